//! Generic tiddler filtering.
//!
//! Implements the `sort=-modified;limit=20` expressions that listings use.
//! Steps are applied in the order they appear in the expression.

use wikispace_store::Tiddler;

pub fn filter_tiddlers(mut tiddlers: Vec<Tiddler>, expr: &str) -> Vec<Tiddler> {
    for step in expr.split(';') {
        let Some((op, value)) = step.split_once('=') else {
            continue;
        };
        match op {
            "sort" => sort_tiddlers(&mut tiddlers, value),
            "limit" => match value.parse::<usize>() {
                Ok(limit) => tiddlers.truncate(limit),
                Err(_) => tracing::warn!("ignoring filter limit {value}"),
            },
            _ => tracing::warn!("ignoring filter step {step}"),
        }
    }
    tiddlers
}

fn sort_tiddlers(tiddlers: &mut [Tiddler], key: &str) {
    let (key, descending) = match key.strip_prefix('-') {
        Some(key) => (key, true),
        None => (key, false),
    };
    match key {
        "modified" => tiddlers.sort_by(|a, b| a.modified.cmp(&b.modified)),
        "title" => tiddlers.sort_by(|a, b| a.title.cmp(&b.title)),
        _ => {
            tracing::warn!("ignoring unknown sort key {key}");
            return;
        }
    }
    if descending {
        tiddlers.reverse();
    }
}
