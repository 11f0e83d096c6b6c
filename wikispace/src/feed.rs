//! Atom activity feeds at `/search.atom`.
//!
//! Webfinger documents and profile pages link here for "recent activity by
//! this user" style listings.

use crate::error::HttpError;
use crate::filter::filter_tiddlers;
use crate::host::server_base_url;
use crate::html::escape_xml;
use crate::serve::ServerContext;
use crate::serve::content_type;
use crate::serve::response;
use axum::Router;
use axum::body::Body;
use axum::extract::Query;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::Response;
use axum::http::StatusCode;
use axum::routing::get;
use serde::Deserialize;
use wikispace_store::Tiddler;

fn xml_header() -> &'static str {
    "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"
}

fn atom_datetime(dt: &chrono::DateTime<chrono::Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

fn atom_feed(ctx: &ServerContext, query: &str, tiddlers: &[Tiddler]) -> String {
    let base = server_base_url(ctx);
    let title = escape_xml(&format!("Search results for {query}"));
    let feed_id = format!("{base}/search.atom?q={}", urlencoding::encode(query));
    let feed_id = escape_xml(&feed_id);
    let updated = match tiddlers.first() {
        Some(tiddler) => atom_datetime(&tiddler.modified),
        None => atom_datetime(&chrono::Utc::now()),
    };
    let mut body = String::new();
    body.push_str(xml_header());
    body.push_str("<feed xmlns=\"http://www.w3.org/2005/Atom\">\n");
    body.push_str(&format!("<title>{title}</title>\n"));
    body.push_str(&format!("<id>{feed_id}</id>\n"));
    body.push_str(&format!("<link href=\"{feed_id}\" rel=\"self\"/>\n"));
    body.push_str(&format!("<updated>{updated}</updated>\n"));
    for tiddler in tiddlers {
        let url = format!(
            "{base}/bags/{}/tiddlers/{}",
            urlencoding::encode(&tiddler.bag),
            urlencoding::encode(&tiddler.title)
        );
        let title = escape_xml(&tiddler.title);
        let author = escape_xml(&tiddler.modifier);
        let updated = atom_datetime(&tiddler.modified);
        let entry = format!(
            "
            <entry>
            <title>{title}</title>
            <link href=\"{url}\"/>
            <id>{url}</id>
            <updated>{updated}</updated>
            <author><name>{author}</name></author>
            </entry>
            "
        );
        body.push_str(&entry);
    }
    body.push_str("</feed>\n");
    crate::html::minify(&body)
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    q: Option<String>,
}

async fn get_search_atom(
    State(ctx): State<ServerContext>,
    Query(query): Query<SearchQuery>,
) -> Result<Response<Body>, HttpError> {
    let q = query
        .q
        .filter(|q| !q.is_empty())
        .ok_or_else(|| HttpError::BadRequest("No search query provided".to_string()))?;
    let tiddlers = {
        let conn = ctx.conn().await;
        Tiddler::search(&conn, &q)?
    };
    let tiddlers = filter_tiddlers(tiddlers, "sort=-modified;limit=20");
    let body = atom_feed(&ctx, &q, &tiddlers);
    let mut headers = HeaderMap::new();
    content_type(&mut headers, "application/atom+xml; charset=utf-8");
    Ok(response(StatusCode::OK, headers, body, &ctx))
}

pub fn routes(router: &Router<ServerContext>) -> Router<ServerContext> {
    router.clone().route("/search.atom", get(get_search_atom))
}
