//! Wikitext rendering.
//!
//! Tiddler bodies are Markdown. Rendering takes the server context because
//! root-relative links in the output are resolved against the canonical base
//! URL.

use crate::host::server_base_url;
use crate::serve::ServerContext;
use markdown::Options;
use wikispace_store::Tiddler;

fn to_html_options() -> Options {
    let mut options = Options::default();
    // Wiki content is authored by the space owner.
    options.compile.allow_dangerous_html = true;
    options
}

fn absolutize_links(html: &str, base: &str) -> String {
    html.replace("href=\"/", &format!("href=\"{base}/"))
}

#[test]
fn test_absolutize_links() {
    let html = "<a href=\"/profiles/alice\">alice</a> <a href=\"https://example.com\">x</a>";
    let actual = absolutize_links(html, "http://wiki.example.org");
    assert!(actual.contains("href=\"http://wiki.example.org/profiles/alice\""));
    assert!(actual.contains("href=\"https://example.com\""));
}

/// Render a tiddler's text to HTML.
pub fn render_wikitext(tiddler: &Tiddler, ctx: &ServerContext) -> String {
    let html = markdown::to_html_with_options(&tiddler.text, &to_html_options()).unwrap();
    absolutize_links(&html, &server_base_url(ctx))
}
