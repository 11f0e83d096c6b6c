//! Canonical host handling for the root site.
//!
//! Tenants live on subdomains of the canonical host; the endpoints in this
//! crate are only served on the root host itself.

use crate::serve::ServerContext;
use axum::http::HeaderMap;

/// Returns the host the client asked for and the canonical host.
///
/// Callers compare the two for equality to decide whether an endpoint is
/// served at all.
pub fn determine_host(ctx: &ServerContext, headers: &HeaderMap) -> (String, String) {
    let requested = headers
        .get(hyper::header::HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
        .to_string();
    (requested, ctx.args.server_host.clone())
}

fn scheme(ctx: &ServerContext) -> &'static str {
    if ctx.args.production { "https" } else { "http" }
}

/// The base URL of the canonical server, without a trailing slash.
pub fn server_base_url(ctx: &ServerContext) -> String {
    format!("{}://{}", scheme(ctx), ctx.args.server_host)
}

/// The base URI of a tenant space, with a trailing slash.
///
/// A space named "alice" on "wiki.example.org" lives at
/// "http(s)://alice.wiki.example.org/".
pub fn space_uri(ctx: &ServerContext, space: &str) -> String {
    format!("{}://{}.{}/", scheme(ctx), space, ctx.args.server_host)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ServeArgs;
    use rusqlite::Connection;

    fn test_ctx(production: bool) -> ServerContext {
        let args = ServeArgs {
            production,
            port: 3000,
            database_path: "".to_string(),
            server_host: "wiki.example.org".to_string(),
            site_name: "WikiSpace".to_string(),
            html_lang: "en".to_string(),
            extra_head: "".to_string(),
        };
        let conn = Connection::open_in_memory().unwrap();
        ServerContext::new(args, conn)
    }

    #[test]
    fn test_determine_host() {
        let ctx = test_ctx(false);
        let mut headers = HeaderMap::new();
        headers.insert(hyper::header::HOST, "alice.wiki.example.org".parse().unwrap());
        let (requested, canonical) = determine_host(&ctx, &headers);
        assert_eq!(requested, "alice.wiki.example.org");
        assert_eq!(canonical, "wiki.example.org");
    }

    #[test]
    fn test_space_uri() {
        let ctx = test_ctx(false);
        assert_eq!(space_uri(&ctx, "alice"), "http://alice.wiki.example.org/");
        assert_eq!(server_base_url(&ctx), "http://wiki.example.org");
        let ctx = test_ctx(true);
        assert_eq!(space_uri(&ctx, "alice"), "https://alice.wiki.example.org/");
    }
}
