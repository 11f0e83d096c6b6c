use axum::body::Body;
use axum::extract::Request;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use http_body_util::BodyExt;
use rusqlite::Connection;
use tower::util::ServiceExt;
use wikispace::ServeArgs;
use wikispace::data;
use wikispace::serve::ServerContext;
use wikispace::serve::app;

pub const CANONICAL_HOST: &str = "wiki.example.org";

pub trait TestDefault {
    fn test_default() -> Self;
}

impl TestDefault for ServeArgs {
    fn test_default() -> Self {
        Self {
            production: false,
            port: 3000,
            database_path: "".to_string(),
            server_host: CANONICAL_HOST.to_string(),
            site_name: "WikiSpace".to_string(),
            html_lang: "en".to_string(),
            extra_head: "<meta property='test' content='test'>".to_string(),
        }
    }
}

impl TestDefault for Connection {
    fn test_default() -> Self {
        let args = ServeArgs::test_default();
        let conn = data::connect(&args).unwrap();
        data::init(&args, &conn);
        conn
    }
}

/// Send a request with an explicit `Host` header and return the full response.
pub async fn request(uri: &str, host: &str) -> (StatusCode, HeaderMap, String) {
    let args = ServeArgs::test_default();
    let conn = Connection::test_default();
    let ctx = ServerContext::new(args, conn);
    let app = app(ctx);
    let req = Request::builder()
        .uri(uri)
        .header("Host", host)
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap();
    let body: Vec<u8> = body.to_bytes().into();
    let body = String::from_utf8(body).unwrap();
    (status, headers, body)
}

/// Send a request on the canonical host.
pub async fn request_body(uri: &str) -> (StatusCode, String) {
    let (status, _headers, body) = request(uri, CANONICAL_HOST).await;
    (status, body)
}
