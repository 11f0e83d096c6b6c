mod common;

use axum::http::StatusCode;
use common::CANONICAL_HOST;
use common::request;
use common::request_body;
use pretty_assertions::assert_eq;

#[tokio::test]
async fn test_host_meta() {
    let (status, headers, body) = request("/.well-known/host-meta", CANONICAL_HOST).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        headers.get("Content-Type").unwrap(),
        "application/xrd+xml"
    );
    assert!(body.contains(
        "<hm:Host xmlns=\"http://host-meta.net/xrd/1.0\">wiki.example.org</hm:Host>"
    ));
    assert!(body.contains("http://wiki.example.org/webfinger?q={uri}"));
}

#[tokio::test]
async fn test_discovery_requires_canonical_host() {
    for uri in ["/.well-known/host-meta", "/webfinger?q=alice"] {
        let (status, _headers, body) = request(uri, "alice.wiki.example.org").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("alice.wiki.example.org"));
    }
}

#[tokio::test]
async fn test_webfinger_requires_account() {
    let (status, body) = request_body("/webfinger").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("No account provided"));

    let (status, _body) = request_body("/webfinger?q=").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_webfinger_normalizes_accounts() {
    let subject = "<Subject>acct:alice@wiki.example.org</Subject>";
    let (status, plain) = request_body("/webfinger?q=alice").await;
    assert_eq!(status, StatusCode::OK);
    assert!(plain.contains(subject));

    let (status, prefixed) = request_body("/webfinger?q=acct:alice@wiki.example.org").await;
    assert_eq!(status, StatusCode::OK);
    assert!(prefixed.contains(subject));

    assert!(plain.contains("http://wiki.example.org/profiles/alice"));
    assert!(plain.contains("/search.atom?q=modifier:alice"));
}

#[tokio::test]
async fn test_webfinger_unknown_account() {
    // The store is not consulted; unknown accounts get a descriptor too.
    let (status, body) = request_body("/webfinger?q=carol").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("acct:carol@wiki.example.org"));
}

#[tokio::test]
async fn test_search_atom() {
    let (status, headers, body) = request("/search.atom?q=modifier:alice", CANONICAL_HOST).await;
    assert_eq!(status, StatusCode::OK);
    let content_type = headers.get("Content-Type").unwrap().to_str().unwrap();
    assert!(content_type.starts_with("application/atom+xml"));
    assert!(body.contains("<feed xmlns=\"http://www.w3.org/2005/Atom\">"));
    assert_eq!(body.matches("<entry>").count(), 20);
    assert!(body.contains("<author><name>alice</name></author>"));

    let (status, body) = request_body("/search.atom").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("No search query"));
}
