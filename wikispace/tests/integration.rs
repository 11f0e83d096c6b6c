mod common;

use axum::http::StatusCode;
use common::CANONICAL_HOST;
use common::request;
use common::request_body;

#[tokio::test]
async fn test_home() {
    let (status, body) = request_body("/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<!DOCTYPE html>"));
    assert!(body.contains("WikiSpace"));
    assert!(body.contains("<meta property='test' content='test'>"));
}

#[tokio::test]
async fn test_profile_requires_canonical_host() {
    let (status, _headers, body) = request("/profiles/alice", "alice.wiki.example.org").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("alice.wiki.example.org"));
}

#[tokio::test]
async fn test_profile_unknown_user() {
    let (status, body) = request_body("/profiles/carol").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("Profile not found for carol"));
}

#[tokio::test]
async fn test_profile_without_profile_tiddler() {
    // Bob exists and has activity, but never wrote a profile tiddler. The
    // store's error detail is part of the message.
    let (status, body) = request_body("/profiles/bob").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("No profile for bob"));
    assert!(body.contains("bob_public"));
}

#[tokio::test]
async fn test_profile_page() {
    let (status, headers, body) = request("/profiles/alice", CANONICAL_HOST).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        headers.get("Content-Type").unwrap(),
        "text/html; charset=UTF-8"
    );
    assert!(body.contains("<title>Profile for alice - WikiSpace</title>"));
    // The rendered profile wikitext.
    assert!(body.contains("<h1>Alice</h1>"));
    assert!(body.contains("/recipes/alice_public/tiddlers/SiteIcon"));
    // The alternate link points at the space's activity feed.
    assert!(body.contains("Atom activity feed"));
    assert!(body.contains("alice.wiki.example.org/search.atom?q=modifier:alice"));
}

#[tokio::test]
async fn test_profile_activity_listing() {
    let (status, body) = request_body("/profiles/alice").await;
    assert_eq!(status, StatusCode::OK);
    // 26 tiddlers were modified by alice; the listing caps at 20.
    assert_eq!(body.matches("<li>").count(), 20);
    // Descending modification time: the profile edit is the most recent,
    // then the notes in order.
    let profile = body.find("tiddlers/profile\"").unwrap();
    let note_01 = body.find("Note 01").unwrap();
    let note_19 = body.find("Note 19").unwrap();
    assert!(profile < note_01);
    assert!(note_01 < note_19);
    // Links percent-encode bag and title.
    assert!(body.contains("/bags/alice_public/tiddlers/Note%2001"));
    assert!(!body.contains("Note 20"));
    assert!(!body.contains("Note 25"));
}

#[tokio::test]
async fn test_tiddler_page() {
    let (status, body) = request_body("/bags/alice_public/tiddlers/Note%2001").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Note 01"));
    assert!(body.contains("note number 1."));
    assert!(body.contains("last modified by alice"));

    let (status, body) = request_body("/bags/alice_public/tiddlers/Missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("Missing"));
}

#[tokio::test]
async fn test_fallback() {
    let (status, body) = request_body("/no-such-page").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("<!DOCTYPE html>"));
}
