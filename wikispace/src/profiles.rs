//! Profile pages and OStatus discovery.
//!
//! Implements host-meta, webfinger, and the per-user public profile page.
//! All three are served on the canonical root host only; tenant subdomains
//! refuse them with a 404 naming the mismatched host.

use crate::error::HttpError;
use crate::filter::filter_tiddlers;
use crate::host::determine_host;
use crate::host::server_base_url;
use crate::host::space_uri;
use crate::html::PageSettings;
use crate::html::escape_html;
use crate::html::escape_xml;
use crate::html::page;
use crate::serve::ServerContext;
use crate::serve::content_type;
use crate::serve::enable_caching;
use crate::serve::response;
use crate::wikitext::render_wikitext;
use axum::Router;
use axum::body::Body;
use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::Response;
use axum::http::StatusCode;
use axum::routing::get;
use indoc::formatdoc;
use serde::Deserialize;
use wikispace_store::StoreError;
use wikispace_store::Tiddler;
use wikispace_store::User;

fn host_meta_xrd(host: &str, server_host: &str) -> String {
    formatdoc! {r#"
        <?xml version="1.0" encoding="UTF-8"?>
        <XRD xmlns="http://docs.oasis-open.org/ns/xri/xrd-1.0" xmlns:hm="http://host-meta.net/xrd/1.0">
        <hm:Host xmlns="http://host-meta.net/xrd/1.0">{host}</hm:Host>
        <Link rel="lrdd" template="{server_host}/webfinger?q={{uri}}">
        <Title>Resource Descriptor</Title>
        </Link>
        </XRD>
    "#}
}

fn webfinger_xrd(username: &str, host: &str, server_host: &str) -> String {
    formatdoc! {r#"
        <?xml version="1.0"?>
        <XRD xmlns="http://docs.oasis-open.org/ns/xri/xrd-1.0">
        <Subject>acct:{username}@{host}</Subject>
        <Alias>{server_host}/profiles/{username}</Alias>
        <Link rel="http://webfinger.net/rel/profile-page"
              href="{server_host}/profiles/{username}"
              type="text/html"/>
        <Link rel="describedby"
              href="{server_host}/profiles/{username}"
              type="text/html"/>
        <Link rel="http://schemas.google.com/g/2010#updates-from"
              href="{server_host}/search.atom?q=modifier:{username}"
              type="application/atom+xml"/>
        </XRD>
    "#}
}

fn profile_body(server_host: &str, avatar_path: &str, profile: &str, tiddlers: &str) -> String {
    formatdoc! {r#"
        <div class="tiddler">
        <img style="float:right" src="{server_host}{avatar_path}" alt="avatar"/>
        {profile}
        </div>
        <div>
        <ul id="tiddlers" class="listing">
        {tiddlers}
        </ul>
        </div>
    "#}
}

async fn get_host_meta(
    State(ctx): State<ServerContext>,
    headers: HeaderMap,
) -> Result<Response<Body>, HttpError> {
    let (http_host, host_url) = determine_host(&ctx, &headers);
    if http_host != host_url {
        return Err(HttpError::NotFound(format!(
            "No host-meta at this host: {http_host}"
        )));
    }
    let body = host_meta_xrd(&escape_xml(&http_host), &server_base_url(&ctx));
    let mut headers = HeaderMap::new();
    content_type(&mut headers, "application/xrd+xml");
    // The document depends only on configuration.
    enable_caching(&mut headers, 600);
    Ok(response(StatusCode::OK, headers, body, &ctx))
}

#[derive(Debug, Deserialize)]
struct WebfingerQuery {
    q: Option<String>,
}

/// Reduce an account identifier to its local username.
///
/// Accepts `alice`, `acct:alice`, and `acct:alice@example.org` alike.
fn normalize_account(account: &str) -> &str {
    let account = account.strip_prefix("acct:").unwrap_or(account);
    match account.split_once('@') {
        Some((local, _host)) => local,
        None => account,
    }
}

#[test]
fn test_normalize_account() {
    assert_eq!(normalize_account("alice"), "alice");
    assert_eq!(normalize_account("acct:alice"), "alice");
    assert_eq!(normalize_account("acct:alice@wiki.example.org"), "alice");
    assert_eq!(normalize_account("alice@wiki.example.org"), "alice");
}

async fn get_webfinger(
    State(ctx): State<ServerContext>,
    headers: HeaderMap,
    Query(query): Query<WebfingerQuery>,
) -> Result<Response<Body>, HttpError> {
    let (http_host, host_url) = determine_host(&ctx, &headers);
    if http_host != host_url {
        return Err(HttpError::NotFound(format!(
            "No webfinger at this host: {http_host}"
        )));
    }
    let account = query
        .q
        .filter(|q| !q.is_empty())
        .ok_or_else(|| HttpError::BadRequest("No account provided to webfinger query".to_string()))?;
    // The store is not consulted: any syntactically valid account gets a
    // descriptor, even one that does not exist.
    let username = normalize_account(&account);
    let body = webfinger_xrd(
        &escape_xml(username),
        &escape_xml(&http_host),
        &server_base_url(&ctx),
    );
    let mut headers = HeaderMap::new();
    content_type(&mut headers, "application/xrd+xml");
    Ok(response(StatusCode::OK, headers, body, &ctx))
}

async fn get_profile(
    State(ctx): State<ServerContext>,
    headers: HeaderMap,
    Path(username): Path<String>,
) -> Result<Response<Body>, HttpError> {
    let (http_host, host_url) = determine_host(&ctx, &headers);
    if http_host != host_url {
        return Err(HttpError::NotFound(format!(
            "No profiles at this host: {http_host}"
        )));
    }

    let (profile_tiddler, recent) = {
        let conn = ctx.conn().await;
        User::get(&conn, &username).map_err(|err| match err {
            StoreError::NoUser(_) => {
                HttpError::NotFound(format!("Profile not found for {username}"))
            }
            err => err.into(),
        })?;
        let bag = format!("{username}_public");
        let profile_tiddler = Tiddler::get(&conn, &bag, "profile")
            .map_err(|err| HttpError::NotFound(format!("No profile for {username}: {err}")))?;
        let recent = Tiddler::search(&conn, &format!("modifier:{username}"))?;
        (profile_tiddler, recent)
    };

    let profile_html = render_wikitext(&profile_tiddler, &ctx);

    let recent = filter_tiddlers(recent, "sort=-modified;limit=20");
    let items = recent
        .iter()
        .map(|tiddler| {
            format!(
                "<li><a href=\"/bags/{}/tiddlers/{}\">{}</a></li>",
                urlencoding::encode(&tiddler.bag),
                urlencoding::encode(&tiddler.title),
                escape_html(&tiddler.title)
            )
        })
        .collect::<Vec<String>>()
        .join("\n");

    let avatar_path = format!("/recipes/{username}_public/tiddlers/SiteIcon");
    let body = profile_body(
        &server_base_url(&ctx),
        &avatar_path,
        &profile_html,
        &items,
    );

    let activity_feed = format!(
        "{}search.atom?q=modifier:{username}",
        space_uri(&ctx, &username)
    );
    let alternate = format!(
        "<link rel=\"alternate\" type=\"application/atom+xml\" title=\"Atom activity feed\" href=\"{}\" />",
        escape_html(&activity_feed)
    );
    let title = format!("Profile for {username}");
    let settings = PageSettings::new(&title, &alternate);
    let body = page(&ctx, &settings, &body);
    let mut headers = HeaderMap::new();
    content_type(&mut headers, "text/html; charset=UTF-8");
    Ok(response(StatusCode::OK, headers, body, &ctx))
}

pub fn routes(router: &Router<ServerContext>) -> Router<ServerContext> {
    router
        .clone()
        .route("/.well-known/host-meta", get(get_host_meta))
        .route("/webfinger", get(get_webfinger))
        .route("/profiles/{username}", get(get_profile))
}
