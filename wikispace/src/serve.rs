use crate::ServeArgs;
use crate::data;
use crate::error::HttpError;
use crate::html::PageSettings;
use crate::html::escape_html;
use crate::html::page;
use crate::wikitext::render_wikitext;
use axum::Router;
use axum::body::Body;
use axum::extract::Path;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::HeaderValue;
use axum::http::Response;
use axum::http::StatusCode;
use axum::routing::get;
use indoc::formatdoc;
use indoc::indoc;
use rusqlite::Connection;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::sync::MutexGuard;
use wikispace_store::Tiddler;

#[derive(Clone)]
pub struct ServerContext {
    pub args: ServeArgs,
    pub conn: Arc<Mutex<Connection>>,
}

impl ServerContext {
    pub fn new(args: ServeArgs, conn: Connection) -> Self {
        Self {
            args: args.clone(),
            conn: Arc::new(Mutex::new(conn)),
        }
    }
    pub async fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().await
    }
}

pub fn response<D: Sized>(
    status: StatusCode,
    headers: HeaderMap,
    body: D,
    ctx: &ServerContext,
) -> Response<Body>
where
    Body: From<D>,
{
    let mut response: Response<Body> = Response::default();
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    if ctx.args.production {
        response.headers_mut().insert(
            "Strict-Transport-Security",
            HeaderValue::from_static("max-age=604800; preload"), // 1 week.
        );
    }
    *response.body_mut() = Body::from(body);
    response
}

pub fn content_type(headers: &mut HeaderMap, content_type: &str) {
    let val = HeaderValue::from_str(content_type).unwrap();
    headers.insert("Content-Type", val);
}

pub fn enable_caching(headers: &mut HeaderMap, max_age: u32) {
    // `must-revalidate` avoids stale responses when disconnected.
    let src = format!("public, max-age={max_age}, must-revalidate");
    let val = HeaderValue::from_str(&src).unwrap();
    headers.insert(hyper::header::CACHE_CONTROL, val);
}

async fn get_home(State(ctx): State<ServerContext>) -> Response<Body> {
    let site_name = escape_html(&ctx.args.site_name);
    let body = formatdoc! {"
        <div class='home'>
            <h1>{site_name}</h1>
            <p>A hosting platform for personal wikis. Spaces live on their own
            subdomains; public profiles live at <code>/profiles/&lt;name&gt;</code>.</p>
        </div>
    "};
    let settings = PageSettings::new("", "");
    let body = page(&ctx, &settings, &body);
    let mut headers = HeaderMap::new();
    content_type(&mut headers, "text/html; charset=UTF-8");
    response(StatusCode::OK, headers, body, &ctx)
}

async fn get_tiddler(
    State(ctx): State<ServerContext>,
    Path((bag, title)): Path<(String, String)>,
) -> Result<Response<Body>, HttpError> {
    let tiddler = {
        let conn = ctx.conn().await;
        Tiddler::get(&conn, &bag, &title)?
    };
    let html = render_wikitext(&tiddler, &ctx);
    let heading = escape_html(&tiddler.title);
    let modifier = escape_html(&tiddler.modifier);
    let modified = tiddler.modified.format("%Y-%m-%d").to_string();
    let body = formatdoc! {r#"
        <div class="tiddler">
        <h1>{heading}</h1>
        <div class="tiddler-meta">last modified by {modifier} on {modified}</div>
        {html}
        </div>
    "#};
    let settings = PageSettings::new(&tiddler.title, "");
    let body = page(&ctx, &settings, &body);
    let mut headers = HeaderMap::new();
    content_type(&mut headers, "text/html; charset=UTF-8");
    Ok(response(StatusCode::OK, headers, body, &ctx))
}

pub async fn not_found(State(ctx): State<ServerContext>) -> Response<Body> {
    let body = indoc! {"
        <div style='text-align: center; margin-top: 100px;'>
            <h1>Not found</h1>
            <p>The page you are looking for does not exist.</p>
        </div>
    "};
    let settings = PageSettings::new("not found", "");
    let body = page(&ctx, &settings, body);
    let mut headers = HeaderMap::new();
    content_type(&mut headers, "text/html; charset=UTF-8");
    response(StatusCode::NOT_FOUND, headers, body, &ctx)
}

pub fn app(ctx: ServerContext) -> Router {
    let router = Router::new()
        .route("/", get(get_home))
        .route("/bags/{bag}/tiddlers/{title}", get(get_tiddler));
    let router = crate::profiles::routes(&router);
    let router = crate::feed::routes(&router);
    let router = router.fallback(not_found);
    router.with_state(ctx)
}

pub async fn run(args: &ServeArgs) {
    let conn = data::connect(args).unwrap();
    data::init(args, &conn);
    let ctx = ServerContext::new(args.clone(), conn);
    let app = app(ctx);
    let addr = format!("0.0.0.0:{}", args.port);
    tracing::info!("Listening on {addr}");
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
