pub mod data;
mod error;
mod feed;
mod filter;
pub mod health;
pub mod host;
pub mod html;
mod profiles;
pub mod serve;
mod wikitext;

use clap::Parser;

#[derive(Clone, Debug, Parser)]
pub struct ServeArgs {
    #[arg(long, env = "WIKISPACE_PRODUCTION")]
    pub production: bool,
    #[arg(long, env = "WIKISPACE_PORT", default_value = "3000")]
    pub port: u16,
    #[arg(long, env = "WIKISPACE_DATABASE_PATH", default_value = "/data/db.sqlite")]
    pub database_path: String,
    /// The canonical host of the root site, for example "wiki.example.org".
    ///
    /// Discovery endpoints and profile pages are only served on this host,
    /// not on tenant subdomains.
    #[arg(long, env = "WIKISPACE_HOST", default_value = "localhost:3000")]
    pub server_host: String,
    /// The name of the website.
    #[arg(long, env = "WIKISPACE_SITE_NAME", default_value = "WikiSpace")]
    pub site_name: String,
    /// The language of the website.
    #[arg(long, env = "WIKISPACE_HTML_LANG", default_value = "en")]
    pub html_lang: String,
    /// Content that is added to the `<head>` tag of every HTML page.
    #[arg(long, env = "WIKISPACE_EXTRA_HEAD", default_value = "")]
    pub extra_head: String,
}
