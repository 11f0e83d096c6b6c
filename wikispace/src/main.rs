use clap::Parser;
use tracing::Level;
use tracing::subscriber::SetGlobalDefaultError;
use wikispace::ServeArgs;
use wikispace::health::HealthArgs;

#[derive(Debug, clap::Subcommand)]
#[allow(clippy::large_enum_variant)]
enum Task {
    /// Start the server.
    Serve(ServeArgs),
    /// Check whether a running server responds.
    CheckHealth(HealthArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Whether to print verbose logs.
    #[arg(long)]
    verbose: bool,
    /// Whether to use ANSI colors.
    #[arg(long)]
    ansi: Option<bool>,
    #[command(subcommand)]
    task: Task,
}

/// Initialize logging with the given level.
pub fn init_subscriber(level: Level, ansi: bool) -> Result<(), SetGlobalDefaultError> {
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(level)
        .with_test_writer()
        .without_time()
        .with_target(false)
        .with_ansi(ansi)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    init_subscriber(level, args.ansi.unwrap_or(true)).unwrap();

    match &args.task {
        Task::Serve(args) => {
            wikispace::serve::run(args).await;
        }
        Task::CheckHealth(args) => {
            wikispace::health::check_health(args).await;
        }
    }
}
