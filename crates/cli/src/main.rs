use anyhow::Context;
use clap::{Parser, Subcommand};
use shelf_db::{JsonFileStore, RequestStore};
use shelf_kernel::settings::Settings;

#[derive(Debug, Parser)]
#[command(name = "shelf", version, about = "Book request board")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the web server
    Serve,
    /// Print the requests in the configured store
    List {
        /// Print the raw records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the effective settings
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load().with_context(|| "failed to load SHELF settings")?;

    match cli.command {
        Command::Serve => {
            shelf_telemetry::init(&settings.telemetry);
            tracing::info!(env = ?settings.environment, "shelf serve starting");
            shelf_app::run(settings).await
        }
        Command::List { json } => list(&settings, json).await,
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&redacted(settings))?);
            Ok(())
        }
    }
}

async fn list(settings: &Settings, json: bool) -> anyhow::Result<()> {
    let store = JsonFileStore::load(&settings.store.path).await;
    let requests = store.list().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&requests)?);
        return Ok(());
    }

    if requests.is_empty() {
        println!("no requests in {}", store.path().display());
        return Ok(());
    }

    for request in &requests {
        let mark = if request.checked { "x" } else { " " };
        println!(
            "[{}] {} by {} (for {}) {}",
            mark, request.title, request.author, request.name, request.id
        );
    }
    Ok(())
}

fn redacted(mut settings: Settings) -> Settings {
    if !settings.google_books.api_key.is_empty() {
        settings.google_books.api_key = "********".to_string();
    }
    settings
}
