use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use zamarank_card::Background;
use zamarank_client::{ZamaClient, ZamaClientConfig};
use zamarank_core::normalize_handle;

#[derive(Debug, Parser)]
#[command(name = "zamarank-cli")]
#[command(about = "Look up Zamarank season and leaderboard ranks for a handle")]
struct Cli {
    /// Override the upstream API root.
    #[arg(long, global = true, env = "ZAMARANK_API_BASE_URL")]
    api_base_url: Option<String>,

    /// Override the page limit per timeframe.
    #[arg(long, global = true, env = "ZAMARANK_MAX_PAGES")]
    max_pages: Option<u32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the normalized profile as JSON.
    Profile {
        handle: String,
        #[arg(long)]
        pretty: bool,
    },
    /// Render the profile card to a PNG file.
    Card {
        handle: String,
        #[arg(short, long, default_value = "card.png")]
        out: PathBuf,
        /// Background image; defaults to `ZAMARANK_CARD_BACKGROUND`.
        #[arg(long)]
        background: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = zamarank_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let mut client_config = ZamaClientConfig::from_app_config(&config);
    if let Some(base) = cli.api_base_url {
        client_config.api_base_url = base;
    }
    if let Some(max_pages) = cli.max_pages {
        client_config.max_pages = max_pages;
    }
    let client = ZamaClient::new(&client_config)?;

    match cli.command {
        Commands::Profile { handle, pretty } => {
            let profile = client.build_profile(&normalize_handle(&handle)).await?;
            let json = if pretty {
                serde_json::to_string_pretty(&profile)?
            } else {
                serde_json::to_string(&profile)?
            };
            println!("{json}");
        }
        Commands::Card {
            handle,
            out,
            background,
        } => {
            let background_path = background.or(config.card_background_path);
            let background = Background::load(background_path.as_deref())?;
            let profile = client.build_profile(&normalize_handle(&handle)).await?;
            let png = zamarank_card::render_card(&profile, &background)?;
            std::fs::write(&out, png)?;
            tracing::info!(path = %out.display(), "card written");
            println!("{}", out.display());
        }
    }

    Ok(())
}
