use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use match_history::api::{build_router, state::AppState};
use match_history::assets::AssetResolver;
use match_history::config::AppConfig;
use match_history::fetch::{HttpPlayerSource, JsonFileSource, PlayerPage, PlayerSource};
use match_history::render::TextRenderer;
use match_history::view_state::DayToggle;
use match_history::RiotId;

#[derive(Parser)]
#[command(name = "match-history")]
#[command(about = "Player match history grouped by day")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a player's match history
    Show {
        /// Riot id as `name#tag`
        riot_id: String,

        /// Read profile.json, stats.json and history.json from this directory
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Expand this day (YYYY-MM-DD)
        #[arg(long, conflicts_with = "expand_latest")]
        expand: Option<String>,

        /// Expand the most recent day
        #[arg(long)]
        expand_latest: bool,

        /// Print the projected history as JSON
        #[arg(long)]
        json: bool,
    },

    /// Start the API server
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port number
        #[arg(long)]
        port: Option<u16>,

        /// Serve saved responses from this directory instead of the HTTP services
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

fn init_tracing(level: &str, json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    // Logs go to stderr so `show` output stays clean.
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn player_source(config: &AppConfig, dir: Option<&Path>) -> Result<Arc<dyn PlayerSource>> {
    Ok(match dir {
        Some(dir) => {
            tracing::info!("Reading player data from {}", dir.display());
            Arc::new(JsonFileSource::new(dir))
        }
        None => Arc::new(
            HttpPlayerSource::new(config.source.clone())
                .context("Failed to build HTTP client")?,
        ),
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config.display()))?;

    let level = cli.log_level.clone().unwrap_or_else(|| config.log_level.clone());
    init_tracing(&level, cli.json_logs);

    tracing::info!("Starting match-history v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Show {
            riot_id,
            dir,
            expand,
            expand_latest,
            json,
        } => {
            let riot_id: RiotId = riot_id.parse()?;
            let source = player_source(&config, dir.as_deref())?;
            let projector = config.display.projector()?;

            let page = PlayerPage::load(source.as_ref(), &riot_id).await?;
            let view = projector.project(&page.history, &riot_id.game_name);

            let mut toggle = DayToggle::new();
            if let Some(day) = expand {
                let day = NaiveDate::parse_from_str(&day, "%Y-%m-%d")
                    .with_context(|| format!("Invalid --expand date (expected YYYY-MM-DD): {}", day))?;
                toggle.toggle(day);
            } else if expand_latest {
                if let Some(day) = view.latest_day() {
                    toggle.toggle(day);
                }
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                let renderer = TextRenderer::new(config.display.date_format.clone());
                print!("{}", renderer.render(&page, &view, toggle.expanded()));
            }
        }
        Commands::Serve { host, port, dir } => {
            let source = player_source(&config, dir.as_deref())?;
            let state = AppState::new(
                source,
                config.display.projector()?,
                AssetResolver::from_config(&config.assets),
            )
            .with_cors_origin(&config.server.cors_origin);

            let app = build_router(state);
            let addr = format!(
                "{}:{}",
                host.unwrap_or(config.server.host),
                port.unwrap_or(config.server.port)
            );
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
