use std::sync::Arc;

use agrifeed_core::{http::build_client, AppError, Config};
use agrifeed_dashboard::{Dashboard, Scheduler, TerminalPresenter};
use agrifeed_weather::CropBook;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

/// Farm dashboard: weather advisories, agriculture news and crop questions.
///
/// Examples:
///   agrifeed
///   agrifeed ask "what soil does cotton need"
#[derive(Parser)]
#[command(name = "agrifeed", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the live dashboard until Ctrl-C (the default).
    Dashboard,
    /// Answer a crop question from local crop data.
    Ask {
        /// The question, e.g. "ideal temperature for wheat"
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    agrifeed_core::init()?;

    let (config, _) = match Config::load_validated() {
        Ok(loaded) => loaded,
        Err(e) => {
            let err = AppError::classify(e);
            eprintln!("{}", err.user_message());
            return Err(err.into());
        }
    };

    match cli.command.unwrap_or(Command::Dashboard) {
        Command::Dashboard => run_dashboard(config).await,
        Command::Ask { question } => {
            ask(&config, &question.join(" "));
            Ok(())
        }
    }
}

fn ask(config: &Config, question: &str) {
    let book = CropBook::from_config(&config.crops);
    match book.answer(question) {
        Some(answer) => {
            tracing::debug!("Answered from {}", answer.source());
            println!("{}", answer);
        }
        None => println!(
            "No local answer. Name a crop and ask about its temperature, soil, water, rainfall or growing time."
        ),
    }
}

async fn run_dashboard(config: Config) -> Result<()> {
    if !config.services.has_weather_key() {
        tracing::warn!("No weather API key configured; advisories will show an error");
    }
    if !config.services.has_news_key() {
        tracing::warn!("No news API key configured; the news panel will stay empty");
    }

    let client = build_client(&config.services.user_agent).context("Failed to build HTTP client")?;
    let presenter = Arc::new(TerminalPresenter::stdout());
    let dashboard = Arc::new(Dashboard::new(&config, client, presenter));

    let scheduler = Scheduler::new(dashboard, &config.refresh);
    let shutdown = scheduler.shutdown_token();
    let schedule = tokio::spawn(scheduler.run());

    tracing::info!("AgriFeed started");

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;
    tracing::info!("Shutting down");
    shutdown.cancel();

    schedule.await.context("Refresh schedule panicked")?;
    Ok(())
}
