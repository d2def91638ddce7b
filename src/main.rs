//! TubeQA CLI entry point.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tubeqa::cli::{commands, Cli, Commands, Reported};
use tubeqa::config::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    // Initialize logging
    let log_level = match cli.verbose {
        0 => settings.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("tubeqa={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match run(&cli, settings).await {
        // Already shown to the user
        Err(e) if e.is::<Reported>() => std::process::exit(1),
        result => result,
    }
}

async fn run(cli: &Cli, settings: Settings) -> Result<()> {
    // Execute command
    match &cli.command {
        Commands::Ask {
            video,
            question,
            language,
            model,
            show_context,
        } => {
            commands::run_ask(video, question, *language, model.clone(), *show_context, settings)
                .await?;
        }

        Commands::Languages => {
            commands::run_languages();
        }

        Commands::Transcript { video, language } => {
            commands::run_transcript(video, *language, settings).await?;
        }

        Commands::Doctor => {
            commands::run_doctor(&settings)?;
        }

        Commands::Serve { host, port } => {
            commands::run_serve(host, *port, settings).await?;
        }

        Commands::Config { action } => {
            commands::run_config(action, &cli.config, settings)?;
        }
    }

    Ok(())
}
