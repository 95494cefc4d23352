mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use showwatch_core::config::{
    DEFAULT_ARTISTS_PATH, DEFAULT_EVENT_URL_TEMPLATE, DEFAULT_REPORT_SUBJECT,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "showwatch-cli")]
#[command(about = "Watch a venue listing for tracked artists")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch, match and notify once. Exits 1 if the run fails.
    Run,
    /// Validate configuration and the alias file without any network calls.
    CheckConfig,
    /// Match a saved listing offline and print the report without sending.
    Match {
        /// JSON file: a raw listing response or an array of show records.
        #[arg(long)]
        shows: PathBuf,
        #[arg(long, env = "SHOWWATCH_ARTISTS_PATH", default_value = DEFAULT_ARTISTS_PATH)]
        artists: PathBuf,
        #[arg(long, env = "SHOWWATCH_EVENT_URL_TEMPLATE", default_value = DEFAULT_EVENT_URL_TEMPLATE)]
        event_url_template: String,
        #[arg(long, env = "SHOWWATCH_REPORT_SUBJECT", default_value = DEFAULT_REPORT_SUBJECT)]
        subject: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(std::env::var("SHOWWATCH_LOG_LEVEL").unwrap_or_else(|_| "info".into()))
    })?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run => commands::run().await,
        Commands::CheckConfig => {
            commands::check_config()?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Match {
            shows,
            artists,
            event_url_template,
            subject,
        } => {
            let formatter =
                showwatch_core::ReportFormatter::new(subject, event_url_template);
            commands::match_offline(&shows, &artists, &formatter)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[cfg(test)]
mod tests;
