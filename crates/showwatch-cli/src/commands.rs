use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use showwatch_core::{
    load_app_config, load_artists, match_shows, AliasTable, Report, ReportFormatter, ShowRecord,
};
use showwatch_pipeline::from_app_config;
use showwatch_scraper::ListingResponse;

pub async fn run() -> anyhow::Result<ExitCode> {
    let config = load_app_config()?;
    let pipeline = from_app_config(&config)?;
    let outcome = pipeline.run().await;

    println!("{}", serde_json::to_string_pretty(&outcome)?);

    Ok(if outcome.is_failure() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

pub fn check_config() -> anyhow::Result<()> {
    let config = load_app_config()?;
    let pipeline = from_app_config(&config)?;

    println!("environment:  {}", config.env);
    println!("channel:      {} -> {}", config.channel.kind, config.channel.destination);
    println!("schedule:     {}", config.schedule);
    println!(
        "seen-store:   {}",
        config
            .seen_path
            .as_ref()
            .map_or_else(|| "disabled".to_string(), |p| p.display().to_string())
    );
    println!("artists ({}):", pipeline.aliases().len());
    for alias in pipeline.aliases().entries() {
        println!(
            "  {} [{}]",
            alias.canonical_name,
            alias.surface_forms.join(", ")
        );
    }
    println!("configuration ok");
    Ok(())
}

pub fn match_offline(
    shows_path: &Path,
    artists_path: &Path,
    formatter: &ReportFormatter,
) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(shows_path)
        .with_context(|| format!("failed to read {}", shows_path.display()))?;
    let aliases = load_artists(artists_path)?;

    match render_offline(&content, &aliases, formatter)? {
        Some(report) => {
            println!("{}\n", report.subject);
            print!("{}", report.body);
        }
        None => println!("no matches"),
    }
    Ok(())
}

/// Renders the report for a saved listing, or `None` when nothing matched.
fn render_offline(
    content: &str,
    aliases: &AliasTable,
    formatter: &ReportFormatter,
) -> anyhow::Result<Option<Report>> {
    let shows = parse_shows(content)?;
    let matches = match_shows(&shows, aliases);
    tracing::info!(
        show_count = shows.len(),
        match_count = matches.len(),
        "matched saved listing"
    );

    if matches.is_empty() {
        return Ok(None);
    }
    Ok(Some(formatter.format(&matches)?))
}

/// Accepts either a bare array of show records or a full listing response.
fn parse_shows(content: &str) -> anyhow::Result<Vec<ShowRecord>> {
    let value: serde_json::Value =
        serde_json::from_str(content).context("shows file is not valid JSON")?;

    if value.is_array() {
        return serde_json::from_value(value).context("invalid show record array");
    }
    let listing: ListingResponse =
        serde_json::from_value(value).context("invalid listing response")?;
    Ok(listing.into_shows())
}

#[cfg(test)]
#[path = "commands_test.rs"]
mod tests;
