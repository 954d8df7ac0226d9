//! Locations command - resolve a place name into coordinates

use super::RULE;
use anyhow::Result;
use owo_colors::OwoColorize;
use serde::Serialize;
use tgtg_api_client::{Location, TgtgClient};
use tracing::debug;

/// JSON output for locations
#[derive(Debug, Serialize)]
struct JsonLocationsOutput<'a> {
    query: &'a str,
    total: usize,
    locations: &'a [Location],
}

/// Run locations command
pub async fn run(client: &TgtgClient, query: &str, format: &str) -> Result<()> {
    let locations = client.find_locations(query).await?;
    debug!(count = locations.len(), "Locations resolved");

    if format == "json" {
        let output = JsonLocationsOutput {
            query,
            total: locations.len(),
            locations: &locations,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!();
    println!("{}", RULE.blue());
    println!("  {} {}", "Locations matching".blue().bold(), query.bold());
    println!("{}", RULE.blue());
    println!();

    if locations.is_empty() {
        println!("  {}", "No matches".yellow());
        println!();
        return Ok(());
    }

    println!(
        "  {:<3} {:<40} {}",
        "#".dimmed(),
        "Name".dimmed(),
        "Coordinates".dimmed()
    );
    for (index, location) in locations.iter().enumerate() {
        println!(
            "  {:<3} {:<40} {}",
            index + 1,
            location.name,
            location.coordinates.to_string().cyan()
        );
    }
    println!();

    Ok(())
}
