//! Stores command - list stores around a point

use super::RULE;
use anyhow::{Result, bail};
use owo_colors::OwoColorize;
use serde::Serialize;
use tgtg_api_client::{Coordinates, Store, TgtgClient};
use tracing::debug;

/// JSON output for stores
#[derive(Debug, Serialize)]
struct JsonStoresOutput<'a> {
    center: Coordinates,
    radius_km: f64,
    total: usize,
    stores: &'a [Store],
}

/// Run stores command
pub async fn run(
    client: &TgtgClient,
    lat: f64,
    lon: f64,
    radius: f64,
    format: &str,
) -> Result<()> {
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        bail!("coordinates out of range: {lat}, {lon}");
    }
    if !radius.is_finite() || radius <= 0.0 {
        bail!("radius must be a positive number of kilometres, got {radius}");
    }

    let center = Coordinates::new(lat, lon);
    let stores = client.find_stores(center, radius).await?;
    debug!(count = stores.len(), "Stores found");

    if format == "json" {
        let output = JsonStoresOutput {
            center,
            radius_km: radius,
            total: stores.len(),
            stores: &stores,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!();
    println!("{}", RULE.blue());
    println!(
        "  {} {} ({} km)",
        "Stores around".blue().bold(),
        center.to_string().bold(),
        radius
    );
    println!("{}", RULE.blue());
    println!();

    if stores.is_empty() {
        println!("  {}", "No stores in range".yellow());
        println!();
        return Ok(());
    }

    for store in &stores {
        let marker = if store.favourited { "★" } else { " " };
        println!(
            "  {} {} {}",
            marker.yellow(),
            store.name.bold(),
            format!("{:.1} km", store.distance).dimmed()
        );
        println!(
            "    {}, {} {}",
            store.address.address_line, store.address.postcode, store.address.city
        );
        if let Some(description) = store.description.as_deref().filter(|d| !d.is_empty()) {
            println!("    {}", description.dimmed());
        }
    }
    println!();
    println!("  {} {}", "Total:".dimmed(), stores.len());
    println!();

    Ok(())
}
