//! Observations command implementation.

use anyhow::{Context, Result};
use valet_lib::prelude::*;

/// Fetch and print observations for series names or a group.
pub(crate) async fn show_observations(
    client: &ValetClient,
    target: &str,
    group: bool,
    options: &ObservationOptions,
) -> Result<()> {
    let result = if group {
        client.group_observation_set(target, Some(options)).await
    } else {
        client.series_observation_set(target, Some(options)).await
    };
    let ObservationSet {
        group_detail,
        series_detail,
        observations,
    } = result.with_context(|| format!("Failed to fetch observations for {target}"))?;

    if let Some(group) = &group_detail {
        println!("Group: {} ({})\n", group.label, group.name);
    }

    let records = valet_lib::flatten_observations(observations);
    if records.is_empty() {
        println!("No observations found.");
        return Ok(());
    }

    println!("{:<12} {:<20} {:<30} {:>12}", "PERIOD", "SERIES", "LABEL", "VALUE");
    println!("{}", "-".repeat(77));
    for record in &records {
        let label = series_detail.get(&record.name).map_or("", |d| d.label.as_str());
        println!(
            "{:<12} {:<20} {:<30} {:>12}",
            record.period(),
            record.name,
            crate::display::truncate(label, 30),
            record.value
        );
    }

    println!("\nTotal: {} observations", records.len());
    Ok(())
}
