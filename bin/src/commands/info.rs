//! Info command implementation.
//!
//! This module handles displaying details about a single series or group.

use crate::display::print_details;
use anyhow::{Context, Result};
use valet_lib::prelude::*;

/// Show details of a series.
pub(crate) async fn show_series(client: &ValetClient, name: &str) -> Result<()> {
    let detail = client
        .series(name)
        .await
        .with_context(|| format!("Failed to fetch series {name}"))?;

    print_detail(&detail);
    Ok(())
}

/// Show details of a group and list its series.
pub(crate) async fn show_group(client: &ValetClient, name: &str) -> Result<()> {
    let group = client
        .group(name)
        .await
        .with_context(|| format!("Failed to fetch group {name}"))?;

    print_detail(&group.detail);
    println!();
    print_details(group.group_series.values(), "series");
    Ok(())
}

fn print_detail(detail: &Detail) {
    println!("Name:        {}", detail.name);
    println!("Label:       {}", detail.label);
    if !detail.description.is_empty() {
        println!("Description: {}", detail.description);
    }
    if !detail.link.is_empty() {
        println!("Link:        {}", detail.link);
    }
    if let Some(dimension) = &detail.dimension {
        println!("Dimension:   {} ({})", dimension.name, dimension.key);
    }
}
