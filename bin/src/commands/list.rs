//! List command implementation.
//!
//! This module handles listing available series and groups with optional filtering.

use crate::display::{matches_search, print_details};
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use valet_lib::prelude::*;

/// List available series, optionally filtered by a search pattern.
pub(crate) async fn list_series(client: &ValetClient, search: Option<&str>) -> Result<()> {
    let series = client
        .list_series()
        .await
        .context("Failed to fetch series list")?;
    print_filtered(&series, search, "series");
    Ok(())
}

/// List available groups, optionally filtered by a search pattern.
pub(crate) async fn list_groups(client: &ValetClient, search: Option<&str>) -> Result<()> {
    let groups = client
        .list_groups()
        .await
        .context("Failed to fetch group list")?;
    print_filtered(&groups, search, "groups");
    Ok(())
}

fn print_filtered(details: &BTreeMap<String, Detail>, search: Option<&str>, noun: &str) {
    let filtered = details
        .values()
        .filter(|detail| search.is_none_or(|pattern| matches_search(detail, pattern)));
    print_details(filtered, noun);
}
