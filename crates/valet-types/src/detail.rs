//! Series and group metadata.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Axis along which the series of a group vary (e.g. currency pair).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    /// Dimension key.
    #[serde(default)]
    pub key: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
}

/// Descriptive metadata about a series or a group.
///
/// List and group payloads key each entry by its identifier and do not repeat
/// it inside the object, so `name` is filled from the map key after decoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Detail {
    /// Human-readable label (e.g. "USD/CAD").
    pub label: String,
    /// Identifier (e.g. "FXUSDCAD").
    pub name: String,
    /// Longer description.
    pub description: String,
    /// Link to the provider's documentation page.
    pub link: String,
    /// Dimension, when the detail describes a member of a dimensioned group.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimension: Option<Dimension>,
}

impl Detail {
    /// Creates a detail with a name and label.
    #[must_use]
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            ..Self::default()
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the dimension.
    #[must_use]
    pub fn with_dimension(mut self, key: impl Into<String>, name: impl Into<String>) -> Self {
        self.dimension = Some(Dimension {
            key: key.into(),
            name: name.into(),
        });
        self
    }

    /// Fills `name` if the payload did not carry it inline.
    pub fn fill_name(&mut self, name: &str) {
        if self.name.is_empty() {
            self.name = name.to_string();
        }
    }
}

impl std::fmt::Display for Detail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.label, self.name)
    }
}

/// Metadata about a group and every series it contains.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDetail {
    /// The group itself.
    #[serde(flatten)]
    pub detail: Detail,
    /// Member series keyed by series name.
    #[serde(rename = "groupSeries", default)]
    pub group_series: BTreeMap<String, Detail>,
}

impl GroupDetail {
    /// Returns the number of series in the group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.group_series.len()
    }

    /// Returns true if the group has no series.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.group_series.is_empty()
    }

    /// Comma-joined series names, usable as an observations target.
    #[must_use]
    pub fn series_names(&self) -> String {
        self.group_series
            .keys()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Copies each map key into the `name` of its detail.
pub fn backfill_names(details: &mut BTreeMap<String, Detail>) {
    for (name, detail) in details.iter_mut() {
        detail.name.clone_from(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_without_name_field() {
        let detail: Detail = serde_json::from_str(
            r#"{"label":"USD/CAD","description":"US dollar to Canadian dollar daily exchange rate"}"#,
        )
        .unwrap();

        assert_eq!(detail.label, "USD/CAD");
        assert!(detail.name.is_empty());
        assert!(detail.link.is_empty());
        assert!(detail.dimension.is_none());
    }

    #[test]
    fn test_detail_with_dimension() {
        let detail: Detail = serde_json::from_str(
            r#"{"label":"USD/CAD","dimension":{"key":"d","name":"date"}}"#,
        )
        .unwrap();

        let dimension = detail.dimension.unwrap();
        assert_eq!(dimension.key, "d");
        assert_eq!(dimension.name, "date");
    }

    #[test]
    fn test_backfill_names_overwrites_from_key() {
        let mut details = BTreeMap::new();
        details.insert("FXUSDCAD".to_string(), Detail::new("", "USD/CAD"));
        details.insert("FXEURCAD".to_string(), Detail::new("stale", "EUR/CAD"));

        backfill_names(&mut details);

        assert_eq!(details["FXUSDCAD"].name, "FXUSDCAD");
        assert_eq!(details["FXEURCAD"].name, "FXEURCAD");
    }

    #[test]
    fn test_fill_name_keeps_inline_name() {
        let mut detail = Detail::new("FXUSDCAD", "USD/CAD");
        detail.fill_name("OTHER");
        assert_eq!(detail.name, "FXUSDCAD");

        let mut detail = Detail::default();
        detail.fill_name("FXUSDCAD");
        assert_eq!(detail.name, "FXUSDCAD");
    }

    #[test]
    fn test_group_detail_flattened_fields() {
        let group: GroupDetail = serde_json::from_str(
            r#"{
                "name": "FX_RATES_DAILY",
                "label": "Daily exchange rates",
                "groupSeries": {
                    "FXAUDCAD": {"label": "AUD/CAD"},
                    "FXUSDCAD": {"label": "USD/CAD"}
                }
            }"#,
        )
        .unwrap();

        assert_eq!(group.detail.name, "FX_RATES_DAILY");
        assert_eq!(group.len(), 2);
        assert_eq!(group.series_names(), "FXAUDCAD,FXUSDCAD");
    }

    #[test]
    fn test_display() {
        let detail = Detail::new("FXUSDCAD", "USD/CAD").with_description("daily");
        assert_eq!(detail.to_string(), "USD/CAD (FXUSDCAD)");
        assert_eq!(detail.description, "daily");
    }
}
