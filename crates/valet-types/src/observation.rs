//! Observation data representation.
//!
//! An observation object on the wire mixes two reserved keys (`d` for a
//! calendar date, `q` for a quarter label) with one key per series:
//!
//! ```json
//! {"d": "2024-01-02", "FXUSDCAD": {"v": "1.3316"}, "FXEURCAD": {"v": "1.4601"}}
//! ```
//!
//! Decoding goes through an explicit ordered map of the raw keys and decodes
//! every non-reserved key against the `{"v": ...}` shape, so a series with an
//! unexpected value fails the whole observation instead of being dropped.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{DecodeError, Detail};

/// Reserved key holding the calendar date of an observation.
pub const DATE_KEY: &str = "d";

/// Reserved key holding the quarter label of an observation.
pub const QUARTER_KEY: &str = "q";

/// Raw observation object as it appears in the payload.
pub type RawObservation = Map<String, Value>;

/// A single series value at one reporting period.
///
/// Each record carries its own name and period, so it stays meaningful once
/// separated from the observation it came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesObservation {
    /// Calendar date (`YYYY-MM-DD`), empty for quarterly series.
    pub date: String,
    /// Quarter label (e.g. `2024Q1`), empty for dated series.
    pub quarter: String,
    /// Series name.
    pub name: String,
    /// Value exactly as reported.
    pub value: String,
}

impl SeriesObservation {
    /// Returns whichever of date or quarter identifies the period.
    #[must_use]
    pub fn period(&self) -> &str {
        if self.date.is_empty() {
            &self.quarter
        } else {
            &self.date
        }
    }

    /// Parses the value as a number.
    ///
    /// Returns `None` for empty or non-numeric values.
    #[must_use]
    pub fn parse_value(&self) -> Option<f64> {
        let trimmed = self.value.trim();
        if trimmed.is_empty() {
            return None;
        }
        trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
    }
}

/// Value shape of a series key inside an observation object.
///
/// A missing or `null` `v` marks a gap and decodes as an empty value.
#[derive(Debug, Deserialize)]
struct RawSeriesValue {
    #[serde(rename = "v", default)]
    value: Option<String>,
}

/// The values of every requested series for one reporting period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawObservation")]
pub struct Observation {
    /// Calendar date (`YYYY-MM-DD`), empty for quarterly observations.
    pub date: String,
    /// Quarter label, empty for dated observations.
    pub quarter: String,
    /// Series values keyed by series name. Never contains `d` or `q`.
    pub series: BTreeMap<String, SeriesObservation>,
}

impl Observation {
    /// Returns whichever of date or quarter identifies the period.
    #[must_use]
    pub fn period(&self) -> &str {
        if self.date.is_empty() {
            &self.quarter
        } else {
            &self.date
        }
    }

    /// Returns the value of a series at this period.
    #[must_use]
    pub fn get(&self, series: &str) -> Option<&SeriesObservation> {
        self.series.get(series)
    }

    /// Returns the number of series values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Returns true if no series value was reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Consumes the observation, yielding its series records.
    pub fn into_series(self) -> impl Iterator<Item = SeriesObservation> {
        self.series.into_values()
    }
}

impl TryFrom<RawObservation> for Observation {
    type Error = DecodeError;

    fn try_from(mut raw: RawObservation) -> Result<Self, Self::Error> {
        let date = take_period(&mut raw, DATE_KEY)?;
        let quarter = take_period(&mut raw, QUARTER_KEY)?;
        if !date.is_empty() && !quarter.is_empty() {
            return Err(DecodeError::MalformedObservation {
                key: QUARTER_KEY.to_string(),
                reason: format!("both date '{date}' and quarter '{quarter}' are set"),
            });
        }

        let mut series = BTreeMap::new();
        for (name, value) in raw {
            let parsed: RawSeriesValue =
                serde_json::from_value(value).map_err(|e| DecodeError::MalformedObservation {
                    key: name.clone(),
                    reason: e.to_string(),
                })?;
            let record = SeriesObservation {
                date: date.clone(),
                quarter: quarter.clone(),
                name: name.clone(),
                value: parsed.value.unwrap_or_default(),
            };
            series.insert(name, record);
        }

        Ok(Self {
            date,
            quarter,
            series,
        })
    }
}

fn take_period(raw: &mut RawObservation, key: &str) -> Result<String, DecodeError> {
    match raw.remove(key) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(DecodeError::MalformedObservation {
            key: key.to_string(),
            reason: format!("expected a string, found {other}"),
        }),
    }
}

/// Flattens observations into one record per (period, series) pair.
///
/// Observation order is preserved; within an observation, records follow
/// series name order.
#[must_use]
pub fn flatten_observations(observations: Vec<Observation>) -> Vec<SeriesObservation> {
    observations
        .into_iter()
        .flat_map(Observation::into_series)
        .collect()
}

/// A complete observations response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservationSet {
    /// The group, for group observation requests.
    pub group_detail: Option<Detail>,
    /// Metadata for every series present in the observations.
    pub series_detail: BTreeMap<String, Detail>,
    /// Observations in the order the API returned them.
    pub observations: Vec<Observation>,
}

impl ObservationSet {
    /// Returns the number of observations (periods).
    #[must_use]
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Returns true if there are no observations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Flattens the observations into series records.
    #[must_use]
    pub fn flatten(self) -> Vec<SeriesObservation> {
        flatten_observations(self.observations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observation(json: &str) -> Observation {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_dated_observation() {
        let obs = observation(r#"{"d":"2024-01-02","FXUSDCAD":{"v":"1.35"}}"#);

        assert_eq!(obs.date, "2024-01-02");
        assert_eq!(obs.quarter, "");
        assert_eq!(obs.len(), 1);

        let record = obs.get("FXUSDCAD").unwrap();
        assert_eq!(record.name, "FXUSDCAD");
        assert_eq!(record.value, "1.35");
        assert_eq!(record.date, "2024-01-02");
        assert_eq!(record.quarter, "");
    }

    #[test]
    fn test_quarterly_observation() {
        let obs = observation(r#"{"q":"2024Q1","GDP":{"v":"2.1"}}"#);

        assert_eq!(obs.quarter, "2024Q1");
        assert_eq!(obs.date, "");
        assert_eq!(obs.period(), "2024Q1");
        assert_eq!(obs.get("GDP").unwrap().quarter, "2024Q1");
    }

    #[test]
    fn test_reserved_keys_not_in_series() {
        let obs = observation(r#"{"d":"2024-01-02","A":{"v":"1"},"B":{"v":"2"}}"#);

        assert_eq!(obs.len(), 2);
        assert!(obs.get(DATE_KEY).is_none());
        assert!(obs.get(QUARTER_KEY).is_none());
    }

    #[test]
    fn test_missing_value_decodes_empty() {
        let obs = observation(r#"{"d":"2024-01-02","FXUSDCAD":{}}"#);
        let record = obs.get("FXUSDCAD").unwrap();
        assert_eq!(record.value, "");
        assert_eq!(record.parse_value(), None);
    }

    #[test]
    fn test_null_value_decodes_empty() {
        let obs = observation(r#"{"d":"2024-01-02","FXUSDCAD":{"v":null},"FXEURCAD":{"v":"1.46"}}"#);
        assert_eq!(obs.get("FXUSDCAD").unwrap().value, "");
        assert_eq!(obs.get("FXEURCAD").unwrap().value, "1.46");
    }

    #[test]
    fn test_date_and_quarter_together_rejected() {
        let raw: RawObservation =
            serde_json::from_str(r#"{"d":"2024-01-02","q":"2024Q1","GDP":{"v":"2.1"}}"#).unwrap();
        assert!(matches!(
            Observation::try_from(raw),
            Err(DecodeError::MalformedObservation { ref key, .. }) if key == "q"
        ));
    }

    #[test]
    fn test_malformed_series_value() {
        let raw: RawObservation =
            serde_json::from_str(r#"{"d":"2024-01-02","FXUSDCAD":"not-an-object"}"#).unwrap();
        let err = Observation::try_from(raw).unwrap_err();

        assert!(matches!(
            err,
            DecodeError::MalformedObservation { ref key, .. } if key == "FXUSDCAD"
        ));
    }

    #[test]
    fn test_malformed_series_value_fails_deserialize() {
        let result: Result<Observation, _> =
            serde_json::from_str(r#"{"d":"2024-01-02","FXUSDCAD":"not-an-object"}"#);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("FXUSDCAD"));
    }

    #[test]
    fn test_non_string_date_rejected() {
        let raw: RawObservation = serde_json::from_str(r#"{"d":20240102}"#).unwrap();
        assert!(matches!(
            Observation::try_from(raw),
            Err(DecodeError::MalformedObservation { ref key, .. }) if key == "d"
        ));
    }

    #[test]
    fn test_flatten_preserves_observation_order() {
        let observations = vec![
            observation(r#"{"d":"2024-01-02","FXUSDCAD":{"v":"1.35"}}"#),
            observation(r#"{"d":"2024-01-03","FXUSDCAD":{"v":"1.36"}}"#),
        ];

        let flat = flatten_observations(observations);

        assert_eq!(flat.len(), 2);
        assert_eq!(flat[0].date, "2024-01-02");
        assert_eq!(flat[0].value, "1.35");
        assert_eq!(flat[1].date, "2024-01-03");
        assert_eq!(flat[1].value, "1.36");
    }

    #[test]
    fn test_flatten_multiple_series_per_period() {
        let observations = vec![
            observation(r#"{"d":"2024-01-02","FXUSDCAD":{"v":"1.35"},"FXEURCAD":{"v":"1.46"}}"#),
            observation(r#"{"d":"2024-01-03","FXUSDCAD":{"v":"1.36"},"FXEURCAD":{"v":"1.47"}}"#),
        ];

        let flat = flatten_observations(observations);
        let periods: Vec<_> = flat.iter().map(SeriesObservation::period).collect();
        let names: Vec<_> = flat.iter().map(|r| r.name.as_str()).collect();

        assert_eq!(periods, ["2024-01-02", "2024-01-02", "2024-01-03", "2024-01-03"]);
        assert_eq!(names, ["FXEURCAD", "FXUSDCAD", "FXEURCAD", "FXUSDCAD"]);
    }

    #[test]
    fn test_parse_value() {
        let mut record = SeriesObservation {
            value: " 1.3316 ".to_string(),
            ..SeriesObservation::default()
        };
        assert_eq!(record.parse_value(), Some(1.3316));

        record.value = "NaN".to_string();
        assert_eq!(record.parse_value(), None);

        record.value = "n/a".to_string();
        assert_eq!(record.parse_value(), None);
    }

    #[test]
    fn test_observation_set_flatten() {
        let set = ObservationSet {
            observations: vec![observation(r#"{"q":"2023Q4","GDP":{"v":"1.0"}}"#)],
            ..ObservationSet::default()
        };
        assert_eq!(set.len(), 1);

        let flat = set.flatten();
        assert_eq!(flat[0].period(), "2023Q4");
        assert_eq!(flat[0].name, "GDP");
    }
}
