//! Response payload decoding.
//!
//! Every endpoint answers with the same envelope, populated differently per
//! endpoint. Maps of [`Detail`] are keyed by series or group name and the
//! name is not repeated inside each value, so it is copied from the key once
//! the structure has been decoded.

use std::collections::BTreeMap;

use serde::Deserialize;
use valet_types::{
    DecodeError, Detail, GroupDetail, Observation, ObservationSet, RawObservation, ValetError,
    backfill_names,
};

/// Error body returned by the API on non-success statuses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorEnvelope {
    /// Human-readable message.
    #[serde(default)]
    pub message: String,
    /// Documentation link.
    #[serde(default)]
    pub docs: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ApiResponse {
    series_detail: Option<BTreeMap<String, Detail>>,
    series_details: Option<Detail>,
    group_detail: Option<Detail>,
    group_details: Option<GroupDetail>,
    series: Option<BTreeMap<String, Detail>>,
    groups: Option<BTreeMap<String, Detail>>,
    observations: Option<Vec<RawObservation>>,
}

impl ApiResponse {
    fn parse(body: &[u8], context: &'static str) -> Result<Self, DecodeError> {
        let mut response: Self =
            serde_json::from_slice(body).map_err(|e| DecodeError::Payload {
                context,
                message: e.to_string(),
            })?;
        response.backfill_names();
        Ok(response)
    }

    fn backfill_names(&mut self) {
        for details in [
            self.series.as_mut(),
            self.groups.as_mut(),
            self.series_detail.as_mut(),
            self.group_details.as_mut().map(|g| &mut g.group_series),
        ]
        .into_iter()
        .flatten()
        {
            backfill_names(details);
        }
    }
}

fn required<T>(value: Option<T>, context: &'static str, field: &'static str) -> Result<T, DecodeError> {
    value.ok_or(DecodeError::MissingField { context, field })
}

/// Decodes a `/lists/series/json` payload.
///
/// # Errors
///
/// Returns a [`DecodeError`] if the payload is invalid or has no `series`.
pub fn decode_series_list(body: &[u8]) -> Result<BTreeMap<String, Detail>, DecodeError> {
    const CONTEXT: &str = "series list";
    required(ApiResponse::parse(body, CONTEXT)?.series, CONTEXT, "series")
}

/// Decodes a `/lists/groups/json` payload.
///
/// # Errors
///
/// Returns a [`DecodeError`] if the payload is invalid or has no `groups`.
pub fn decode_group_list(body: &[u8]) -> Result<BTreeMap<String, Detail>, DecodeError> {
    const CONTEXT: &str = "group list";
    required(ApiResponse::parse(body, CONTEXT)?.groups, CONTEXT, "groups")
}

/// Decodes a `/series/{name}/json` payload.
///
/// # Errors
///
/// Returns a [`DecodeError`] if the payload is invalid or has no
/// `seriesDetails`.
pub fn decode_series_detail(body: &[u8]) -> Result<Detail, DecodeError> {
    const CONTEXT: &str = "series detail";
    required(
        ApiResponse::parse(body, CONTEXT)?.series_details,
        CONTEXT,
        "seriesDetails",
    )
}

/// Decodes a `/groups/{name}/json` payload.
///
/// # Errors
///
/// Returns a [`DecodeError`] if the payload is invalid or has no
/// `groupDetails`.
pub fn decode_group_detail(body: &[u8]) -> Result<GroupDetail, DecodeError> {
    const CONTEXT: &str = "group detail";
    required(
        ApiResponse::parse(body, CONTEXT)?.group_details,
        CONTEXT,
        "groupDetails",
    )
}

/// Decodes an `/observations/...` payload.
///
/// Observations keep the order of the payload.
///
/// # Errors
///
/// Returns [`DecodeError::MalformedObservation`] if a series value does not
/// have the `{"v": ...}` shape, or another [`DecodeError`] if the payload is
/// invalid or has no `observations`.
pub fn decode_observations(body: &[u8]) -> Result<ObservationSet, DecodeError> {
    const CONTEXT: &str = "observations";
    let response = ApiResponse::parse(body, CONTEXT)?;
    let raw = required(response.observations, CONTEXT, "observations")?;

    let observations = raw
        .into_iter()
        .map(Observation::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ObservationSet {
        group_detail: response.group_detail,
        series_detail: response.series_detail.unwrap_or_default(),
        observations,
    })
}

/// Decodes the API error body, if it carries a message.
#[must_use]
pub fn decode_error_envelope(body: &[u8]) -> Option<ErrorEnvelope> {
    serde_json::from_slice::<ErrorEnvelope>(body)
        .ok()
        .filter(|envelope| !envelope.message.is_empty())
}

/// Builds the error for a non-success response.
///
/// The API's own message is preferred; otherwise the raw body, and finally
/// the status code alone.
#[must_use]
pub fn remote_error(status: u16, body: &[u8]) -> ValetError {
    if let Some(envelope) = decode_error_envelope(body) {
        return ValetError::Remote {
            status,
            message: envelope.message,
            docs: envelope.docs.filter(|d| !d.is_empty()),
        };
    }

    let text = String::from_utf8_lossy(body).trim().to_string();
    let message = if text.is_empty() {
        format!("HTTP status {status}")
    } else {
        text
    };
    ValetError::Remote {
        status,
        message,
        docs: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_list_backfills_names() {
        let details =
            decode_series_list(br#"{"series":{"FXUSDCAD":{"label":"US dollar"}}}"#).unwrap();

        let detail = &details["FXUSDCAD"];
        assert_eq!(detail.name, "FXUSDCAD");
        assert_eq!(detail.label, "US dollar");
    }

    #[test]
    fn test_group_list_backfills_names() {
        let body = br#"{
            "terms": {"url": "https://www.bankofcanada.ca/terms/"},
            "groups": {
                "FX_RATES_DAILY": {"label": "Daily exchange rates", "link": "https://example.test/fx"},
                "BOND_YIELDS_ALL": {"label": "Bond yields"}
            }
        }"#;
        let groups = decode_group_list(body).unwrap();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups["FX_RATES_DAILY"].name, "FX_RATES_DAILY");
        assert_eq!(groups["FX_RATES_DAILY"].link, "https://example.test/fx");
        assert_eq!(groups["BOND_YIELDS_ALL"].name, "BOND_YIELDS_ALL");
    }

    #[test]
    fn test_missing_list_field() {
        assert_eq!(
            decode_series_list(br#"{"groups":{}}"#),
            Err(DecodeError::MissingField {
                context: "series list",
                field: "series",
            })
        );
    }

    #[test]
    fn test_invalid_json_names_context() {
        let err = decode_group_list(b"<html>oops</html>").unwrap_err();
        assert!(matches!(err, DecodeError::Payload { context: "group list", .. }));
        assert!(err.to_string().starts_with("Invalid group list payload"));
    }

    #[test]
    fn test_wrong_type_is_payload_error() {
        let err = decode_series_list(br#"{"series":["FXUSDCAD"]}"#).unwrap_err();
        assert!(matches!(err, DecodeError::Payload { .. }));
    }

    #[test]
    fn test_series_detail() {
        let body = br#"{"seriesDetails":{"name":"FXUSDCAD","label":"USD/CAD","description":"US dollar to Canadian dollar daily exchange rate","dimension":{"key":"d","name":"date"}}}"#;
        let detail = decode_series_detail(body).unwrap();

        assert_eq!(detail.name, "FXUSDCAD");
        assert_eq!(detail.label, "USD/CAD");
        assert_eq!(detail.dimension.unwrap().name, "date");
    }

    #[test]
    fn test_group_detail_backfills_series_names() {
        let body = br#"{
            "groupDetails": {
                "name": "FX_RATES_DAILY",
                "label": "Daily exchange rates",
                "groupSeries": {
                    "FXUSDCAD": {"label": "USD/CAD", "link": "https://example.test/FXUSDCAD"},
                    "FXEURCAD": {"label": "EUR/CAD", "link": "https://example.test/FXEURCAD"}
                }
            }
        }"#;
        let group = decode_group_detail(body).unwrap();

        assert_eq!(group.detail.name, "FX_RATES_DAILY");
        assert_eq!(group.group_series["FXUSDCAD"].name, "FXUSDCAD");
        assert_eq!(group.group_series["FXEURCAD"].name, "FXEURCAD");
    }

    #[test]
    fn test_observations_payload() {
        let body = br#"{
            "seriesDetail": {
                "FXUSDCAD": {"label": "USD/CAD", "dimension": {"key": "d", "name": "date"}}
            },
            "observations": [
                {"d": "2024-01-02", "FXUSDCAD": {"v": "1.3316"}},
                {"d": "2024-01-03", "FXUSDCAD": {"v": "1.3342"}}
            ]
        }"#;
        let set = decode_observations(body).unwrap();

        assert!(set.group_detail.is_none());
        assert_eq!(set.series_detail["FXUSDCAD"].name, "FXUSDCAD");
        assert_eq!(set.len(), 2);

        let flat = set.flatten();
        assert_eq!(flat[0].date, "2024-01-02");
        assert_eq!(flat[1].date, "2024-01-03");
        assert_eq!(flat[1].value, "1.3342");
    }

    #[test]
    fn test_group_observations_payload() {
        let body = br#"{
            "groupDetail": {"label": "Daily exchange rates", "description": "FX"},
            "seriesDetail": {"FXUSDCAD": {"label": "USD/CAD"}},
            "observations": [{"d": "2024-01-02", "FXUSDCAD": {"v": "1.3316"}}]
        }"#;
        let set = decode_observations(body).unwrap();

        assert_eq!(set.group_detail.unwrap().label, "Daily exchange rates");
        assert_eq!(set.observations[0].series["FXUSDCAD"].value, "1.3316");
    }

    #[test]
    fn test_empty_observations() {
        let set = decode_observations(br#"{"seriesDetail":{},"observations":[]}"#).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_malformed_observation() {
        let body = br#"{"observations":[{"d":"2024-01-02","FXUSDCAD":"not-an-object"}]}"#;
        let err = decode_observations(body).unwrap_err();

        assert!(matches!(
            err,
            DecodeError::MalformedObservation { ref key, .. } if key == "FXUSDCAD"
        ));
    }

    #[test]
    fn test_error_envelope() {
        let body = br#"{"message":"Series FOO not found.","docs":"https://www.bankofcanada.ca/valet/docs"}"#;
        let envelope = decode_error_envelope(body).unwrap();
        assert_eq!(envelope.message, "Series FOO not found.");

        assert!(decode_error_envelope(b"{}").is_none());
        assert!(decode_error_envelope(b"Bad Gateway").is_none());
    }

    #[test]
    fn test_remote_error_prefers_message() {
        let err = remote_error(404, br#"{"message":"Series FOO not found.","docs":""}"#);
        let ValetError::Remote {
            status,
            message,
            docs,
        } = err
        else {
            panic!("expected remote error");
        };
        assert_eq!(status, 404);
        assert_eq!(message, "Series FOO not found.");
        assert_eq!(docs, None);
    }

    #[test]
    fn test_remote_error_fallbacks() {
        assert_eq!(
            remote_error(502, b" Bad Gateway\n").to_string(),
            "API error (status 502): Bad Gateway"
        );
        assert_eq!(
            remote_error(500, b"").to_string(),
            "API error (status 500): HTTP status 500"
        );
    }
}
