//! Valet endpoint URL construction.
//!
//! Names are percent-encoded as single path segments, so `/`, `?`, `#` and
//! spaces cannot escape into the rest of the URL. Commas stay literal.

use ::url::Url;

/// Base URL of the Bank of Canada Valet API.
pub const BASE_URL: &str = "https://www.bankofcanada.ca/valet";

/// URL listing every series.
///
/// # Example
///
/// ```
/// use valet_fetch::url::{BASE_URL, series_list_url};
///
/// assert_eq!(
///     series_list_url(BASE_URL),
///     "https://www.bankofcanada.ca/valet/lists/series/json"
/// );
/// ```
#[must_use]
pub fn series_list_url(base_url: &str) -> String {
    format!("{}/lists/series/json", trim_base(base_url))
}

/// URL listing every group.
#[must_use]
pub fn group_list_url(base_url: &str) -> String {
    format!("{}/lists/groups/json", trim_base(base_url))
}

/// URL of a single series' details.
#[must_use]
pub fn series_url(base_url: &str, name: &str) -> String {
    format!("{}/series/{}/json", trim_base(base_url), encode_segment(name))
}

/// URL of a group's details and member series.
#[must_use]
pub fn group_url(base_url: &str, name: &str) -> String {
    format!("{}/groups/{}/json", trim_base(base_url), encode_segment(name))
}

/// Observations path for one or more comma-joined series names.
#[must_use]
pub fn series_observations_path(names: &str) -> String {
    format!("/observations/{}/json", encode_segment(names))
}

/// Observations path for a group.
#[must_use]
pub fn group_observations_path(name: &str) -> String {
    format!("/observations/group/{}/json", encode_segment(name))
}

pub(crate) fn trim_base(base_url: &str) -> &str {
    base_url.trim_end_matches('/')
}

/// Percent-encodes `name` as one path segment.
fn encode_segment(name: &str) -> String {
    let Ok(mut scratch) = Url::parse("http://localhost/") else {
        return name.to_string();
    };
    if let Ok(mut segments) = scratch.path_segments_mut() {
        segments.clear().push(name);
    }
    scratch.path().trim_start_matches('/').to_string()
}
