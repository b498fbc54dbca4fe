//! Observation query construction.
//!
//! Turns a target (series names or a group) and [`ObservationOptions`] into a
//! complete observations URL. Validation runs before anything is rendered:
//!
//! 1. the target must name at least one series or a group
//! 2. start and end dates come as a pair
//! 3. a date pair must parse and be ordered; it then overrides any recency option
//! 4. otherwise at most one recency option may be set, defaulting to `recent=1`
//! 5. `order_dir` is kept only when it is exactly `asc` or `desc`
//!
//! Rendering is deterministic: parameters always appear in the same order.

use ::url::form_urlencoded;
use valet_types::{ObservationOptions, OrderDir, QueryError, TimeWindow};

use crate::url::{group_observations_path, series_observations_path, trim_base};

/// What an observations request is for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObservationTarget {
    /// One or more series, stored comma-joined.
    Series(String),
    /// A single group.
    Group(String),
}

impl ObservationTarget {
    /// Targets comma-separated series names.
    ///
    /// Whitespace around names and empty entries are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::EmptyTarget`] if no name remains.
    pub fn series(names: &str) -> Result<Self, QueryError> {
        Self::series_list(names.split(','))
    }

    /// Targets a list of series names.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::EmptyTarget`] if no non-empty name is given.
    pub fn series_list<I, S>(names: I) -> Result<Self, QueryError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: Vec<String> = names
            .into_iter()
            .map(|n| n.as_ref().trim().to_string())
            .filter(|n| !n.is_empty())
            .collect();
        if names.is_empty() {
            return Err(QueryError::EmptyTarget);
        }
        Ok(Self::Series(names.join(",")))
    }

    /// Targets a group.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::EmptyTarget`] if the name is empty.
    pub fn group(name: &str) -> Result<Self, QueryError> {
        require_name(name).map(|n| Self::Group(n.to_string()))
    }

    /// Returns the target identifier.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Series(names) | Self::Group(names) => names,
        }
    }

    /// Returns true for group targets.
    #[must_use]
    pub const fn is_group(&self) -> bool {
        matches!(self, Self::Group(_))
    }

    /// Returns the endpoint path, relative to the API base URL.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Series(names) => series_observations_path(names),
            Self::Group(name) => group_observations_path(name),
        }
    }
}

/// Validated time window and ordering of an observations request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ObservationQuery {
    window: TimeWindow,
    order: Option<OrderDir>,
}

impl ObservationQuery {
    /// Validates options, applying defaults when absent.
    ///
    /// # Errors
    ///
    /// Returns the first [`QueryError`] found by
    /// [`ObservationOptions::time_window`].
    pub fn new(options: Option<&ObservationOptions>) -> Result<Self, QueryError> {
        let Some(options) = options else {
            return Ok(Self::default());
        };
        Ok(Self {
            window: options.time_window()?,
            order: options.order(),
        })
    }

    /// Returns the resolved time window.
    #[must_use]
    pub const fn window(&self) -> TimeWindow {
        self.window
    }

    /// Returns the sort direction, if any.
    #[must_use]
    pub const fn order(&self) -> Option<OrderDir> {
        self.order
    }

    /// Returns the query parameters in rendering order.
    #[must_use]
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = match self.window {
            TimeWindow::Range(range) => vec![
                ("start_date", range.start.to_string()),
                ("end_date", range.end.to_string()),
            ],
            TimeWindow::Recent(recency) => vec![(recency.key(), recency.value().to_string())],
        };
        if let Some(order) = self.order {
            params.push(("order_dir", order.as_str().to_string()));
        }
        params
    }

    /// Renders the URL-encoded query string (without the leading `?`).
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.params() {
            serializer.append_pair(key, &value);
        }
        serializer.finish()
    }
}

impl std::fmt::Display for ObservationQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

/// Builds the full observations URL for a target.
///
/// # Example
///
/// ```
/// use valet_fetch::{ObservationTarget, observations_url};
/// use valet_types::ObservationOptions;
///
/// let target = ObservationTarget::series("FXUSDCAD,FXEURCAD").unwrap();
/// let options = ObservationOptions::new().with_recent_weeks(2).with_order_dir("asc");
/// let url = observations_url("https://www.bankofcanada.ca/valet", &target, Some(&options)).unwrap();
/// assert_eq!(
///     url,
///     "https://www.bankofcanada.ca/valet/observations/FXUSDCAD,FXEURCAD/json?recent_weeks=2&order_dir=asc"
/// );
/// ```
///
/// # Errors
///
/// Returns a [`QueryError`] if the options are invalid.
pub fn observations_url(
    base_url: &str,
    target: &ObservationTarget,
    options: Option<&ObservationOptions>,
) -> Result<String, QueryError> {
    let query = ObservationQuery::new(options)?;
    Ok(format!(
        "{}{}?{}",
        trim_base(base_url),
        target.path(),
        query.to_query_string()
    ))
}

/// Builds a series observations URL, validating the names first.
///
/// # Errors
///
/// Returns [`QueryError::EmptyTarget`] for an empty name list, or the
/// options' validation error.
pub fn series_observations_url(
    base_url: &str,
    names: &str,
    options: Option<&ObservationOptions>,
) -> Result<String, QueryError> {
    observations_url(base_url, &ObservationTarget::series(names)?, options)
}

/// Builds a group observations URL, validating the name first.
///
/// # Errors
///
/// Returns [`QueryError::EmptyTarget`] for an empty name, or the options'
/// validation error.
pub fn group_observations_url(
    base_url: &str,
    name: &str,
    options: Option<&ObservationOptions>,
) -> Result<String, QueryError> {
    observations_url(base_url, &ObservationTarget::group(name)?, options)
}

pub(crate) fn require_name(name: &str) -> Result<&str, QueryError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(QueryError::EmptyTarget);
    }
    Ok(name)
}
