//! Observation request options.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{DateRange, QueryError};

/// Sort direction of returned observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderDir {
    /// Oldest first.
    Asc,
    /// Newest first.
    Desc,
}

impl OrderDir {
    /// Returns the query parameter value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl std::fmt::Display for OrderDir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error for unrecognized sort directions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown order direction: {0} (expected asc or desc)")]
pub struct OrderDirParseError(pub String);

impl FromStr for OrderDir {
    type Err = OrderDirParseError;

    /// Matches exactly `asc` or `desc`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(OrderDirParseError(other.to_string())),
        }
    }
}

/// A request for the N most recent periods in one granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Recency {
    /// N most recent observations.
    Count(u32),
    /// Observations from the N most recent weeks.
    Weeks(u32),
    /// Observations from the N most recent months.
    Months(u32),
    /// Observations from the N most recent years.
    Years(u32),
}

impl Recency {
    /// Returns the query parameter name.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Count(_) => "recent",
            Self::Weeks(_) => "recent_weeks",
            Self::Months(_) => "recent_months",
            Self::Years(_) => "recent_years",
        }
    }

    /// Returns the number of units requested.
    #[must_use]
    pub const fn value(&self) -> u32 {
        match self {
            Self::Count(n) | Self::Weeks(n) | Self::Months(n) | Self::Years(n) => *n,
        }
    }
}

impl Default for Recency {
    fn default() -> Self {
        Self::Count(1)
    }
}

/// The resolved time window of an observation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeWindow {
    /// Explicit inclusive date range.
    Range(DateRange),
    /// Most recent periods.
    Recent(Recency),
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self::Recent(Recency::default())
    }
}

/// Caller options for an observations request.
///
/// The time window is either an explicit `start_date`/`end_date` pair or a
/// single recency option. When nothing is set the request asks for the most
/// recent observation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservationOptions {
    /// First date (inclusive), `YYYY-MM-DD`.
    pub start_date: Option<String>,
    /// Last date (inclusive), `YYYY-MM-DD`.
    pub end_date: Option<String>,
    /// N most recent observations.
    pub recent: u32,
    /// N most recent weeks.
    pub recent_weeks: u32,
    /// N most recent months.
    pub recent_months: u32,
    /// N most recent years.
    pub recent_years: u32,
    /// Sort direction. Anything other than `asc` or `desc` is ignored.
    pub order_dir: Option<String>,
}

impl ObservationOptions {
    /// Creates empty options (most recent observation).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an explicit date range.
    #[must_use]
    pub fn with_range(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start_date = Some(start.into());
        self.end_date = Some(end.into());
        self
    }

    /// Sets the start date only.
    #[must_use]
    pub fn with_start_date(mut self, start: impl Into<String>) -> Self {
        self.start_date = Some(start.into());
        self
    }

    /// Sets the end date only.
    #[must_use]
    pub fn with_end_date(mut self, end: impl Into<String>) -> Self {
        self.end_date = Some(end.into());
        self
    }

    /// Requests the N most recent observations.
    #[must_use]
    pub const fn with_recent(mut self, n: u32) -> Self {
        self.recent = n;
        self
    }

    /// Requests the N most recent weeks.
    #[must_use]
    pub const fn with_recent_weeks(mut self, n: u32) -> Self {
        self.recent_weeks = n;
        self
    }

    /// Requests the N most recent months.
    #[must_use]
    pub const fn with_recent_months(mut self, n: u32) -> Self {
        self.recent_months = n;
        self
    }

    /// Requests the N most recent years.
    #[must_use]
    pub const fn with_recent_years(mut self, n: u32) -> Self {
        self.recent_years = n;
        self
    }

    /// Sets the sort direction.
    #[must_use]
    pub fn with_order_dir(mut self, order_dir: impl Into<String>) -> Self {
        self.order_dir = Some(order_dir.into());
        self
    }

    /// Resolves the time window.
    ///
    /// A valid date range takes precedence over any recency option.
    ///
    /// # Errors
    ///
    /// - [`QueryError::ConflictingDateOption`] if only one date is set
    /// - [`QueryError::InvalidDate`] if a date is not `YYYY-MM-DD`
    /// - [`QueryError::InvertedRange`] if the end precedes the start
    /// - [`QueryError::AmbiguousRecency`] if more than one recency option is set
    pub fn time_window(&self) -> Result<TimeWindow, QueryError> {
        match (non_empty(&self.start_date), non_empty(&self.end_date)) {
            (Some(start), Some(end)) => DateRange::parse(start, end).map(TimeWindow::Range),
            (None, None) => self.recency().map(TimeWindow::Recent),
            _ => Err(QueryError::ConflictingDateOption),
        }
    }

    /// Returns the sort direction if it is exactly `asc` or `desc`.
    #[must_use]
    pub fn order(&self) -> Option<OrderDir> {
        self.order_dir.as_deref().and_then(|s| s.parse().ok())
    }

    fn recency(&self) -> Result<Recency, QueryError> {
        let set: Vec<Recency> = [
            Recency::Count(self.recent),
            Recency::Weeks(self.recent_weeks),
            Recency::Months(self.recent_months),
            Recency::Years(self.recent_years),
        ]
        .into_iter()
        .filter(|r| r.value() > 0)
        .collect();

        match set.as_slice() {
            [] => Ok(Recency::default()),
            [one] => Ok(*one),
            _ => Err(QueryError::AmbiguousRecency),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}
