//! Core types for the valet time-series API client.
//!
//! This crate provides the fundamental data structures used throughout valet:
//!
//! - [`Detail`] / [`GroupDetail`] - Series and group metadata
//! - [`Observation`] - Series values for one date or quarter
//! - [`SeriesObservation`] - One flattened (period, series, value) record
//! - [`ObservationOptions`] - Time window and ordering of a request
//! - [`DateRange`] - Validated explicit date range
//! - [`ValetError`] - Error taxonomy shared by all crates

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/valet/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod date_range;
mod detail;
mod error;
mod observation;
mod options;

pub use date_range::{DATE_FORMAT, DateRange};
pub use detail::{Detail, Dimension, GroupDetail, backfill_names};
pub use error::{BoxError, DecodeError, QueryError, Result, ValetError};
pub use observation::{
    DATE_KEY, Observation, ObservationSet, QUARTER_KEY, RawObservation, SeriesObservation,
    flatten_observations,
};
pub use options::{ObservationOptions, OrderDir, OrderDirParseError, Recency, TimeWindow};
