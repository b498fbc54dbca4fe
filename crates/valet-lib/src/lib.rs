//! Rust client library for the Bank of Canada Valet time-series API.
//!
//! This is a facade crate that re-exports functionality from the valet
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```ignore
//! use valet_lib::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ValetClient::with_defaults()?;
//!
//!     let options = ObservationOptions::new().with_recent_weeks(2).with_order_dir("asc");
//!     for record in client.series_observations("FXUSDCAD", Some(&options)).await? {
//!         println!("{} {} {}", record.period(), record.name, record.value);
//!     }
//!
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/valet/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use valet_types::*;

// Re-export fetch functionality
#[cfg(feature = "fetch")]
pub use valet_fetch::{
    ClientConfig, ErrorEnvelope, Fetch, FetchResponse, HttpClient, ObservationQuery,
    ObservationTarget, TransportError, ValetClient, decode, group_observations_url,
    observations_url, series_observations_url, url,
};

/// Prelude module for convenient imports.
///
/// ```
/// use valet_lib::prelude::*;
/// ```
pub mod prelude {
    pub use valet_types::{
        DateRange, Detail, GroupDetail, Observation, ObservationOptions, ObservationSet,
        OrderDir, QueryError, Result, SeriesObservation, ValetError,
    };

    #[cfg(feature = "fetch")]
    pub use valet_fetch::{ClientConfig, HttpClient, ObservationTarget, ValetClient};
}
