//! Query construction, transport and decoding for the valet API client.
//!
//! This crate provides the request/response pipeline:
//!
//! - [`url`] - Endpoint URL construction
//! - [`ObservationQuery`] - Validated observation query parameters
//! - [`decode`] - Payload decoding and name back-fill
//! - [`Fetch`] / [`HttpClient`] - Transport seam and its reqwest implementation
//! - [`ValetClient`] - One method per API operation

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/valet/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod api;
mod client;
pub mod decode;
mod query;
pub mod url;

pub use api::ValetClient;
pub use client::{ClientConfig, Fetch, FetchResponse, HttpClient, TransportError};
pub use decode::ErrorEnvelope;
pub use query::{
    ObservationQuery, ObservationTarget, group_observations_url, observations_url,
    series_observations_url,
};
