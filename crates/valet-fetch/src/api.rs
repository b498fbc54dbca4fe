//! Valet API client.

use std::collections::BTreeMap;

use bytes::Bytes;
use valet_types::{
    DecodeError, Detail, GroupDetail, ObservationOptions, ObservationSet, Result,
    SeriesObservation, ValetError,
};

use crate::client::{ClientConfig, Fetch, HttpClient, TransportError};
use crate::decode::{
    decode_group_detail, decode_group_list, decode_observations, decode_series_detail,
    decode_series_list, remote_error,
};
use crate::query::{ObservationTarget, observations_url, require_name};
use crate::url::{group_list_url, group_url, series_list_url, series_url};

/// Client for the Valet API.
///
/// Generic over the transport so tests and callers can substitute their own
/// [`Fetch`] implementation.
#[derive(Debug, Clone)]
pub struct ValetClient<F = HttpClient> {
    fetch: F,
    base_url: String,
}

impl ValetClient<HttpClient> {
    /// Creates a client backed by [`HttpClient`].
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: ClientConfig) -> std::result::Result<Self, TransportError> {
        let base_url = config.base_url.clone();
        Ok(Self::with_fetch(HttpClient::new(config)?, base_url))
    }

    /// Creates a client for the public API with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_defaults() -> std::result::Result<Self, TransportError> {
        Self::new(ClientConfig::default())
    }
}

impl<F: Fetch> ValetClient<F> {
    /// Creates a client with a custom transport.
    pub fn with_fetch(fetch: F, base_url: impl Into<String>) -> Self {
        Self {
            fetch,
            base_url: base_url.into(),
        }
    }

    /// Returns the API root.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the transport.
    #[must_use]
    pub const fn fetcher(&self) -> &F {
        &self.fetch
    }

    /// Lists every series, keyed by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or decoding fails.
    pub async fn list_series(&self) -> Result<BTreeMap<String, Detail>> {
        let body = self.get(&series_list_url(&self.base_url)).await?;
        Ok(decode_series_list(&body)?)
    }

    /// Lists every group, keyed by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or decoding fails.
    pub async fn list_groups(&self) -> Result<BTreeMap<String, Detail>> {
        let body = self.get(&group_list_url(&self.base_url)).await?;
        Ok(decode_group_list(&body)?)
    }

    /// Fetches the details of one series.
    ///
    /// # Errors
    ///
    /// Returns [`ValetError::InvalidInput`] for an empty name, or an error if
    /// the request or decoding fails.
    pub async fn series(&self, name: &str) -> Result<Detail> {
        let name = require_name(name)?;
        let body = self.get(&series_url(&self.base_url, name)).await?;
        let mut detail = decode_series_detail(&body)?;
        detail.fill_name(name);
        Ok(detail)
    }

    /// Fetches the details of one series from its latest observation.
    ///
    /// Uses `/observations/{name}/json?recent=1`, whose `seriesDetail` map can
    /// carry fields the `/series` endpoint leaves out.
    ///
    /// # Errors
    ///
    /// Returns [`ValetError::InvalidInput`] for an empty name,
    /// [`DecodeError::MissingField`] if the response has no series detail, or
    /// an error if the request or decoding fails.
    pub async fn series_from_observations(&self, name: &str) -> Result<Detail> {
        let name = require_name(name)?;
        let mut set = self.series_observation_set(name, None).await?;
        match set.series_detail.remove(name) {
            Some(detail) => Ok(detail),
            None => set.series_detail.into_values().next().ok_or_else(|| {
                DecodeError::MissingField {
                    context: "observations",
                    field: "seriesDetail",
                }
                .into()
            }),
        }
    }

    /// Fetches the details of a group and its member series.
    ///
    /// # Errors
    ///
    /// Returns [`ValetError::InvalidInput`] for an empty name, or an error if
    /// the request or decoding fails.
    pub async fn group(&self, name: &str) -> Result<GroupDetail> {
        let name = require_name(name)?;
        let body = self.get(&group_url(&self.base_url, name)).await?;
        let mut group = decode_group_detail(&body)?;
        group.detail.fill_name(name);
        Ok(group)
    }

    /// Fetches observations for comma-separated series names, flattened.
    ///
    /// # Errors
    ///
    /// Returns [`ValetError::InvalidInput`] for invalid names or options, or
    /// an error if the request or decoding fails.
    pub async fn series_observations(
        &self,
        names: &str,
        options: Option<&ObservationOptions>,
    ) -> Result<Vec<SeriesObservation>> {
        Ok(self.series_observation_set(names, options).await?.flatten())
    }

    /// Fetches observations for a group, flattened.
    ///
    /// # Errors
    ///
    /// Returns [`ValetError::InvalidInput`] for an invalid name or options, or
    /// an error if the request or decoding fails.
    pub async fn group_observations(
        &self,
        name: &str,
        options: Option<&ObservationOptions>,
    ) -> Result<Vec<SeriesObservation>> {
        Ok(self.group_observation_set(name, options).await?.flatten())
    }

    /// Fetches observations and series metadata for series names.
    ///
    /// # Errors
    ///
    /// See [`ValetClient::series_observations`].
    pub async fn series_observation_set(
        &self,
        names: &str,
        options: Option<&ObservationOptions>,
    ) -> Result<ObservationSet> {
        let target = ObservationTarget::series(names)?;
        self.observation_set(&target, options).await
    }

    /// Fetches observations, group metadata and series metadata for a group.
    ///
    /// # Errors
    ///
    /// See [`ValetClient::group_observations`].
    pub async fn group_observation_set(
        &self,
        name: &str,
        options: Option<&ObservationOptions>,
    ) -> Result<ObservationSet> {
        let target = ObservationTarget::group(name)?;
        self.observation_set(&target, options).await
    }

    /// Fetches observations for any target.
    ///
    /// # Errors
    ///
    /// Returns [`ValetError::InvalidInput`] for invalid options, or an error
    /// if the request or decoding fails.
    pub async fn observation_set(
        &self,
        target: &ObservationTarget,
        options: Option<&ObservationOptions>,
    ) -> Result<ObservationSet> {
        let url = observations_url(&self.base_url, target, options)?;
        let body = self.get(&url).await?;
        let mut set = decode_observations(&body)?;
        if let (ObservationTarget::Group(name), Some(group)) = (target, set.group_detail.as_mut())
        {
            group.fill_name(name);
        }
        Ok(set)
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "valet::client::get", skip(self), err)
    )]
    async fn get(&self, url: &str) -> Result<Bytes> {
        let response = self.fetch.fetch(url).await.map_err(ValetError::Transport)?;
        if !response.is_success() {
            return Err(remote_error(response.status, &response.body));
        }
        Ok(response.body)
    }
}
