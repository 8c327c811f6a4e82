//! Read-only lookups against the Snap4City super service map.
//!
//! Every lookup opens its own HTTP client, performs a single GET and hands the
//! upstream JSON back untouched. Any failure (network, status, body) collapses
//! to `Value::Null`; the cause is only logged.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::client::ClientError;
use crate::http::{add_extra_headers, build_http_client, ResponseExt};
use crate::options::TransportOptions;

pub const DEFAULT_BASE_URL: &str = "https://www.snap4city.org/superservicemap/api/v1";
pub const USER_AGENT: &str = "snap/1.0";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Filters for the events endpoint. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventQuery {
    /// Time window, e.g. `day`, `week` or `month`.
    pub range: Option<String>,
    /// Spatial selection, e.g. `43.77;11.25` or a bounding box.
    pub selection: Option<String>,
    /// Maximum distance in kilometres from the selection.
    pub max_dists: Option<f64>,
    /// Maximum number of events returned.
    pub max_results: Option<u32>,
}

impl EventQuery {
    /// Query pairs for the provider, skipping unset filters.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(range) = &self.range {
            params.push(("range", range.clone()));
        }
        if let Some(selection) = &self.selection {
            params.push(("selection", selection.clone()));
        }
        if let Some(dists) = self.max_dists {
            params.push(("maxDists", dists.to_string()));
        }
        if let Some(results) = self.max_results {
            params.push(("maxResults", results.to_string()));
        }
        params
    }
}

/// Client for the transit endpoints.
#[derive(Debug, Clone)]
pub struct TransitClient {
    base_url: String,
    transport_options: TransportOptions,
}

impl Default for TransitClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl TransitClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_options(
            base_url,
            TransportOptions::new()
                .with_timeout(DEFAULT_TIMEOUT)
                .with_user_agent(USER_AGENT),
        )
    }

    pub fn with_options(base_url: impl Into<String>, transport_options: TransportOptions) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport_options,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The full agency list.
    pub async fn agencies(&self) -> Value {
        self.get("tpl/agencies", &[]).await
    }

    /// Bus lines operated by the agency identified by `agency_url`.
    pub async fn bus_lines(&self, agency_url: &str) -> Value {
        self.get("tpl/bus-lines/", &[("agency", agency_url.to_string())])
            .await
    }

    /// Events matching the given filters.
    pub async fn events(&self, query: &EventQuery) -> Value {
        self.get("events/", &query.to_params()).await
    }

    async fn get(&self, path: &str, params: &[(&str, String)]) -> Value {
        let url = format!("{}/{}", self.base_url, path);
        match self.fetch(&url, params).await {
            Ok(value) => value,
            Err(e) => {
                warn!("Transit lookup {} failed: {}", url, e);
                Value::Null
            }
        }
    }

    async fn fetch(&self, url: &str, params: &[(&str, String)]) -> Result<Value, ClientError> {
        debug!("GET {} {:?}", url, params);

        let http_client = build_http_client(&self.transport_options)?;
        let req = add_extra_headers(http_client.get(url).query(params), &self.transport_options);

        let response = req.send().await?.error_for_status()?;
        response.json_logged().await
    }
}
