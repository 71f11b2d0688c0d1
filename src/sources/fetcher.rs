//! Region data retrieval with ordered endpoint failover.
//!
//! Mirrors are tried strictly one after another, never in parallel, so a
//! degraded mirror does not cause every other mirror to be hit at once.

use futures::stream::{self, StreamExt};
use std::sync::Arc;

use super::transport::HttpTransport;
use crate::core::constants::OVERPASS_QUERY_TIMEOUT_SECS;
use crate::core::geo::LatLng;
use crate::data::overpass::{build_query, RegionPayload};
use crate::{Error, Result};

/// State carried through the endpoint fold
enum Attempt {
    NotStarted,
    Failed(Error),
    Succeeded(RegionPayload),
}

pub struct RegionDataFetcher {
    transport: Arc<dyn HttpTransport>,
    endpoints: Vec<String>,
    query_timeout_secs: u64,
}

impl RegionDataFetcher {
    /// Fails with `InvalidConfig` when `endpoints` is empty.
    pub fn new(transport: Arc<dyn HttpTransport>, endpoints: Vec<String>) -> Result<Self> {
        if endpoints.is_empty() {
            return Err(Error::InvalidConfig(
                "region fetcher needs at least one endpoint".to_string(),
            ));
        }
        Ok(Self {
            transport,
            endpoints,
            query_timeout_secs: OVERPASS_QUERY_TIMEOUT_SECS,
        })
    }

    pub fn with_query_timeout(mut self, secs: u64) -> Self {
        self.query_timeout_secs = secs;
        self
    }

    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }

    /// Fetches every road, water and park element within `radius_m` of `center`.
    pub async fn fetch(&self, center: LatLng, radius_m: f64) -> Result<RegionPayload> {
        let query = build_query(center, radius_m, self.query_timeout_secs);
        let query = query.as_str();

        let outcome = stream::iter(self.endpoints.iter())
            .fold(Attempt::NotStarted, move |state, endpoint| async move {
                match state {
                    // No further calls once an endpoint delivered
                    Attempt::Succeeded(payload) => Attempt::Succeeded(payload),
                    Attempt::NotStarted | Attempt::Failed(_) => {
                        match self.try_endpoint(endpoint, query).await {
                            Ok(payload) => Attempt::Succeeded(payload),
                            Err(e) => {
                                log::warn!("region endpoint {} failed: {}", endpoint, e);
                                Attempt::Failed(e)
                            }
                        }
                    }
                }
            })
            .await;

        match outcome {
            Attempt::Succeeded(payload) => Ok(payload),
            Attempt::Failed(last) => Err(Error::AllEndpointsUnavailable {
                attempted: self.endpoints.len(),
                last: Box::new(last),
            }),
            // Unreachable while the endpoint list is non-empty
            Attempt::NotStarted => Err(Error::InvalidConfig(
                "region fetcher has no endpoints".to_string(),
            )),
        }
    }

    async fn try_endpoint(&self, endpoint: &str, query: &str) -> Result<RegionPayload> {
        log::info!("requesting region data from {}", endpoint);
        let response = self.transport.post_form(endpoint, &[("data", query)]).await?;
        if !response.is_success() {
            return Err(Error::EndpointStatus {
                endpoint: endpoint.to_string(),
                status: response.status,
            });
        }

        let payload = RegionPayload::from_slice(&response.body)?;
        log::info!(
            "received {} elements from {}",
            payload.elements.len(),
            endpoint
        );
        Ok(payload)
    }
}
