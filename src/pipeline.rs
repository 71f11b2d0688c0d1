//! End-to-end poster generation.
//!
//! `PosterPipeline::run` resolves the place, fetches the surrounding region,
//! classifies and projects it, then renders onto the caller's canvas. The
//! canvas is only touched once every network stage has succeeded.
//!
//! Runs on the same pipeline cancel each other: every run takes a generation
//! ticket, and a run whose ticket is no longer current stops at its next
//! stage boundary with `Error::Superseded`.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::core::config::{NetworkConfig, PosterConfig};
use crate::core::constants::{DEFAULT_ATTRIBUTION, DEFAULT_RADIUS_M};
use crate::core::geo::LatLng;
use crate::core::projection::make_projector;
use crate::data::classify::{classify, ClassifiedRegion};
use crate::rendering::canvas::Canvas;
use crate::rendering::renderer::LayeredRenderer;
use crate::rendering::typography::PosterText;
use crate::sources::fetcher::RegionDataFetcher;
use crate::sources::geocoder::PlaceResolver;
use crate::sources::transport::{HttpTransport, ReqwestTransport};
use crate::theme::Theme;
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct PosterRequest {
    pub place: String,
    /// Country or region used to disambiguate the place; may be empty
    pub region: String,
    pub radius_m: f64,
}

impl PosterRequest {
    pub fn new(place: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            place: place.into(),
            region: region.into(),
            radius_m: DEFAULT_RADIUS_M,
        }
    }

    pub fn with_radius(mut self, radius_m: f64) -> Self {
        self.radius_m = radius_m;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.place.trim().is_empty() {
            return Err(Error::InvalidConfig("place name must not be empty".to_string()));
        }
        if !(self.radius_m.is_finite() && self.radius_m > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "radius must be a positive number of meters, got {}",
                self.radius_m
            )));
        }
        Ok(())
    }
}

/// Progress events, in the order a successful run emits them
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineStatus {
    Resolving { query: String },
    Resolved { location: LatLng, display_name: String },
    Fetching { radius_m: f64, endpoints: usize },
    Fetched { elements: usize },
    Classified(FeatureCounts),
    Rendering { width: f32, height: f32 },
    Finished,
    Superseded,
    Failed { message: String },
}

/// Receives pipeline progress
pub trait StatusSink: Send + Sync {
    fn report(&self, status: PipelineStatus);
}

impl<F> StatusSink for F
where
    F: Fn(PipelineStatus) + Send + Sync,
{
    fn report(&self, status: PipelineStatus) {
        self(status)
    }
}

/// Sink that drops every event
pub struct Silent;

impl StatusSink for Silent {
    fn report(&self, _status: PipelineStatus) {}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FeatureCounts {
    pub roads: usize,
    pub water_lines: usize,
    pub water_polygons: usize,
    pub parks: usize,
}

impl From<&ClassifiedRegion> for FeatureCounts {
    fn from(region: &ClassifiedRegion) -> Self {
        Self {
            roads: region.roads.len(),
            water_lines: region.water_lines.len(),
            water_polygons: region.water_polygons.len(),
            parks: region.parks.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PosterSummary {
    pub location: LatLng,
    pub display_name: String,
    pub counts: FeatureCounts,
}

pub struct PosterPipeline {
    resolver: PlaceResolver,
    fetcher: RegionDataFetcher,
    attribution: String,
    generation: AtomicU64,
}

impl PosterPipeline {
    pub fn new(transport: Arc<dyn HttpTransport>, network: &NetworkConfig) -> Result<Self> {
        network.validate()?;
        let resolver = PlaceResolver::new(transport.clone(), network.geocoder_url.clone());
        let fetcher = RegionDataFetcher::new(transport, network.overpass_endpoints.clone())?
            .with_query_timeout(network.timeout_secs);
        Ok(Self {
            resolver,
            fetcher,
            attribution: DEFAULT_ATTRIBUTION.to_string(),
            generation: AtomicU64::new(0),
        })
    }

    /// Pipeline over real HTTP, configured from `config`
    pub fn from_config(config: &PosterConfig) -> Result<Self> {
        config.validate()?;
        let transport: Arc<dyn HttpTransport> = Arc::new(ReqwestTransport::new(&config.network)?);
        Ok(Self::new(transport, &config.network)?
            .with_attribution(config.typography.attribution.clone()))
    }

    pub fn with_attribution(mut self, attribution: impl Into<String>) -> Self {
        self.attribution = attribution.into();
        self
    }

    /// Produces one poster on `canvas`.
    ///
    /// On error the canvas is left as it was, unless rendering itself had
    /// already started.
    pub async fn run<C>(
        &self,
        request: &PosterRequest,
        theme: &Theme,
        canvas: &mut C,
        status: &dyn StatusSink,
    ) -> Result<PosterSummary>
    where
        C: Canvas + ?Sized,
    {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let result = self.run_stages(ticket, request, theme, canvas, status).await;
        match &result {
            Ok(summary) => {
                log::info!(
                    "poster for '{}' finished: {} roads, {} water, {} parks",
                    request.place,
                    summary.counts.roads,
                    summary.counts.water_lines + summary.counts.water_polygons,
                    summary.counts.parks
                );
                status.report(PipelineStatus::Finished);
            }
            Err(Error::Superseded) => {
                log::info!("poster run {} superseded", ticket);
                status.report(PipelineStatus::Superseded);
            }
            Err(e) => {
                log::error!("poster for '{}' failed: {}", request.place, e);
                status.report(PipelineStatus::Failed {
                    message: e.to_string(),
                });
            }
        }
        result
    }

    async fn run_stages<C>(
        &self,
        ticket: u64,
        request: &PosterRequest,
        theme: &Theme,
        canvas: &mut C,
        status: &dyn StatusSink,
    ) -> Result<PosterSummary>
    where
        C: Canvas + ?Sized,
    {
        request.validate()?;

        status.report(PipelineStatus::Resolving {
            query: request.place.trim().to_string(),
        });
        let place = self.resolver.resolve(&request.place, &request.region).await?;
        self.ensure_current(ticket)?;
        status.report(PipelineStatus::Resolved {
            location: place.location,
            display_name: place.display_name.clone(),
        });

        status.report(PipelineStatus::Fetching {
            radius_m: request.radius_m,
            endpoints: self.fetcher.endpoints().len(),
        });
        let payload = self.fetcher.fetch(place.location, request.radius_m).await?;
        self.ensure_current(ticket)?;
        status.report(PipelineStatus::Fetched {
            elements: payload.elements.len(),
        });

        let region = classify(&payload);
        let counts = FeatureCounts::from(&region);
        status.report(PipelineStatus::Classified(counts));

        let (width, height) = (canvas.width(), canvas.height());
        status.report(PipelineStatus::Rendering { width, height });

        let project = make_projector(place.location, request.radius_m, width as f64, height as f64);
        let text = PosterText {
            place: request.place.trim().to_string(),
            region: region_label(&request.region, &place.display_name),
            location: place.location,
            attribution: self.attribution.clone(),
        };
        LayeredRenderer::new(theme).render(canvas, &region, Some(&text), project);

        Ok(PosterSummary {
            location: place.location,
            display_name: place.display_name,
            counts,
        })
    }

    fn ensure_current(&self, ticket: u64) -> Result<()> {
        if self.generation.load(Ordering::SeqCst) == ticket {
            Ok(())
        } else {
            Err(Error::Superseded)
        }
    }
}

/// The requested region, or the last component of the resolved name.
fn region_label(requested: &str, display_name: &str) -> String {
    let requested = requested.trim();
    if !requested.is_empty() {
        return requested.to_string();
    }
    display_name
        .rsplit(',')
        .next()
        .map(str::trim)
        .unwrap_or_default()
        .to_string()
}
