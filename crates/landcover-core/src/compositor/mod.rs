//! Layer compositor: assembles a [`MapView`] from a viewport, an ordered
//! list of layer descriptors and a legend.
//!
//! Assembly is best-effort over layers. A layer whose asset cannot be
//! resolved is reported as a [`LayerResolutionError`] and left out while the
//! rest are kept in their original relative order. An invalid center or a
//! malformed legend fails the whole view.

pub mod legend;
pub mod resolver;

use serde::Serialize;
use tracing::{debug, warn};

use crate::coords::{LatLon, ZoomRange};
use crate::error::{LayerResolutionError, Result};
use crate::points::StyledPoint;
use crate::viz::VizParams;

pub use legend::{Legend, LegendEntry};
pub use resolver::{AssetCatalog, LayerResolver};

/// What a layer draws.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayerSource {
    /// An externally hosted raster drawn through visualization parameters.
    Raster { asset: String, viz: VizParams },
    /// Styled survey points from a vector asset.
    Points {
        asset: String,
        points: Vec<StyledPoint>,
    },
}

impl LayerSource {
    pub fn asset(&self) -> &str {
        match self {
            Self::Raster { asset, .. } | Self::Points { asset, .. } => asset,
        }
    }
}

/// Layer descriptor as handed to the compositor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerSpec {
    pub name: String,
    pub source: LayerSource,
    /// Visible when the map first loads.
    pub shown: bool,
}

impl LayerSpec {
    pub fn raster(name: impl Into<String>, asset: impl Into<String>, viz: VizParams) -> Self {
        Self {
            name: name.into(),
            source: LayerSource::Raster {
                asset: asset.into(),
                viz,
            },
            shown: true,
        }
    }

    pub fn points(name: impl Into<String>, asset: impl Into<String>, points: Vec<StyledPoint>) -> Self {
        Self {
            name: name.into(),
            source: LayerSource::Points {
                asset: asset.into(),
                points,
            },
            shown: true,
        }
    }

    pub fn hidden(mut self) -> Self {
        self.shown = false;
        self
    }
}

/// A layer whose asset has been resolved to a display location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layer {
    pub name: String,
    pub location: String,
    #[serde(flatten)]
    pub source: LayerSource,
    pub shown: bool,
}

/// A fully assembled map. Layers are in draw order: later ones on top.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    center: LatLon,
    zoom: u32,
    layers: Vec<Layer>,
    legend: Legend,
}

impl MapView {
    pub fn center(&self) -> LatLon {
        self.center
    }

    pub fn zoom(&self) -> u32 {
        self.zoom
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer_names(&self) -> Vec<&str> {
        self.layers.iter().map(|l| l.name.as_str()).collect()
    }

    pub fn legend(&self) -> &Legend {
        &self.legend
    }
}

/// An assembled view plus the layers that had to be left out.
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    pub view: MapView,
    pub skipped: Vec<LayerResolutionError>,
}

impl Composition {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Builds map views against one resolver and one backend zoom range.
pub struct Compositor<'a, R: LayerResolver + ?Sized> {
    resolver: &'a R,
    zoom_range: ZoomRange,
}

impl<'a, R: LayerResolver + ?Sized> Compositor<'a, R> {
    pub fn new(resolver: &'a R) -> Self {
        Self {
            resolver,
            zoom_range: ZoomRange::default(),
        }
    }

    pub fn with_zoom_range(mut self, zoom_range: ZoomRange) -> Self {
        self.zoom_range = zoom_range;
        self
    }

    pub fn zoom_range(&self) -> ZoomRange {
        self.zoom_range
    }

    /// Assemble a view. Inputs are only read.
    ///
    /// Fails with `InvalidCoordinate` for an out-of-range center and with
    /// `Legend` for a blank legend entry. `zoom` is clamped into the
    /// backend range.
    pub fn build_map_view(
        &self,
        center: LatLon,
        zoom: u32,
        layers: &[LayerSpec],
        legend: &Legend,
    ) -> Result<Composition> {
        center.validate()?;
        legend.validate()?;

        let clamped = self.zoom_range.clamp(zoom);
        if clamped != zoom {
            debug!(requested = zoom, zoom = clamped, "zoom clamped to backend range");
        }

        let mut resolved = Vec::with_capacity(layers.len());
        let mut skipped = Vec::new();
        for spec in layers {
            let asset = spec.source.asset();
            match self.resolver.resolve(asset) {
                Ok(location) => resolved.push(Layer {
                    name: spec.name.clone(),
                    location,
                    source: spec.source.clone(),
                    shown: spec.shown,
                }),
                Err(source) => {
                    let err = LayerResolutionError {
                        layer: spec.name.clone(),
                        asset: asset.to_string(),
                        source,
                    };
                    warn!(layer = %err.layer, asset = %err.asset, "skipping layer: {}", err.source);
                    skipped.push(err);
                }
            }
        }

        debug!(
            lat = center.lat,
            lon = center.lon,
            zoom = clamped,
            layers = resolved.len(),
            skipped = skipped.len(),
            "map view assembled"
        );

        Ok(Composition {
            view: MapView {
                center,
                zoom: clamped,
                layers: resolved,
                legend: legend.clone(),
            },
            skipped,
        })
    }
}

/// [`Compositor::build_map_view`] with the default zoom range.
pub fn build_map_view<R: LayerResolver + ?Sized>(
    center: LatLon,
    zoom: u32,
    layers: &[LayerSpec],
    legend: &Legend,
    resolver: &R,
) -> Result<Composition> {
    Compositor::new(resolver).build_map_view(center, zoom, layers, legend)
}
