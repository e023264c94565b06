//! Error types for landcover-core.

use std::path::PathBuf;

use thiserror::Error;

/// A class attribute that is not one of the eight top-level land-cover codes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown land-cover class code {code:?}")]
pub struct UnknownClassError {
    /// The raw attribute value as it appeared in the dataset.
    pub code: String,
}

impl UnknownClassError {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}

/// A viewport center outside the WGS84 ranges.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum InvalidCoordinateError {
    #[error("latitude {0} outside [-90, 90]")]
    Latitude(f64),

    #[error("longitude {0} outside [-180, 180]")]
    Longitude(f64),
}

/// Why a layer resolver could not produce a location for an asset.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("asset is not in the catalog")]
    NotFound,

    #[error("asset is unavailable: {0}")]
    Unavailable(String),
}

/// A named layer whose asset reference could not be resolved.
///
/// Recoverable: the compositor reports it and omits the layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("layer {layer:?} (asset {asset:?}) could not be resolved: {source}")]
pub struct LayerResolutionError {
    pub layer: String,
    pub asset: String,
    #[source]
    pub source: ResolveError,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LegendError {
    #[error("legend entry {index} has an empty label")]
    EmptyLabel { index: usize },

    #[error("legend entry {label:?} has an empty color")]
    EmptyColor { label: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid hex color {0:?}, expected #rrggbb")]
pub struct ColorParseError(pub String);

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum VizParamsError {
    #[error("visualization range is not finite: [{min}, {max}]")]
    NonFinite { min: f64, max: f64 },

    #[error("visualization range is inverted: min {min} > max {max}")]
    Inverted { min: f64, max: f64 },
}

/// Failure to load a points dataset.
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("cannot read points dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed points dataset: {0}")]
    Json(#[from] serde_json::Error),

    #[error("point {index} has an invalid coordinate: {source}")]
    Coordinate {
        index: usize,
        #[source]
        source: InvalidCoordinateError,
    },

    #[error("feature {index} is not a Point geometry (found {found:?})")]
    Geometry { index: usize, found: String },

    #[error("feature {index} has no LC1 property")]
    MissingClass { index: usize },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid zoom range: min {min} > max {max}")]
    ZoomRange { min: u32, max: u32 },

    #[error("legend title must not be empty")]
    EmptyLegendTitle,
}

/// Main error type for landcover-core operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    UnknownClass(#[from] UnknownClassError),

    #[error(transparent)]
    InvalidCoordinate(#[from] InvalidCoordinateError),

    #[error(transparent)]
    Legend(#[from] LegendError),

    #[error(transparent)]
    VizParams(#[from] VizParamsError),

    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type alias for landcover-core operations.
pub type Result<T> = std::result::Result<T, Error>;
