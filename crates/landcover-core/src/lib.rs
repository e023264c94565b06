//! Land-cover study presentation core.
//!
//! Holds the fixed land-cover class table, styles survey points by class,
//! composites raster/vector layers into map views and renders the study
//! pages to standalone HTML.
//!
//! ```ignore
//! use landcover_core::{build_map_view, AssetCatalog, LatLon, Legend, LAND_COVER};
//!
//! let legend = Legend::land_cover(&LAND_COVER);
//! let composition = build_map_view(LatLon::new(41.9, 12.5), 8, &[], &legend, &AssetCatalog::default())?;
//! ```

pub mod color;
pub mod compositor;
pub mod config;
pub mod coords;
pub mod dataset;
pub mod error;
pub mod pages;
pub mod points;
pub mod registry;
pub mod render;
pub mod viz;

pub use color::Rgb;
pub use compositor::{
    build_map_view, AssetCatalog, Composition, Compositor, Layer, LayerResolver, LayerSource,
    LayerSpec, Legend, LegendEntry, MapView,
};
pub use config::SiteConfig;
pub use coords::{LatLon, ZoomRange};
pub use error::{
    Error, InvalidCoordinateError, LayerResolutionError, ResolveError, Result, UnknownClassError,
};
pub use points::{style, style_batch, GeoPoint, MissingClassPolicy, StyledBatch, StyledPoint};
pub use registry::{ClassCode, ColorRegistry, LAND_COVER};
pub use viz::VizParams;
