//! Raster visualization parameters: value range, palette and band selection.

use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::error::VizParamsError;
use crate::registry::ColorRegistry;

/// Bands of the Sentinel-2 true-color median composite.
pub const S2_MEDIAN_BANDS: [&str; 3] = ["TCI_R_median", "TCI_G_median", "TCI_B_median"];

/// How a raster's pixel values map to display colors.
///
/// `min <= max` and both finite are guaranteed by construction, including
/// when deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawVizParams")]
pub struct VizParams {
    min: f64,
    max: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    palette: Vec<Rgb>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    bands: Vec<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawVizParams {
    min: f64,
    max: f64,
    #[serde(default)]
    palette: Vec<Rgb>,
    #[serde(default)]
    bands: Vec<String>,
}

impl TryFrom<RawVizParams> for VizParams {
    type Error = VizParamsError;

    fn try_from(raw: RawVizParams) -> Result<Self, Self::Error> {
        Ok(Self::new(raw.min, raw.max)?
            .with_palette(raw.palette)
            .with_bands(raw.bands))
    }
}

impl VizParams {
    pub fn new(min: f64, max: f64) -> Result<Self, VizParamsError> {
        if !min.is_finite() || !max.is_finite() {
            return Err(VizParamsError::NonFinite { min, max });
        }
        if min > max {
            return Err(VizParamsError::Inverted { min, max });
        }
        Ok(Self {
            min,
            max,
            palette: Vec::new(),
            bands: Vec::new(),
        })
    }

    pub fn with_palette(mut self, palette: Vec<Rgb>) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_bands<I, S>(mut self, bands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bands = bands.into_iter().map(Into::into).collect();
        self
    }

    /// Classifier output: values 0–8 through the registry's nine-entry palette.
    pub fn classification(registry: &ColorRegistry) -> Self {
        Self {
            min: 0.0,
            max: 8.0,
            palette: registry.classification_palette(),
            bands: Vec::new(),
        }
    }

    /// Pre-rendered 8-bit true-color image. Zero is left out as the
    /// out-of-area fill value.
    pub fn true_color() -> Self {
        Self {
            min: 1.0,
            max: 255.0,
            palette: Vec::new(),
            bands: Vec::new(),
        }
    }

    /// Sentinel-2 true-color median mosaic.
    pub fn sentinel2_median() -> Self {
        Self {
            min: 0.0,
            max: 255.0,
            palette: Vec::new(),
            bands: Vec::new(),
        }
        .with_bands(S2_MEDIAN_BANDS)
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn palette(&self) -> &[Rgb] {
        &self.palette
    }

    pub fn bands(&self) -> &[String] {
        &self.bands
    }

    /// Palette color for a pixel value, stretching `[min, max]` linearly over
    /// the palette entries. `None` without a palette or for NaN.
    pub fn color_for_value(&self, value: f64) -> Option<Rgb> {
        if self.palette.is_empty() || value.is_nan() {
            return None;
        }
        let last = self.palette.len() - 1;
        let span = self.max - self.min;
        let t = if span > 0.0 {
            ((value - self.min) / span).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let index = (t * last as f64).round() as usize;
        self.palette.get(index.min(last)).copied()
    }
}
