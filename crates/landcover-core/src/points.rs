//! Survey points and per-point styling by land-cover class.
//!
//! Styling is a pure mapping from one [`GeoPoint`] to one [`StyledPoint`]:
//! the color table is passed in explicitly and nothing is shared between
//! invocations, so a batch can be styled in any order (and in parallel with
//! the `threading` feature). What happens to points with an unrecognized
//! class is the caller's [`MissingClassPolicy`].

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::color::Rgb;
use crate::coords::LatLon;
use crate::error::UnknownClassError;
use crate::registry::{ClassCode, ColorRegistry};

/// A geo-referenced survey record.
///
/// `class_code` is kept raw: survey extracts may carry malformed or missing
/// codes, which only surface when the point is styled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(
        default,
        alias = "POINT_ID",
        deserialize_with = "crate::dataset::optional_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(flatten)]
    pub location: LatLon,
    #[serde(alias = "LC1")]
    pub class_code: String,
    #[serde(
        default,
        alias = "SURVEY_DATE",
        deserialize_with = "crate::dataset::optional_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub survey_date: Option<String>,
}

impl GeoPoint {
    pub fn new(location: LatLon, class_code: impl Into<String>) -> Self {
        Self {
            id: None,
            location,
            class_code: class_code.into(),
            survey_date: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_survey_date(mut self, date: impl Into<String>) -> Self {
        self.survey_date = Some(date.into());
        self
    }
}

/// Style attached to a point, in the shape map front-ends read it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PointStyle {
    #[serde(rename = "fillColor")]
    pub fill_color: Rgb,
}

/// A [`GeoPoint`] with its display style. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyledPoint {
    #[serde(flatten)]
    point: GeoPoint,
    /// `None` only for points styled with a fallback color.
    class: Option<ClassCode>,
    style: PointStyle,
}

impl StyledPoint {
    fn fallback(point: &GeoPoint, color: Rgb) -> Self {
        Self {
            point: point.clone(),
            class: None,
            style: PointStyle { fill_color: color },
        }
    }

    pub fn point(&self) -> &GeoPoint {
        &self.point
    }

    pub fn class(&self) -> Option<ClassCode> {
        self.class
    }

    pub fn style(&self) -> PointStyle {
        self.style
    }

    /// GeoJSON `Feature` with the style under `properties.style`.
    pub fn to_geojson(&self) -> serde_json::Value {
        let p = &self.point;
        serde_json::json!({
            "type": "Feature",
            "geometry": {
                "type": "Point",
                "coordinates": [p.location.lon, p.location.lat],
            },
            "properties": {
                "id": p.id,
                "LC1": p.class_code,
                "class": self.class.map(ClassCode::name),
                "survey_date": p.survey_date,
                "style": self.style,
            },
        })
    }
}

/// Style a single point from its class code.
///
/// Fails with [`UnknownClassError`] for codes outside the eight classes;
/// no partial result is produced.
pub fn style(point: &GeoPoint, registry: &ColorRegistry) -> Result<StyledPoint, UnknownClassError> {
    let class: ClassCode = point.class_code.parse()?;
    Ok(StyledPoint {
        point: point.clone(),
        class: Some(class),
        style: PointStyle {
            fill_color: registry.color(class),
        },
    })
}

/// Style every point independently. Output order matches input order.
pub fn style_each(
    points: &[GeoPoint],
    registry: &ColorRegistry,
) -> Vec<Result<StyledPoint, UnknownClassError>> {
    #[cfg(feature = "threading")]
    {
        use rayon::prelude::*;
        points.par_iter().map(|p| style(p, registry)).collect()
    }
    #[cfg(not(feature = "threading"))]
    {
        points.iter().map(|p| style(p, registry)).collect()
    }
}

/// What a batch does with a point whose class code is not recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingClassPolicy {
    /// Omit the point and record the error.
    #[default]
    Drop,
    /// Fail the whole batch on the first unknown code.
    Abort,
    /// Keep the point with this color and record the error.
    Fallback(Rgb),
}

/// A point the batch could not classify.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedPoint {
    /// Position in the input slice.
    pub index: usize,
    pub id: Option<String>,
    pub error: UnknownClassError,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyledBatch {
    pub points: Vec<StyledPoint>,
    pub rejected: Vec<RejectedPoint>,
}

/// Style a collection under `policy`.
///
/// One bad record never affects the styling of the others; only
/// [`MissingClassPolicy::Abort`] turns it into a batch failure.
pub fn style_batch(
    points: &[GeoPoint],
    registry: &ColorRegistry,
    policy: MissingClassPolicy,
) -> Result<StyledBatch, UnknownClassError> {
    let mut batch = StyledBatch::default();
    for (index, result) in style_each(points, registry).into_iter().enumerate() {
        let error = match result {
            Ok(styled) => {
                batch.points.push(styled);
                continue;
            }
            Err(error) => error,
        };
        let point = &points[index];
        match policy {
            MissingClassPolicy::Abort => return Err(error),
            MissingClassPolicy::Drop => {
                warn!(index, id = ?point.id, code = %error.code, "dropping point with unknown land-cover class");
            }
            MissingClassPolicy::Fallback(color) => {
                warn!(index, id = ?point.id, code = %error.code, %color, "styling point with fallback color");
                batch.points.push(StyledPoint::fallback(point, color));
            }
        }
        batch.rejected.push(RejectedPoint {
            index,
            id: point.id.clone(),
            error,
        });
    }
    Ok(batch)
}
