//! Browser bindings: build map views and style survey points client-side.
//!
//! Every entry point takes a JSON string and returns a plain JS object.
//! The request handling itself lives in [`compose`] so it can be exercised
//! without a JS host.

use landcover_core::points::style_batch;
use landcover_core::{
    AssetCatalog, GeoPoint, LatLon, LayerSpec, Legend, MapView, MissingClassPolicy, VizParams,
    LAND_COVER,
};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

// ── Request / response ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MapRequest {
    pub center: LatLon,
    pub zoom: u32,
    #[serde(default)]
    pub layers: Vec<LayerRequest>,
    /// Asset id → tile location. Layers whose asset is absent are skipped.
    #[serde(default)]
    pub catalog: AssetCatalog,
    /// Defaults to the land-cover legend.
    #[serde(default)]
    pub legend: Option<Legend>,
    #[serde(default)]
    pub missing_class: MissingClassPolicy,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayerRequest {
    Raster {
        name: String,
        asset: String,
        viz: VizParams,
        #[serde(default = "shown_by_default")]
        shown: bool,
    },
    /// Raw survey records; styled with the land-cover colors.
    Points {
        name: String,
        asset: String,
        points: Vec<GeoPoint>,
        #[serde(default = "shown_by_default")]
        shown: bool,
    },
}

fn shown_by_default() -> bool {
    true
}

#[derive(Debug, Serialize)]
pub struct MapResponse {
    pub view: MapView,
    /// One message per layer left out of the view.
    pub skipped: Vec<String>,
    pub rejected: Vec<RejectedReport>,
}

#[derive(Debug, Serialize)]
pub struct RejectedReport {
    pub layer: String,
    pub index: usize,
    pub id: Option<String>,
    pub code: String,
}

// ── Core ─────────────────────────────────────────────────────────────────────

/// Style point layers, resolve every layer against the request catalog and
/// build the map view.
pub fn compose(request: MapRequest) -> Result<MapResponse, String> {
    let mut specs = Vec::with_capacity(request.layers.len());
    let mut rejected = Vec::new();

    for layer in request.layers {
        let (spec, shown) = match layer {
            LayerRequest::Raster { name, asset, viz, shown } => {
                (LayerSpec::raster(name, asset, viz), shown)
            }
            LayerRequest::Points { name, asset, points, shown } => {
                let batch = style_batch(&points, &LAND_COVER, request.missing_class)
                    .map_err(|e| format!("layer {name:?}: {e}"))?;
                rejected.extend(batch.rejected.into_iter().map(|r| RejectedReport {
                    layer: name.clone(),
                    index: r.index,
                    id: r.id,
                    code: r.error.code,
                }));
                (LayerSpec::points(name, asset, batch.points), shown)
            }
        };
        specs.push(if shown { spec } else { spec.hidden() });
    }

    let legend = request
        .legend
        .unwrap_or_else(|| Legend::land_cover(&LAND_COVER));
    let composition = landcover_core::build_map_view(
        request.center,
        request.zoom,
        &specs,
        &legend,
        &request.catalog,
    )
    .map_err(|e| e.to_string())?;

    Ok(MapResponse {
        view: composition.view,
        skipped: composition.skipped.iter().map(ToString::to_string).collect(),
        rejected,
    })
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(JsValue::from)
}

// ── Bindings ─────────────────────────────────────────────────────────────────

/// The land-cover legend: title plus eight `{label, color}` entries.
#[wasm_bindgen]
pub fn legend() -> Result<JsValue, JsValue> {
    to_js(&Legend::land_cover(&LAND_COVER))
}

/// Build a map view from a [`MapRequest`] JSON document.
#[wasm_bindgen]
pub fn build_map_view(request_json: &str) -> Result<JsValue, JsValue> {
    let request: MapRequest = serde_json::from_str(request_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid request: {e}")))?;
    let response = compose(request).map_err(|e| JsValue::from_str(&e))?;
    to_js(&response)
}

/// Style one survey point; fails for an unknown class code.
#[wasm_bindgen]
pub fn style_point(point_json: &str) -> Result<JsValue, JsValue> {
    let point: GeoPoint = serde_json::from_str(point_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid point: {e}")))?;
    let styled =
        landcover_core::style(&point, &LAND_COVER).map_err(|e| JsValue::from_str(&e.to_string()))?;
    to_js(&styled)
}
