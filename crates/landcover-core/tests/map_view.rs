//! End-to-end map assembly through the public API.

use approx::assert_relative_eq;
use landcover_core::{
    build_map_view, style, AssetCatalog, ClassCode, Error, GeoPoint, InvalidCoordinateError,
    LatLon, LayerSpec, Legend, VizParams, LAND_COVER,
};

const FIXED_LEGEND: [(&str, &str); 8] = [
    ("Artificial Land", "#ff0101"),
    ("Cropland", "#ffff01"),
    ("Woodland", "#336601"),
    ("Shrubland", "#ff8001"),
    ("Grassland", "#01ff01"),
    ("Bareland", "#808080"),
    ("Water", "#0101ff"),
    ("Wetlands", "#99ffff"),
];

fn catalog() -> AssetCatalog {
    AssetCatalog::new()
        .with_asset("s2/median", "tiles/mosaic/{z}/{x}/{y}.png")
        .with_asset("lucas", "vector/lucas")
        .with_asset("users/x/RF_1x1", "tiles/rf11/{z}/{x}/{y}.png")
        .with_asset("users/x/MLP_1x1", "tiles/mlp11/{z}/{x}/{y}.png")
}

#[test]
fn rome_mosaic_with_styled_points_keeps_draw_order() {
    let survey = [
        GeoPoint::new(LatLon::new(41.95, 12.40), "A"),
        GeoPoint::new(LatLon::new(41.85, 12.60), "E"),
    ];
    let styled = survey
        .iter()
        .map(|p| style(p, &LAND_COVER))
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    let layers = [
        LayerSpec::raster("mosaic", "s2/median", VizParams::sentinel2_median()),
        LayerSpec::points("styledPoints", "lucas", styled),
    ];
    let legend = Legend::land_cover(&LAND_COVER);

    let comp = build_map_view(LatLon::new(41.902782, 12.496366), 8, &layers, &legend, &catalog())
        .unwrap();

    assert_eq!(comp.view.layer_names(), ["mosaic", "styledPoints"]);
    assert_eq!(comp.view.zoom(), 8);
    assert_relative_eq!(comp.view.center().lat, 41.902782);
    assert_relative_eq!(comp.view.center().lon, 12.496366);
    assert!(comp.skipped.is_empty());
}

#[test]
fn one_unresolvable_layer_out_of_three() {
    let classification = VizParams::classification(&LAND_COVER);
    let layers = [
        LayerSpec::raster("RF 1x1", "users/x/RF_1x1", classification.clone()),
        LayerSpec::raster("RF 3x3", "users/x/RF_3x3", classification.clone()),
        LayerSpec::raster("MLP 1x1", "users/x/MLP_1x1", classification),
    ];
    let comp = build_map_view(LatLon::new(41.9, 12.5), 8, &layers, &Legend::default(), &catalog())
        .unwrap();

    assert_eq!(comp.view.layer_names(), ["RF 1x1", "MLP 1x1"]);
    assert_eq!(comp.skipped.len(), 1);
    assert_eq!(comp.skipped[0].layer, "RF 3x3");
    assert!(comp.skipped[0].to_string().contains("RF 3x3"));
}

#[test]
fn empty_layers_build_an_empty_view() {
    let comp = build_map_view(LatLon::new(0.0, 0.0), 3, &[], &Legend::default(), &catalog()).unwrap();
    assert_eq!(comp.view.layers().len(), 0);
}

#[test]
fn latitude_out_of_range_is_rejected() {
    let err = build_map_view(LatLon::new(200.0, 12.5), 8, &[], &Legend::default(), &catalog())
        .unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidCoordinate(InvalidCoordinateError::Latitude(_))
    ));
}

#[test]
fn fixed_legend_round_trips_exactly() {
    let legend = Legend::from_entries(Legend::DEFAULT_TITLE, FIXED_LEGEND);
    let comp = build_map_view(LatLon::new(41.9, 12.5), 8, &[], &legend, &catalog()).unwrap();

    let out: Vec<(&str, &str)> = comp
        .view
        .legend()
        .entries()
        .iter()
        .map(|e| (e.label.as_str(), e.color.as_str()))
        .collect();
    assert_eq!(out, FIXED_LEGEND);
    assert_eq!(comp.view.legend(), &Legend::land_cover(&LAND_COVER));
}

#[test]
fn styling_agrees_with_registry_for_every_class() {
    for class in ClassCode::ALL {
        let code = class.letter().to_string();
        let point = GeoPoint::new(LatLon::new(45.0, 9.0), code.as_str());
        let styled = style(&point, &LAND_COVER).unwrap();
        assert_eq!(styled.style().fill_color, LAND_COVER.color_for(&code).unwrap());
    }
    assert!(style(&GeoPoint::new(LatLon::new(45.0, 9.0), "K"), &LAND_COVER).is_err());
}
