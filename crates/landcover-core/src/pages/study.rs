//! The land-cover study: four pages narrating database creation, training
//! and regional map classification, with the maps that go with them.

use std::path::Path;

use tracing::info;

use crate::compositor::{AssetCatalog, Compositor, LayerResolver, LayerSpec, Legend};
use crate::config::SiteConfig;
use crate::coords::LatLon;
use crate::error::Result;
use crate::pages::{Page, Site};
use crate::points::{style_batch, GeoPoint, MissingClassPolicy};
use crate::registry::{ColorRegistry, LAND_COVER};
use crate::viz::VizParams;

// ── Assets ───────────────────────────────────────────────────────────────────

/// Sentinel-2 surface reflectance, 2018 per-pixel median of the true-color bands.
pub const S2_MEDIAN_2018: &str = "COPERNICUS/S2_SR/TCI_median_2018";
/// LUCAS 2018 survey points.
pub const LUCAS_POINTS: &str = "projects/sentinel2download332224/assets/lucas_full";
/// True-color 2018 median image of the Lazio region.
pub const LAZIO_TCI: &str = "users/federicopavesiwork/Lazio_2018_TCI";
pub const MLP_1X1: &str = "users/federicopavesiwork/MLP_1x1";
pub const MLP_3X3: &str = "users/federicopavesiwork/MLP_3x3";
pub const RF_1X1: &str = "users/federicopavesiwork/RF_1x1";
pub const RF_3X3: &str = "users/federicopavesiwork/RF_3x3";

/// Both maps open on Rome.
pub const ROME: LatLon = LatLon {
    lat: 41.902782,
    lon: 12.496366,
};
pub const DEFAULT_ZOOM: u32 = 8;

/// Classifier rasters on the classification page, in layer order.
const CLASSIFIER_LAYERS: [(&str, &str); 4] = [
    ("MLP 1x1", MLP_1X1),
    ("MLP 3x3", MLP_3X3),
    ("RF 1x1", RF_1X1),
    ("RF 3x3", RF_3X3),
];

/// Every study asset mapped to pre-rendered tiles under `tiles/<name>/`.
pub fn default_catalog() -> AssetCatalog {
    let mut catalog = AssetCatalog::new();
    for asset in [S2_MEDIAN_2018, LAZIO_TCI, MLP_1X1, MLP_3X3, RF_1X1, RF_3X3] {
        let name = asset.rsplit('/').next().unwrap_or(asset).to_lowercase();
        catalog.insert(asset, format!("tiles/{name}/{{z}}/{{x}}/{{y}}.png"));
    }
    catalog.insert(LUCAS_POINTS, "vector/lucas_full");
    catalog
}

// ── Pages ────────────────────────────────────────────────────────────────────

/// Build every page of the study.
///
/// `points` are the survey records for the database map; `None` leaves the
/// points layer out with a notice. Points with unrecognized class codes are
/// handled by `config.missing_class`.
pub fn build_study<R: LayerResolver + ?Sized>(
    config: &SiteConfig,
    points: Option<&[GeoPoint]>,
    resolver: &R,
) -> Result<Site> {
    let compositor = Compositor::new(resolver).with_zoom_range(config.zoom_range);
    let legend = Legend::land_cover(&LAND_COVER).with_title(config.legend_title.clone());

    let pages = vec![
        introduction(),
        database_creation(&compositor, &legend, config, points, &LAND_COVER)?,
        algorithms_training(),
        map_classification(&compositor, &legend, &config.asset_dir)?,
    ];
    info!(pages = pages.len(), "study pages assembled");
    Ok(Site::new(pages))
}

fn introduction() -> Page {
    Page::new("introduction", "Introduction")
        .text(
            "This study classifies the land-cover composition of a region from \
             [Copernicus Sentinel-2](https://sentinels.copernicus.eu/web/sentinel/missions/sentinel-2) \
             imagery and [Eurostat LUCAS](https://ec.europa.eu/eurostat/web/lucas) survey points.",
        )
        .text(
            "_The code used for the download and training steps is available \
             [here](https://github.com/FedericoPavesi/Lucas_points_for_Sentinel2_LandCover_Download)._",
        )
        .text(
            "LUCAS provides geo-referenced points with a three-character land-cover class. \
             Sentinel-2 provides high-resolution multi-spectral images of the earth surface. \
             Joining the two gives a database of pixel reflectances labelled with a land-cover \
             class, on which a **Random Forest** and a **Multi-Layer Perceptron** are trained \
             and then applied to the reflectance map of a whole region.",
        )
}

fn database_creation<R: LayerResolver + ?Sized>(
    compositor: &Compositor<'_, R>,
    legend: &Legend,
    config: &SiteConfig,
    points: Option<&[GeoPoint]>,
    registry: &ColorRegistry,
) -> Result<Page> {
    let assets = &config.asset_dir;
    let mut page = Page::new("database-creation", "Database creation")
        .heading(3, "Eurostat LUCAS")
        .text(
            "The Land Use and Cover Area frame Survey is a __collection of geo-referenced \
             points__ (WGS84) with a __three-character land-cover classification__ and the \
             __date of the survey__. The 2018 campaign covers 27 countries with 237,768 usable \
             points. The first character splits land cover into eight classes: Artificial \
             Land (A), Cropland (B), Woodland (C), Shrubland (D), Grassland (E), Bareland (F), \
             Water (G) and Wetlands (H), which are the labels used for training.",
        )
        .image(
            assets.join("Lucas_country_numerosity.png"),
            "Per country LUCAS points 2018 numerosity",
        )
        .image(
            assets.join("Lucas_LC1_numerosity.png"),
            "Per one-digit class LUCAS points 2018 numerosity",
        )
        .heading(3, "Sentinel-2")
        .text(
            "The two __Copernicus Sentinel-2__ satellites carry a multi-spectral instrument \
             sampling __thirteen bands__, four of them at 10 m resolution, with a revisit time \
             of about five days. Level-2A products (bottom-of-atmosphere reflectance, available \
             since 2017) are used as they come.",
        )
        .heading(3, "The process")
        .text(
            "A sample balanced over the eight classes (5,000 points each) is drawn from the \
             2018 survey; water and wetlands are augmented by shifting survey dates six months. \
             For every point, images from two months before to one month after the survey are \
             reduced to the per-pixel median and a 3x3 pixel window around the point is \
             extracted, resampling lower-resolution bands to 10 m. Each window is then \
             flattened into a row of band reflectances next to its class.",
        )
        .text(
            "The map below shows the 2018 Sentinel-2 median mosaic with the survey points \
             colored by class.",
        );

    let mut layers = vec![LayerSpec::raster(
        "Sentinel-2 2018 median",
        S2_MEDIAN_2018,
        VizParams::sentinel2_median(),
    )];
    let mut rejected_notice = None;
    match points {
        Some(points) => {
            let batch = style_batch(points, registry, config.missing_class)?;
            if !batch.rejected.is_empty() {
                let action = match config.missing_class {
                    MissingClassPolicy::Fallback(_) => "drawn in the fallback color",
                    _ => "left out",
                };
                rejected_notice = Some(format!(
                    "{} survey points have an unrecognized land-cover class and were {action}.",
                    batch.rejected.len()
                ));
            }
            layers.push(LayerSpec::points("Lucas Points", LUCAS_POINTS, batch.points));
        }
        None => {
            rejected_notice = Some("No survey points dataset is configured; the points layer is not shown.".to_string());
        }
    }

    let composition = compositor.build_map_view(ROME, DEFAULT_ZOOM, &layers, legend)?;
    page = page.map(composition);
    if let Some(notice) = rejected_notice {
        page = page.notice(notice);
    }
    Ok(page)
}

fn algorithms_training() -> Page {
    Page::new("algorithms-training", "Algorithms training")
        .text(
            "Two classifiers are trained on the flattened database: a **Random Forest** and a \
             **Multi-Layer Perceptron**. Each comes in two variants: *1x1* sees only the \
             reflectances of the labelled pixel, *3x3* also sees its eight neighbours.",
        )
        .text(
            "Performance is first measured with a train, validation and test split. The next \
             page checks how the classifiers behave on a whole region against official \
             land-cover statistics.",
        )
}

fn map_classification<R: LayerResolver + ?Sized>(
    compositor: &Compositor<'_, R>,
    legend: &Legend,
    assets: &Path,
) -> Result<Page> {
    let page = Page::new("map-classification", "Map classification")
        .text(
            "Test accuracy alone does not say how a land-cover classifier performs on real \
             maps. LUCAS publishes areal land-cover statistics per NUTS region, so a region \
             can be classified pixel by pixel and its class distribution compared to the \
             official one: the closer the two, the better the classifier.",
        )
        .text(
            "For the Lazio region, 2018 images with less than 40% cloud cover are reduced to \
             the median reflectance, cropped to the ISTAT boundary and exported in square \
             slices, out-of-area pixels set to zero. Every classifier is run on all slices; \
             the 3x3 variants stride over each pixel's neighbourhood with edge padding.",
        )
        .text(
            "The classification masks of each algorithm can be switched on from the layer \
             control in the upper-right corner of the map.",
        );

    let classification = VizParams::classification(&LAND_COVER);
    let mut layers = vec![LayerSpec::raster("Lazio TCI", LAZIO_TCI, VizParams::true_color())];
    layers.extend(
        CLASSIFIER_LAYERS
            .iter()
            .map(|&(name, asset)| LayerSpec::raster(name, asset, classification.clone()).hidden()),
    );
    let composition = compositor.build_map_view(ROME, DEFAULT_ZOOM, &layers, legend)?;

    Ok(page
        .map(composition)
        .text(
            "The figures below compare each classifier's regional distribution with the \
             LUCAS statistics. All four land at a Kullback-Leibler divergence of about 0.42; \
             RF 3x3 is closest (0.41, two trials only as it is slow) and MLP 3x3 furthest \
             (0.46). Every classifier overestimates shrubland, wetlands and water and \
             underestimates cropland and woodland: classes are shaped structures of pixels, \
             which per-pixel reflectance only partly captures, and yearly medians blur \
             seasonal effects such as snow, water level and crop stages.",
        )
        .image(assets.join("Map_bar_RF1x1.png"), "RF 1x1 results compared to LUCAS statistics")
        .image(assets.join("Map_bar_MLP1x1.png"), "MLP 1x1 results compared to LUCAS statistics")
        .image(assets.join("Map_bar_RF3x3.png"), "RF 3x3 results compared to LUCAS statistics")
        .image(assets.join("Map_bar_MLP3x3.png"), "MLP 3x3 results compared to LUCAS statistics"))
}
