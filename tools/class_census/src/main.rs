//! Survey point census by land-cover class.
//! Styles every point of a LUCAS export, counts points per top-level class
//! and reports the raw codes that match none of them. Optionally writes the
//! counts as JSON and the styled points as a GeoJSON FeatureCollection.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use landcover_core::dataset::load_points;
use landcover_core::points::style_each;
use landcover_core::{ClassCode, GeoPoint, StyledPoint, LAND_COVER};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "class_census", about = "Count survey points per land-cover class")]
struct Args {
    /// Survey points (JSON array or GeoJSON FeatureCollection).
    #[arg(short, long)]
    input: PathBuf,

    /// Write the census as JSON to this path.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write the classified points as a styled GeoJSON FeatureCollection.
    #[arg(long)]
    geojson: Option<PathBuf>,
}

// ── Census ────────────────────────────────────────────────────────────────────

#[derive(Serialize, Debug, PartialEq)]
struct ClassCount {
    code: char,
    name: &'static str,
    color: String,
    count: usize,
}

#[derive(Serialize, Debug, PartialEq)]
struct Census {
    total: usize,
    classes: Vec<ClassCount>,
    /// Raw code → occurrences, for codes outside the eight classes.
    unknown: BTreeMap<String, usize>,
}

fn census(points: &[GeoPoint]) -> (Census, Vec<StyledPoint>) {
    let mut counts = [0usize; 8];
    let mut unknown = BTreeMap::new();
    let mut styled = Vec::with_capacity(points.len());

    for result in style_each(points, &LAND_COVER) {
        match result {
            Ok(point) => {
                if let Some(class) = point.class() {
                    counts[usize::from(class.raster_value() - 1)] += 1;
                }
                styled.push(point);
            }
            Err(e) => *unknown.entry(e.code).or_insert(0) += 1,
        }
    }

    let classes = ClassCode::ALL
        .iter()
        .zip(counts)
        .map(|(&class, count)| ClassCount {
            code: class.letter(),
            name: class.name(),
            color: LAND_COVER.color(class).to_hex(),
            count,
        })
        .collect();

    (
        Census {
            total: points.len(),
            classes,
            unknown,
        },
        styled,
    )
}

fn print_table(census: &Census) {
    eprintln!("{:<4} {:<16} {:<8} {:>8} {:>7}", "code", "class", "color", "points", "share");
    for c in &census.classes {
        let share = if census.total == 0 {
            0.0
        } else {
            100.0 * c.count as f64 / census.total as f64
        };
        eprintln!("{:<4} {:<16} {:<8} {:>8} {:>6.1}%", c.code, c.name, c.color, c.count, share);
    }
    let unknown: usize = census.unknown.values().sum();
    eprintln!("{:<4} {:<16} {:<8} {:>8}", "-", "unrecognized", "", unknown);
    for (code, n) in &census.unknown {
        eprintln!("       {code:?}: {n}");
    }
    eprintln!("total: {}", census.total);
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let points = load_points(&args.input)
        .with_context(|| format!("loading {}", args.input.display()))?;
    info!(count = points.len(), "survey points loaded");

    let (census, styled) = census(&points);
    print_table(&census);

    if let Some(path) = &args.output {
        fs::write(path, serde_json::to_string_pretty(&census)?)
            .with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "census written");
    }

    if let Some(path) = &args.geojson {
        let collection = serde_json::json!({
            "type": "FeatureCollection",
            "features": styled.iter().map(StyledPoint::to_geojson).collect::<Vec<_>>(),
        });
        fs::write(path, serde_json::to_string(&collection)?)
            .with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), features = styled.len(), "styled points written");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use landcover_core::LatLon;

    fn pt(code: &str) -> GeoPoint {
        GeoPoint::new(LatLon::new(41.9, 12.5), code)
    }

    #[test]
    fn counts_by_first_letter_and_collects_unknown_codes() {
        let points = [pt("A11"), pt("B16"), pt("B"), pt("H"), pt("X9"), pt(""), pt("X9")];
        let (census, styled) = census(&points);

        assert_eq!(census.total, 7);
        assert_eq!(styled.len(), 4);
        let counts: Vec<usize> = census.classes.iter().map(|c| c.count).collect();
        assert_eq!(counts, [1, 2, 0, 0, 0, 0, 0, 1]);
        assert_eq!(census.unknown.get("X9"), Some(&2));
        assert_eq!(census.unknown.get(""), Some(&1));
    }

    #[test]
    fn class_rows_follow_registry_order_and_colors() {
        let (census, _) = census(&[]);
        assert_eq!(census.classes.len(), 8);
        assert_eq!(census.classes[0].name, "Artificial Land");
        assert_eq!(census.classes[0].color, "#ff0101");
        assert_eq!(census.classes[7].code, 'H');
    }
}
