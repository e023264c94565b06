//! Color-table visualizer. Writes PNG previews of the land-cover colors:
//! the legend swatches, the 0..=8 classification ramp, and optionally a
//! classified raster (JSON `{width, height, data}` of class values) colored
//! the way the classification map layers are.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use clap::Parser;
use image::{Rgb as Pixel, RgbImage};
use landcover_core::{ClassCode, Rgb, VizParams, LAND_COVER};
use serde::Deserialize;

const SWATCH: u32 = 32;

#[derive(Parser, Debug)]
#[command(name = "visualize", about = "Write PNG previews of the land-cover colors")]
struct Args {
    /// Output directory.
    #[arg(short, long, default_value = "data/debug")]
    output: PathBuf,

    /// Classified raster JSON to render as classification.png.
    #[arg(short, long)]
    raster: Option<PathBuf>,
}

#[derive(Deserialize)]
struct ClassRaster {
    width: u32,
    height: u32,
    /// Row-major class values; 0 is no-data, 1..=8 are classes A..H.
    data: Vec<Option<f64>>,
}

// ── Colour helpers ────────────────────────────────────────────────────────────

fn pixel(c: Rgb) -> Pixel<u8> {
    Pixel(c.to_array())
}

/// One row per class, in legend order.
fn legend_image() -> RgbImage {
    let mut img = RgbImage::new(SWATCH * 4, SWATCH * ClassCode::ALL.len() as u32);
    for (row, class) in ClassCode::ALL.iter().enumerate() {
        let color = pixel(LAND_COVER.color(*class));
        for y in 0..SWATCH {
            for x in 0..img.width() {
                img.put_pixel(x, row as u32 * SWATCH + y, color);
            }
        }
    }
    img
}

/// Horizontal sweep over `[min, max]` through the classification palette.
fn ramp_image(viz: &VizParams, width: u32) -> RgbImage {
    let mut img = RgbImage::new(width, SWATCH);
    let span = viz.max() - viz.min();
    for x in 0..width {
        let value = viz.min() + span * x as f64 / (width - 1).max(1) as f64;
        let color = viz.color_for_value(value).unwrap_or(Rgb::NO_DATA);
        for y in 0..SWATCH {
            img.put_pixel(x, y, pixel(color));
        }
    }
    img
}

fn raster_image(raster: &ClassRaster, viz: &VizParams) -> Result<RgbImage> {
    let expected = raster.width as usize * raster.height as usize;
    ensure!(
        raster.data.len() == expected,
        "raster has {} values, expected {}x{} = {expected}",
        raster.data.len(),
        raster.width,
        raster.height
    );
    let mut img = RgbImage::new(raster.width, raster.height);
    for (i, value) in raster.data.iter().enumerate() {
        let color = value
            .and_then(|v| viz.color_for_value(v))
            .unwrap_or(Rgb::NO_DATA);
        let (x, y) = (i as u32 % raster.width, i as u32 / raster.width);
        img.put_pixel(x, y, pixel(color));
    }
    Ok(img)
}

fn save(img: &RgbImage, path: &Path) -> Result<()> {
    img.save(path)
        .with_context(|| format!("failed to save {}", path.display()))?;
    eprintln!("  wrote {}", path.display());
    Ok(())
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();
    fs::create_dir_all(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;

    let viz = VizParams::classification(&LAND_COVER);

    save(&legend_image(), &args.output.join("legend.png"))?;
    save(&ramp_image(&viz, 9 * SWATCH), &args.output.join("classification_ramp.png"))?;

    if let Some(path) = &args.raster {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let raster: ClassRaster = serde_json::from_str(&text)
            .with_context(|| format!("parsing {}", path.display()))?;
        save(&raster_image(&raster, &viz)?, &args.output.join("classification.png"))?;
    }

    Ok(())
}
