/// Static site generator for the land-cover study.
/// Builds every study page from the site config and writes one HTML file
/// per page, plus `index.html`, a `manifest.json` listing the pages, and the
/// referenced figures under `figures/`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use landcover_core::dataset::load_points;
use landcover_core::pages::study::build_study;
use landcover_core::pages::{Page, Site};
use landcover_core::render::{render_site, site_figures, RenderedPage};
use landcover_core::SiteConfig;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "landcover-site", about = "Render the land-cover study pages to HTML")]
struct Args {
    /// Site config JSON. Without it the built-in study defaults are used.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Survey points (JSON array or GeoJSON FeatureCollection). Overrides the config.
    #[arg(short, long)]
    points: Option<PathBuf>,

    /// Directory holding the page figures. Overrides the config.
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Output directory. Overrides the config.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Render only the page with this slug.
    #[arg(long)]
    page: Option<String>,
}

#[derive(Serialize)]
struct Manifest<'a> {
    pages: Vec<ManifestEntry<'a>>,
}

#[derive(Serialize)]
struct ManifestEntry<'a> {
    slug: &'a str,
    title: &'a str,
    file: &'a str,
    maps: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SiteConfig::from_path(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SiteConfig::default(),
    };
    if let Some(points) = args.points {
        config.points_path = Some(points);
    }
    if let Some(assets) = args.assets {
        config.asset_dir = assets;
    }
    if let Some(output) = args.output {
        config.output_dir = output;
    }

    let points = match &config.points_path {
        Some(path) => {
            let points = load_points(path)
                .with_context(|| format!("loading survey points {}", path.display()))?;
            info!(count = points.len(), path = %path.display(), "survey points loaded");
            Some(points)
        }
        None => {
            warn!("no survey points configured; the points layer will be left out");
            None
        }
    };

    let site = build_study(&config, points.as_deref(), &config.catalog)
        .context("building study pages")?;
    let rendered = render_site(&site).context("rendering pages")?;

    let written = write_site(&site, &rendered, &config.output_dir, args.page.as_deref())?;
    eprintln!("Wrote {written} page(s) to {}", config.output_dir.display());
    Ok(())
}

/// Write the selected pages (all when `only` is `None`), `index.html` for a
/// full run, the site figures and a manifest of the whole site.
/// Returns the number of pages written.
fn write_site(site: &Site, rendered: &[RenderedPage], out: &Path, only: Option<&str>) -> Result<usize> {
    let selected: Vec<(&Page, &RenderedPage)> = site
        .pages()
        .iter()
        .zip(rendered)
        .filter(|(page, _)| only.map_or(true, |slug| page.slug == slug))
        .collect();
    if selected.is_empty() {
        let known: Vec<&str> = site.navigation().into_iter().map(|(slug, _)| slug).collect();
        bail!(
            "no page named {:?}; known pages: {}",
            only.unwrap_or_default(),
            known.join(", ")
        );
    }

    fs::create_dir_all(out).with_context(|| format!("creating {}", out.display()))?;

    for (_, page) in &selected {
        write_page(out, &page.file_name, &page.html)?;
    }
    if only.is_none() {
        if let Some(first) = rendered.first() {
            write_page(out, "index.html", &first.html)?;
        }
    }

    copy_figures(site, out)?;

    let manifest = Manifest {
        pages: site
            .pages()
            .iter()
            .zip(rendered)
            .map(|(page, file)| ManifestEntry {
                slug: &page.slug,
                title: &page.title,
                file: &file.file_name,
                maps: page.maps().count(),
            })
            .collect(),
    };
    let manifest_path = out.join("manifest.json");
    fs::write(&manifest_path, serde_json::to_string_pretty(&manifest)?)
        .with_context(|| format!("writing {}", manifest_path.display()))?;

    Ok(selected.len())
}

/// Copy every figure the pages reference to its page-relative location.
/// A missing source is logged and left out; the page still renders.
fn copy_figures(site: &Site, out: &Path) -> Result<()> {
    for (href, source) in site_figures(site) {
        let dest = out.join(&href);
        if !source.is_file() {
            warn!(source = %source.display(), "figure not found; page will show a broken image");
            continue;
        }
        if let Some(dir) = dest.parent() {
            fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        }
        fs::copy(source, &dest)
            .with_context(|| format!("copying {} to {}", source.display(), dest.display()))?;
        info!(figure = %href, "figure copied");
    }
    Ok(())
}

fn write_page(dir: &Path, name: &str, html: &str) -> Result<()> {
    let path = dir.join(name);
    fs::write(&path, html).with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), bytes = html.len(), "page written");
    Ok(())
}
