//! Standalone HTML rendering of study pages.
//!
//! Each page becomes one document: a navigation bar, the blocks in order,
//! and every map as a Leaflet container whose [`MapView`] is embedded as
//! JSON and drawn by a shared script (layer switcher plus legend overlay).
//!
//! Figures are referenced under [`FIGURE_DIR`] next to the pages; the caller
//! publishes them there using [`site_figures`].

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

use crate::compositor::MapView;
use crate::pages::{Block, Page, Site};

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";

const STYLE: &str = r#"
    body { font-family: sans-serif; max-width: 960px; margin: 0 auto; padding: 0 16px 48px; line-height: 1.5; }
    nav { display: flex; gap: 16px; padding: 12px 0; border-bottom: 1px solid #ddd; margin-bottom: 16px; }
    nav a.current { font-weight: bold; }
    figure { margin: 24px 0; text-align: center; }
    figure img { max-width: 100%; }
    .lc-map { height: 520px; margin: 24px 0; }
    .notice { background: #fff4e5; border-left: 4px solid #ff8001; padding: 8px 12px; }
    .lc-legend { background: white; padding: 8px 10px; border-radius: 4px; box-shadow: 0 1px 4px rgba(0,0,0,0.3); line-height: 20px; }
    .lc-legend i { display: inline-block; width: 14px; height: 14px; margin-right: 6px; vertical-align: middle; border: 1px solid #555; }
"#;

const MAP_SCRIPT: &str = r#"
document.querySelectorAll('.lc-map').forEach(function (el) {
  var view = JSON.parse(document.getElementById(el.id + '-data').textContent);
  var map = L.map(el).setView([view.center.lat, view.center.lon], view.zoom);
  L.tileLayer('https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png', {
    attribution: '&copy; OpenStreetMap contributors'
  }).addTo(map);

  var overlays = {};
  view.layers.forEach(function (layer) {
    var lyr;
    if (layer.kind === 'raster') {
      lyr = L.tileLayer(layer.location, { maxZoom: 24 });
    } else {
      lyr = L.layerGroup(layer.points.map(function (p) {
        return L.circleMarker([p.lat, p.lon], {
          radius: 4, weight: 0, fillOpacity: 0.9, fillColor: p.style.fillColor
        }).bindTooltip(p.class_code);
      }));
    }
    overlays[layer.name] = lyr;
    if (layer.shown) { lyr.addTo(map); }
  });
  L.control.layers(null, overlays, { collapsed: false }).addTo(map);

  var legend = L.control({ position: 'bottomright' });
  legend.onAdd = function () {
    var div = L.DomUtil.create('div', 'lc-legend');
    var title = document.createElement('strong');
    title.textContent = view.legend.title;
    div.appendChild(title);
    view.legend.entries.forEach(function (entry) {
      var row = document.createElement('div');
      var swatch = document.createElement('i');
      swatch.style.background = entry.color;
      row.appendChild(swatch);
      row.appendChild(document.createTextNode(entry.label));
      div.appendChild(row);
    });
    return div;
  };
  legend.addTo(map);
});
"#;

/// A rendered page ready to be written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub file_name: String,
    pub html: String,
}

pub fn page_file_name(slug: &str) -> String {
    format!("{slug}.html")
}

/// Directory next to the rendered pages that holds the figures.
pub const FIGURE_DIR: &str = "figures";

/// Page-relative `src` of a figure: `figures/<file name>`.
pub fn figure_href(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{FIGURE_DIR}/{name}")
}

/// Every figure the site references, as `(href, source path)` sorted by href.
/// Each href is relative to the output directory and appears once.
pub fn site_figures(site: &Site) -> Vec<(String, &Path)> {
    let mut figures = BTreeMap::new();
    for page in site.pages() {
        for block in &page.blocks {
            if let Block::Image { path, .. } = block {
                figures.entry(figure_href(path)).or_insert(path.as_path());
            }
        }
    }
    figures.into_iter().collect()
}

/// Render every page of the site, in navigation order.
pub fn render_site(site: &Site) -> Result<Vec<RenderedPage>, serde_json::Error> {
    site.pages()
        .iter()
        .map(|page| {
            render_page(site, page).map(|html| RenderedPage {
                file_name: page_file_name(&page.slug),
                html,
            })
        })
        .collect()
}

/// Render one page as a standalone HTML document.
pub fn render_page(site: &Site, page: &Page) -> Result<String, serde_json::Error> {
    let mut html = String::new();
    let title = escape_html(&page.title);
    let has_map = page.maps().next().is_some();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\" />\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\" />\n");
    let _ = writeln!(html, "<title>{title}</title>");
    if has_map {
        let _ = writeln!(html, "<link rel=\"stylesheet\" href=\"{LEAFLET_CSS}\" />");
    }
    let _ = writeln!(html, "<style>{STYLE}</style>\n</head>\n<body>");

    html.push_str("<nav>\n");
    for (slug, nav_title) in site.navigation() {
        let class = if slug == page.slug { " class=\"current\"" } else { "" };
        let _ = writeln!(
            html,
            "<a href=\"{}\"{class}>{}</a>",
            escape_html(&page_file_name(slug)),
            escape_html(nav_title)
        );
    }
    html.push_str("</nav>\n");
    let _ = writeln!(html, "<h1>{title}</h1>");

    let mut map_index = 0;
    for block in &page.blocks {
        match block {
            Block::Heading { level, text } => {
                let _ = writeln!(html, "<h{level}>{}</h{level}>", escape_html(text));
            }
            Block::Text(text) => {
                let _ = writeln!(html, "<p>{}</p>", render_inline(text));
            }
            Block::Image { path, caption } => {
                let src = escape_html(&figure_href(path));
                let caption = escape_html(caption);
                let _ = writeln!(
                    html,
                    "<figure>\n<img src=\"{src}\" alt=\"{caption}\" />\n<figcaption>{caption}</figcaption>\n</figure>"
                );
            }
            Block::Map(view) => {
                map_index += 1;
                html.push_str(&render_map(&format!("map-{map_index}"), view)?);
            }
            Block::Notice(text) => {
                let _ = writeln!(html, "<p class=\"notice\">{}</p>", escape_html(text));
            }
        }
    }

    if has_map {
        let _ = writeln!(html, "<script src=\"{LEAFLET_JS}\"></script>");
        let _ = writeln!(html, "<script>{MAP_SCRIPT}</script>");
    }
    html.push_str("</body>\n</html>\n");
    Ok(html)
}

fn render_map(id: &str, view: &MapView) -> Result<String, serde_json::Error> {
    let json = script_safe_json(&serde_json::to_string(view)?);
    Ok(format!(
        "<div class=\"lc-map\" id=\"{id}\"></div>\n\
         <script type=\"application/json\" id=\"{id}-data\">{json}</script>\n"
    ))
}

/// JSON inside a `<script>` element must not contain `</`.
fn script_safe_json(json: &str) -> String {
    json.replace("</", "<\\/")
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        push_escaped(&mut out, ch);
    }
    out
}

fn push_escaped(out: &mut String, ch: char) {
    match ch {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '"' => out.push_str("&quot;"),
        '\'' => out.push_str("&#39;"),
        _ => out.push(ch),
    }
}

// ── Inline markup ─────────────────────────────────────────────────────────────

/// Escape `text` and render `**strong**`, `__strong__`, `*em*`, `_em_` and
/// `[label](url)`. Unmatched delimiters are kept literally.
pub fn render_inline(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    let mut prev: Option<char> = None;
    while let Some(ch) = rest.chars().next() {
        let word_boundary = !prev.is_some_and(char::is_alphanumeric);
        let span = link(rest).or_else(|| if word_boundary { emphasis(rest) } else { None });
        match span {
            Some((html, consumed)) => {
                out.push_str(&html);
                prev = rest[..consumed].chars().last();
                rest = &rest[consumed..];
            }
            None => {
                push_escaped(&mut out, ch);
                prev = Some(ch);
                rest = &rest[ch.len_utf8()..];
            }
        }
    }
    out
}

/// `[label](url)` at the start of `s`: rendered html and bytes consumed.
fn link(s: &str) -> Option<(String, usize)> {
    let body = s.strip_prefix('[')?;
    let label_end = body.find("](")?;
    let label = &body[..label_end];
    let after = &body[label_end + 2..];
    let url_end = after.find(')')?;
    let url = &after[..url_end];
    if label.is_empty() || url.is_empty() || url.contains(char::is_whitespace) {
        return None;
    }
    let html = format!("<a href=\"{}\">{}</a>", escape_html(url), render_inline(label));
    Some((html, 1 + label_end + 2 + url_end + 1))
}

/// Emphasis span at the start of `s`. The closing delimiter must follow a
/// non-space and must not be followed by a letter or digit, so underscores
/// inside identifiers and URLs are left alone.
fn emphasis(s: &str) -> Option<(String, usize)> {
    const DELIMS: [(&str, &str); 4] = [("**", "strong"), ("__", "strong"), ("*", "em"), ("_", "em")];
    for (delim, tag) in DELIMS {
        let Some(body) = s.strip_prefix(delim) else {
            continue;
        };
        if body.starts_with(char::is_whitespace) {
            continue;
        }
        let close = body.match_indices(delim).map(|(i, _)| i).find(|&i| {
            i > 0
                && !body[..i].ends_with(char::is_whitespace)
                && !body[i + delim.len()..].starts_with(char::is_alphanumeric)
                && !body[i + delim.len()..].starts_with(delim)
        });
        if let Some(end) = close {
            let html = format!("<{tag}>{}</{tag}>", render_inline(&body[..end]));
            return Some((html, delim.len() * 2 + end));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositor::{build_map_view, AssetCatalog, Legend, LayerSpec};
    use crate::coords::LatLon;
    use crate::registry::LAND_COVER;
    use crate::viz::VizParams;

    #[test]
    fn html_special_characters_are_escaped() {
        assert_eq!(escape_html(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }

    #[test]
    fn bold_and_links_render() {
        assert_eq!(
            render_inline("a __collection__ of **points**"),
            "a <strong>collection</strong> of <strong>points</strong>"
        );
        assert_eq!(
            render_inline("see [LUCAS](https://ec.europa.eu/eurostat/web/lucas)."),
            "see <a href=\"https://ec.europa.eu/eurostat/web/lucas\">LUCAS</a>."
        );
    }

    #[test]
    fn underscores_inside_urls_do_not_close_emphasis() {
        let text = "_code [here](https://github.com/a/Lucas_points_for_Sentinel2)._";
        assert_eq!(
            render_inline(text),
            "<em>code <a href=\"https://github.com/a/Lucas_points_for_Sentinel2\">here</a>.</em>"
        );
    }

    #[test]
    fn intra_word_and_unmatched_delimiters_stay_literal() {
        assert_eq!(render_inline("snake_case_name"), "snake_case_name");
        assert_eq!(render_inline("2 * 3 and *open"), "2 * 3 and *open");
        assert_eq!(render_inline("[broken](no close"), "[broken](no close");
    }

    #[test]
    fn markup_inside_text_is_still_escaped() {
        assert_eq!(render_inline("**<b>**"), "<strong>&lt;b&gt;</strong>");
    }

    #[test]
    fn map_json_cannot_close_its_script_tag() {
        let legend = Legend::from_entries("</script><script>alert(1)", [("Water", "#0101ff")]);
        let comp = build_map_view(LatLon::new(41.9, 12.5), 8, &[], &legend, &AssetCatalog::new()).unwrap();
        let html = render_map("map-1", &comp.view).unwrap();
        assert!(!html.contains("</script><script>"));
        assert!(html.contains(r#"<\/script>"#));
    }

    #[test]
    fn page_has_navigation_blocks_and_map_script() {
        let catalog = AssetCatalog::new().with_asset("rf", "tiles/rf/{z}/{x}/{y}.png");
        let layers = [LayerSpec::raster("RF 1x1", "rf", VizParams::classification(&LAND_COVER))];
        let comp = build_map_view(
            LatLon::new(41.902782, 12.496366),
            8,
            &layers,
            &Legend::land_cover(&LAND_COVER),
            &catalog,
        )
        .unwrap();
        let page = Page::new("map-classification", "Map classification")
            .text("intro")
            .map(comp)
            .image("assets/Map_bar_RF1x1.png", "RF 1x1 results")
            .notice("heads up");
        let site = Site::new(vec![Page::new("introduction", "Introduction"), page.clone()]);

        let html = render_page(&site, &page).unwrap();
        assert!(html.contains("<title>Map classification</title>"));
        assert!(html.contains("<a href=\"introduction.html\">Introduction</a>"));
        assert!(html.contains("<a href=\"map-classification.html\" class=\"current\">"));
        assert!(html.contains("<div class=\"lc-map\" id=\"map-1\"></div>"));
        assert!(html.contains("\"location\":\"tiles/rf/{z}/{x}/{y}.png\""));
        assert!(html.contains("<figcaption>RF 1x1 results</figcaption>"));
        assert!(html.contains("<p class=\"notice\">heads up</p>"));
        assert!(html.contains(LEAFLET_JS));
    }

    #[test]
    fn figures_are_referenced_relative_to_the_page() {
        let page = Page::new("database-creation", "Database creation")
            .image("assets/Lucas_country_numerosity.png", "per country")
            .image("/data/study/figs/Lucas_LC1_numerosity.png", "per class");
        let site = Site::new(vec![
            page.clone(),
            Page::new("other", "Other").image("assets/Lucas_country_numerosity.png", "again"),
        ]);

        let html = render_page(&site, &page).unwrap();
        assert!(html.contains("<img src=\"figures/Lucas_country_numerosity.png\""), "{html}");
        assert!(html.contains("<img src=\"figures/Lucas_LC1_numerosity.png\""), "{html}");
        assert!(!html.contains("assets/"), "source directory must not leak into the page");

        let figures = site_figures(&site);
        assert_eq!(
            figures,
            [
                ("figures/Lucas_LC1_numerosity.png".to_string(), Path::new("/data/study/figs/Lucas_LC1_numerosity.png")),
                ("figures/Lucas_country_numerosity.png".to_string(), Path::new("assets/Lucas_country_numerosity.png")),
            ],
            "one entry per figure, pointing back at its source"
        );
    }

    #[test]
    fn pages_without_maps_skip_leaflet() {
        let page = Page::new("introduction", "Introduction").text("hello");
        let site = Site::new(vec![page.clone()]);
        let html = render_page(&site, &page).unwrap();
        assert!(!html.contains("leaflet"));
    }

    #[test]
    fn render_site_names_files_after_slugs() {
        let site = Site::new(vec![Page::new("a", "A"), Page::new("b", "B")]);
        let files: Vec<String> = render_site(&site).unwrap().into_iter().map(|p| p.file_name).collect();
        assert_eq!(files, ["a.html", "b.html"]);
    }
}
