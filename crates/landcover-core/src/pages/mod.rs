//! Page model: an ordered sequence of text, figure and map blocks.

pub mod study;

use std::path::PathBuf;

use crate::compositor::{Composition, MapView};

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading { level: u8, text: String },
    /// A paragraph with inline `**bold**`, `__bold__` and `[text](url)` markup.
    Text(String),
    Image { path: PathBuf, caption: String },
    Map(MapView),
    /// Diagnostic shown to the reader, e.g. a layer that could not be loaded.
    Notice(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// File stem of the rendered page.
    pub slug: String,
    pub title: String,
    pub blocks: Vec<Block>,
}

impl Page {
    pub fn new(slug: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            title: title.into(),
            blocks: Vec::new(),
        }
    }

    pub fn heading(mut self, level: u8, text: impl Into<String>) -> Self {
        self.blocks.push(Block::Heading {
            level: level.clamp(1, 6),
            text: text.into(),
        });
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.blocks.push(Block::Text(text.into()));
        self
    }

    pub fn image(mut self, path: impl Into<PathBuf>, caption: impl Into<String>) -> Self {
        self.blocks.push(Block::Image {
            path: path.into(),
            caption: caption.into(),
        });
        self
    }

    pub fn notice(mut self, text: impl Into<String>) -> Self {
        self.blocks.push(Block::Notice(text.into()));
        self
    }

    /// Add the map, followed by one notice per layer that was left out.
    pub fn map(mut self, composition: Composition) -> Self {
        self.blocks.push(Block::Map(composition.view));
        for skipped in composition.skipped {
            self.blocks.push(Block::Notice(format!(
                "Layer \"{}\" could not be loaded and is not shown ({}).",
                skipped.layer, skipped.source
            )));
        }
        self
    }

    pub fn maps(&self) -> impl Iterator<Item = &MapView> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Map(view) => Some(view),
            _ => None,
        })
    }
}

/// All pages in navigation order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Site {
    pages: Vec<Page>,
}

impl Site {
    pub fn new(pages: Vec<Page>) -> Self {
        Self { pages }
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn get(&self, slug: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.slug == slug)
    }

    /// `(slug, title)` for the navigation bar.
    pub fn navigation(&self) -> Vec<(&str, &str)> {
        self.pages
            .iter()
            .map(|p| (p.slug.as_str(), p.title.as_str()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositor::{build_map_view, AssetCatalog, Legend, LayerSpec};
    use crate::coords::LatLon;
    use crate::viz::VizParams;

    #[test]
    fn skipped_layers_become_notices_after_the_map() {
        let layers = [LayerSpec::raster("RF 3x3", "missing", VizParams::true_color())];
        let comp = build_map_view(
            LatLon::new(41.9, 12.5),
            8,
            &layers,
            &Legend::default(),
            &AssetCatalog::new(),
        )
        .unwrap();
        let page = Page::new("p", "P").map(comp);

        assert!(matches!(page.blocks[0], Block::Map(_)));
        match &page.blocks[1] {
            Block::Notice(text) => assert!(text.contains("RF 3x3"), "notice must name the layer: {text}"),
            other => panic!("expected notice, got {other:?}"),
        }
        assert_eq!(page.maps().count(), 1);
    }

    #[test]
    fn heading_level_is_clamped() {
        let page = Page::new("p", "P").heading(9, "deep");
        assert_eq!(page.blocks[0], Block::Heading { level: 6, text: "deep".into() });
    }

    #[test]
    fn navigation_follows_registration_order() {
        let site = Site::new(vec![Page::new("b", "Second"), Page::new("a", "First")]);
        assert_eq!(site.navigation(), [("b", "Second"), ("a", "First")]);
        assert_eq!(site.get("a").map(|p| p.title.as_str()), Some("First"));
        assert!(site.get("zzz").is_none());
    }
}
