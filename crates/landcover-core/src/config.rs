//! Site configuration.
//!
//! Loaded from JSON; every field is optional and defaults to the values of
//! the published study, so an empty object `{}` is a complete config.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::compositor::{AssetCatalog, Legend};
use crate::coords::ZoomRange;
use crate::error::ConfigError;
use crate::pages::study;
use crate::points::MissingClassPolicy;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Directory holding the pre-rendered figures referenced by the pages.
    pub asset_dir: PathBuf,
    /// Where rendered HTML pages are written.
    pub output_dir: PathBuf,
    /// Survey points export; without it the points layer is left out.
    pub points_path: Option<PathBuf>,
    /// Asset id → tile location for every map layer.
    pub catalog: AssetCatalog,
    pub zoom_range: ZoomRange,
    pub missing_class: MissingClassPolicy,
    pub legend_title: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            asset_dir: PathBuf::from("assets"),
            output_dir: PathBuf::from("site"),
            points_path: None,
            catalog: study::default_catalog(),
            zoom_range: ZoomRange::default(),
            missing_class: MissingClassPolicy::default(),
            legend_title: Legend::DEFAULT_TITLE.to_string(),
        }
    }
}

impl SiteConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.zoom_range.is_valid() {
            return Err(ConfigError::ZoomRange {
                min: self.zoom_range.min,
                max: self.zoom_range.max,
            });
        }
        if self.legend_title.trim().is_empty() {
            return Err(ConfigError::EmptyLegendTitle);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use std::io::Write;

    #[test]
    fn empty_object_is_the_default_config() {
        let config = SiteConfig::from_json("{}").unwrap();
        assert_eq!(config, SiteConfig::default());
        assert!(config.catalog.contains(study::LAZIO_TCI));
    }

    #[test]
    fn fields_override_defaults() {
        let json = r##"{
            "output_dir": "public",
            "points_path": "data/lucas_2018.geojson",
            "zoom_range": {"min": 2, "max": 18},
            "missing_class": {"fallback": "#808080"},
            "catalog": {"users/x/RF_1x1": "https://tiles.example/rf11/{z}/{x}/{y}"}
        }"##;
        let config = SiteConfig::from_json(json).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("public"));
        assert_eq!(config.zoom_range, ZoomRange::new(2, 18));
        assert_eq!(
            config.missing_class,
            MissingClassPolicy::Fallback(Rgb::new(0x80, 0x80, 0x80))
        );
        assert_eq!(config.catalog.len(), 1, "a catalog in the file replaces the default");
        assert_eq!(config.asset_dir, PathBuf::from("assets"));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(matches!(
            SiteConfig::from_json(r#"{"zoom": 8}"#),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn inverted_zoom_range_is_rejected() {
        let err = SiteConfig::from_json(r#"{"zoom_range": {"min": 19, "max": 3}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::ZoomRange { min: 19, max: 3 }));
    }

    #[test]
    fn blank_legend_title_is_rejected() {
        let err = SiteConfig::from_json(r#"{"legend_title": "  "}"#).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyLegendTitle));
    }

    #[test]
    fn from_path_reads_file_and_reports_missing_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"legend_title": "Land cover"}}"#).unwrap();
        assert_eq!(SiteConfig::from_path(file.path()).unwrap().legend_title, "Land cover");

        let err = SiteConfig::from_path(Path::new("/nonexistent/site.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
