//! Resolution of opaque asset identifiers to display locations.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ResolveError;

/// Turns an asset identifier into something the map front-end can load,
/// typically a tile URL template with `{z}/{x}/{y}` placeholders.
pub trait LayerResolver {
    fn resolve(&self, asset: &str) -> Result<String, ResolveError>;
}

impl<F> LayerResolver for F
where
    F: Fn(&str) -> Result<String, ResolveError>,
{
    fn resolve(&self, asset: &str) -> Result<String, ResolveError> {
        self(asset)
    }
}

/// In-memory asset id → location table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetCatalog {
    assets: BTreeMap<String, String>,
}

impl AssetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, asset: impl Into<String>, location: impl Into<String>) {
        self.assets.insert(asset.into(), location.into());
    }

    pub fn with_asset(mut self, asset: impl Into<String>, location: impl Into<String>) -> Self {
        self.insert(asset, location);
        self
    }

    pub fn remove(&mut self, asset: &str) -> Option<String> {
        self.assets.remove(asset)
    }

    pub fn contains(&self, asset: &str) -> bool {
        self.assets.contains_key(asset)
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.assets.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl LayerResolver for AssetCatalog {
    fn resolve(&self, asset: &str) -> Result<String, ResolveError> {
        match self.assets.get(asset) {
            Some(location) if !location.trim().is_empty() => Ok(location.clone()),
            Some(_) => Err(ResolveError::Unavailable("empty location".to_string())),
            None => Err(ResolveError::NotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_resolves_known_assets_only() {
        let catalog = AssetCatalog::new().with_asset("users/a/RF_1x1", "tiles/rf11/{z}/{x}/{y}.png");
        assert_eq!(
            catalog.resolve("users/a/RF_1x1").as_deref(),
            Ok("tiles/rf11/{z}/{x}/{y}.png")
        );
        assert_eq!(catalog.resolve("users/a/RF_3x3"), Err(ResolveError::NotFound));
    }

    #[test]
    fn blank_location_is_unavailable() {
        let catalog = AssetCatalog::new().with_asset("x", "  ");
        assert!(matches!(catalog.resolve("x"), Err(ResolveError::Unavailable(_))));
    }

    #[test]
    fn closures_act_as_resolvers() {
        let resolver = |asset: &str| Ok::<_, ResolveError>(format!("https://tiles.example/{asset}"));
        assert_eq!(resolver.resolve("m").unwrap(), "https://tiles.example/m");
    }

    #[test]
    fn catalog_is_a_plain_json_object() {
        let catalog: AssetCatalog = serde_json::from_str(r#"{"a": "tiles/a", "b": "tiles/b"}"#).unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.contains("b"));
    }
}
