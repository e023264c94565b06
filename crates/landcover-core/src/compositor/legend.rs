//! Static legend overlay: ordered display name → color entries.

use serde::{Deserialize, Serialize};

use crate::error::LegendError;
use crate::registry::ColorRegistry;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub label: String,
    /// Kept verbatim; the legend never reformats a color it was given.
    pub color: String,
}

/// Entries keep insertion order, which is display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Legend {
    pub title: String,
    entries: Vec<LegendEntry>,
}

impl Legend {
    pub const DEFAULT_TITLE: &'static str = "NLCD Land Cover Classification";

    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            entries: Vec::new(),
        }
    }

    pub fn from_entries<I, L, C>(title: impl Into<String>, entries: I) -> Self
    where
        I: IntoIterator<Item = (L, C)>,
        L: Into<String>,
        C: Into<String>,
    {
        let mut legend = Self::new(title);
        for (label, color) in entries {
            legend.push(label, color);
        }
        legend
    }

    /// One entry per class, in class order, colors as `#rrggbb`.
    pub fn land_cover(registry: &ColorRegistry) -> Self {
        Self::from_entries(
            Self::DEFAULT_TITLE,
            registry.iter().map(|(class, color)| (class.name(), color.to_hex())),
        )
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn push(&mut self, label: impl Into<String>, color: impl Into<String>) {
        self.entries.push(LegendEntry {
            label: label.into(),
            color: color.into(),
        });
    }

    pub fn entries(&self) -> &[LegendEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Labels and colors must be non-blank. Nothing else is checked.
    pub fn validate(&self) -> Result<(), LegendError> {
        for (index, entry) in self.entries.iter().enumerate() {
            if entry.label.trim().is_empty() {
                return Err(LegendError::EmptyLabel { index });
            }
            if entry.color.trim().is_empty() {
                return Err(LegendError::EmptyColor {
                    label: entry.label.clone(),
                });
            }
        }
        Ok(())
    }
}

impl Default for Legend {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TITLE)
    }
}
