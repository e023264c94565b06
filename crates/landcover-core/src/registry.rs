//! Land-cover class codes and the fixed class → color table.
//!
//! The eight classes are the first character of the LUCAS LC1 land-cover
//! code. Their colors are a process-wide constant ([`LAND_COVER`]) shared by
//! point styling, classification palettes and every legend.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::error::UnknownClassError;

/// Top-level land-cover category, identified by a single letter A–H.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ClassCode {
    #[serde(rename = "A")]
    ArtificialLand,
    #[serde(rename = "B")]
    Cropland,
    #[serde(rename = "C")]
    Woodland,
    #[serde(rename = "D")]
    Shrubland,
    #[serde(rename = "E")]
    Grassland,
    #[serde(rename = "F")]
    Bareland,
    #[serde(rename = "G")]
    Water,
    #[serde(rename = "H")]
    Wetlands,
}

impl ClassCode {
    /// All classes in letter order, which is also legend and palette order.
    pub const ALL: [ClassCode; 8] = [
        Self::ArtificialLand,
        Self::Cropland,
        Self::Woodland,
        Self::Shrubland,
        Self::Grassland,
        Self::Bareland,
        Self::Water,
        Self::Wetlands,
    ];

    pub fn letter(self) -> char {
        (b'A' + self as u8) as char
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::ArtificialLand => "Artificial Land",
            Self::Cropland => "Cropland",
            Self::Woodland => "Woodland",
            Self::Shrubland => "Shrubland",
            Self::Grassland => "Grassland",
            Self::Bareland => "Bareland",
            Self::Water => "Water",
            Self::Wetlands => "Wetlands",
        }
    }

    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'A'..='H' => Some(Self::ALL[(letter as u8 - b'A') as usize]),
            _ => None,
        }
    }

    /// Pixel value of this class in classifier output rasters (1–8; 0 is no-data).
    pub fn raster_value(self) -> u8 {
        self as u8 + 1
    }

    pub fn from_raster_value(value: u8) -> Option<Self> {
        value
            .checked_sub(1)
            .and_then(|i| Self::ALL.get(i as usize).copied())
    }
}

impl fmt::Display for ClassCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ClassCode {
    type Err = UnknownClassError;

    /// Accepts a bare letter (`"B"`) or a three-character LC1 code (`"B16"`).
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let code = raw.trim();
        let mut chars = code.chars();
        let parsed = match (chars.next(), chars.as_str()) {
            (Some(letter), "") => Self::from_letter(letter),
            (Some(letter), rest) if rest.len() == 2 && rest.bytes().all(|b| b.is_ascii_digit()) => {
                Self::from_letter(letter)
            }
            _ => None,
        };
        parsed.ok_or_else(|| UnknownClassError::new(raw))
    }
}

/// Immutable class → color table, indexed by [`ClassCode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorRegistry {
    colors: [Rgb; 8],
}

impl ColorRegistry {
    /// `colors` follows [`ClassCode::ALL`] order.
    pub const fn new(colors: [Rgb; 8]) -> Self {
        Self { colors }
    }

    #[inline]
    pub fn color(&self, class: ClassCode) -> Rgb {
        self.colors[class as usize]
    }

    /// Color for a raw class attribute; fails for anything outside the eight codes.
    pub fn color_for(&self, code: &str) -> Result<Rgb, UnknownClassError> {
        code.parse::<ClassCode>().map(|class| self.color(class))
    }

    /// `(class, color)` pairs in class order.
    pub fn iter(&self) -> impl Iterator<Item = (ClassCode, Rgb)> + '_ {
        ClassCode::ALL.iter().map(move |&class| (class, self.color(class)))
    }

    /// Nine-entry palette for classifier rasters: index 0 is no-data black,
    /// index `class.raster_value()` is that class's color.
    pub fn classification_palette(&self) -> Vec<Rgb> {
        std::iter::once(Rgb::NO_DATA).chain(self.colors).collect()
    }
}

/// The study's land-cover colors.
pub static LAND_COVER: ColorRegistry = ColorRegistry::new([
    Rgb::new(0xff, 0x01, 0x01), // A: artificial land
    Rgb::new(0xff, 0xff, 0x01), // B: cropland
    Rgb::new(0x33, 0x66, 0x01), // C: woodland
    Rgb::new(0xff, 0x80, 0x01), // D: shrubland
    Rgb::new(0x01, 0xff, 0x01), // E: grassland
    Rgb::new(0x80, 0x80, 0x80), // F: bareland
    Rgb::new(0x01, 0x01, 0xff), // G: water
    Rgb::new(0x99, 0xff, 0xff), // H: wetlands
]);
