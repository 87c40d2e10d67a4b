//! A single color entry of a theme.

use std::fmt;

use serde::Serialize;

use crate::error::CoreError;
use crate::feed::SwatchItem;

/// Swatches whose brightest channel is below this value count as dark.
pub const DARK_BRIGHTNESS_THRESHOLD: u8 = 192;

/// 8-bit RGB triple decoded from a swatch's hex color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Perceived brightness as used for dark/light classification: the
    /// maximum of the three channels.
    pub fn brightness(self) -> u8 {
        self.r.max(self.g).max(self.b)
    }
}

/// One color of a theme.
///
/// Derived values (RGB, brightness, darkness) are computed once at
/// construction; a `Swatch` never changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Swatch {
    hex_color: String,
    color_mode: String,
    channels: [f64; 4],
    index: usize,
    rgb: Rgb,
    brightness: u8,
    is_dark: bool,
}

impl Swatch {
    /// Build a swatch from a hex color (`RRGGBB` or `0xRRGGBB`).
    pub fn new(
        hex_color: &str,
        color_mode: impl Into<String>,
        channels: [f64; 4],
        index: usize,
    ) -> Result<Self, CoreError> {
        let hex = normalize_hex(hex_color)?;
        let value = u32::from_str_radix(&hex, 16)
            .map_err(|e| CoreError::InvalidRecord(format!("Invalid swatch hex '{hex_color}': {e}")))?;
        let rgb = Rgb {
            r: (value >> 16 & 0xFF) as u8,
            g: (value >> 8 & 0xFF) as u8,
            b: (value & 0xFF) as u8,
        };
        let brightness = rgb.brightness();

        Ok(Self {
            hex_color: hex,
            color_mode: color_mode.into(),
            channels,
            index,
            rgb,
            brightness,
            is_dark: brightness < DARK_BRIGHTNESS_THRESHOLD,
        })
    }

    /// Build a swatch from its wire form. `position` is used when the item's
    /// own index is missing or unparseable.
    pub fn from_item(item: &SwatchItem, position: usize) -> Result<Self, CoreError> {
        let channels = [
            parse_channel(&item.swatch_channel1),
            parse_channel(&item.swatch_channel2),
            parse_channel(&item.swatch_channel3),
            parse_channel(&item.swatch_channel4),
        ];
        let index = item.swatch_index.trim().parse().unwrap_or(position);
        Self::new(&item.swatch_hex_color, item.swatch_color_mode.trim(), channels, index)
    }

    /// Bare six-digit hex color, e.g. `"FF8800"`.
    pub fn hex_color(&self) -> &str {
        &self.hex_color
    }

    /// Prefixed numeric literal form, e.g. `"0xFF8800"`.
    pub fn hex_literal(&self) -> String {
        format!("0x{}", self.hex_color)
    }

    /// Color-space label (`rgb`, `cmyk`, `hsv`, `lab`, ...). Channel meaning
    /// depends on it.
    pub fn color_mode(&self) -> &str {
        &self.color_mode
    }

    pub fn channels(&self) -> [f64; 4] {
        self.channels
    }

    /// Zero-based position within the parent theme.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn rgb(&self) -> Rgb {
        self.rgb
    }

    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    pub fn is_dark(&self) -> bool {
        self.is_dark
    }
}

impl fmt::Display for Swatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.hex_color)
    }
}

fn normalize_hex(raw: &str) -> Result<String, CoreError> {
    let trimmed = raw.trim();
    let bare = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if bare.len() != 6 || !bare.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(CoreError::InvalidRecord(format!(
            "Invalid swatch hex '{raw}'"
        )));
    }
    Ok(bare.to_ascii_uppercase())
}

fn parse_channel(raw: &str) -> f64 {
    raw.trim().parse().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn white_is_bright() {
        let swatch = Swatch::new("FFFFFF", "rgb", [1.0, 1.0, 1.0, 0.0], 0).unwrap();
        assert_eq!(swatch.rgb(), Rgb { r: 255, g: 255, b: 255 });
        assert_eq!(swatch.brightness(), 255);
        assert!(!swatch.is_dark());
    }

    #[test]
    fn black_is_dark() {
        let swatch = Swatch::new("000000", "rgb", [0.0; 4], 1).unwrap();
        assert_eq!(swatch.rgb(), Rgb { r: 0, g: 0, b: 0 });
        assert_eq!(swatch.brightness(), 0);
        assert!(swatch.is_dark());
    }

    #[test]
    fn brightness_threshold_is_exclusive() {
        assert!(Swatch::new("BF0000", "rgb", [0.0; 4], 0).unwrap().is_dark());
        assert!(!Swatch::new("00C000", "rgb", [0.0; 4], 0).unwrap().is_dark());
    }

    #[test]
    fn prefixed_hex_is_stored_bare() {
        let swatch = Swatch::new("0x1a2B3c", "rgb", [0.0; 4], 2).unwrap();
        assert_eq!(swatch.hex_color(), "1A2B3C");
        assert_eq!(swatch.hex_literal(), "0x1A2B3C");
        assert_eq!(swatch.rgb(), Rgb { r: 0x1A, g: 0x2B, b: 0x3C });
        assert_eq!(swatch.to_string(), "#1A2B3C");
    }

    #[test]
    fn malformed_hex_is_rejected() {
        assert!(Swatch::new("FFF", "rgb", [0.0; 4], 0).is_err());
        assert!(Swatch::new("ZZZZZZ", "rgb", [0.0; 4], 0).is_err());
        assert!(Swatch::new("", "rgb", [0.0; 4], 0).is_err());
    }

    #[test]
    fn from_item_parses_channels_and_index() {
        let item = SwatchItem {
            swatch_hex_color: "336699".into(),
            swatch_color_mode: "rgb".into(),
            swatch_channel1: "0.2".into(),
            swatch_channel2: "0.4".into(),
            swatch_channel3: "0.6".into(),
            swatch_channel4: "".into(),
            swatch_index: "3".into(),
        };
        let swatch = Swatch::from_item(&item, 0).unwrap();
        assert_eq!(swatch.channels(), [0.2, 0.4, 0.6, 0.0]);
        assert_eq!(swatch.index(), 3);
        assert_eq!(swatch.color_mode(), "rgb");
    }

    #[test]
    fn from_item_falls_back_to_position() {
        let item = SwatchItem {
            swatch_hex_color: "336699".into(),
            ..Default::default()
        };
        assert_eq!(Swatch::from_item(&item, 4).unwrap().index(), 4);
    }
}
