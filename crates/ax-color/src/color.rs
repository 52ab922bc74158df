// SPDX-License-Identifier: MIT
//
// ax-color color system: exact 8-bit sRGB storage with an HSL view.
//
// Single-character variable names (r, g, b, h, s, l, d, k) are the
// standard mathematical convention in color science.
#![allow(clippy::many_single_char_names)]
//
// A theme seed is the one value a user types in, so it must come back out
// unchanged: `Color` keeps the three 8-bit channels and nothing else. Every
// derived representation (HSL, linear sRGB) is computed on demand.
//
// Conversion pipeline:
//
//   CSS text (hex / rgb() / hsl()) → Color (u8 × 3) ↔ HSL (f32)
//                                          ↓
//                                   sRGB (0–1) → linear sRGB (luminance)

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Why a string could not be turned into a [`Color`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseColorError {
    #[error("empty color string")]
    Empty,

    #[error("'{0}' is not a valid hex color (expected #RGB or #RRGGBB)")]
    InvalidHex(String),

    #[error("{channel} channel {value} is out of range (0-255)")]
    ChannelOutOfRange { channel: &'static str, value: u32 },

    #[error("{component} {value}% is out of range (0-100)")]
    PercentOutOfRange { component: &'static str, value: String },

    #[error("'{0}' is not a recognized color (use #RRGGBB, rgb(r, g, b) or hsl(h, s%, l%))")]
    Unrecognized(String),
}

// ─── Color ───────────────────────────────────────────────────────────────────

/// An opaque sRGB color with 8-bit channels.
///
/// `Color` is an immutable `Copy` value. Equality is exact channel equality,
/// which is what makes "the 500 tone equals the seed" a checkable property.
///
/// # Examples
///
/// ```
/// use ax_color::Color;
///
/// let purple: Color = "#6750A4".parse().unwrap();
/// assert_eq!(purple, Color::rgb(0x67, 0x50, 0xA4));
/// assert_eq!(purple.to_hex(), "#6750A4");
///
/// let rotated = purple.rotate_hue(30.0);
/// assert!((rotated.hue() - purple.hue() - 30.0).abs() < 1.5);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Hue / saturation / lightness view of a [`Color`].
///
/// - `h`: hue angle in degrees, `[0, 360)`
/// - `s`: saturation, `0.0` to `1.0`
/// - `l`: lightness, `0.0` (black) to `1.0` (white)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

impl Hsl {
    #[must_use]
    pub fn new(h: f32, s: f32, l: f32) -> Self {
        Self {
            h: normalize_hue(h),
            s: s.clamp(0.0, 1.0),
            l: l.clamp(0.0, 1.0),
        }
    }
}

impl Color {
    // ─── Constructors ────────────────────────────────────────────────────

    /// Create a color from 8-bit channels.
    #[inline]
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create a color from sRGB components in the `0.0–1.0` range.
    #[must_use]
    pub fn srgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgb(to_u8(r), to_u8(g), to_u8(b))
    }

    /// Create a color from HSL components (`s` and `l` in `0.0–1.0`).
    #[must_use]
    pub fn hsl(h: f32, s: f32, l: f32) -> Self {
        Self::from_hsl(Hsl::new(h, s, l))
    }

    /// Convert an HSL value to the nearest 8-bit color.
    #[must_use]
    pub fn from_hsl(hsl: Hsl) -> Self {
        let (r, g, b) = hsl_to_srgb(hsl.h, hsl.s, hsl.l);
        Self::srgb(r, g, b)
    }

    /// Parse a hex string (`#RGB` or `#RRGGBB`, `#` optional).
    ///
    /// Returns `None` if the string is not a valid hex color.
    #[must_use]
    pub fn hex(s: &str) -> Option<Self> {
        parse_hex(s)
    }

    /// Parse any supported CSS color notation.
    ///
    /// Accepts `#RGB`, `#RRGGBB`, `rgb(r, g, b)`, `rgb(r g b)`,
    /// `hsl(h, s%, l%)` and `hsl(h s% l%)`, case-insensitive, surrounding
    /// whitespace ignored.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseColorError`] describing the first problem found.
    pub fn parse(input: &str) -> Result<Self, ParseColorError> {
        let s = input.trim().to_ascii_lowercase();
        if s.is_empty() {
            return Err(ParseColorError::Empty);
        }

        if let Some(caps) = RGB_FN.captures(&s) {
            let r = parse_channel(&caps[1], "red")?;
            let g = parse_channel(&caps[2], "green")?;
            let b = parse_channel(&caps[3], "blue")?;
            return Ok(Self::rgb(r, g, b));
        }

        if let Some(caps) = HSL_FN.captures(&s) {
            let h: f32 = caps[1]
                .parse()
                .map_err(|_| ParseColorError::Unrecognized(input.to_string()))?;
            let sat = parse_percent(&caps[2], "saturation")?;
            let light = parse_percent(&caps[3], "lightness")?;
            return Ok(Self::hsl(h, sat, light));
        }

        let looks_hex = s.starts_with('#') || s.bytes().all(|c| c.is_ascii_hexdigit());
        if looks_hex {
            return parse_hex(&s).ok_or_else(|| ParseColorError::InvalidHex(input.trim().to_string()));
        }

        Err(ParseColorError::Unrecognized(input.trim().to_string()))
    }

    /// Pure black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// Pure white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    // ─── Views ───────────────────────────────────────────────────────────

    /// sRGB components in the `0.0–1.0` range.
    #[must_use]
    pub fn to_srgb(self) -> (f32, f32, f32) {
        (
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
        )
    }

    /// HSL view of this color.
    #[must_use]
    pub fn to_hsl(self) -> Hsl {
        let (r, g, b) = self.to_srgb();
        let (h, s, l) = srgb_to_hsl(r, g, b);
        Hsl { h, s, l }
    }

    /// Hue angle in degrees. Achromatic colors report `0.0`.
    #[must_use]
    pub fn hue(self) -> f32 {
        self.to_hsl().h
    }

    /// HSL lightness, `0.0` to `1.0`.
    #[must_use]
    pub fn lightness(self) -> f32 {
        self.to_hsl().l
    }

    /// Whether the three channels are equal (a pure gray).
    #[inline]
    #[must_use]
    pub const fn is_achromatic(self) -> bool {
        self.r == self.g && self.g == self.b
    }

    /// Uppercase `#RRGGBB`.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    // ─── HSL Operations ──────────────────────────────────────────────────

    /// Rotate the hue by `degrees`, holding saturation and lightness.
    #[must_use]
    pub fn rotate_hue(self, degrees: f32) -> Self {
        let hsl = self.to_hsl();
        Self::from_hsl(Hsl::new(hsl.h + degrees, hsl.s, hsl.l))
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Color({})", self.to_hex())
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Default for Color {
    /// Default is black.
    fn default() -> Self {
        Self::BLACK
    }
}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(de::Error::custom)
    }
}

// ─── Hue Helpers ─────────────────────────────────────────────────────────────

/// Normalize a hue angle to the range [0, 360).
#[inline]
#[must_use]
pub fn normalize_hue(h: f32) -> f32 {
    let h = h % 360.0;
    if h < 0.0 { h + 360.0 } else { h }
}

/// Absolute hue difference (shortest arc on the color wheel).
#[inline]
#[must_use]
pub fn hue_diff(a: f32, b: f32) -> f32 {
    let d = (a - b).abs() % 360.0;
    if d > 180.0 { 360.0 - d } else { d }
}

// ─── sRGB ↔ HSL ──────────────────────────────────────────────────────────────

fn srgb_to_hsl(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) * 0.5;

    let d = max - min;
    if d < 1e-6 {
        return (0.0, 0.0, l);
    }

    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };

    let h = if (max - r).abs() < f32::EPSILON {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if (max - g).abs() < f32::EPSILON {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    (normalize_hue(h * 60.0), s, l)
}

fn hsl_to_srgb(h: f32, s: f32, l: f32) -> (f32, f32, f32) {
    let a = s * l.min(1.0 - l);
    let f = |n: f32| {
        let k = (n + h / 30.0) % 12.0;
        a.mul_add(-(k - 3.0).min(9.0 - k).clamp(-1.0, 1.0), l)
    };
    (f(0.0), f(8.0), f(4.0))
}

// ─── Linear sRGB ↔ sRGB (Gamma) ─────────────────────────────────────────────
//
// WCAG relative luminance is defined on linear light, so contrast math has
// to undo the sRGB transfer curve first.

/// Convert a single linear sRGB component to sRGB (apply gamma).
#[inline]
#[must_use]
pub fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.003_130_8 {
        c * 12.92
    } else {
        1.055f32.mul_add(c.powf(1.0 / 2.4), -0.055)
    }
}

/// Convert a single sRGB component to linear sRGB (remove gamma).
#[inline]
#[must_use]
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.040_45 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

// ─── Parsing ─────────────────────────────────────────────────────────────────

static RGB_FN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^rgb\(\s*(\d{1,3})\s*[,\s]\s*(\d{1,3})\s*[,\s]\s*(\d{1,3})\s*\)$")
        .expect("rgb() pattern is valid")
});

static HSL_FN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^hsl\(\s*(\d+(?:\.\d+)?)(?:deg)?\s*[,\s]\s*(\d+(?:\.\d+)?)%\s*[,\s]\s*(\d+(?:\.\d+)?)%\s*\)$",
    )
    .expect("hsl() pattern is valid")
});

fn parse_channel(digits: &str, channel: &'static str) -> Result<u8, ParseColorError> {
    let value: u32 = digits
        .parse()
        .map_err(|_| ParseColorError::Unrecognized(digits.to_string()))?;
    u8::try_from(value).map_err(|_| ParseColorError::ChannelOutOfRange { channel, value })
}

fn parse_percent(digits: &str, component: &'static str) -> Result<f32, ParseColorError> {
    let value: f32 = digits
        .parse()
        .map_err(|_| ParseColorError::Unrecognized(digits.to_string()))?;
    if value > 100.0 {
        return Err(ParseColorError::PercentOutOfRange {
            component,
            value: digits.to_string(),
        });
    }
    Ok(value / 100.0)
}

/// Parse a hex color string into a Color.
fn parse_hex(s: &str) -> Option<Color> {
    let s = s.strip_prefix('#').unwrap_or(s);
    let bytes = s.as_bytes();

    match bytes.len() {
        // #RGB
        3 => {
            let r = parse_hex_digit(bytes[0])?;
            let g = parse_hex_digit(bytes[1])?;
            let b = parse_hex_digit(bytes[2])?;
            Some(Color::rgb((r << 4) | r, (g << 4) | g, (b << 4) | b))
        }
        // #RRGGBB
        6 => {
            let r = parse_hex_byte(&bytes[0..2])?;
            let g = parse_hex_byte(&bytes[2..4])?;
            let b = parse_hex_byte(&bytes[4..6])?;
            Some(Color::rgb(r, g, b))
        }
        _ => None,
    }
}

#[inline]
const fn parse_hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

#[inline]
fn parse_hex_byte(bytes: &[u8]) -> Option<u8> {
    let hi = parse_hex_digit(bytes[0])?;
    let lo = parse_hex_digit(bytes[1])?;
    Some((hi << 4) | lo)
}

/// Convert a float (0.0–1.0) to a u8 (0–255) with correct rounding.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_u8(v: f32) -> u8 {
    // Safe: clamp guarantees 0.0 <= value <= 255.0 before truncation.
    v.mul_add(255.0, 0.5).clamp(0.0, 255.0) as u8
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn approx_eq(a: f32, b: f32, epsilon: f32) -> bool {
        (a - b).abs() < epsilon
    }

    // ── Parsing ──────────────────────────────────────────────────────────

    #[test]
    fn parse_long_hex() {
        assert_eq!(Color::parse("#6750A4"), Ok(Color::rgb(0x67, 0x50, 0xA4)));
        assert_eq!(Color::parse("6750a4"), Ok(Color::rgb(0x67, 0x50, 0xA4)));
    }

    #[test]
    fn parse_short_hex() {
        assert_eq!(Color::parse("#fa0"), Ok(Color::rgb(0xFF, 0xAA, 0x00)));
    }

    #[test]
    fn parse_rgb_function() {
        assert_eq!(Color::parse("rgb(103, 80, 164)"), Ok(Color::rgb(103, 80, 164)));
        assert_eq!(Color::parse("RGB(103 80 164)"), Ok(Color::rgb(103, 80, 164)));
    }

    #[test]
    fn parse_hsl_function() {
        assert_eq!(Color::parse("hsl(0, 100%, 50%)"), Ok(Color::rgb(255, 0, 0)));
        assert_eq!(Color::parse("hsl(120deg 100% 25%)"), Ok(Color::rgb(0, 128, 0)));
    }

    #[test]
    fn parse_trims_whitespace() {
        assert_eq!(Color::parse("  #000000 \n"), Ok(Color::BLACK));
    }

    #[test]
    fn parse_rejects_empty() {
        assert_eq!(Color::parse("   "), Err(ParseColorError::Empty));
    }

    #[test]
    fn parse_rejects_bad_hex() {
        assert!(matches!(Color::parse("#12345"), Err(ParseColorError::InvalidHex(_))));
        assert!(matches!(Color::parse("#gggggg"), Err(ParseColorError::InvalidHex(_))));
        assert!(matches!(Color::parse("#11223344"), Err(ParseColorError::InvalidHex(_))));
    }

    #[test]
    fn parse_rejects_channel_overflow() {
        assert_eq!(
            Color::parse("rgb(256, 0, 0)"),
            Err(ParseColorError::ChannelOutOfRange { channel: "red", value: 256 })
        );
    }

    #[test]
    fn parse_rejects_percent_overflow() {
        assert!(matches!(
            Color::parse("hsl(10, 120%, 50%)"),
            Err(ParseColorError::PercentOutOfRange { component: "saturation", .. })
        ));
    }

    #[test]
    fn parse_rejects_names() {
        assert!(matches!(Color::parse("purple"), Err(ParseColorError::Unrecognized(_))));
    }

    // ── Formatting ───────────────────────────────────────────────────────

    #[test]
    fn hex_is_uppercase() {
        assert_eq!(Color::rgb(0xab, 0x0c, 0xff).to_hex(), "#AB0CFF");
        assert_eq!(Color::rgb(1, 2, 3).to_string(), "#010203");
    }

    #[test]
    fn serde_uses_hex_string() {
        let json = serde_json::to_string(&Color::rgb(0x67, 0x50, 0xA4)).unwrap();
        assert_eq!(json, "\"#6750A4\"");
        let back: Color = serde_json::from_str("\"#6750a4\"").unwrap();
        assert_eq!(back, Color::rgb(0x67, 0x50, 0xA4));
        assert!(serde_json::from_str::<Color>("\"nope\"").is_err());
    }

    // ── HSL ──────────────────────────────────────────────────────────────

    #[test]
    fn hsl_of_primary_purple() {
        let hsl = Color::rgb(0x67, 0x50, 0xA4).to_hsl();
        assert!(approx_eq(hsl.h, 256.4, 0.2), "hue: {}", hsl.h);
        assert!(approx_eq(hsl.s, 0.344, 0.002), "saturation: {}", hsl.s);
        assert!(approx_eq(hsl.l, 0.478, 0.002), "lightness: {}", hsl.l);
    }

    #[test]
    fn hsl_of_grays_is_achromatic() {
        let hsl = Color::rgb(128, 128, 128).to_hsl();
        assert!(approx_eq(hsl.h, 0.0, f32::EPSILON));
        assert!(approx_eq(hsl.s, 0.0, f32::EPSILON));
        assert!(Color::rgb(7, 7, 7).is_achromatic());
        assert!(!Color::rgb(7, 7, 8).is_achromatic());
    }

    #[test]
    fn primaries_have_expected_hues() {
        assert!(approx_eq(Color::rgb(255, 0, 0).hue(), 0.0, 0.01));
        assert!(approx_eq(Color::rgb(0, 255, 0).hue(), 120.0, 0.01));
        assert!(approx_eq(Color::rgb(0, 0, 255).hue(), 240.0, 0.01));
    }

    #[test]
    fn rotate_hue_wraps() {
        let red = Color::rgb(255, 0, 0);
        assert_eq!(red.rotate_hue(120.0), Color::rgb(0, 255, 0));
        assert_eq!(red.rotate_hue(-120.0), Color::rgb(0, 0, 255));
        assert_eq!(red.rotate_hue(360.0), red);
    }

    #[test]
    fn hue_diff_shortest_arc() {
        assert!(approx_eq(hue_diff(350.0, 10.0), 20.0, 1e-4));
        assert!(approx_eq(hue_diff(10.0, 350.0), 20.0, 1e-4));
        assert!(approx_eq(normalize_hue(-30.0), 330.0, 1e-4));
    }

    // ── Gamma ────────────────────────────────────────────────────────────

    #[test]
    fn gamma_roundtrip() {
        for i in 0..=20 {
            let v = i as f32 / 20.0;
            let back = linear_to_srgb(srgb_to_linear(v));
            assert!(approx_eq(v, back, 1e-4), "gamma roundtrip {v} → {back}");
        }
    }

    proptest! {
        #[test]
        fn hsl_roundtrip_is_exact(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
            let c = Color::rgb(r, g, b);
            prop_assert_eq!(Color::from_hsl(c.to_hsl()), c);
        }

        #[test]
        fn hex_roundtrip_is_exact(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
            let c = Color::rgb(r, g, b);
            prop_assert_eq!(Color::parse(&c.to_hex()), Ok(c));
        }
    }
}
