//! WCAG contrast checks for generated themes.
//!
//! - Body text pairs must reach 4.5:1 (WCAG AA)
//! - 3:1 is only good enough for large text
//! - 7:1 is AAA
//!
//! Luminance is computed on linear sRGB as WCAG 2.1 defines it.

use std::fmt;

use ax_color::Color;
use ax_color::color::srgb_to_linear;
use serde::Serialize;

use crate::config::ThemeConfig;
use crate::semantic::{CONTRAST_PAIRS, MIN_TEXT_CONTRAST};
use crate::token::TokenName;

/// WCAG relative luminance, 0.0 for black up to 1.0 for white.
#[must_use]
pub fn relative_luminance(color: Color) -> f64 {
    let (r, g, b) = color.to_srgb();
    let [r, g, b] = [r, g, b].map(|c| f64::from(srgb_to_linear(c)));
    0.2126f64.mul_add(r, 0.7152f64.mul_add(g, 0.0722 * b))
}

/// `(L1 + 0.05) / (L2 + 0.05)` with L1 the lighter side. Symmetric, in
/// `1.0..=21.0`.
#[must_use]
pub fn contrast_ratio(a: Color, b: Color) -> f64 {
    let (la, lb) = (relative_luminance(a), relative_luminance(b));
    (la.max(lb) + 0.05) / (la.min(lb) + 0.05)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContrastLevel {
    Fail,
    AaLarge,
    Aa,
    Aaa,
}

impl ContrastLevel {
    #[must_use]
    pub fn classify(ratio: f64) -> Self {
        if ratio >= 7.0 {
            Self::Aaa
        } else if ratio >= MIN_TEXT_CONTRAST {
            Self::Aa
        } else if ratio >= 3.0 {
            Self::AaLarge
        } else {
            Self::Fail
        }
    }
}

impl fmt::Display for ContrastLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Fail => "fail",
            Self::AaLarge => "AA large",
            Self::Aa => "AA",
            Self::Aaa => "AAA",
        })
    }
}

/// One audited foreground/background pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContrastCheck {
    pub foreground: TokenName,
    pub background: TokenName,
    pub fg_color: Color,
    pub bg_color: Color,
    pub ratio: f64,
    pub level: ContrastLevel,
}

impl ContrastCheck {
    #[must_use]
    pub fn passes(&self) -> bool {
        self.ratio >= MIN_TEXT_CONTRAST
    }
}

/// Check every text/background pair of `config`.
///
/// Pairs where either side was overridden with a non-color value are skipped.
#[must_use]
pub fn audit(config: &ThemeConfig) -> Vec<ContrastCheck> {
    CONTRAST_PAIRS
        .iter()
        .filter_map(|&(foreground, background)| {
            let fg_color = config.get(foreground)?.as_color()?;
            let bg_color = config.get(background)?.as_color()?;
            let ratio = contrast_ratio(fg_color, bg_color);
            Some(ContrastCheck {
                foreground,
                background,
                fg_color,
                bg_color,
                ratio,
                level: ContrastLevel::classify(ratio),
            })
        })
        .collect()
}
