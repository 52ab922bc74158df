//! Semantic mapping: palette tones onto named color tokens.
//!
//! Each binding names one token and the (role, step) it reads in light mode
//! and in dark mode. Dark mode is the same table read through the other
//! column, so a dark theme shares every hue with its light twin and only
//! the tone selection moves.
//!
//! The neutral rows are tuned so each pair in [`CONTRAST_PAIRS`] clears
//! WCAG AA (4.5:1) in both modes for any seed.

use crate::config::Mode;
use crate::palette::ToneStep::{self, S50, S100, S200, S300, S400, S500, S600, S700, S800, S900};
use crate::roles::Role::{self, Error, Neutral as N, NeutralVariant as NV, Primary as P, Secondary, Tertiary};
use crate::roles::RoleSet;
use crate::token::TokenCategory::{
    self, Background, Border, Brand, Info, Inverse, Nav, Success, Text, Warning,
};
use crate::token::{TokenMap, TokenName, TokenValue};

/// One row of the binding table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub name: TokenName,
    pub light: (Role, ToneStep),
    pub dark: (Role, ToneStep),
}

impl Binding {
    #[must_use]
    pub const fn select(&self, mode: Mode) -> (Role, ToneStep) {
        match mode {
            Mode::Light => self.light,
            Mode::Dark => self.dark,
        }
    }
}

const fn bind(
    category: TokenCategory,
    key: &'static str,
    light: (Role, ToneStep),
    dark: (Role, ToneStep),
) -> Binding {
    Binding {
        name: TokenName::Named(category, key),
        light,
        dark,
    }
}

/// The binding table, in export order.
pub const BINDINGS: &[Binding] = &[
    // Brand
    bind(Brand, "default", (P, S500), (P, S300)),
    bind(Brand, "emphasis", (P, S700), (P, S200)),
    bind(Brand, "muted", (P, S100), (P, S800)),
    bind(Brand, "faint", (P, S50), (P, S900)),
    bind(Brand, "border", (P, S300), (P, S600)),
    // Background
    bind(Background, "default", (N, S50), (N, S900)),
    bind(Background, "subtle", (N, S100), (N, S800)),
    bind(Background, "muted", (NV, S50), (NV, S900)),
    bind(Background, "emphasis", (N, S800), (N, S100)),
    // Text
    bind(Text, "default", (N, S900), (N, S50)),
    bind(Text, "heading", (N, S900), (N, S50)),
    bind(Text, "secondary", (NV, S700), (NV, S200)),
    bind(Text, "subtle", (N, S600), (N, S400)),
    bind(Text, "disabled", (N, S400), (N, S600)),
    bind(Text, "inverse", (N, S50), (N, S900)),
    // Border
    bind(Border, "default", (NV, S200), (NV, S700)),
    bind(Border, "emphasis", (NV, S300), (NV, S600)),
    bind(Border, "muted", (N, S100), (N, S800)),
    // Error
    bind(TokenCategory::Error, "default", (Error, S600), (Error, S300)),
    bind(TokenCategory::Error, "emphasis", (Error, S800), (Error, S100)),
    bind(TokenCategory::Error, "muted", (Error, S100), (Error, S800)),
    bind(TokenCategory::Error, "border", (Error, S500), (Error, S400)),
    // Success
    bind(Success, "default", (Secondary, S600), (Secondary, S300)),
    bind(Success, "emphasis", (Secondary, S800), (Secondary, S100)),
    bind(Success, "muted", (Secondary, S100), (Secondary, S800)),
    // Warning
    bind(Warning, "default", (Tertiary, S600), (Tertiary, S300)),
    bind(Warning, "emphasis", (Tertiary, S800), (Tertiary, S100)),
    bind(Warning, "muted", (Tertiary, S100), (Tertiary, S800)),
    // Info
    bind(Info, "default", (P, S600), (P, S300)),
    bind(Info, "emphasis", (P, S800), (P, S100)),
    bind(Info, "muted", (P, S100), (P, S800)),
    // Navigation
    bind(Nav, "bg", (N, S50), (N, S900)),
    bind(Nav, "text", (NV, S700), (NV, S200)),
    bind(Nav, "text-active", (P, S600), (P, S200)),
    bind(Nav, "hover", (N, S100), (N, S800)),
    bind(Nav, "active", (P, S100), (P, S800)),
    bind(Nav, "border", (NV, S100), (NV, S800)),
    // Inverse
    bind(Inverse, "surface", (N, S800), (N, S100)),
    bind(Inverse, "on-surface", (N, S50), (N, S900)),
    bind(Inverse, "primary", (P, S200), (P, S600)),
];

/// (foreground, background) pairs that must reach 4.5:1.
pub const CONTRAST_PAIRS: &[(TokenName, TokenName)] = &[
    (TokenName::Named(Text, "default"), TokenName::Named(Background, "default")),
    (TokenName::Named(Text, "heading"), TokenName::Named(Background, "default")),
    (TokenName::Named(Text, "secondary"), TokenName::Named(Background, "default")),
    (TokenName::Named(Text, "default"), TokenName::Named(Background, "subtle")),
    (TokenName::Named(Text, "inverse"), TokenName::Named(Background, "emphasis")),
    (TokenName::Named(Nav, "text"), TokenName::Named(Nav, "bg")),
    (TokenName::Named(Inverse, "on-surface"), TokenName::Named(Inverse, "surface")),
];

/// Minimum contrast for every pair in [`CONTRAST_PAIRS`].
pub const MIN_TEXT_CONTRAST: f64 = 4.5;

#[must_use]
pub fn binding(name: TokenName) -> Option<&'static Binding> {
    BINDINGS.iter().find(|b| b.name == name)
}

/// Palette tokens plus every binding, resolved for `mode`.
///
/// Scale tokens are not produced here.
#[must_use]
pub fn map_tokens(roles: &RoleSet, mode: Mode) -> TokenMap {
    let mut tokens = TokenMap::new();

    for (role, palette) in roles.iter() {
        for (step, color) in palette.iter() {
            tokens.insert(TokenName::Palette(role, step), TokenValue::Color(color));
        }
    }

    for b in BINDINGS {
        let (role, step) = b.select(mode);
        tokens.insert(b.name, TokenValue::Color(roles.get(role).tone(step)));
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::schema;
    use ax_color::Color;
    use pretty_assertions::assert_eq;

    const PURPLE: Color = Color::rgb(0x67, 0x50, 0xA4);

    fn color_of(tokens: &TokenMap, name: &str) -> Color {
        tokens[&TokenName::parse(name).unwrap()].as_color().unwrap()
    }

    #[test]
    fn binding_names_are_unique() {
        for (i, a) in BINDINGS.iter().enumerate() {
            assert!(BINDINGS[i + 1..].iter().all(|b| b.name != a.name), "duplicate {}", a.name);
        }
    }

    #[test]
    fn mapping_covers_every_color_token() {
        let tokens = map_tokens(&RoleSet::from_seed(PURPLE), Mode::Light);
        let color_names: Vec<_> = schema().iter().filter(|n| n.is_color()).collect();
        assert_eq!(tokens.len(), color_names.len());
        for name in color_names {
            assert!(tokens.contains_key(name), "missing {name}");
        }
    }

    #[test]
    fn brand_default_is_seed_in_light() {
        let tokens = map_tokens(&RoleSet::from_seed(PURPLE), Mode::Light);
        assert_eq!(color_of(&tokens, "brand-default"), PURPLE);
        assert_eq!(color_of(&tokens, "primary-500"), PURPLE);
    }

    #[test]
    fn dark_swaps_surfaces() {
        let roles = RoleSet::from_seed(PURPLE);
        let light = map_tokens(&roles, Mode::Light);
        let dark = map_tokens(&roles, Mode::Dark);
        assert_eq!(color_of(&light, "background-default"), color_of(&dark, "text-default"));
        assert_ne!(color_of(&light, "background-default"), color_of(&dark, "background-default"));
        // Palette tokens do not depend on mode.
        assert_eq!(color_of(&light, "secondary-300"), color_of(&dark, "secondary-300"));
    }

    #[test]
    fn contrast_pairs_name_bindings() {
        for (fg, bg) in CONTRAST_PAIRS {
            assert!(binding(*fg).is_some(), "{fg} unbound");
            assert!(binding(*bg).is_some(), "{bg} unbound");
        }
    }
}
