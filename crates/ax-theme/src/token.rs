//! Design-token names, values and the closed token schema.
//!
//! Every theme resolves the same fixed list of names, in the same order:
//! the sixty palette tokens (`primary-50` … `neutral-variant-900`), then the
//! semantic color bindings (`brand-default`, `text-heading`, …), then the
//! scalar scales (typography, spacing, radius, shadow). That order is the
//! order every exporter writes in.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::LazyLock;

use ax_color::Color;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

use crate::config::Mode;
use crate::error::{ThemeError, ThemeResult};
use crate::palette::ToneStep;
use crate::roles::Role;
use crate::semantic::BINDINGS;

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenCategory {
    /// Raw palette tones.
    Colors,
    Brand,
    Background,
    Text,
    Border,
    Error,
    Success,
    Warning,
    Info,
    Nav,
    Inverse,
    Typography,
    Spacing,
    Radius,
    Shadow,
}

impl TokenCategory {
    pub const ALL: [Self; 15] = [
        Self::Colors,
        Self::Brand,
        Self::Background,
        Self::Text,
        Self::Border,
        Self::Error,
        Self::Success,
        Self::Warning,
        Self::Info,
        Self::Nav,
        Self::Inverse,
        Self::Typography,
        Self::Spacing,
        Self::Radius,
        Self::Shadow,
    ];

    /// Leading segment of the flat token name. Typography tokens have none.
    #[must_use]
    pub const fn prefix(self) -> Option<&'static str> {
        match self {
            Self::Colors | Self::Typography => None,
            Self::Brand => Some("brand"),
            Self::Background => Some("background"),
            Self::Text => Some("text"),
            Self::Border => Some("border"),
            Self::Error => Some("error"),
            Self::Success => Some("success"),
            Self::Warning => Some("warning"),
            Self::Info => Some("info"),
            Self::Nav => Some("nav"),
            Self::Inverse => Some("inverse"),
            Self::Spacing => Some("spacing"),
            Self::Radius => Some("radius"),
            Self::Shadow => Some("shadow"),
        }
    }

    /// Object key used in the JSON export.
    #[must_use]
    pub const fn json_key(self) -> &'static str {
        match self {
            Self::Colors => "colors",
            Self::Brand => "brand",
            Self::Background => "background",
            Self::Text => "text",
            Self::Border => "border",
            Self::Error => "error",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Nav => "nav",
            Self::Inverse => "inverse",
            Self::Typography => "typography",
            Self::Spacing => "spacing",
            Self::Radius => "radius",
            Self::Shadow => "shadows",
        }
    }

    #[must_use]
    pub fn from_json_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.json_key() == key)
    }

    /// Whether tokens in this category hold colors.
    #[must_use]
    pub const fn is_color(self) -> bool {
        !matches!(
            self,
            Self::Typography | Self::Spacing | Self::Radius | Self::Shadow
        )
    }

    /// Human-readable section title for export comments.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Colors => "Palettes",
            Self::Brand => "Brand",
            Self::Background => "Background",
            Self::Text => "Text",
            Self::Border => "Border",
            Self::Error => "Error",
            Self::Success => "Success",
            Self::Warning => "Warning",
            Self::Info => "Info",
            Self::Nav => "Navigation",
            Self::Inverse => "Inverse",
            Self::Typography => "Typography",
            Self::Spacing => "Spacing",
            Self::Radius => "Radius",
            Self::Shadow => "Shadows",
        }
    }
}

// ---------------------------------------------------------------------------
// Names
// ---------------------------------------------------------------------------

/// A token name from the schema.
///
/// Displays as its flat name (`primary-500`, `brand-default`,
/// `font-size-base`). The CSS property is that name behind the export
/// prefix: `--ax-brand-default`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenName {
    Palette(Role, ToneStep),
    Named(TokenCategory, &'static str),
}

impl TokenName {
    #[must_use]
    pub const fn category(self) -> TokenCategory {
        match self {
            Self::Palette(..) => TokenCategory::Colors,
            Self::Named(category, _) => category,
        }
    }

    #[must_use]
    pub const fn is_color(self) -> bool {
        self.category().is_color()
    }

    /// Key inside the category object of the JSON export.
    #[must_use]
    pub fn key(self) -> String {
        match self {
            Self::Palette(role, step) => format!("{role}-{step}"),
            Self::Named(_, key) => key.to_string(),
        }
    }

    /// Look a flat name up in the schema.
    pub fn parse(name: &str) -> ThemeResult<Self> {
        NAME_INDEX
            .get(name.trim())
            .copied()
            .ok_or_else(|| ThemeError::UnknownToken(name.trim().to_string()))
    }

    /// Look a (category, key) pair up in the schema.
    #[must_use]
    pub fn lookup(category: TokenCategory, key: &str) -> Option<Self> {
        schema()
            .iter()
            .copied()
            .find(|name| name.category() == category && name.key() == key)
    }

    /// Parse a value for this token. Color tokens require a color, scalar
    /// tokens non-empty text that cannot end a declaration or open a block
    /// in the generated stylesheets.
    pub fn parse_value(self, raw: &str) -> ThemeResult<TokenValue> {
        let trimmed = raw.trim();
        if self.is_color() {
            let color = Color::parse(trimmed).map_err(|e| ThemeError::invalid_color(raw, &e))?;
            return Ok(TokenValue::Color(color));
        }
        let breaks_out = |c: char| matches!(c, ';' | '{' | '}') || c.is_control();
        if trimmed.is_empty() || trimmed.contains(breaks_out) {
            return Err(ThemeError::InvalidTokenValue {
                token: self.to_string(),
                value: raw.to_string(),
            });
        }
        Ok(TokenValue::Scalar(trimmed.to_string()))
    }
}

impl fmt::Display for TokenName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self, self.category().prefix()) {
            (Self::Palette(role, step), _) => write!(f, "{role}-{step}"),
            (Self::Named(_, key), None) => f.write_str(key),
            (Self::Named(_, key), Some(prefix)) => write!(f, "{prefix}-{key}"),
        }
    }
}

impl Serialize for TokenName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TokenName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Values
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenValue {
    Color(Color),
    /// Spacing, radius, shadow and typography values, kept as CSS text.
    Scalar(String),
}

impl TokenValue {
    #[must_use]
    pub const fn as_color(&self) -> Option<Color> {
        match self {
            Self::Color(c) => Some(*c),
            Self::Scalar(_) => None,
        }
    }
}

impl fmt::Display for TokenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Color(c) => write!(f, "{c}"),
            Self::Scalar(s) => f.write_str(s),
        }
    }
}

impl From<Color> for TokenValue {
    fn from(c: Color) -> Self {
        Self::Color(c)
    }
}

impl Serialize for TokenValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Resolved tokens of one theme.
pub type TokenMap = BTreeMap<TokenName, TokenValue>;

// ---------------------------------------------------------------------------
// Scale table
// ---------------------------------------------------------------------------

/// A scalar token with its light and dark values.
#[derive(Debug, Clone, Copy)]
pub struct ScaleToken {
    pub category: TokenCategory,
    pub key: &'static str,
    pub light: &'static str,
    pub dark: &'static str,
}

const fn same(category: TokenCategory, key: &'static str, value: &'static str) -> ScaleToken {
    ScaleToken {
        category,
        key,
        light: value,
        dark: value,
    }
}

use TokenCategory::{Radius, Shadow, Spacing, Typography};

/// Non-color tokens. Only the shadows differ between modes.
pub const SCALES: &[ScaleToken] = &[
    same(
        Typography,
        "font-family",
        "'Inter', 'Noto Sans Thai', -apple-system, BlinkMacSystemFont, sans-serif",
    ),
    same(Typography, "font-size-xs", "0.75rem"),
    same(Typography, "font-size-sm", "0.875rem"),
    same(Typography, "font-size-base", "1rem"),
    same(Typography, "font-size-lg", "1.125rem"),
    same(Typography, "font-size-xl", "1.25rem"),
    same(Typography, "font-size-2xl", "1.5rem"),
    same(Typography, "font-size-3xl", "1.875rem"),
    same(Typography, "font-size-4xl", "2.25rem"),
    same(Typography, "font-weight-normal", "400"),
    same(Typography, "font-weight-medium", "500"),
    same(Typography, "font-weight-semibold", "600"),
    same(Typography, "font-weight-bold", "700"),
    same(Typography, "line-height-tight", "1.25"),
    same(Typography, "line-height-normal", "1.5"),
    same(Typography, "line-height-relaxed", "1.75"),
    same(Spacing, "2xs", "0.125rem"),
    same(Spacing, "xs", "0.25rem"),
    same(Spacing, "sm", "0.5rem"),
    same(Spacing, "md", "1rem"),
    same(Spacing, "lg", "1.5rem"),
    same(Spacing, "xl", "2rem"),
    same(Spacing, "2xl", "2.5rem"),
    same(Spacing, "3xl", "3rem"),
    same(Spacing, "4xl", "4rem"),
    same(Radius, "sm", "0.25rem"),
    same(Radius, "md", "0.375rem"),
    same(Radius, "lg", "0.5rem"),
    same(Radius, "xl", "0.75rem"),
    same(Radius, "2xl", "1rem"),
    same(Radius, "full", "9999px"),
    ScaleToken {
        category: Shadow,
        key: "sm",
        light: "0 1px 2px 0 rgb(0 0 0 / 0.05)",
        dark: "0 1px 2px 0 rgb(0 0 0 / 0.3)",
    },
    ScaleToken {
        category: Shadow,
        key: "md",
        light: "0 4px 6px -1px rgb(0 0 0 / 0.1), 0 2px 4px -2px rgb(0 0 0 / 0.1)",
        dark: "0 4px 6px -1px rgb(0 0 0 / 0.4), 0 2px 4px -2px rgb(0 0 0 / 0.3)",
    },
    ScaleToken {
        category: Shadow,
        key: "lg",
        light: "0 10px 15px -3px rgb(0 0 0 / 0.1), 0 4px 6px -4px rgb(0 0 0 / 0.1)",
        dark: "0 10px 15px -3px rgb(0 0 0 / 0.5), 0 4px 6px -4px rgb(0 0 0 / 0.4)",
    },
];

/// Scale tokens with the values for `mode`.
#[must_use]
pub fn scale_defaults(mode: Mode) -> TokenMap {
    SCALES
        .iter()
        .map(|s| {
            let value = match mode {
                Mode::Light => s.light,
                Mode::Dark => s.dark,
            };
            (
                TokenName::Named(s.category, s.key),
                TokenValue::Scalar(value.to_string()),
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

static SCHEMA: LazyLock<Vec<TokenName>> = LazyLock::new(|| {
    let palettes = Role::ALL
        .into_iter()
        .flat_map(|role| ToneStep::ALL.into_iter().map(move |step| TokenName::Palette(role, step)));
    let bindings = BINDINGS.iter().map(|b| b.name);
    let scales = SCALES.iter().map(|s| TokenName::Named(s.category, s.key));
    palettes.chain(bindings).chain(scales).collect()
});

static NAME_INDEX: LazyLock<HashMap<String, TokenName>> =
    LazyLock::new(|| SCHEMA.iter().map(|name| (name.to_string(), *name)).collect());

/// Every token name a complete theme defines, in export order.
#[must_use]
pub fn schema() -> &'static [TokenName] {
    &SCHEMA
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
