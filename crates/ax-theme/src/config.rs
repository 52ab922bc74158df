//! Theme configuration: one mode's fully resolved token set.
//!
//! A [`ThemeConfig`] is the pipeline output for one mode: the mapped color
//! tokens, the scale tokens for that mode, then any overrides on top.
//! Overrides always win over generated values.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ThemeError, ThemeResult};
use crate::roles::RoleSet;
use crate::semantic::map_tokens;
use crate::token::{TokenMap, TokenName, TokenValue, scale_defaults, schema};

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Light,
    Dark,
}

impl Mode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Capitalized label for export headers.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Light => "Light",
            Self::Dark => "Dark",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            _ => Err(ThemeError::UnsupportedMode(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Overrides
// ---------------------------------------------------------------------------

/// Which mode(s) an override lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverrideScope {
    #[default]
    Light,
    Dark,
    Both,
}

impl OverrideScope {
    #[must_use]
    pub const fn includes(self, mode: Mode) -> bool {
        matches!(
            (self, mode),
            (Self::Both, _) | (Self::Light, Mode::Light) | (Self::Dark, Mode::Dark)
        )
    }
}

impl FromStr for OverrideScope {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "both" => Ok(Self::Both),
            _ => Err(ThemeError::UnsupportedMode(s.to_string())),
        }
    }
}

/// Sparse per-mode token values applied after generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawOverride", into = "RawOverride")]
pub struct ThemeOverride {
    pub light: TokenMap,
    pub dark: TokenMap,
}

impl ThemeOverride {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.light.is_empty() && self.dark.is_empty()
    }

    #[must_use]
    pub const fn for_mode(&self, mode: Mode) -> &TokenMap {
        match mode {
            Mode::Light => &self.light,
            Mode::Dark => &self.dark,
        }
    }

    /// Parse and record `value` for `name` in every mode of `scope`.
    pub fn set(&mut self, name: &str, value: &str, scope: OverrideScope) -> ThemeResult<TokenName> {
        let token = TokenName::parse(name)?;
        let value = token.parse_value(value)?;
        self.insert(token, value, scope);
        Ok(token)
    }

    /// Record an already-validated value.
    pub fn insert(&mut self, token: TokenName, value: TokenValue, scope: OverrideScope) {
        if scope.includes(Mode::Light) {
            self.light.insert(token, value.clone());
        }
        if scope.includes(Mode::Dark) {
            self.dark.insert(token, value);
        }
    }

    pub fn clear(&mut self) {
        self.light.clear();
        self.dark.clear();
    }
}

/// Wire form: `{ "light": { "brand-default": "#FF0000" }, "dark": {} }`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct RawOverride {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    light: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    dark: BTreeMap<String, String>,
}

fn parse_raw_map(raw: BTreeMap<String, String>) -> ThemeResult<TokenMap> {
    raw.into_iter()
        .map(|(name, value)| {
            let token = TokenName::parse(&name)?;
            Ok((token, token.parse_value(&value)?))
        })
        .collect()
}

fn to_raw_map(tokens: TokenMap) -> BTreeMap<String, String> {
    tokens
        .into_iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

impl TryFrom<RawOverride> for ThemeOverride {
    type Error = ThemeError;

    fn try_from(raw: RawOverride) -> Result<Self, Self::Error> {
        Ok(Self {
            light: parse_raw_map(raw.light)?,
            dark: parse_raw_map(raw.dark)?,
        })
    }
}

impl From<ThemeOverride> for RawOverride {
    fn from(o: ThemeOverride) -> Self {
        Self {
            light: to_raw_map(o.light),
            dark: to_raw_map(o.dark),
        }
    }
}

// ---------------------------------------------------------------------------
// ThemeConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeConfig {
    pub id: String,
    pub mode: Mode,
    pub roles: RoleSet,
    pub tokens: TokenMap,
}

impl ThemeConfig {
    /// Map `roles` for `mode` and merge in that mode's scale tokens.
    #[must_use]
    pub fn generate(id: impl Into<String>, roles: RoleSet, mode: Mode) -> Self {
        let id = id.into();
        let mut tokens = map_tokens(&roles, mode);
        tokens.extend(scale_defaults(mode));
        log::debug!("generated {mode} theme '{id}' with {} tokens", tokens.len());
        Self {
            id,
            mode,
            roles,
            tokens,
        }
    }

    /// Generate, then apply this mode's half of `overrides`.
    #[must_use]
    pub fn generate_with(
        id: impl Into<String>,
        roles: RoleSet,
        mode: Mode,
        overrides: &ThemeOverride,
    ) -> Self {
        let mut config = Self::generate(id, roles, mode);
        config.apply_overrides(overrides.for_mode(mode));
        config
    }

    /// Overwrite tokens with `overrides`.
    pub fn apply_overrides(&mut self, overrides: &TokenMap) {
        for (name, value) in overrides {
            self.tokens.insert(*name, value.clone());
        }
    }

    #[must_use]
    pub fn get(&self, name: TokenName) -> Option<&TokenValue> {
        self.tokens.get(&name)
    }

    /// Resolve a flat name such as `brand-default`.
    #[must_use]
    pub fn get_str(&self, name: &str) -> Option<&TokenValue> {
        TokenName::parse(name).ok().and_then(|n| self.tokens.get(&n))
    }

    /// Tokens in schema order. Only names present in the schema are yielded.
    pub fn ordered(&self) -> impl Iterator<Item = (TokenName, &TokenValue)> {
        schema()
            .iter()
            .filter_map(|name| self.tokens.get(name).map(|v| (*name, v)))
    }

    /// Schema names with no value.
    #[must_use]
    pub fn missing_tokens(&self) -> Vec<String> {
        schema()
            .iter()
            .filter(|name| !self.tokens.contains_key(*name))
            .map(ToString::to_string)
            .collect()
    }

    pub fn ensure_complete(&self) -> ThemeResult<()> {
        let missing = self.missing_tokens();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ThemeError::IncompleteTheme {
                id: self.id.clone(),
                missing,
            })
        }
    }

    /// Tokens that differ from a fresh generation on the same roles.
    #[must_use]
    pub fn diff_from_generated(&self) -> TokenMap {
        let base = Self::generate(self.id.clone(), self.roles, self.mode);
        self.tokens
            .iter()
            .filter(|(name, value)| base.tokens.get(*name) != Some(*value))
            .map(|(name, value)| (*name, value.clone()))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
