//! Role derivation: the six palettes a theme is built from.
//!
//! Only the primary seed is required. Secondary and tertiary seeds default to
//! the primary hue rotated by [`SECONDARY_HUE_OFFSET`] and
//! [`TERTIARY_HUE_OFFSET`], keeping the primary's saturation and lightness.
//! Both neutral palettes take the primary hue at a fixed mid lightness:
//! neutral has no saturation at all, neutral-variant keeps a faint tint.
//! Fixing their lightness is what keeps the text/background pairings of the
//! binding table readable for every seed.

use std::fmt;
use std::str::FromStr;

use ax_color::Color;
use serde::{Deserialize, Serialize};

use crate::error::ThemeError;
use crate::palette::TonalPalette;

/// Secondary seed hue = primary hue + this many degrees.
pub const SECONDARY_HUE_OFFSET: f32 = 30.0;

/// Tertiary seed hue = primary hue + this many degrees.
pub const TERTIARY_HUE_OFFSET: f32 = 60.0;

/// Red-family seed used for the error palette unless one is supplied.
pub const DEFAULT_ERROR_SEED: Color = Color::rgb(0xB3, 0x26, 0x1E);

/// Neutral seeds sit at this HSL lightness.
pub const NEUTRAL_LIGHTNESS: f32 = 0.5;

/// Neutral-variant keeps this much saturation from the primary hue.
pub const NEUTRAL_VARIANT_SATURATION: f32 = 0.08;

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Primary,
    Secondary,
    Tertiary,
    Error,
    Neutral,
    NeutralVariant,
}

impl Role {
    pub const ALL: [Self; 6] = [
        Self::Primary,
        Self::Secondary,
        Self::Tertiary,
        Self::Error,
        Self::Neutral,
        Self::NeutralVariant,
    ];

    /// Token-name form (`primary`, `neutral-variant`, …).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Tertiary => "tertiary",
            Self::Error => "error",
            Self::Neutral => "neutral",
            Self::NeutralVariant => "neutral-variant",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Role {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.name() == s)
            .ok_or_else(|| ThemeError::UnknownToken(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Seeds
// ---------------------------------------------------------------------------

/// Seeds for [`RoleSet::derive`]. `None` means "derive from primary".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoleSeeds {
    pub primary: Color,
    pub secondary: Option<Color>,
    pub tertiary: Option<Color>,
    pub error: Option<Color>,
}

impl RoleSeeds {
    #[must_use]
    pub const fn from_primary(primary: Color) -> Self {
        Self {
            primary,
            secondary: None,
            tertiary: None,
            error: None,
        }
    }

    /// Seeds that regenerate the primary, secondary, tertiary and error
    /// palettes of `roles`. A seed that matches what the primary would
    /// derive on its own stays `None`.
    #[must_use]
    pub fn recover(roles: &RoleSet) -> Self {
        let primary = roles.primary_seed();
        let explicit = |role: Role, derived: Color| {
            let seed = roles.get(role).seed();
            (seed != derived).then_some(seed)
        };
        Self {
            primary,
            secondary: explicit(Role::Secondary, primary.rotate_hue(SECONDARY_HUE_OFFSET)),
            tertiary: explicit(Role::Tertiary, primary.rotate_hue(TERTIARY_HUE_OFFSET)),
            error: explicit(Role::Error, DEFAULT_ERROR_SEED),
        }
    }
}

// ---------------------------------------------------------------------------
// RoleSet
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoleSet {
    palettes: [TonalPalette; 6],
}

impl RoleSet {
    /// Run the palette generator once per role.
    #[must_use]
    pub fn derive(seeds: &RoleSeeds) -> Self {
        let primary = seeds.primary;
        let hue = primary.hue();

        let secondary = seeds
            .secondary
            .unwrap_or_else(|| primary.rotate_hue(SECONDARY_HUE_OFFSET));
        let tertiary = seeds
            .tertiary
            .unwrap_or_else(|| primary.rotate_hue(TERTIARY_HUE_OFFSET));
        let error = seeds.error.unwrap_or(DEFAULT_ERROR_SEED);
        let neutral = Color::hsl(hue, 0.0, NEUTRAL_LIGHTNESS);
        let neutral_variant = Color::hsl(hue, NEUTRAL_VARIANT_SATURATION, NEUTRAL_LIGHTNESS);

        log::debug!(
            "deriving roles from {primary}: secondary {secondary}, tertiary {tertiary}, error {error}"
        );

        Self {
            palettes: [primary, secondary, tertiary, error, neutral, neutral_variant]
                .map(TonalPalette::generate),
        }
    }

    /// Palettes in [`Role::ALL`] order, taken as given.
    #[must_use]
    pub const fn from_palettes(palettes: [TonalPalette; 6]) -> Self {
        Self { palettes }
    }

    /// Roles derived from a single primary seed.
    #[must_use]
    pub fn from_seed(primary: Color) -> Self {
        Self::derive(&RoleSeeds::from_primary(primary))
    }

    #[must_use]
    pub const fn get(&self, role: Role) -> &TonalPalette {
        &self.palettes[role.index()]
    }

    #[must_use]
    pub const fn primary_seed(&self) -> Color {
        self.get(Role::Primary).seed()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Role, &TonalPalette)> {
        Role::ALL.into_iter().map(move |role| (role, self.get(role)))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
