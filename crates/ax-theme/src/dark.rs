//! Dark-mode derivation.
//!
//! A dark theme is never an inversion of the light one. It is the same
//! [`RoleSet`](crate::RoleSet) pushed through the dark column of the binding
//! table, so brand, state and surface colors keep their hue families and
//! each mode meets its own contrast targets.
//!
//! Light overrides do not follow: the dark set is always rebuilt in full from
//! the roles, then only dark-scoped overrides are applied.

use crate::config::{Mode, ThemeConfig, ThemeOverride};

/// Dark counterpart of `light`, sharing its id and roles.
#[must_use]
pub fn derive_dark(light: &ThemeConfig) -> ThemeConfig {
    ThemeConfig::generate(light.id.clone(), light.roles, Mode::Dark)
}

/// Dark counterpart of `light` with the dark half of `overrides` applied.
#[must_use]
pub fn derive_dark_with(light: &ThemeConfig, overrides: &ThemeOverride) -> ThemeConfig {
    let mut dark = derive_dark(light);
    dark.apply_overrides(&overrides.dark);
    dark
}
