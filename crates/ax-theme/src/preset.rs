//! Presets: named, storable seeds with optional overrides.
//!
//! A preset never stores generated tokens, only what is needed to run the
//! pipeline again: the role seeds and the overrides. Presets are immutable:
//! editing one means saving a new value under the same id. Built-in presets
//! cannot be replaced, renamed or deleted.

use ax_color::Color;

use crate::builtin::builtin_presets;
use crate::config::{Mode, ThemeConfig, ThemeOverride};
use crate::dark::derive_dark_with;
use crate::error::{ThemeError, ThemeResult};
use crate::roles::{RoleSeeds, RoleSet};

/// Id under which a theme that is not a registered preset is tracked.
pub const CUSTOM_THEME_ID: &str = "custom";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preset {
    pub id: String,
    pub name: String,
    pub seeds: RoleSeeds,
    pub overrides: ThemeOverride,
}

impl Preset {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, seed: Color) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            seeds: RoleSeeds::from_primary(seed),
            overrides: ThemeOverride::default(),
        }
    }

    #[must_use]
    pub const fn with_seeds(mut self, seeds: RoleSeeds) -> Self {
        self.seeds = seeds;
        self
    }

    #[must_use]
    pub fn with_overrides(mut self, overrides: ThemeOverride) -> Self {
        self.overrides = overrides;
        self
    }

    /// Primary seed.
    #[must_use]
    pub const fn seed(&self) -> Color {
        self.seeds.primary
    }

    /// Run the pipeline: light and dark configs with overrides applied.
    #[must_use]
    pub fn generate(&self) -> (ThemeConfig, ThemeConfig) {
        let roles = RoleSet::derive(&self.seeds);
        let light = ThemeConfig::generate_with(self.id.clone(), roles, Mode::Light, &self.overrides);
        let dark = derive_dark_with(&light, &self.overrides);
        (light, dark)
    }
}

/// Built-in presets followed by user presets.
#[derive(Debug, Clone)]
pub struct PresetRegistry {
    builtin: Vec<Preset>,
    user: Vec<Preset>,
}

impl Default for PresetRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PresetRegistry {
    /// Registry holding only the built-in presets.
    #[must_use]
    pub fn new() -> Self {
        Self {
            builtin: builtin_presets(),
            user: Vec::new(),
        }
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Preset> {
        self.builtin
            .iter()
            .chain(&self.user)
            .find(|preset| preset.id == id)
    }

    #[must_use]
    pub fn is_builtin(&self, id: &str) -> bool {
        self.builtin.iter().any(|preset| preset.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Preset> {
        self.builtin.iter().chain(&self.user)
    }

    #[must_use]
    pub fn user_presets(&self) -> &[Preset] {
        &self.user
    }

    /// Add a user preset, replacing any user preset with the same id.
    pub fn save(&mut self, preset: Preset) -> ThemeResult<()> {
        if self.is_builtin(&preset.id) || preset.id == CUSTOM_THEME_ID {
            return Err(ThemeError::ReadOnlyPreset(preset.id));
        }
        match self.user.iter_mut().find(|p| p.id == preset.id) {
            Some(existing) => *existing = preset,
            None => self.user.push(preset),
        }
        Ok(())
    }

    pub fn delete(&mut self, id: &str) -> ThemeResult<Preset> {
        let index = self.user_index(id)?;
        Ok(self.user.remove(index))
    }

    /// Change the display name of a user preset. The id stays.
    pub fn rename(&mut self, id: &str, name: &str) -> ThemeResult<()> {
        let index = self.user_index(id)?;
        name.clone_into(&mut self.user[index].name);
        Ok(())
    }

    /// Copy any preset, builtin or user, into a new user preset named
    /// `<name> (Copy)` under the first free `<id>-copy[-N]` id.
    pub fn duplicate(&mut self, id: &str) -> ThemeResult<Preset> {
        let source = self
            .get(id)
            .cloned()
            .ok_or_else(|| ThemeError::UnknownPreset(id.to_string()))?;
        let copy = Preset {
            id: self.free_id(&format!("{}-copy", source.id)),
            name: format!("{} (Copy)", source.name),
            ..source
        };
        self.user.push(copy.clone());
        Ok(copy)
    }

    fn user_index(&self, id: &str) -> ThemeResult<usize> {
        if self.is_builtin(id) {
            return Err(ThemeError::ReadOnlyPreset(id.to_string()));
        }
        self.user
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| ThemeError::UnknownPreset(id.to_string()))
    }

    fn free_id(&self, base: &str) -> String {
        let mut candidate = base.to_string();
        let mut n = 2;
        while self.get(&candidate).is_some() {
            candidate = format!("{base}-{n}");
            n += 1;
        }
        candidate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::DEFAULT_PRESET_ID;
    use crate::config::OverrideScope;
    use crate::token::TokenValue;
    use pretty_assertions::assert_eq;

    fn brand() -> Preset {
        Preset::new("brand", "Brand", Color::rgb(0x12, 0x34, 0x56))
    }

    #[test]
    fn builtins_are_read_only() {
        let mut reg = PresetRegistry::new();
        assert!(matches!(
            reg.save(Preset::new(DEFAULT_PRESET_ID, "Mine", Color::BLACK)),
            Err(ThemeError::ReadOnlyPreset(_))
        ));
        assert!(matches!(reg.delete(DEFAULT_PRESET_ID), Err(ThemeError::ReadOnlyPreset(_))));
        assert!(matches!(
            reg.save(Preset::new(CUSTOM_THEME_ID, "Custom", Color::BLACK)),
            Err(ThemeError::ReadOnlyPreset(_))
        ));
    }

    #[test]
    fn save_replaces_wholesale() {
        let mut reg = PresetRegistry::new();
        reg.save(brand()).unwrap();
        reg.save(Preset::new("brand", "Brand v2", Color::WHITE)).unwrap();
        assert_eq!(reg.user_presets().len(), 1);
        assert_eq!(reg.get("brand").unwrap().name, "Brand v2");
        assert_eq!(reg.get("brand").unwrap().seed(), Color::WHITE);
    }

    #[test]
    fn delete_user_preset() {
        let mut reg = PresetRegistry::new();
        reg.save(brand()).unwrap();
        assert_eq!(reg.delete("brand").unwrap().id, "brand");
        assert!(reg.get("brand").is_none());
        assert!(matches!(reg.delete("brand"), Err(ThemeError::UnknownPreset(_))));
    }

    #[test]
    fn rename_changes_name_only() {
        let mut reg = PresetRegistry::new();
        reg.save(brand()).unwrap();
        reg.rename("brand", "Brand Blue").unwrap();
        let renamed = reg.get("brand").unwrap();
        assert_eq!(renamed.name, "Brand Blue");
        assert_eq!(renamed.seed(), brand().seed());

        assert!(matches!(reg.rename(DEFAULT_PRESET_ID, "X"), Err(ThemeError::ReadOnlyPreset(_))));
        assert!(matches!(reg.rename("gone", "X"), Err(ThemeError::UnknownPreset(_))));
    }

    #[test]
    fn duplicate_picks_free_ids() {
        let mut reg = PresetRegistry::new();
        reg.save(brand()).unwrap();

        let first = reg.duplicate("brand").unwrap();
        assert_eq!(first.id, "brand-copy");
        assert_eq!(first.name, "Brand (Copy)");
        assert_eq!(first.seeds, brand().seeds);

        let second = reg.duplicate("brand").unwrap();
        assert_eq!(second.id, "brand-copy-2");

        let from_builtin = reg.duplicate("rose").unwrap();
        assert_eq!(from_builtin.id, "rose-copy");
        assert!(!reg.is_builtin("rose-copy"));
        assert_eq!(reg.user_presets().len(), 4);

        assert!(matches!(reg.duplicate("gone"), Err(ThemeError::UnknownPreset(_))));
    }

    #[test]
    fn iteration_lists_builtins_first() {
        let mut reg = PresetRegistry::new();
        reg.save(brand()).unwrap();
        let ids: Vec<&str> = reg.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids.first(), Some(&DEFAULT_PRESET_ID));
        assert_eq!(ids.last(), Some(&"brand"));
    }

    #[test]
    fn generate_applies_overrides_per_mode() {
        let mut overrides = ThemeOverride::default();
        overrides.set("brand-default", "#FF0000", OverrideScope::Dark).unwrap();
        let preset = brand().with_overrides(overrides);
        let (light, dark) = preset.generate();
        let red = TokenValue::Color(Color::rgb(255, 0, 0));
        assert_ne!(light.get_str("brand-default"), Some(&red));
        assert_eq!(dark.get_str("brand-default"), Some(&red));
        assert_eq!(light.id, "brand");
        assert_eq!(dark.id, "brand");
    }

    #[test]
    fn generate_uses_every_role_seed() {
        let teal = Color::rgb(0x14, 0xB8, 0xA6);
        let seeds = RoleSeeds {
            tertiary: Some(teal),
            ..RoleSeeds::from_primary(Color::rgb(0x12, 0x34, 0x56))
        };
        let (light, dark) = brand().with_seeds(seeds).generate();
        let teal_token = TokenValue::Color(teal);
        assert_eq!(light.get_str("tertiary-500"), Some(&teal_token));
        assert_eq!(dark.get_str("tertiary-500"), Some(&teal_token));
    }
}
