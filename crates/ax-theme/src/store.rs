//! Theme store: the one stateful piece of the engine.
//!
//! Holds the current role seeds, their overrides, the resolved light and dark
//! configs and the preset registry. Every mutator validates its input
//! before touching state, so a failed call leaves the store exactly as it
//! was. Each successful mutation bumps [`ThemeStore::version`]; callers that
//! need change notification compare versions.
//!
//! Applying a theme to a page goes through [`StyleSink`], and persistence
//! through a [`KeyValueStore`], so the store itself never touches a DOM or
//! a filesystem directly.

use std::collections::BTreeMap;

use ax_color::Color;

use crate::builtin::{DEFAULT_PRESET_ID, default_preset};
use crate::config::{Mode, OverrideScope, ThemeConfig, ThemeOverride};
use crate::contrast::{ContrastCheck, audit};
use crate::error::{ThemeError, ThemeResult};
use crate::export::{ExportFormat, ExportMode, ExportOptions, ThemeExporter, parse_json_pair};
use crate::preset::{CUSTOM_THEME_ID, Preset, PresetRegistry};
use crate::roles::{RoleSeeds, RoleSet};
use crate::storage::{KeyValueStore, PersistedPreset, PersistedState, STATE_KEY};
use crate::token::TokenName;

/// Receiver for CSS custom properties.
pub trait StyleSink {
    fn set_property(&mut self, name: &str, value: &str);
}

impl StyleSink for BTreeMap<String, String> {
    fn set_property(&mut self, name: &str, value: &str) {
        self.insert(name.to_string(), value.to_string());
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct ThemeStore<S: KeyValueStore> {
    presets: PresetRegistry,
    seeds: RoleSeeds,
    current_id: String,
    overrides: ThemeOverride,
    light: ThemeConfig,
    dark: ThemeConfig,
    exporter: ThemeExporter,
    storage: S,
    version: u64,
}

impl<S: KeyValueStore> ThemeStore<S> {
    /// Store on the default preset with default export options.
    pub fn new(storage: S) -> Self {
        Self::with_options(storage, ExportOptions::default())
    }

    /// Store on the default preset.
    pub fn with_options(storage: S, options: ExportOptions) -> Self {
        let preset = default_preset();
        let (light, dark) = preset.generate();
        Self {
            presets: PresetRegistry::new(),
            seeds: preset.seeds,
            current_id: preset.id,
            overrides: preset.overrides,
            light,
            dark,
            exporter: ThemeExporter::new(options),
            storage,
            version: 0,
        }
    }

    /// Restore from `storage`. Never fails: missing, unreadable or corrupt
    /// state falls back to the default preset.
    pub fn load(storage: S) -> Self {
        Self::load_with_options(storage, ExportOptions::default())
    }

    pub fn load_with_options(storage: S, options: ExportOptions) -> Self {
        let mut store = Self::with_options(storage, options);

        let text = match store.storage.get(STATE_KEY) {
            Ok(Some(text)) => text,
            Ok(None) => {
                log::info!("no saved theme state, using '{DEFAULT_PRESET_ID}'");
                return store;
            }
            Err(err) => {
                log::warn!("could not read saved theme state: {err}");
                return store;
            }
        };

        let state = match PersistedState::decode(&text) {
            Ok(state) => state,
            Err(err) => {
                log::warn!("{err}; falling back to '{DEFAULT_PRESET_ID}'");
                return store;
            }
        };

        let mut custom = None;
        for persisted in state.presets {
            if persisted.id == CUSTOM_THEME_ID {
                custom = Some(Preset::from(persisted));
                continue;
            }
            let id = persisted.id.clone();
            if let Err(err) = store.presets.save(persisted.into()) {
                log::warn!("skipping saved preset '{id}': {err}");
            }
        }

        let current = if state.current_theme_id == CUSTOM_THEME_ID {
            custom
        } else {
            store.presets.get(&state.current_theme_id).cloned()
        };

        match current {
            Some(preset) => {
                store.rebuild(preset);
                log::info!("restored theme '{}'", store.current_id);
            }
            None => log::warn!(
                "saved theme '{}' is not available, using '{DEFAULT_PRESET_ID}'",
                state.current_theme_id
            ),
        }
        store.version = 0;
        store
    }

    // ---------------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------------

    fn rebuild(&mut self, preset: Preset) {
        let (light, dark) = preset.generate();
        self.seeds = preset.seeds;
        self.current_id = preset.id;
        self.overrides = preset.overrides;
        self.light = light;
        self.dark = dark;
        self.version += 1;
    }

    fn custom(seeds: RoleSeeds, overrides: ThemeOverride) -> Preset {
        Preset::new(CUSTOM_THEME_ID, "Custom", seeds.primary)
            .with_seeds(seeds)
            .with_overrides(overrides)
    }

    fn rename_current(&mut self, id: &str) {
        id.clone_into(&mut self.current_id);
        id.clone_into(&mut self.light.id);
        id.clone_into(&mut self.dark.id);
    }

    /// Parse `input` as a color and make it the new primary seed. Other
    /// roles derive from it and overrides are dropped.
    pub fn apply_seed(&mut self, input: &str) -> ThemeResult<()> {
        let seed = Color::parse(input).map_err(|e| ThemeError::invalid_color(input, &e))?;
        self.apply_seeds(RoleSeeds::from_primary(seed));
        Ok(())
    }

    /// Make `seeds` the current theme. Overrides are dropped.
    pub fn apply_seeds(&mut self, seeds: RoleSeeds) {
        self.rebuild(Self::custom(seeds, ThemeOverride::default()));
        log::debug!("applied seeds {seeds:?}");
    }

    pub fn apply_preset(&mut self, id: &str) -> ThemeResult<()> {
        let preset = self
            .presets
            .get(id)
            .cloned()
            .ok_or_else(|| ThemeError::UnknownPreset(id.to_string()))?;
        self.rebuild(preset);
        log::info!("applied preset '{id}'");
        Ok(())
    }

    /// Set one token in the modes named by `scope`. The other mode is left
    /// alone; nothing is re-derived.
    pub fn set_override(
        &mut self,
        name: &str,
        value: &str,
        scope: OverrideScope,
    ) -> ThemeResult<TokenName> {
        let token = TokenName::parse(name)?;
        let value = token.parse_value(value)?;

        if scope.includes(Mode::Light) {
            self.light.tokens.insert(token, value.clone());
        }
        if scope.includes(Mode::Dark) {
            self.dark.tokens.insert(token, value.clone());
        }
        self.overrides.insert(token, value, scope);
        self.rename_current(CUSTOM_THEME_ID);
        self.version += 1;
        log::debug!("override {token} ({scope:?})");
        Ok(token)
    }

    /// Drop every override, keeping the seed.
    pub fn clear_overrides(&mut self) {
        let preset = match self.presets.get(&self.current_id) {
            Some(preset) if preset.seeds == self.seeds && preset.overrides.is_empty() => {
                preset.clone()
            }
            _ => Self::custom(self.seeds, ThemeOverride::default()),
        };
        self.rebuild(preset);
    }

    /// Back to the default preset.
    pub fn reset(&mut self) {
        self.rebuild(default_preset());
        log::info!("reset to '{DEFAULT_PRESET_ID}'");
    }

    /// Save the current seed and overrides as a user preset and make it
    /// current.
    pub fn save_preset(&mut self, id: &str, name: &str) -> ThemeResult<()> {
        let preset = Preset::new(id, name, self.seeds.primary)
            .with_seeds(self.seeds)
            .with_overrides(self.overrides.clone());
        self.presets.save(preset)?;
        self.rename_current(id);
        self.version += 1;
        log::info!("saved preset '{id}'");
        Ok(())
    }

    /// Remove a user preset. If it was current, the theme stays and becomes
    /// custom.
    pub fn delete_preset(&mut self, id: &str) -> ThemeResult<()> {
        self.presets.delete(id)?;
        if self.current_id == id {
            self.rename_current(CUSTOM_THEME_ID);
        }
        self.version += 1;
        log::info!("deleted preset '{id}'");
        Ok(())
    }

    /// Change the display name of a user preset.
    pub fn rename_preset(&mut self, id: &str, name: &str) -> ThemeResult<()> {
        self.presets.rename(id, name)?;
        self.version += 1;
        log::info!("renamed preset '{id}' to \"{name}\"");
        Ok(())
    }

    /// Copy a preset under a fresh id. The current theme does not change.
    /// Returns the new id.
    pub fn duplicate_preset(&mut self, id: &str) -> ThemeResult<String> {
        let copy = self.presets.duplicate(id)?;
        self.version += 1;
        log::info!("duplicated preset '{id}' as '{}'", copy.id);
        Ok(copy.id)
    }

    /// Replace the current theme with a JSON export (single or pair).
    ///
    /// The 500 tones of the imported primary, secondary, tertiary and error
    /// palettes become the role seeds; every token that differs from what
    /// those seeds generate is kept as an override of its own mode.
    pub fn import_json(&mut self, text: &str) -> ThemeResult<()> {
        let (light, dark) = parse_json_pair(text)?;
        let seeds = RoleSeeds::recover(&light.roles);
        let roles = RoleSet::derive(&seeds);
        let dark = dark.unwrap_or_else(|| ThemeConfig::generate(light.id.clone(), light.roles, Mode::Dark));

        let mut overrides = ThemeOverride::default();
        for (cfg, scope) in [(&light, OverrideScope::Light), (&dark, OverrideScope::Dark)] {
            let base = ThemeConfig::generate(CUSTOM_THEME_ID, roles, cfg.mode);
            for (name, value) in cfg.ordered() {
                if base.get(name) != Some(value) {
                    overrides.insert(name, value.clone(), scope);
                }
            }
        }

        log::info!(
            "imported theme '{}' (seed {}, {} light / {} dark overrides)",
            light.id,
            seeds.primary,
            overrides.light.len(),
            overrides.dark.len()
        );
        self.rebuild(Self::custom(seeds, overrides));
        Ok(())
    }

    // ---------------------------------------------------------------------------
    // Output
    // ---------------------------------------------------------------------------

    pub fn export_current(&self, format: ExportFormat, mode: ExportMode) -> ThemeResult<String> {
        self.exporter.export(&self.light, Some(&self.dark), format, mode)
    }

    /// Write every token of `mode` as a custom property.
    pub fn apply_to_document(&self, sink: &mut dyn StyleSink, mode: Mode) {
        for (name, value) in self.config(mode).ordered() {
            let property = format!("--{}", self.exporter.property_name(name));
            sink.set_property(&property, &value.to_string());
        }
    }

    #[must_use]
    pub fn contrast_report(&self, mode: Mode) -> Vec<ContrastCheck> {
        audit(self.config(mode))
    }

    /// Write user presets and the current theme id to storage.
    pub fn persist(&mut self) -> ThemeResult<()> {
        let mut presets: Vec<PersistedPreset> =
            self.presets.user_presets().iter().map(PersistedPreset::from).collect();
        if self.current_id == CUSTOM_THEME_ID {
            let custom = Self::custom(self.seeds, self.overrides.clone());
            presets.push(PersistedPreset::from(&custom));
        }
        let state = PersistedState {
            current_theme_id: self.current_id.clone(),
            presets,
        };
        self.storage.set(STATE_KEY, &state.encode()?)?;
        log::info!("persisted theme '{}'", self.current_id);
        Ok(())
    }

    // ---------------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------------

    /// The current light config.
    #[must_use]
    pub const fn current(&self) -> &ThemeConfig {
        &self.light
    }

    #[must_use]
    pub const fn dark(&self) -> &ThemeConfig {
        &self.dark
    }

    #[must_use]
    pub const fn config(&self, mode: Mode) -> &ThemeConfig {
        match mode {
            Mode::Light => &self.light,
            Mode::Dark => &self.dark,
        }
    }

    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    #[must_use]
    pub const fn presets(&self) -> &PresetRegistry {
        &self.presets
    }

    /// Current primary seed.
    #[must_use]
    pub const fn seed(&self) -> Color {
        self.seeds.primary
    }

    #[must_use]
    pub const fn seeds(&self) -> RoleSeeds {
        self.seeds
    }

    #[must_use]
    pub fn current_theme_id(&self) -> &str {
        &self.current_id
    }

    #[must_use]
    pub const fn overrides(&self) -> &ThemeOverride {
        &self.overrides
    }

    #[must_use]
    pub const fn exporter(&self) -> &ThemeExporter {
        &self.exporter
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::DEFAULT_SEED;
    use crate::storage::MemoryStore;
    use crate::token::TokenValue;
    use pretty_assertions::assert_eq;

    const PURPLE: Color = Color::rgb(0x67, 0x50, 0xA4);

    fn store() -> ThemeStore<MemoryStore> {
        ThemeStore::new(MemoryStore::new())
    }

    fn token(cfg: &ThemeConfig, name: &str) -> TokenValue {
        cfg.get_str(name).cloned().unwrap()
    }

    #[test]
    fn starts_on_default_preset() {
        let s = store();
        assert_eq!(s.current_theme_id(), DEFAULT_PRESET_ID);
        assert_eq!(s.seed(), DEFAULT_SEED);
        assert_eq!(s.version(), 0);
        assert!(s.current().ensure_complete().is_ok());
        assert!(s.dark().ensure_complete().is_ok());
    }

    #[test]
    fn apply_seed_replaces_theme() {
        let mut s = store();
        s.apply_seed("#6750A4").unwrap();
        assert_eq!(s.current_theme_id(), CUSTOM_THEME_ID);
        assert_eq!(s.current().id, CUSTOM_THEME_ID);
        assert_eq!(token(s.current(), "primary-500"), TokenValue::Color(PURPLE));
        assert_eq!(s.version(), 1);
    }

    #[test]
    fn failed_operations_do_not_mutate() {
        let mut s = store();
        let before = (s.current().clone(), s.dark().clone(), s.version());

        assert!(s.apply_seed("#zzz").is_err());
        assert!(s.apply_preset("missing").is_err());
        assert!(s.set_override("brand-nope", "#fff", OverrideScope::Both).is_err());
        assert!(s.set_override("brand-default", "nope", OverrideScope::Both).is_err());
        assert!(s.save_preset(DEFAULT_PRESET_ID, "Mine").is_err());
        assert!(s.delete_preset("missing").is_err());
        assert!(s.import_json("{}").is_err());
        let injected = "4px; }\nbody { color: red";
        assert!(s.set_override("radius-md", injected, OverrideScope::Light).is_err());
        assert!(s.rename_preset(DEFAULT_PRESET_ID, "Mine").is_err());
        assert!(s.duplicate_preset("missing").is_err());

        assert_eq!((s.current().clone(), s.dark().clone(), s.version()), before);
        assert_eq!(s.current_theme_id(), DEFAULT_PRESET_ID);
    }

    #[test]
    fn light_override_does_not_touch_dark() {
        let mut s = store();
        let dark_before = s.dark().clone();
        s.set_override("brand-default", "#FF0000", OverrideScope::Light).unwrap();
        assert_eq!(token(s.current(), "brand-default"), TokenValue::Color(Color::rgb(255, 0, 0)));
        assert_eq!(s.dark().tokens, dark_before.tokens);
        assert_eq!(s.current_theme_id(), CUSTOM_THEME_ID);
    }

    #[test]
    fn both_scope_reaches_every_export() {
        let mut s = store();
        s.set_override("brand-default", "#FF0000", OverrideScope::Both).unwrap();
        let css = s.export_current(ExportFormat::Css, ExportMode::Both).unwrap();
        assert_eq!(css.matches("--ax-brand-default: #FF0000;").count(), 2);
        let scss = s.export_current(ExportFormat::Scss, ExportMode::Both).unwrap();
        assert!(scss.contains("$ax-brand-default: #FF0000;"));
        assert!(scss.contains("$ax-dark-brand-default: #FF0000;"));
    }

    #[test]
    fn clear_overrides_keeps_seed() {
        let mut s = store();
        s.apply_preset("rose").unwrap();
        s.set_override("radius-md", "6px", OverrideScope::Light).unwrap();
        assert_eq!(s.current_theme_id(), CUSTOM_THEME_ID);
        s.clear_overrides();
        assert!(s.overrides().is_empty());
        assert_eq!(token(s.current(), "radius-md"), TokenValue::Scalar("0.375rem".into()));
        // The seed alone no longer names a preset once the id went custom.
        assert_eq!(s.current_theme_id(), CUSTOM_THEME_ID);
    }

    #[test]
    fn save_and_delete_presets() {
        let mut s = store();
        s.apply_seed("#6750A4").unwrap();
        s.save_preset("purple", "Purple").unwrap();
        assert_eq!(s.current_theme_id(), "purple");
        assert_eq!(s.current().id, "purple");
        assert_eq!(s.presets().get("purple").unwrap().seed(), PURPLE);

        s.clear_overrides();
        assert_eq!(s.current_theme_id(), "purple");

        s.delete_preset("purple").unwrap();
        assert_eq!(s.current_theme_id(), CUSTOM_THEME_ID);
        assert_eq!(s.seed(), PURPLE);
    }

    #[test]
    fn rename_and_duplicate_presets() {
        let mut s = store();
        s.apply_seed("#6750A4").unwrap();
        s.save_preset("purple", "Purple").unwrap();
        let version = s.version();

        s.rename_preset("purple", "Grape").unwrap();
        assert_eq!(s.presets().get("purple").unwrap().name, "Grape");
        assert_eq!(s.current_theme_id(), "purple");
        assert_eq!(s.version(), version + 1);

        let copy = s.duplicate_preset("rose").unwrap();
        assert_eq!(copy, "rose-copy");
        assert_eq!(s.current_theme_id(), "purple");
        s.apply_preset(&copy).unwrap();
        assert_eq!(s.seed(), s.presets().get("rose").unwrap().seed());

        s.persist().unwrap();
        let restored = ThemeStore::load(s.storage().clone());
        assert_eq!(restored.presets().get("purple").unwrap().name, "Grape");
        assert_eq!(restored.current_theme_id(), "rose-copy");
    }

    #[test]
    fn reset_goes_to_default() {
        let mut s = store();
        s.apply_seed("#6750A4").unwrap();
        s.reset();
        assert_eq!(s.current_theme_id(), DEFAULT_PRESET_ID);
        assert_eq!(s.seed(), DEFAULT_SEED);
    }

    #[test]
    fn document_receives_every_token() {
        let mut s = store();
        s.apply_seed("#6750A4").unwrap();
        let mut sink: BTreeMap<String, String> = BTreeMap::new();
        s.apply_to_document(&mut sink, Mode::Light);
        assert_eq!(sink.len(), crate::token::schema().len());
        assert_eq!(sink["--ax-brand-default"], "#6750A4");
        assert_eq!(sink["--ax-font-family"], token(s.current(), "font-family").to_string());
    }

    #[test]
    fn persist_and_load_custom_theme() {
        let mut s = store();
        s.apply_seed("#6750A4").unwrap();
        s.set_override("text-default", "#111111", OverrideScope::Light).unwrap();
        s.persist().unwrap();

        let restored = ThemeStore::load(s.storage().clone());
        assert_eq!(restored.current_theme_id(), CUSTOM_THEME_ID);
        assert_eq!(restored.seed(), PURPLE);
        assert_eq!(restored.current(), s.current());
        assert_eq!(restored.dark(), s.dark());
        assert_eq!(restored.version(), 0);
    }

    #[test]
    fn role_seeds_survive_persistence() {
        let teal = Color::rgb(0x14, 0xB8, 0xA6);
        let seeds = RoleSeeds {
            secondary: Some(teal),
            error: Some(Color::rgb(0xDC, 0x26, 0x26)),
            ..RoleSeeds::from_primary(PURPLE)
        };
        let mut s = store();
        s.apply_seeds(seeds);
        assert_eq!(token(s.current(), "secondary-500"), TokenValue::Color(teal));
        s.persist().unwrap();

        let restored = ThemeStore::load(s.storage().clone());
        assert_eq!(restored.seeds(), seeds);
        assert_eq!(restored.current(), s.current());
        assert_eq!(restored.dark(), s.dark());

        s.save_preset("duo", "Duo").unwrap();
        s.apply_seed("#10B981").unwrap();
        s.apply_preset("duo").unwrap();
        assert_eq!(s.seeds(), seeds);
        assert_eq!(token(s.current(), "secondary-500"), TokenValue::Color(teal));
    }

    #[test]
    fn persist_and_load_user_preset() {
        let mut s = store();
        s.apply_seed("#10B981").unwrap();
        s.save_preset("mint", "Mint").unwrap();
        s.persist().unwrap();

        let text = s.storage().get(STATE_KEY).unwrap().unwrap();
        let state = PersistedState::decode(&text).unwrap();
        assert_eq!(state.current_theme_id, "mint");
        assert_eq!(state.presets.len(), 1);

        let restored = ThemeStore::load(s.storage().clone());
        assert_eq!(restored.current_theme_id(), "mint");
        assert!(restored.presets().get("mint").is_some());
        assert_eq!(restored.current(), s.current());
    }

    #[test]
    fn corrupt_state_falls_back_to_default() {
        let mut storage = MemoryStore::new();
        storage.set(STATE_KEY, "{ definitely not json").unwrap();
        let s = ThemeStore::load(storage);
        assert_eq!(s.current_theme_id(), DEFAULT_PRESET_ID);
        assert!(s.current().ensure_complete().is_ok());
    }

    #[test]
    fn unknown_current_id_falls_back_to_default() {
        let mut storage = MemoryStore::new();
        storage
            .set(STATE_KEY, r#"{"currentThemeId":"gone","presets":[]}"#)
            .unwrap();
        let s = ThemeStore::load(storage);
        assert_eq!(s.current_theme_id(), DEFAULT_PRESET_ID);
    }

    #[test]
    fn import_roundtrip_through_store() {
        let mut s = store();
        s.apply_seed("#6750A4").unwrap();
        s.set_override("nav-bg", "#FAFAFA", OverrideScope::Dark).unwrap();
        let json = s.export_current(ExportFormat::Json, ExportMode::Both).unwrap();

        let mut other = store();
        other.import_json(&json).unwrap();
        assert_eq!(other.seed(), PURPLE);
        assert_eq!(other.current().tokens, s.current().tokens);
        assert_eq!(other.dark().tokens, s.dark().tokens);
        assert_eq!(other.overrides().dark.len(), 1);
        assert!(other.overrides().light.is_empty());
    }

    #[test]
    fn importing_a_dark_export_keeps_overrides_dark() {
        let mut s = store();
        s.apply_seed("#6750A4").unwrap();
        s.set_override("background-default", "#000000", OverrideScope::Dark).unwrap();
        let json = s.export_current(ExportFormat::Json, ExportMode::Dark).unwrap();

        let mut other = store();
        other.import_json(&json).unwrap();
        assert_eq!(other.seed(), PURPLE);
        assert_eq!(other.dark().tokens, s.dark().tokens);
        assert_eq!(other.current().tokens, s.current().tokens);
        assert!(other.overrides().light.is_empty());
        assert_eq!(other.overrides().dark.len(), 1);
    }

    #[test]
    fn import_recovers_explicit_role_seeds() {
        let seeds = RoleSeeds {
            tertiary: Some(Color::rgb(0x14, 0xB8, 0xA6)),
            ..RoleSeeds::from_primary(PURPLE)
        };
        let mut s = store();
        s.apply_seeds(seeds);
        let json = s.export_current(ExportFormat::Json, ExportMode::Both).unwrap();

        let mut other = store();
        other.import_json(&json).unwrap();
        assert_eq!(other.seeds(), seeds);
        assert!(other.overrides().is_empty());
    }

    #[test]
    fn contrast_report_covers_pairs() {
        let s = store();
        let report = s.contrast_report(Mode::Dark);
        assert_eq!(report.len(), crate::semantic::CONTRAST_PAIRS.len());
        assert!(report.iter().all(ContrastCheck::passes));
    }
}
