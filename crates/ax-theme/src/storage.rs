//! Persistence: a tiny key/value seam plus the persisted record.
//!
//! The store writes one JSON document under [`STATE_KEY`]:
//!
//! ```json
//! {
//!   "currentThemeId": "brand",
//!   "presets": [
//!     { "id": "brand", "name": "Brand", "seedColor": "#123456", "overrides": {} }
//!   ]
//! }
//! ```
//!
//! Explicit role seeds are written as `secondaryColor`, `tertiaryColor` and
//! `errorColor`, and left out when the role derives from the primary.
//!
//! Only user presets are listed. A current theme that is not a registered
//! preset appears as a preset with id `custom`.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};

use ax_color::Color;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::config::ThemeOverride;
use crate::error::{ThemeError, ThemeResult};
use crate::preset::Preset;
use crate::roles::RoleSeeds;

/// Key of the persisted record.
pub const STATE_KEY: &str = "ax-theme-state";

// ---------------------------------------------------------------------------
// Key/value stores
// ---------------------------------------------------------------------------

pub trait KeyValueStore {
    fn get(&self, key: &str) -> ThemeResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> ThemeResult<()>;
}

/// In-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> ThemeResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> ThemeResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One `<key>.json` file per key inside a directory.
///
/// Writes go to a temp file in the same directory and are renamed over the
/// target, so a reader sees either the old document or the new one.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn write_atomic(&self, path: &Path, value: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.flush()?;
        tmp.persist(path).map_err(|err| err.error)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> ThemeResult<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(ThemeError::Storage { path, source }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> ThemeResult<()> {
        let path = self.path_for(key);
        self.write_atomic(&path, value)
            .map_err(|source| ThemeError::Storage { path, source })
    }
}

// ---------------------------------------------------------------------------
// Persisted record
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedPreset {
    pub id: String,
    pub name: String,
    #[serde(rename = "seedColor")]
    pub seed: Color,
    #[serde(rename = "secondaryColor", default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<Color>,
    #[serde(rename = "tertiaryColor", default, skip_serializing_if = "Option::is_none")]
    pub tertiary: Option<Color>,
    #[serde(rename = "errorColor", default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Color>,
    #[serde(default)]
    pub overrides: ThemeOverride,
}

impl From<&Preset> for PersistedPreset {
    fn from(preset: &Preset) -> Self {
        Self {
            id: preset.id.clone(),
            name: preset.name.clone(),
            seed: preset.seeds.primary,
            secondary: preset.seeds.secondary,
            tertiary: preset.seeds.tertiary,
            error: preset.seeds.error,
            overrides: preset.overrides.clone(),
        }
    }
}

impl From<PersistedPreset> for Preset {
    fn from(p: PersistedPreset) -> Self {
        let seeds = RoleSeeds {
            primary: p.seed,
            secondary: p.secondary,
            tertiary: p.tertiary,
            error: p.error,
        };
        Self::new(p.id, p.name, p.seed)
            .with_seeds(seeds)
            .with_overrides(p.overrides)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(rename = "currentThemeId")]
    pub current_theme_id: String,
    #[serde(default)]
    pub presets: Vec<PersistedPreset>,
}

impl PersistedState {
    pub fn decode(text: &str) -> ThemeResult<Self> {
        serde_json::from_str(text).map_err(|e| ThemeError::CorruptPersistedState(e.to_string()))
    }

    pub fn encode(&self) -> ThemeResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ThemeError::CorruptPersistedState(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OverrideScope;
    use pretty_assertions::assert_eq;

    #[test]
    fn memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn file_store_writes_and_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("nested"));
        assert_eq!(store.get(STATE_KEY).unwrap(), None);

        store.set(STATE_KEY, "first").unwrap();
        store.set(STATE_KEY, "second").unwrap();
        assert_eq!(store.get(STATE_KEY).unwrap().as_deref(), Some("second"));
        assert!(store.path_for(STATE_KEY).ends_with("ax-theme-state.json"));

        // Only the target file remains; temp files were renamed away.
        let entries = fs::read_dir(store.dir()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn persisted_wire_format() {
        let mut overrides = ThemeOverride::default();
        overrides.set("brand-default", "#FF0000", OverrideScope::Light).unwrap();
        let state = PersistedState {
            current_theme_id: "brand".into(),
            presets: vec![PersistedPreset {
                id: "brand".into(),
                name: "Brand".into(),
                seed: Color::rgb(0x12, 0x34, 0x56),
                secondary: None,
                tertiary: Some(Color::rgb(0x14, 0xB8, 0xA6)),
                error: None,
                overrides,
            }],
        };
        let text = state.encode().unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["currentThemeId"], "brand");
        assert_eq!(value["presets"][0]["seedColor"], "#123456");
        assert_eq!(value["presets"][0]["overrides"]["light"]["brand-default"], "#FF0000");
        assert_eq!(value["presets"][0]["tertiaryColor"], "#14B8A6");
        assert!(value["presets"][0].get("secondaryColor").is_none());
        assert_eq!(PersistedState::decode(&text).unwrap(), state);
    }

    #[test]
    fn decode_rejects_garbage() {
        for text in [
            "",
            "{",
            r#"{"presets":[]}"#,
            r#"{"currentThemeId":"x","presets":[{"id":"a","name":"A","seedColor":"nope"}]}"#,
            r##"{"currentThemeId":"x","presets":[{"id":"a","name":"A","seedColor":"#fff","overrides":{"light":{"bogus":"1"}}}]}"##,
        ] {
            assert!(
                matches!(PersistedState::decode(text), Err(ThemeError::CorruptPersistedState(_))),
                "{text:?}"
            );
        }
    }

    #[test]
    fn missing_overrides_default_to_empty() {
        let state =
            PersistedState::decode(r##"{"currentThemeId":"a","presets":[{"id":"a","name":"A","seedColor":"#fff"}]}"##)
                .unwrap();
        assert!(state.presets[0].overrides.is_empty());
        assert_eq!(state.presets[0].seed, Color::WHITE);
        assert_eq!(state.presets[0].error, None);

        let preset = Preset::from(state.presets[0].clone());
        assert_eq!(preset.seeds, RoleSeeds::from_primary(Color::WHITE));
    }
}
