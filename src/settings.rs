// SPDX-License-Identifier: MIT
//
// CLI settings: an optional TOML file.
//
//   prefix    = "ax"            # custom property / variable prefix
//   selector  = "class"         # class | data-theme | combined
//   state_dir = "/some/dir"     # where the theme state is persisted
//   log_level = "info"          # env_logger filter, below RUST_LOG and -v
//   header    = true            # comment headers in css/scss output
//
// Every key is optional. A missing default file means defaults; a missing
// file named with --config is an error.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use ax_theme::{ExportOptions, SelectorStrategy};
use serde::{Deserialize, Serialize};

const APP_DIR: &str = "ax-theme";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub prefix: String,
    pub selector: SelectorStrategy,
    pub state_dir: Option<PathBuf>,
    pub log_level: Option<String>,
    pub header: bool,
}

impl Default for Settings {
    fn default() -> Self {
        let options = ExportOptions::default();
        Self {
            prefix: options.prefix,
            selector: options.selector,
            state_dir: None,
            log_level: None,
            header: options.header,
        }
    }
}

impl Settings {
    /// `<config dir>/ax-theme/config.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Read `explicit` if given, otherwise the default location.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) if path.is_file() => path,
                _ => return Ok(Self::default()),
            },
        };
        let text = fs::read_to_string(&path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Where the theme state lives.
    pub fn state_dir(&self) -> PathBuf {
        self.state_dir
            .clone()
            .or_else(|| dirs::data_dir().map(|dir| dir.join(APP_DIR)))
            .unwrap_or_else(|| PathBuf::from(".").join(APP_DIR))
    }

    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            prefix: self.prefix.clone(),
            selector: self.selector,
            header: self.header,
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_file_is_defaults() {
        assert_eq!(Settings::from_toml("").unwrap(), Settings::default());
        assert_eq!(Settings::default().export_options(), ExportOptions::default());
    }

    #[test]
    fn all_keys() {
        let settings = Settings::from_toml(
            r#"
            prefix = "brand"
            selector = "data-theme"
            state_dir = "/tmp/themes"
            log_level = "debug"
            header = false
            "#,
        )
        .unwrap();
        assert_eq!(settings.prefix, "brand");
        assert_eq!(settings.selector, SelectorStrategy::DataTheme);
        assert_eq!(settings.state_dir(), PathBuf::from("/tmp/themes"));
        assert_eq!(settings.log_level.as_deref(), Some("debug"));

        let options = settings.export_options();
        assert_eq!(options.prefix, "brand");
        assert!(!options.header);
    }

    #[test]
    fn rejects_unknown_keys_and_selectors() {
        assert!(Settings::from_toml("colour = 1").is_err());
        assert!(Settings::from_toml(r#"selector = "media""#).is_err());
    }

    #[test]
    fn explicit_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(Settings::load(Some(&missing)).is_err());

        let path = dir.path().join("config.toml");
        fs::write(&path, "prefix = \"x\"\n").unwrap();
        assert_eq!(Settings::load(Some(&path)).unwrap().prefix, "x");
    }
}
