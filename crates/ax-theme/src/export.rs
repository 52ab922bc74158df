//! Theme export: CSS custom properties, SCSS variables, JSON, Tailwind.
//!
//! Every format walks the token schema in order, so the same theme always
//! produces byte-identical text. A dark config is derived on demand when the
//! caller does not pass one.
//!
//! ```text
//! css       :root { --ax-brand-default: #6750A4; … }   :root.dark { … }
//! scss      $ax-brand-default: #6750A4;                $ax-dark-brand-default: …;
//! json      { "id", "mode", "colors": { "primary": { "50": … } }, "brand": { … }, … }
//! tailwind  module.exports = { theme: { extend: { colors: { "ax-primary": { "50": … } } } } }
//! ```

use std::fmt::{self, Write as _};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::config::{Mode, ThemeConfig};
use crate::dark::derive_dark;
use crate::error::{ThemeError, ThemeResult};
use crate::palette::{TonalPalette, ToneStep};
use crate::roles::{Role, RoleSet};
use crate::token::{TokenCategory, TokenMap, TokenName, TokenValue};

/// Default custom-property / variable prefix.
pub const DEFAULT_PREFIX: &str = "ax";

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Css,
    Scss,
    Json,
    Tailwind,
}

impl ExportFormat {
    pub const ALL: [Self; 4] = [Self::Css, Self::Scss, Self::Json, Self::Tailwind];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Css => "css",
            Self::Scss => "scss",
            Self::Json => "json",
            Self::Tailwind => "tailwind",
        }
    }

    /// File extension for the format.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Css => "css",
            Self::Scss => "scss",
            Self::Json => "json",
            Self::Tailwind => "js",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == lower)
            .ok_or_else(|| ThemeError::UnsupportedFormat(s.to_string()))
    }
}

/// Which mode(s) to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExportMode {
    #[default]
    Light,
    Dark,
    Both,
}

impl FromStr for ExportMode {
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

impl From<Mode> for ExportMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Light => Self::Light,
            Mode::Dark => Self::Dark,
        }
    }
}

/// How the CSS blocks select light and dark mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectorStrategy {
    /// `:root` and `:root.dark`.
    #[default]
    Class,
    /// `:root[data-theme="light"]` and `:root[data-theme="dark"]`.
    DataTheme,
    /// Both of the above, plus a bare `.dark`.
    Combined,
}

impl SelectorStrategy {
    #[must_use]
    pub const fn selector(self, mode: Mode) -> &'static str {
        match (self, mode) {
            (Self::Class, Mode::Light) => ":root",
            (Self::Class, Mode::Dark) => ":root.dark",
            (Self::DataTheme, Mode::Light) => r#":root[data-theme="light"]"#,
            (Self::DataTheme, Mode::Dark) => r#":root[data-theme="dark"]"#,
            (Self::Combined, Mode::Light) => r#":root, :root[data-theme="light"]"#,
            (Self::Combined, Mode::Dark) => r#":root.dark, :root[data-theme="dark"], .dark"#,
        }
    }
}

impl FromStr for SelectorStrategy {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "class" => Ok(Self::Class),
            "data-theme" => Ok(Self::DataTheme),
            "combined" => Ok(Self::Combined),
            _ => Err(ThemeError::UnsupportedMode(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Leading name segment: `ax` gives `--ax-brand-default`.
    pub prefix: String,
    pub selector: SelectorStrategy,
    /// Emit comment headers (CSS/SCSS) and section comments (SCSS).
    pub header: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            selector: SelectorStrategy::default(),
            header: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Exporter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct ThemeExporter {
    options: ExportOptions,
}

impl ThemeExporter {
    #[must_use]
    pub const fn new(options: ExportOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub const fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Prefixed flat name, without the leading `--` or `$`.
    #[must_use]
    pub fn property_name(&self, name: TokenName) -> String {
        if self.options.prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}-{name}", self.options.prefix)
        }
    }

    /// Serialize a theme. `dark` is derived from `light` when absent.
    pub fn export(
        &self,
        light: &ThemeConfig,
        dark: Option<&ThemeConfig>,
        format: ExportFormat,
        mode: ExportMode,
    ) -> ThemeResult<String> {
        let derived;
        let dark = match (dark, mode, format) {
            (Some(d), ..) => d,
            (None, ExportMode::Light, _) | (None, ExportMode::Both, ExportFormat::Tailwind) => light,
            (None, ..) => {
                derived = derive_dark(light);
                &derived
            }
        };

        let configs: Vec<&ThemeConfig> = match (format, mode) {
            (ExportFormat::Tailwind, ExportMode::Dark) => vec![dark],
            (ExportFormat::Tailwind, _) | (_, ExportMode::Light) => vec![light],
            (_, ExportMode::Dark) => vec![dark],
            (_, ExportMode::Both) => vec![light, dark],
        };
        for cfg in &configs {
            cfg.ensure_complete()?;
        }

        log::debug!("exporting '{}' as {format} ({mode:?})", light.id);

        Ok(match format {
            ExportFormat::Css => configs
                .iter()
                .map(|cfg| self.css_block(cfg))
                .collect::<Vec<_>>()
                .join("\n"),
            ExportFormat::Scss => configs
                .iter()
                .map(|cfg| self.scss_block(cfg))
                .collect::<Vec<_>>()
                .join("\n"),
            ExportFormat::Json => {
                let value = match configs.as_slice() {
                    [light, dark] => json!({ "light": to_json(light), "dark": to_json(dark) }),
                    [single] => to_json(single),
                    _ => Value::Null,
                };
                pretty(&value) + "\n"
            }
            ExportFormat::Tailwind => self.tailwind(configs[0]),
        })
    }

    fn css_block(&self, cfg: &ThemeConfig) -> String {
        let mut out = String::new();
        if self.options.header {
            let _ = writeln!(out, "/* AX Theme: {} ({}) */", cfg.id, cfg.mode.label());
            let _ = writeln!(out, "/* Generated by ax-theme */");
            out.push('\n');
        }
        let _ = writeln!(out, "{} {{", self.options.selector.selector(cfg.mode));
        for (name, value) in cfg.ordered() {
            let _ = writeln!(out, "  --{}: {value};", self.property_name(name));
        }
        out.push_str("}\n");
        out
    }

    fn scss_block(&self, cfg: &ThemeConfig) -> String {
        let mut out = String::new();
        if self.options.header {
            let _ = writeln!(out, "// AX Theme: {} ({})", cfg.id, cfg.mode.label());
            let _ = writeln!(out, "// Generated by ax-theme");
            out.push('\n');
        }

        let mut section = None;
        for (name, value) in cfg.ordered() {
            if self.options.header && section != Some(name.category()) {
                if section.is_some() {
                    out.push('\n');
                }
                let _ = writeln!(out, "// {}", name.category().title());
                section = Some(name.category());
            }
            let var = match cfg.mode {
                Mode::Light => self.property_name(name),
                Mode::Dark => self.property_name_dark(name),
            };
            let _ = writeln!(out, "${var}: {value};");
        }
        out
    }

    fn property_name_dark(&self, name: TokenName) -> String {
        if self.options.prefix.is_empty() {
            format!("dark-{name}")
        } else {
            format!("{}-dark-{name}", self.options.prefix)
        }
    }

    fn tailwind(&self, cfg: &ThemeConfig) -> String {
        let mut colors = Map::new();
        for role in Role::ALL {
            let mut steps = Map::new();
            for step in ToneStep::ALL {
                if let Some(value) = cfg.get(TokenName::Palette(role, step)) {
                    steps.insert(step.to_string(), Value::String(value.to_string()));
                }
            }
            let key = if self.options.prefix.is_empty() {
                role.to_string()
            } else {
                format!("{}-{role}", self.options.prefix)
            };
            colors.insert(key, Value::Object(steps));
        }
        let config = json!({ "theme": { "extend": { "colors": colors } } });

        let mut out = String::new();
        if self.options.header {
            out.push_str("// Tailwind config extension\n");
        }
        let _ = writeln!(out, "module.exports = {};", pretty(&config));
        out
    }
}

fn pretty(value: &Value) -> String {
    // A Value always serializes.
    serde_json::to_string_pretty(value).unwrap_or_default()
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

fn palettes_json(lookup: impl Fn(Role, ToneStep) -> Option<String>) -> Value {
    let mut roles = Map::new();
    for role in Role::ALL {
        let mut steps = Map::new();
        for step in ToneStep::ALL {
            if let Some(value) = lookup(role, step) {
                steps.insert(step.to_string(), Value::String(value));
            }
        }
        roles.insert(role.to_string(), Value::Object(steps));
    }
    Value::Object(roles)
}

fn palette_tokens_match(cfg: &ThemeConfig) -> bool {
    cfg.roles.iter().all(|(role, palette)| {
        palette.iter().all(|(step, color)| {
            cfg.get(TokenName::Palette(role, step)) == Some(&TokenValue::Color(color))
        })
    })
}

/// JSON object for one config, in schema order.
#[must_use]
pub fn to_json(cfg: &ThemeConfig) -> Value {
    let mut root = Map::new();
    root.insert("id".into(), Value::String(cfg.id.clone()));
    root.insert("mode".into(), Value::String(cfg.mode.to_string()));
    root.insert(
        TokenCategory::Colors.json_key().into(),
        palettes_json(|role, step| cfg.get(TokenName::Palette(role, step)).map(ToString::to_string)),
    );

    for (name, value) in cfg.ordered() {
        if name.category() == TokenCategory::Colors {
            continue;
        }
        let section = root
            .entry(name.category().json_key())
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(map) = section {
            map.insert(name.key(), Value::String(value.to_string()));
        }
    }

    if !palette_tokens_match(cfg) {
        root.insert(
            "palettes".into(),
            palettes_json(|role, step| Some(cfg.roles.get(role).tone(step).to_string())),
        );
    }

    Value::Object(root)
}

fn invalid(msg: impl Into<String>) -> ThemeError {
    ThemeError::InvalidImport(msg.into())
}

fn object<'a>(value: &'a Value, what: &str) -> ThemeResult<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| invalid(format!("{what} must be an object")))
}

fn string<'a>(value: &'a Value, what: &str) -> ThemeResult<&'a str> {
    value
        .as_str()
        .ok_or_else(|| invalid(format!("{what} must be a string")))
}

/// Read a `role → step → color` object into palette tokens.
fn read_palettes(value: &Value, what: &str) -> ThemeResult<TokenMap> {
    let mut tokens = TokenMap::new();
    for (role_key, steps) in object(value, what)? {
        let role: Role = role_key.parse()?;
        for (step_key, color) in object(steps, role_key)? {
            let step: ToneStep = step_key
                .parse()
                .map_err(|_| ThemeError::UnknownToken(format!("{role_key}-{step_key}")))?;
            let name = TokenName::Palette(role, step);
            let value = name.parse_value(string(color, &name.to_string())?)?;
            tokens.insert(name, value);
        }
    }
    Ok(tokens)
}

fn roles_from(tokens: &TokenMap, id: &str) -> ThemeResult<RoleSet> {
    let mut missing = Vec::new();
    let palettes = Role::ALL.map(|role| {
        let tones = ToneStep::ALL.map(|step| {
            let name = TokenName::Palette(role, step);
            tokens.get(&name).and_then(TokenValue::as_color).unwrap_or_else(|| {
                missing.push(name.to_string());
                ax_color::Color::BLACK
            })
        });
        TonalPalette::from_tones(tones)
    });
    if missing.is_empty() {
        Ok(RoleSet::from_palettes(palettes))
    } else {
        Err(ThemeError::IncompleteTheme {
            id: id.to_string(),
            missing,
        })
    }
}

fn config_from_json(value: &Value, default_mode: Mode) -> ThemeResult<ThemeConfig> {
    let root = object(value, "theme")?;
    let id = root
        .get("id")
        .map(|v| string(v, "id"))
        .transpose()?
        .unwrap_or("custom")
        .to_string();
    let mode: Mode = match root.get("mode") {
        Some(v) => string(v, "mode")?.parse()?,
        None => default_mode,
    };

    let mut tokens = TokenMap::new();
    for (key, section) in root {
        match key.as_str() {
            "id" | "mode" | "palettes" => {}
            "colors" => tokens.extend(read_palettes(section, "colors")?),
            _ => {
                let category = TokenCategory::from_json_key(key)
                    .ok_or_else(|| invalid(format!("unknown section '{key}'")))?;
                for (token_key, raw) in object(section, key)? {
                    let name = TokenName::lookup(category, token_key)
                        .ok_or_else(|| ThemeError::UnknownToken(format!("{key}.{token_key}")))?;
                    let value = name.parse_value(string(raw, &name.to_string())?)?;
                    tokens.insert(name, value);
                }
            }
        }
    }

    let roles = match root.get("palettes") {
        Some(p) => roles_from(&read_palettes(p, "palettes")?, &id)?,
        None => roles_from(&tokens, &id)?,
    };

    let config = ThemeConfig {
        id,
        mode,
        roles,
        tokens,
    };
    config.ensure_complete()?;
    Ok(config)
}

/// Parse a single-theme JSON export.
pub fn parse_json(text: &str) -> ThemeResult<ThemeConfig> {
    let value: Value = serde_json::from_str(text).map_err(|e| invalid(e.to_string()))?;
    config_from_json(&value, Mode::Light)
}

/// Parse either a single-theme export or a `{ "light", "dark" }` pair.
///
/// Returns `(light, dark)`. A single dark theme comes back as its own
/// `dark` next to a light theme generated from the same palettes; a single
/// light theme has no `dark`. Each half of a pair must carry its own mode.
pub fn parse_json_pair(text: &str) -> ThemeResult<(ThemeConfig, Option<ThemeConfig>)> {
    let value: Value = serde_json::from_str(text).map_err(|e| invalid(e.to_string()))?;
    let root = object(&value, "theme")?;
    match (root.get("light"), root.get("dark")) {
        (Some(light), dark) => {
            let light = config_from_json(light, Mode::Light)?;
            let dark = dark.map(|d| config_from_json(d, Mode::Dark)).transpose()?;
            expect_mode(&light, Mode::Light)?;
            if let Some(dark) = &dark {
                expect_mode(dark, Mode::Dark)?;
            }
            Ok((light, dark))
        }
        (None, Some(_)) => Err(invalid("a dark theme needs a light theme next to it")),
        (None, None) => match config_from_json(&value, Mode::Light)? {
            dark if dark.mode == Mode::Dark => {
                let light = ThemeConfig::generate(dark.id.clone(), dark.roles, Mode::Light);
                Ok((light, Some(dark)))
            }
            light => Ok((light, None)),
        },
    }
}

fn expect_mode(cfg: &ThemeConfig, mode: Mode) -> ThemeResult<()> {
    if cfg.mode == mode {
        Ok(())
    } else {
        Err(invalid(format!("the {mode} half of the pair is a {} theme", cfg.mode)))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
