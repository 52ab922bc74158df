// SPDX-License-Identifier: MIT
//
// ax-theme: command-line front end for the theme token engine.
//
// The binary wires the library crates to a terminal:
//
//   ax-color → color parsing and formatting
//   ax-theme → palettes, roles, tokens, dark mode, export, theme store
//
// Read-only commands (palette, roles, export --seed) never touch the saved
// state. Everything else goes through a ThemeStore backed by a FileStore in
// the state directory and persists after a successful mutation:
//
//   args → Settings (TOML) → ThemeStore::load → command → persist → stdout

mod settings;

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context as _, bail};
use clap::{ArgAction, Args, Parser, Subcommand};
use log::LevelFilter;

use ax_color::Color;
use ax_theme::contrast::ContrastCheck;
use ax_theme::{
    ExportFormat, ExportMode, ExportOptions, FileStore, KeyValueStore, MemoryStore, Mode,
    OverrideScope, RoleSeeds, RoleSet, ThemeStore, TonalPalette,
};

use settings::Settings;

// ─── Command line ───────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "ax-theme", version)]
#[command(about = "Generate design-token themes from a seed color", long_about = None)]
struct Cli {
    /// Settings file [default: <config dir>/ax-theme/config.toml]
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the ten-step tonal palette of a seed
    Palette { seed: String },
    /// Print the six role palettes derived from a primary seed
    Roles {
        seed: String,
        #[command(flatten)]
        roles: RoleSeedArgs,
    },
    /// Print every token of the current theme
    Tokens {
        #[arg(long, default_value = "light")]
        mode: Mode,
    },
    /// Export the current theme, or a seed/preset without saving it
    Export {
        #[arg(long, conflicts_with = "preset")]
        seed: Option<String>,
        #[arg(long)]
        preset: Option<String>,
        #[command(flatten)]
        roles: RoleSeedArgs,
        /// css, scss, json or tailwind
        #[arg(short, long, default_value = "css")]
        format: ExportFormat,
        /// light, dark or both
        #[arg(short, long, default_value = "both")]
        mode: ExportMode,
        /// Write to a file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Make a seed color the current theme
    Apply {
        seed: String,
        #[command(flatten)]
        roles: RoleSeedArgs,
    },
    /// Manage presets
    Preset {
        #[command(subcommand)]
        command: PresetCommand,
    },
    /// Set one token of the current theme
    Override {
        token: String,
        value: String,
        /// light, dark or both
        #[arg(long, default_value = "light")]
        scope: OverrideScope,
    },
    /// Drop all token overrides, keeping the seed
    ClearOverrides,
    /// Go back to the default preset
    Reset,
    /// Report text/background contrast ratios
    Check {
        /// Only check one mode
        #[arg(long)]
        mode: Option<Mode>,
    },
    /// Replace the current theme with a JSON export
    Import { file: PathBuf },
    /// Print the custom properties a page would receive
    Document {
        #[arg(long, default_value = "light")]
        mode: Mode,
    },
}

#[derive(Subcommand)]
enum PresetCommand {
    /// List builtin and saved presets
    List,
    /// Make a preset the current theme
    Apply { id: String },
    /// Save the current theme as a preset
    Save {
        id: String,
        /// Display name [default: the id]
        #[arg(long)]
        name: Option<String>,
    },
    /// Delete a saved preset
    Delete { id: String },
    /// Change the display name of a saved preset
    Rename { id: String, name: String },
    /// Copy a preset under a new id
    Duplicate { id: String },
}

/// Seeds for the roles that otherwise derive from the primary seed.
#[derive(Args, Debug, Default, PartialEq, Eq)]
struct RoleSeedArgs {
    /// Secondary seed [default: primary hue + 30°]
    #[arg(long, value_name = "COLOR", requires = "seed")]
    secondary: Option<String>,
    /// Tertiary seed [default: primary hue + 60°]
    #[arg(long, value_name = "COLOR", requires = "seed")]
    tertiary: Option<String>,
    /// Error seed [default: #B3261E]
    #[arg(long, value_name = "COLOR", requires = "seed")]
    error: Option<String>,
}

impl RoleSeedArgs {
    fn seeds(&self, primary: &str) -> anyhow::Result<RoleSeeds> {
        let optional = |input: &Option<String>| input.as_deref().map(parse_seed).transpose();
        Ok(RoleSeeds {
            primary: parse_seed(primary)?,
            secondary: optional(&self.secondary)?,
            tertiary: optional(&self.tertiary)?,
            error: optional(&self.error)?,
        })
    }
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match Settings::load(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("ax-theme: {err:#}");
            return ExitCode::FAILURE;
        }
    };
    init_logging(cli.verbose, &settings);

    match run(cli.command, &settings) {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("ax-theme: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Filter precedence, lowest first: `warn`, settings file, `RUST_LOG`, `-v`.
fn init_logging(verbose: u8, settings: &Settings) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(LevelFilter::Warn);
    if let Some(filters) = &settings.log_level {
        builder.parse_filters(filters);
    }
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    if let Some(level) = verbosity(verbose) {
        builder.filter_level(level);
    }
    builder.format_timestamp(None).init();
}

const fn verbosity(count: u8) -> Option<LevelFilter> {
    match count {
        0 => None,
        1 => Some(LevelFilter::Info),
        2 => Some(LevelFilter::Debug),
        _ => Some(LevelFilter::Trace),
    }
}

/// Run one command and return what it prints.
fn run(command: Command, settings: &Settings) -> anyhow::Result<String> {
    let options = settings.export_options();

    match command {
        Command::Palette { seed } => {
            let palette = TonalPalette::from_seed_str(&seed)?;
            Ok(render_palette(&palette))
        }
        Command::Roles { seed, roles } => Ok(render_roles(&RoleSet::derive(&roles.seeds(&seed)?))),
        Command::Export {
            seed,
            preset,
            roles,
            format,
            mode,
            out,
        } => {
            let text = if seed.is_some() || preset.is_some() {
                let mut scratch = ThemeStore::with_options(MemoryStore::new(), options);
                if let Some(seed) = seed {
                    scratch.apply_seeds(roles.seeds(&seed)?);
                }
                if let Some(id) = preset {
                    scratch.apply_preset(&id)?;
                }
                scratch.export_current(format, mode)?
            } else {
                open_store(settings, options).export_current(format, mode)?
            };
            write_output(&text, out.as_deref())
        }
        command => {
            let mut store = open_store(settings, options);
            let (output, changed) = run_stateful(command, &mut store)?;
            if changed {
                let dir = store.storage().dir().display().to_string();
                store
                    .persist()
                    .with_context(|| format!("saving theme state in {dir}"))?;
            }
            Ok(output)
        }
    }
}

fn open_store(settings: &Settings, options: ExportOptions) -> ThemeStore<FileStore> {
    let dir = settings.state_dir();
    log::debug!("theme state in {}", dir.display());
    ThemeStore::load_with_options(FileStore::new(dir), options)
}

/// Commands that read or mutate the saved theme. Returns the output and
/// whether the store changed.
fn run_stateful<S: KeyValueStore>(
    command: Command,
    store: &mut ThemeStore<S>,
) -> anyhow::Result<(String, bool)> {
    let before = store.version();

    let output = match command {
        Command::Tokens { mode } => render_tokens(store, mode),
        Command::Apply { seed, roles } => {
            store.apply_seeds(roles.seeds(&seed)?);
            format!("applied seed {}\n", store.seed())
        }
        Command::Preset { command } => run_preset(command, store)?,
        Command::Override { token, value, scope } => {
            let token = store.set_override(&token, &value, scope)?;
            format!("{token} = {value} ({scope:?})\n")
        }
        Command::ClearOverrides => {
            store.clear_overrides();
            format!("cleared overrides on '{}'\n", store.current_theme_id())
        }
        Command::Reset => {
            store.reset();
            format!("reset to '{}'\n", store.current_theme_id())
        }
        Command::Check { mode } => {
            let modes = mode.map_or_else(|| vec![Mode::Light, Mode::Dark], |m| vec![m]);
            let mut out = String::new();
            let mut failed = 0;
            for mode in modes {
                let checks = store.contrast_report(mode);
                failed += checks.iter().filter(|c| !c.passes()).count();
                out.push_str(&render_checks(mode, &checks));
            }
            if failed > 0 {
                bail!("{out}{failed} pairing(s) below the minimum text contrast");
            }
            out
        }
        Command::Import { file } => {
            let text = fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            store.import_json(&text)?;
            format!("imported {} (seed {})\n", file.display(), store.seed())
        }
        Command::Document { mode } => {
            let mut sink = BTreeMap::new();
            store.apply_to_document(&mut sink, mode);
            render_document(&sink)
        }
        Command::Palette { .. } | Command::Roles { .. } | Command::Export { .. } => {
            bail!("command does not use the saved theme")
        }
    };

    Ok((output, store.version() != before))
}

fn run_preset<S: KeyValueStore>(
    command: PresetCommand,
    store: &mut ThemeStore<S>,
) -> anyhow::Result<String> {
    Ok(match command {
        PresetCommand::List => render_presets(store),
        PresetCommand::Apply { id } => {
            store.apply_preset(&id)?;
            format!("applied preset '{id}'\n")
        }
        PresetCommand::Save { id, name } => {
            let name = name.unwrap_or_else(|| id.clone());
            store.save_preset(&id, &name)?;
            format!("saved preset '{id}'\n")
        }
        PresetCommand::Delete { id } => {
            store.delete_preset(&id)?;
            format!("deleted preset '{id}'\n")
        }
        PresetCommand::Rename { id, name } => {
            store.rename_preset(&id, &name)?;
            format!("renamed preset '{id}' to \"{name}\"\n")
        }
        PresetCommand::Duplicate { id } => {
            let copy = store.duplicate_preset(&id)?;
            format!("duplicated preset '{id}' as '{copy}'\n")
        }
    })
}

fn parse_seed(input: &str) -> anyhow::Result<Color> {
    Color::parse(input).with_context(|| format!("invalid seed color '{input}'"))
}

fn write_output(text: &str, out: Option<&Path>) -> anyhow::Result<String> {
    match out {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
            log::info!("wrote {}", path.display());
            Ok(String::new())
        }
        None => Ok(text.to_string()),
    }
}

// ─── Rendering ──────────────────────────────────────────────────────────────

fn render_palette(palette: &TonalPalette) -> String {
    let mut out = String::new();
    for (step, color) in palette.iter() {
        let _ = writeln!(out, "{:>4}  {color}", step.value());
    }
    out
}

fn render_roles(roles: &RoleSet) -> String {
    let mut out = String::new();
    for (role, palette) in roles.iter() {
        let _ = write!(out, "{:<16}", role.name());
        for (_, color) in palette.iter() {
            let _ = write!(out, " {color}");
        }
        out.push('\n');
    }
    out
}

fn render_tokens<S: KeyValueStore>(store: &ThemeStore<S>, mode: Mode) -> String {
    let mut out = String::new();
    for (name, value) in store.config(mode).ordered() {
        let _ = writeln!(out, "{name} = {value}");
    }
    out
}

fn render_presets<S: KeyValueStore>(store: &ThemeStore<S>) -> String {
    let presets = store.presets();
    let mut out = String::new();
    for preset in presets.iter() {
        let marker = if preset.id == store.current_theme_id() { '*' } else { ' ' };
        let kind = if presets.is_builtin(&preset.id) { "builtin" } else { "saved" };
        let _ = writeln!(
            out,
            "{marker} {:<20} {:<20} {}  {kind}",
            preset.id,
            preset.name,
            preset.seed()
        );
    }
    if presets.get(store.current_theme_id()).is_none() {
        let _ = writeln!(
            out,
            "* {:<20} {:<20} {}",
            store.current_theme_id(),
            "(unsaved)",
            store.seed()
        );
    }
    out
}

fn render_checks(mode: Mode, checks: &[ContrastCheck]) -> String {
    let mut out = format!("{}\n", mode.label());
    for check in checks {
        let _ = writeln!(
            out,
            "  {:<22} on {:<22} {:>5.2}  {}",
            check.foreground.to_string(),
            check.background.to_string(),
            check.ratio,
            check.level
        );
    }
    out
}

fn render_document(properties: &BTreeMap<String, String>) -> String {
    let mut out = String::new();
    for (name, value) in properties {
        let _ = writeln!(out, "{name}: {value};");
    }
    out
}

// ─── Tests ──────────────────────────────────────────────────────────────────
