//! Built-in presets: ready-to-use brand seeds.
//!
//! Each preset is just a primary seed. Everything else comes out of the
//! pipeline, so every preset gets the same token schema and contrast
//! guarantees as a custom seed.

use ax_color::Color;

use crate::preset::Preset;

/// Preset applied on first run and by `reset`.
pub const DEFAULT_PRESET_ID: &str = "aegisx";

/// Seed of the default preset.
pub const DEFAULT_SEED: Color = Color::rgb(0x63, 0x66, 0xF1);

type Row = (&'static str, &'static str, Color);

const DEFAULT_ROW: Row = (DEFAULT_PRESET_ID, "AegisX", DEFAULT_SEED);

/// (id, display name, seed)
const BUILTINS: &[Row] = &[
    DEFAULT_ROW,
    ("material-indigo", "Material Indigo", Color::rgb(0x3F, 0x51, 0xB5)),
    ("material-purple", "Material Purple", Color::rgb(0x67, 0x3A, 0xB7)),
    ("tailwind-blue", "Tailwind Blue", Color::rgb(0x3B, 0x82, 0xF6)),
    ("tailwind-violet", "Tailwind Violet", Color::rgb(0x8B, 0x5C, 0xF6)),
    ("bootstrap-primary", "Bootstrap Primary", Color::rgb(0x0D, 0x6E, 0xFD)),
    ("verus", "Verus Teal", Color::rgb(0x14, 0xB8, 0xA6)),
    ("rose", "Rose Pink", Color::rgb(0xF4, 0x3F, 0x5E)),
    ("emerald", "Emerald Green", Color::rgb(0x10, 0xB9, 0x81)),
    ("amber", "Amber Orange", Color::rgb(0xF5, 0x9E, 0x0B)),
    ("slate", "Slate Gray", Color::rgb(0x64, 0x74, 0x8B)),
];

fn preset_from(&(id, name, seed): &Row) -> Preset {
    Preset::new(id, name, seed)
}

/// All builtin presets, in display order.
#[must_use]
pub fn builtin_presets() -> Vec<Preset> {
    BUILTINS.iter().map(preset_from).collect()
}

/// The preset applied on first run and by `reset`.
#[must_use]
pub fn default_preset() -> Preset {
    preset_from(&DEFAULT_ROW)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
