//! # ax-theme: Theme Token Generation & Export Engine
//!
//! Turns one seed color into a complete design-token theme for both light
//! and dark mode, and writes it out as CSS custom properties, SCSS
//! variables, JSON or a Tailwind config extension.
//!
//! # Architecture
//!
//! ```text
//! seed color (ax_color::Color)
//!     │
//!     ▼
//! palette.rs:  ten-step tonal ramp (50..900, seed at 500)
//!     │
//!     ▼
//! roles.rs:    six palettes (primary/secondary/tertiary/error/neutral/nv)
//!     │
//!     ▼
//! semantic.rs: binding table → named color tokens (light or dark steps)
//!     │
//!     ▼
//! config.rs:   ThemeConfig = mapped colors + scale tokens + overrides
//!     │
//!     ├──► dark.rs:     same RoleSet, dark steps
//!     ├──► contrast.rs: WCAG audit of text/background pairings
//!     ▼
//! export.rs:   css / scss / json / tailwind text
//! ```
//!
//! `store.rs` wraps the pipeline in a single mutable [`ThemeStore`] with a
//! preset registry (`preset.rs`, `builtin.rs`) and persistence through a
//! [`KeyValueStore`] (`storage.rs`).
//!
//! # Color Space
//!
//! Tonal math happens in HSL. Colors are stored as exact 8-bit sRGB, so a
//! seed typed by a user is reproduced byte-for-byte at the 500 step of every
//! export.

// Single-char math variables are standard in color science.
#![allow(clippy::many_single_char_names)]
// Token tables have one row per token.
#![allow(clippy::too_many_lines)]
// Errors carry the user's input; documenting every variant twice adds noise.
#![allow(clippy::missing_errors_doc)]

pub mod builtin;
pub mod config;
pub mod contrast;
pub mod dark;
pub mod error;
pub mod export;
pub mod palette;
pub mod preset;
pub mod roles;
pub mod semantic;
pub mod storage;
pub mod store;
pub mod token;

pub use ax_color::Color;
pub use config::{Mode, OverrideScope, ThemeConfig, ThemeOverride};
pub use error::{ThemeError, ThemeResult};
pub use export::{ExportFormat, ExportMode, ExportOptions, SelectorStrategy, ThemeExporter};
pub use palette::{TonalPalette, ToneStep};
pub use preset::{Preset, PresetRegistry};
pub use roles::{Role, RoleSeeds, RoleSet};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use store::{StyleSink, ThemeStore};
pub use token::{TokenCategory, TokenMap, TokenName, TokenValue};
