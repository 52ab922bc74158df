// SPDX-License-Identifier: MIT
//
// ax-color: the color value type underneath the ax-theme engine.
//
// Colors are stored exactly as 8-bit sRGB so a seed entered by a user is
// reproduced byte-for-byte in every export. All tonal math happens in HSL,
// derived on demand, and WCAG luminance math uses the sRGB gamma helpers.

pub mod color;

pub use color::{Color, Hsl, ParseColorError};
