//! Tonal palette generation: one seed color, ten tone steps.
//!
//! The seed lives at step 500 unchanged. Lighter steps close a fixed
//! fraction of the remaining distance to white, darker steps a fixed
//! fraction of the distance to black. The fractions are not linear: they
//! bunch up near the ends so the extreme steps stay distinguishable from
//! pure white and pure black.
//!
//! ```text
//!   50  100  200  300  400  [500]  600  700  800  900
//!   ◄──── toward white ────  seed  ──── toward black ────►
//! ```
//!
//! Hue never changes across a palette. Saturation is scaled down slightly at
//! the outer steps so near-white and near-black tones do not glow.

use std::fmt;
use std::str::FromStr;

use ax_color::{Color, Hsl};
use serde::{Deserialize, Serialize};

use crate::error::{ThemeError, ThemeResult};

// ---------------------------------------------------------------------------
// Tone steps
// ---------------------------------------------------------------------------

/// One of the ten tone steps of a [`TonalPalette`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum ToneStep {
    S50,
    S100,
    S200,
    S300,
    S400,
    S500,
    S600,
    S700,
    S800,
    S900,
}

impl ToneStep {
    /// All steps, lightest first.
    pub const ALL: [Self; 10] = [
        Self::S50,
        Self::S100,
        Self::S200,
        Self::S300,
        Self::S400,
        Self::S500,
        Self::S600,
        Self::S700,
        Self::S800,
        Self::S900,
    ];

    /// Numeric label of the step (`50`, `100`, … `900`).
    #[must_use]
    pub const fn value(self) -> u16 {
        match self {
            Self::S50 => 50,
            Self::S100 => 100,
            Self::S200 => 200,
            Self::S300 => 300,
            Self::S400 => 400,
            Self::S500 => 500,
            Self::S600 => 600,
            Self::S700 => 700,
            Self::S800 => 800,
            Self::S900 => 900,
        }
    }

    #[must_use]
    pub const fn from_value(value: u16) -> Option<Self> {
        Some(match value {
            50 => Self::S50,
            100 => Self::S100,
            200 => Self::S200,
            300 => Self::S300,
            400 => Self::S400,
            500 => Self::S500,
            600 => Self::S600,
            700 => Self::S700,
            800 => Self::S800,
            900 => Self::S900,
            _ => return None,
        })
    }

    /// Position in [`ToneStep::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ToneStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

impl FromStr for ToneStep {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u16>()
            .ok()
            .and_then(Self::from_value)
            .ok_or_else(|| ThemeError::UnknownToken(s.to_string()))
    }
}

impl TryFrom<u16> for ToneStep {
    type Error = String;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::from_value(value).ok_or_else(|| format!("{value} is not a tone step"))
    }
}

impl From<ToneStep> for u16 {
    fn from(step: ToneStep) -> Self {
        step.value()
    }
}

// ---------------------------------------------------------------------------
// Lightness curve
// ---------------------------------------------------------------------------

/// Seed lightness is clamped into this range before the curve is applied,
/// so black and white seeds still produce ten distinct tones.
pub const SEED_LIGHTNESS_RANGE: (f32, f32) = (0.05, 0.95);

/// How a step moves away from the seed.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Direction {
    TowardWhite,
    Seed,
    TowardBlack,
}

/// (direction, fraction of remaining distance, saturation scale), indexed by
/// [`ToneStep::index`].
const CURVE: [(Direction, f32, f32); 10] = [
    (Direction::TowardWhite, 0.92, 0.85),
    (Direction::TowardWhite, 0.84, 0.92),
    (Direction::TowardWhite, 0.68, 1.00),
    (Direction::TowardWhite, 0.50, 1.00),
    (Direction::TowardWhite, 0.26, 1.00),
    (Direction::Seed, 0.0, 1.00),
    (Direction::TowardBlack, 0.18, 1.00),
    (Direction::TowardBlack, 0.38, 1.00),
    (Direction::TowardBlack, 0.56, 0.95),
    (Direction::TowardBlack, 0.72, 0.90),
];

fn tone_for(seed: Color, hsl: Hsl, step: ToneStep) -> Color {
    let (direction, fraction, sat_scale) = CURVE[step.index()];
    let (min_l, max_l) = SEED_LIGHTNESS_RANGE;
    let l0 = hsl.l.clamp(min_l, max_l);

    let l = match direction {
        Direction::Seed => return seed,
        Direction::TowardWhite => (1.0 - l0).mul_add(fraction, l0),
        Direction::TowardBlack => l0 * (1.0 - fraction),
    };

    Color::from_hsl(Hsl::new(hsl.h, hsl.s * sat_scale, l))
}

// ---------------------------------------------------------------------------
// TonalPalette
// ---------------------------------------------------------------------------

/// Exactly one color per [`ToneStep`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TonalPalette {
    tones: [Color; 10],
}

impl TonalPalette {
    /// Run the tone curve on `seed`. Deterministic; step 500 is `seed`.
    #[must_use]
    pub fn generate(seed: Color) -> Self {
        let hsl = seed.to_hsl();
        let tones = ToneStep::ALL.map(|step| tone_for(seed, hsl, step));
        Self { tones }
    }

    /// Parse `input` as a color and generate its palette.
    pub fn from_seed_str(input: &str) -> ThemeResult<Self> {
        let seed = Color::parse(input).map_err(|e| ThemeError::invalid_color(input, &e))?;
        Ok(Self::generate(seed))
    }

    /// Build a palette from explicit tones, lightest first.
    #[must_use]
    pub const fn from_tones(tones: [Color; 10]) -> Self {
        Self { tones }
    }

    #[must_use]
    pub const fn tone(&self, step: ToneStep) -> Color {
        self.tones[step.index()]
    }

    /// The 500 tone.
    #[must_use]
    pub const fn seed(&self) -> Color {
        self.tones[ToneStep::S500.index()]
    }

    /// Steps and colors, lightest first.
    pub fn iter(&self) -> impl Iterator<Item = (ToneStep, Color)> + '_ {
        ToneStep::ALL.iter().map(|&step| (step, self.tone(step)))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use ax_color::color::hue_diff;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    const PURPLE: Color = Color::rgb(0x67, 0x50, 0xA4);

    #[test]
    fn seed_is_exact_at_500() {
        let p = TonalPalette::generate(PURPLE);
        assert_eq!(p.tone(ToneStep::S500), PURPLE);
        assert_eq!(p.seed(), PURPLE);
    }

    #[test]
    fn lightness_decreases_through_the_ramp() {
        let p = TonalPalette::generate(PURPLE);
        let ls: Vec<f32> = p.iter().map(|(_, c)| c.lightness()).collect();
        for pair in ls.windows(2) {
            assert!(pair[0] > pair[1], "ramp not descending: {ls:?}");
        }
    }

    #[test]
    fn hue_is_held() {
        let p = TonalPalette::generate(PURPLE);
        for step in [ToneStep::S300, ToneStep::S400, ToneStep::S600, ToneStep::S700] {
            let d = hue_diff(p.tone(step).hue(), PURPLE.hue());
            assert!(d < 2.5, "step {step} drifted {d}°");
        }
    }

    #[test]
    fn gray_seed_gives_gray_ramp() {
        let p = TonalPalette::generate(Color::rgb(128, 128, 128));
        assert!(p.iter().all(|(_, c)| c.is_achromatic()));
    }

    #[test]
    fn extreme_seeds_give_distinct_tones() {
        for seed in [Color::WHITE, Color::BLACK] {
            let p = TonalPalette::generate(seed);
            let mut tones: Vec<Color> = p.iter().map(|(_, c)| c).collect();
            tones.sort_by_key(|c| (c.r, c.g, c.b));
            tones.dedup();
            assert_eq!(tones.len(), 10, "duplicate tones for {seed}");
        }
    }

    #[test]
    fn from_seed_str_rejects_garbage() {
        assert!(matches!(
            TonalPalette::from_seed_str("not-a-color"),
            Err(ThemeError::InvalidColor { .. })
        ));
        assert_eq!(TonalPalette::from_seed_str("#6750a4").unwrap().seed(), PURPLE);
    }

    #[test]
    fn step_values_roundtrip() {
        for step in ToneStep::ALL {
            assert_eq!(ToneStep::from_value(step.value()), Some(step));
            assert_eq!(step.to_string().parse::<ToneStep>().unwrap(), step);
        }
        assert_eq!(ToneStep::from_value(150), None);
    }

    proptest! {
        #[test]
        fn every_seed_is_reproduced(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
            let seed = Color::rgb(r, g, b);
            prop_assert_eq!(TonalPalette::generate(seed).tone(ToneStep::S500), seed);
        }

        #[test]
        fn outer_steps_bracket_the_seed(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
            let p = TonalPalette::generate(Color::rgb(r, g, b));
            prop_assert!(p.tone(ToneStep::S50).lightness() > p.tone(ToneStep::S400).lightness());
            prop_assert!(p.tone(ToneStep::S600).lightness() > p.tone(ToneStep::S900).lightness());
        }
    }
}
