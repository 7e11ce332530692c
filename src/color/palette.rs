//! Palette algorithms.
//!
//! Spiral mode spreads hues by the golden angle over node order. Entropy mode
//! derives hue, chroma and lightness from four brainwave scalars and still
//! spreads nodes by the golden angle so panes stay distinguishable.

use super::core::{ColorPair, Hcl};

/// `360 × (1 − 1/φ)` degrees.
pub const GOLDEN_ANGLE: f64 = 137.507_764_050_037_85;

const TRIT_HUE_SHIFT: f64 = 20.0;

/// Fixed parameters shared by both palette modes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaletteSettings {
    pub spiral_chroma: f64,
    pub spiral_lightness: f64,
    /// Background lightness as a fraction of the foreground's.
    pub bg_lightness_scale: f64,
}

impl Default for PaletteSettings {
    fn default() -> Self {
        Self {
            spiral_chroma: 0.6,
            spiral_lightness: 0.5,
            bg_lightness_scale: 0.3,
        }
    }
}

impl PaletteSettings {
    fn pair(&self, fg: Hcl) -> ColorPair {
        let bg = fg.with_lightness(fg.lightness * self.bg_lightness_scale);
        ColorPair {
            fg: fg.to_argb(),
            bg: bg.to_argb(),
        }
    }
}

/// Three-valued symmetry signal biasing hue warmer or cooler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Trit {
    Minus,
    #[default]
    Zero,
    Plus,
}

impl Trit {
    /// Values other than -1 and +1 read as neutral.
    pub fn from_i32(value: i32) -> Self {
        match value {
            1 => Trit::Plus,
            -1 => Trit::Minus,
            _ => Trit::Zero,
        }
    }

    pub fn hue_shift(self) -> f64 {
        match self {
            Trit::Plus => TRIT_HUE_SHIFT,
            Trit::Zero => 0.0,
            Trit::Minus => -TRIT_HUE_SHIFT,
        }
    }
}

/// Scalars driving entropy mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntropySignal {
    /// Integrated information Φ, typically 0..50.
    pub phi: f64,
    /// Typically -10..0.
    pub valence: f64,
    /// Mean Fisher-Rao distance, typically 0..5.
    pub fisher: f64,
    pub trit: Trit,
}

impl EntropySignal {
    pub fn new(phi: f64, valence: f64, fisher: f64, trit: Trit) -> Self {
        Self {
            phi,
            valence,
            fisher,
            trit,
        }
    }

    pub fn chroma(&self) -> f64 {
        0.3 + 0.6 * sigmoid(self.valence + 3.0)
    }

    pub fn lightness(&self) -> f64 {
        0.3 + 0.4 * sigmoid(self.fisher - 1.0)
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn spread(index: usize) -> f64 {
    index as f64 * GOLDEN_ANGLE
}

pub fn spiral_hcl(index: usize, settings: &PaletteSettings) -> Hcl {
    Hcl::new(
        spread(index).rem_euclid(360.0),
        settings.spiral_chroma,
        settings.spiral_lightness,
    )
}

pub fn spiral_pair(index: usize, settings: &PaletteSettings) -> ColorPair {
    settings.pair(spiral_hcl(index, settings))
}

pub fn entropy_hcl(index: usize, signal: &EntropySignal) -> Hcl {
    let base = (signal.phi * GOLDEN_ANGLE + spread(index)).rem_euclid(360.0);
    let hue = (base + signal.trit.hue_shift()).rem_euclid(360.0);
    Hcl::new(hue, signal.chroma(), signal.lightness())
}

pub fn entropy_pair(index: usize, signal: &EntropySignal, settings: &PaletteSettings) -> ColorPair {
    settings.pair(entropy_hcl(index, signal))
}
