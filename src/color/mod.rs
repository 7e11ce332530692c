//! Color model: HSL math over packed ARGB values plus the two palette
//! algorithms that assign per-node color pairs.
//!
//! Palettes are pure functions of node index and scalar inputs; the runtime
//! maps them over the graph.

mod core;
pub mod palette;

pub use self::core::{Argb, ColorPair, DEFAULT_COLOR, Hcl, argb_to_hex, brighten, pack_argb, unpack_argb};
pub use palette::{EntropySignal, GOLDEN_ANGLE, PaletteSettings, Trit, entropy_hcl, entropy_pair, spiral_hcl, spiral_pair};
