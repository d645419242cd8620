#![forbid(unsafe_code)]

//! Colors for the energy-flow diagram: hex parsing, linear blending, and the
//! default palette.

pub mod color;
pub mod palette;

pub use color::{ColorError, Rgb, mix, mix_hexes};
pub use palette::{Palette, PaletteParse};
