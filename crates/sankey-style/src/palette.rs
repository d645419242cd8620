//! Diagram palette and its environment overrides.
//!
//! The host normally supplies colors from its own theme. When it does not,
//! [`Palette::default`] matches the stock solar-green / grid-purple scheme,
//! and [`Palette::from_env`] lets a deployment override either color.

use std::env;

use crate::color::{ColorError, Rgb};

/// Environment variable overriding the generation (solar) color.
pub const ENV_SOLAR_COLOR: &str = "ELEC_SANKEY_SOLAR_COLOR";
/// Environment variable overriding the grid-import color.
pub const ENV_GRID_COLOR: &str = "ELEC_SANKEY_GRID_COLOR";

/// Colors used by the layout engine and renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Generation bands and the generation side of the blend zone.
    pub generation: Rgb,
    /// Grid-import band and the grid side of the blend zone.
    pub grid_in: Rgb,
    /// Background of the rule overlay icon.
    pub rule_icon: Rgb,
    /// Debug-point markers.
    pub debug_point: Rgb,
}

impl Palette {
    pub const DEFAULT_GENERATION: Rgb = Rgb::new(0x0d, 0x6a, 0x04);
    pub const DEFAULT_GRID_IN: Rgb = Rgb::new(0x92, 0x0e, 0x83);

    /// Replace the generation color.
    #[must_use]
    pub fn with_generation(mut self, color: Rgb) -> Self {
        self.generation = color;
        self
    }

    /// Replace the grid-import color.
    #[must_use]
    pub fn with_grid_in(mut self, color: Rgb) -> Self {
        self.grid_in = color;
        self
    }

    /// Default palette with environment overrides applied; invalid values are
    /// ignored (see [`Palette::from_env_with_diagnostics`]).
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with_diagnostics().palette
    }

    /// Default palette with environment overrides, plus parse errors.
    #[must_use]
    pub fn from_env_with_diagnostics() -> PaletteParse {
        from_env_with(|key| env::var(key).ok())
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            generation: Self::DEFAULT_GENERATION,
            grid_in: Self::DEFAULT_GRID_IN,
            rule_icon: Rgb::new(0x4b, 0x06, 0x7c),
            debug_point: Rgb::new(0x22, 0xdd, 0xdd),
        }
    }
}

/// Palette plus any overrides that failed to parse.
#[derive(Debug, Clone)]
pub struct PaletteParse {
    pub palette: Palette,
    /// `(variable, error)` for each rejected override.
    pub errors: Vec<(&'static str, ColorError)>,
}

fn from_env_with<F>(mut get: F) -> PaletteParse
where
    F: FnMut(&str) -> Option<String>,
{
    let mut palette = Palette::default();
    let mut errors = Vec::new();

    if let Some(color) = read_override(&mut get, ENV_SOLAR_COLOR, &mut errors) {
        palette.generation = color;
    }
    if let Some(color) = read_override(&mut get, ENV_GRID_COLOR, &mut errors) {
        palette.grid_in = color;
    }

    PaletteParse { palette, errors }
}

fn read_override<F>(
    get: &mut F,
    key: &'static str,
    errors: &mut Vec<(&'static str, ColorError)>,
) -> Option<Rgb>
where
    F: FnMut(&str) -> Option<String>,
{
    let value = get(key)?;
    match Rgb::from_hex(&value) {
        Ok(color) => Some(color),
        Err(err) => {
            sankey_core::warn!(
                code = sankey_core::logging::Diagnostic::InvalidPaletteOverride.code(),
                variable = key,
                value = %value,
                "ignoring invalid palette override"
            );
            errors.push((key, err));
            None
        }
    }
}
