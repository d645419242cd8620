//! RGB colors, hex conversion, and linear blending.

use std::fmt;
use std::str::FromStr;

/// RGB color (opaque).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red channel (0–255).
    pub r: u8,
    /// Green channel (0–255).
    pub g: u8,
    /// Blue channel (0–255).
    pub b: u8,
}

impl Rgb {
    /// Create a new RGB color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (the leading `#` is optional, digits are case-insensitive).
    pub fn from_hex(input: &str) -> Result<Self, ColorError> {
        let invalid = || ColorError::InvalidHex {
            input: input.to_string(),
        };
        let digits = input.trim().strip_prefix('#').unwrap_or(input.trim());
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Lowercase `#rrggbb`.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

/// Color contract violations.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorError {
    /// Not a six-digit hex color.
    InvalidHex { input: String },
    /// Blend ratio outside `[0, 1]` (or NaN).
    RatioOutOfRange(f64),
}

impl fmt::Display for ColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidHex { input } => write!(f, "invalid hex color: {input:?}"),
            Self::RatioOutOfRange(ratio) => write!(f, "invalid blend ratio: {ratio}"),
        }
    }
}

impl std::error::Error for ColorError {}

/// Blend `a` and `b` channel-wise: `ratio` 1 gives `a`, 0 gives `b`.
///
/// Channels are rounded to the nearest integer. `ratio` must lie in `[0, 1]`;
/// anything else is a caller bug and is rejected.
pub fn mix(a: Rgb, b: Rgb, ratio: f64) -> Result<Rgb, ColorError> {
    if !(0.0..=1.0).contains(&ratio) {
        return Err(ColorError::RatioOutOfRange(ratio));
    }
    let channel = |ca: u8, cb: u8| -> u8 {
        let v = (f64::from(ca) * ratio + f64::from(cb) * (1.0 - ratio)).round();
        v.clamp(0.0, 255.0) as u8
    };
    Ok(Rgb::new(
        channel(a.r, b.r),
        channel(a.g, b.g),
        channel(a.b, b.b),
    ))
}

/// [`mix`] on hex strings, returning lowercase `#rrggbb`.
pub fn mix_hexes(a: &str, b: &str, ratio: f64) -> Result<String, ColorError> {
    let a = Rgb::from_hex(a)?;
    let b = Rgb::from_hex(b)?;
    mix(a, b, ratio).map(Rgb::to_hex)
}
