//! Fixed layout tunables.
//!
//! All distances are in diagram units (SVG user units / CSS pixels). None of
//! these are runtime-configurable; the layout is deterministic for a given set
//! of routes.

/// Length of the straight terminator block under each generation source.
pub const TERMINATOR_BLOCK_LENGTH: f64 = 50.0;
/// Horizontal gap between neighbouring generation sources at the top.
pub const GENERATION_FAN_OUT_HORIZONTAL_GAP: f64 = 50.0;
/// Vertical gap between neighbouring consumer bands at the right.
pub const CONSUMERS_FAN_OUT_VERTICAL_GAP: f64 = 50.0;
/// Horizontal run of the consumer fan-out.
pub const CONSUMERS_FAN_OUT_HORIZONTAL_SPAN: f64 = 200.0;
/// Width reserved for each consumer label.
pub const CONSUMERS_LABEL_WIDTH: f64 = 180.0;

/// Width the widest trunk is scaled to.
pub const TARGET_SCALED_TRUNK_WIDTH: f64 = 150.0;
/// Inner radius added to a branch width where the generation trunk turns.
pub const TRUNK_TURN_RADIUS: f64 = 50.0;

/// Length of the gradient where grid import and generation merge.
pub const BLEND_LENGTH: f64 = 100.0;
/// Solid blended run between the gradient and the consumer fan-out.
pub const BLEND_LENGTH_PRE_FAN_OUT: f64 = 30.0;

pub const ARROW_HEAD_LENGTH: f64 = 10.0;
pub const TEXT_PADDING: f64 = 8.0;
pub const FONT_SIZE_PX: f64 = 16.0;
pub const ICON_SIZE_PX: f64 = 24.0;

/// Centre of the generation fan-out.
pub const PV_ORIGIN_X: f64 = 500.0;
/// Top of the generation terminators; room for one icon and one text line above.
pub const PV_ORIGIN_Y: f64 = TEXT_PADDING * 2.0 + FONT_SIZE_PX + ICON_SIZE_PX;
/// Left edge of the grid import and export bands.
pub const GRID_ORIGIN_X: f64 = 80.0;

/// Overlap between adjoining shapes so antialiasing leaves no hairline seam.
pub const PAD_ANTIALIAS: f64 = 0.5;

/// Side of the rule overlay icon.
pub const RULE_ICON_SIZE: f64 = 30.0;

/// Icon hint attached to the grid import label.
pub const ICON_TRANSMISSION_TOWER: &str = "mdi:transmission-tower";
/// Icon hint for generation sources created from card configuration.
pub const ICON_SOLAR_POWER: &str = "mdi:solar-power";

/// Display unit used when the host does not set one.
pub const DEFAULT_UNIT: &str = "kWh";
