#![forbid(unsafe_code)]

//! Energy-flow diagram public facade.
//!
//! Re-exports the diagram model, layout, palette, and (behind features) the
//! SVG renderer and card glue, with a prelude for day-to-day use.
//!
//! ```
//! use elec_sankey::prelude::*;
//!
//! let mut diagram = SankeyDiagram::new().with_unit("W");
//! diagram.set_grid_in(Route::new("sensor.grid", 5.0));
//! diagram.add_or_update_generation(Route::new("sensor.pv", 5.0));
//! diagram.add_or_update_consumer(Route::new("sensor.tv", 10.0));
//!
//! assert_eq!(diagram.scale().multiplier(), 15.0);
//! let svg = SvgRenderer::new().render(&diagram.compute_layout());
//! assert!(svg.starts_with("<svg"));
//! ```

use std::fmt;

// --- Geometry re-exports ---------------------------------------------------

pub use sankey_core::geometry::{BandCorners, FlowBand, Point, Rect, flow_by_corners};
pub use sankey_core::logging::Diagnostic;

// --- Style re-exports ------------------------------------------------------

pub use sankey_style::{ColorError, Palette, Rgb, mix, mix_hexes};

// --- Layout re-exports -----------------------------------------------------

pub use sankey_layout::{
    ConsumerExtra, ConsumerExtras, DiagramLayout, FlowLayout, Junctions, LabelKind,
    LabelPlacement, NoExtras, Phantom, RateTarget, Reconciliation, Route, RouteMap, RuleOverlay,
    RuleState, SankeyDiagram, Scale, Shape, ShapeKind,
};

// --- Render re-exports -----------------------------------------------------

#[cfg(feature = "render")]
pub use sankey_render::{LabelFormatter, NamedLabel, RoundedLabel, SvgRenderer};

// --- Card re-exports -------------------------------------------------------

#[cfg(feature = "card")]
pub use sankey_card::{CardConfigError, EntityState, PowerFlowCardConfig, SnapshotError, StateSnapshot};

// --- Errors ---------------------------------------------------------------

/// Top-level error type.
#[derive(Debug)]
pub enum Error {
    /// A color string did not parse or a blend ratio was out of range.
    Color(ColorError),
    /// The card configuration is invalid; every violation is listed.
    #[cfg(feature = "card")]
    CardConfig(Vec<CardConfigError>),
    /// A configured entity is missing or not numeric.
    #[cfg(feature = "card")]
    Snapshot(SnapshotError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Color(err) => write!(f, "{err}"),
            #[cfg(feature = "card")]
            Self::CardConfig(errors) => {
                f.write_str("invalid card configuration: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    write!(f, "{err}")?;
                }
                Ok(())
            }
            #[cfg(feature = "card")]
            Self::Snapshot(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Color(err) => Some(err),
            #[cfg(feature = "card")]
            Self::CardConfig(errors) => errors
                .first()
                .map(|e| e as &(dyn std::error::Error + 'static)),
            #[cfg(feature = "card")]
            Self::Snapshot(err) => Some(err),
        }
    }
}

impl From<ColorError> for Error {
    fn from(err: ColorError) -> Self {
        Self::Color(err)
    }
}

#[cfg(feature = "card")]
impl From<Vec<CardConfigError>> for Error {
    fn from(errors: Vec<CardConfigError>) -> Self {
        Self::CardConfig(errors)
    }
}

#[cfg(feature = "card")]
impl From<SnapshotError> for Error {
    fn from(err: SnapshotError) -> Self {
        Self::Snapshot(err)
    }
}

/// Standard result type for elec-sankey APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// Parse a card configuration, map the snapshot, and render the diagram.
#[cfg(all(feature = "card", feature = "render"))]
pub fn render_card(config_json: &str, states: &StateSnapshot, renderer: &SvgRenderer) -> Result<String> {
    let config = PowerFlowCardConfig::from_json(config_json)?;
    let diagram = config.build_diagram(states)?;
    Ok(renderer.render_with(&diagram.compute_layout(), &NamedLabel))
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        DiagramLayout, Error, Palette, RateTarget, Result, Rgb, Route, SankeyDiagram,
    };

    #[cfg(feature = "render")]
    pub use crate::SvgRenderer;

    #[cfg(feature = "card")]
    pub use crate::{EntityState, PowerFlowCardConfig};

    pub use crate::{core, layout, style};
}

pub use sankey_core as core;
pub use sankey_layout as layout;
pub use sankey_style as style;

#[cfg(feature = "render")]
pub use sankey_render as render;

#[cfg(feature = "card")]
pub use sankey_card as card;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_error_converts() {
        let err: Error = Rgb::from_hex("#zzz").unwrap_err().into();
        assert!(matches!(err, Error::Color(_)));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[cfg(all(feature = "card", feature = "render"))]
    #[test]
    fn render_card_end_to_end() {
        let config = r#"{
            "power_from_grid_entity": "sensor.grid",
            "generation_entities": ["sensor.pv"],
            "consumer_entities": ["sensor.oven"]
        }"#;
        let states: StateSnapshot = [
            ("sensor.grid", EntityState::new("300")),
            ("sensor.pv", EntityState::new("700")),
            ("sensor.oven", EntityState::new("1000").with_friendly_name("Oven")),
        ]
        .into_iter()
        .map(|(id, s)| (id.to_string(), s))
        .collect();

        let svg = render_card(config, &states, &SvgRenderer::new()).unwrap();
        assert!(svg.contains(">Oven</text>"));
        assert!(svg.contains(">1000\u{a0}W</text>"));
    }

    #[cfg(all(feature = "card", feature = "render"))]
    #[test]
    fn render_card_errors() {
        let states = StateSnapshot::new();
        let err = render_card("{}", &states, &SvgRenderer::new()).unwrap_err();
        assert!(matches!(err, Error::CardConfig(ref e) if e.len() == 1));
        assert!(err.to_string().starts_with("invalid card configuration: entities="));

        let err = render_card(
            r#"{"consumer_entities": ["sensor.oven"]}"#,
            &states,
            &SvgRenderer::new(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Snapshot(SnapshotError::EntityNotFound(_))));
    }
}
