#![forbid(unsafe_code)]

//! SVG rendering for energy-flow diagram layouts.
//!
//! ```
//! use sankey_layout::{Route, SankeyDiagram};
//! use sankey_render::SvgRenderer;
//!
//! let mut diagram = SankeyDiagram::new().with_unit("W");
//! diagram.set_grid_in(Route::new("sensor.grid", 400.0));
//! diagram.add_or_update_generation(Route::new("sensor.pv", 600.0));
//! diagram.add_or_update_consumer(Route::new("sensor.oven", 1000.0));
//!
//! let svg = SvgRenderer::new().render(&diagram.compute_layout());
//! assert!(svg.contains("1000 W"));
//! ```

pub mod label;
pub mod svg;

pub use label::{LabelFormatter, NamedLabel, RoundedLabel, ellipsize, round_one_decimal};
pub use svg::{GRID_IN_MISSING_TEXT, PLACEHOLDER_HEIGHT, SvgRenderer};
