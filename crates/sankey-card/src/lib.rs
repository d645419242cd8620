#![forbid(unsafe_code)]

//! Power-flow card glue: a serde-loaded card configuration plus a snapshot
//! of entity states becomes a [`SankeyDiagram`](sankey_layout::SankeyDiagram).
//!
//! Fetching states is the host's job; this crate only maps them.

pub mod config;
pub mod snapshot;

pub use config::{CardConfigError, DEFAULT_CARD_UNIT, PowerFlowCardConfig, is_valid_entity_id};
pub use snapshot::{EntityState, SnapshotError, StateSnapshot};
