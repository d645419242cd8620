//! Entity states to diagram routes.

use std::collections::HashMap;
use std::fmt;

use sankey_layout::constants::ICON_SOLAR_POWER;
use sankey_layout::{Route, SankeyDiagram};
use serde::{Deserialize, Serialize};

use crate::config::PowerFlowCardConfig;

/// Current state of one entity as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EntityState {
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<String>,
}

impl EntityState {
    #[must_use]
    pub fn new(state: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            friendly_name: None,
        }
    }

    #[must_use]
    pub fn with_friendly_name(mut self, name: impl Into<String>) -> Self {
        self.friendly_name = Some(name.into());
        self
    }
}

/// Entity id to state.
pub type StateSnapshot = HashMap<String, EntityState>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    /// A configured entity is absent from the snapshot.
    EntityNotFound(String),
    /// The entity's state does not parse as a finite number
    /// (`"unavailable"`, `"unknown"`, empty).
    NonNumericState { entity: String, state: String },
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EntityNotFound(entity) => write!(f, "entity not available: {entity}"),
            Self::NonNumericState { entity, state } => {
                write!(f, "entity {entity} has non-numeric state {state:?}")
            }
        }
    }
}

impl std::error::Error for SnapshotError {}

impl PowerFlowCardConfig {
    /// Build a diagram from the configured entities' current states.
    ///
    /// The first missing or non-numeric entity aborts the build; the card
    /// shows a warning instead of a partial diagram.
    pub fn build_diagram(&self, states: &StateSnapshot) -> Result<SankeyDiagram, SnapshotError> {
        let mut diagram = SankeyDiagram::new().with_unit(self.unit.clone());
        if let Some(entity) = &self.power_from_grid_entity {
            diagram.set_grid_in(route_for(entity, states)?);
        }
        if let Some(entity) = &self.power_to_grid_entity {
            diagram.set_grid_out(route_for(entity, states)?);
        }
        for entity in &self.generation_entities {
            diagram.add_or_update_generation(route_for(entity, states)?.with_icon(ICON_SOLAR_POWER));
        }
        for entity in &self.consumer_entities {
            diagram.add_or_update_consumer(route_for(entity, states)?);
        }
        sankey_core::debug!(
            entities = self.watched_entities().count(),
            unit = %self.unit,
            "diagram built from snapshot"
        );
        Ok(diagram)
    }

    /// Whether any watched entity changed state between two snapshots.
    #[must_use]
    pub fn needs_refresh(&self, old: &StateSnapshot, new: &StateSnapshot) -> bool {
        self.watched_entities().any(|entity| {
            old.get(entity).map(|s| &s.state) != new.get(entity).map(|s| &s.state)
        })
    }
}

fn route_for(entity: &str, states: &StateSnapshot) -> Result<Route, SnapshotError> {
    let state = states
        .get(entity)
        .ok_or_else(|| SnapshotError::EntityNotFound(entity.to_string()))?;
    let rate = parse_rate(&state.state).ok_or_else(|| SnapshotError::NonNumericState {
        entity: entity.to_string(),
        state: state.state.clone(),
    })?;
    Ok(Route::new(entity, rate).with_text(display_name(entity, state)))
}

fn parse_rate(state: &str) -> Option<f64> {
    state.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Friendly name, else the object id with underscores as spaces.
fn display_name(entity: &str, state: &EntityState) -> String {
    if let Some(name) = &state.friendly_name {
        return name.clone();
    }
    let object_id = entity.split_once('.').map_or(entity, |(_, id)| id);
    object_id.replace('_', " ")
}
