//! Card configuration.
//!
//! # JSON shape
//!
//! ```json
//! {
//!   "title": "Power",
//!   "power_from_grid_entity": "sensor.grid_import",
//!   "power_to_grid_entity": "sensor.grid_export",
//!   "generation_entities": ["sensor.pv_roof"],
//!   "consumer_entities": ["sensor.oven", "sensor.heat_pump"],
//!   "unit": "W"
//! }
//! ```
//!
//! Every field is optional, but at least one entity must be configured.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unit shown when the configuration does not name one.
pub const DEFAULT_CARD_UNIT: &str = "W";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerFlowCardConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power_from_grid_entity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power_to_grid_entity: Option<String>,
    pub generation_entities: Vec<String>,
    pub consumer_entities: Vec<String>,
    pub unit: String,
}

impl Default for PowerFlowCardConfig {
    fn default() -> Self {
        Self {
            title: None,
            power_from_grid_entity: None,
            power_to_grid_entity: None,
            generation_entities: Vec::new(),
            consumer_entities: Vec::new(),
            unit: DEFAULT_CARD_UNIT.to_string(),
        }
    }
}

/// One configuration violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardConfigError {
    pub field: &'static str,
    pub value: String,
    pub message: String,
}

impl CardConfigError {
    fn new(field: &'static str, value: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for CardConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={} ({})", self.field, self.value, self.message)
    }
}

impl std::error::Error for CardConfigError {}

impl PowerFlowCardConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, Vec<CardConfigError>> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| vec![CardConfigError::new("config", "", format!("invalid JSON: {e}"))])?;
        config.validate()?;
        Ok(config)
    }

    /// Validate config constraints and return all violations.
    pub fn validate(&self) -> Result<(), Vec<CardConfigError>> {
        let mut errors = Vec::new();
        if self.watched_entities().next().is_none() {
            errors.push(CardConfigError::new(
                "entities",
                "",
                "must specify at least one entity",
            ));
        }
        validate_entity("power_from_grid_entity", self.power_from_grid_entity.as_deref(), &mut errors);
        validate_entity("power_to_grid_entity", self.power_to_grid_entity.as_deref(), &mut errors);
        for entity in &self.generation_entities {
            validate_entity("generation_entities", Some(entity), &mut errors);
        }
        for entity in &self.consumer_entities {
            validate_entity("consumer_entities", Some(entity), &mut errors);
        }
        if self.unit.trim().is_empty() {
            errors.push(CardConfigError::new("unit", &self.unit, "unit must not be empty"));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Every configured entity id: grid import, grid export, generation,
    /// then consumers.
    pub fn watched_entities(&self) -> impl Iterator<Item = &str> {
        self.power_from_grid_entity
            .as_deref()
            .into_iter()
            .chain(self.power_to_grid_entity.as_deref())
            .chain(self.generation_entities.iter().map(String::as_str))
            .chain(self.consumer_entities.iter().map(String::as_str))
    }
}

fn validate_entity(field: &'static str, entity: Option<&str>, errors: &mut Vec<CardConfigError>) {
    if let Some(entity) = entity
        && !is_valid_entity_id(entity)
    {
        errors.push(CardConfigError::new(
            field,
            entity,
            "entity id must look like domain.object_id",
        ));
    }
}

/// `domain.object_id`, each half made of ASCII letters, digits, or `_`.
#[must_use]
pub fn is_valid_entity_id(id: &str) -> bool {
    let word = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_');
    match id.split_once('.') {
        Some((domain, object_id)) => word(domain) && word(object_id),
        None => false,
    }
}
