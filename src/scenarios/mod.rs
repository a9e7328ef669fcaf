//! Scenario catalog
//!
//! An ordered, immutable list of self-contained scenarios. No scenario
//! depends on the outcome of another.
//!
//! ## Standard Catalog
//!
//! ### Client addressing
//! - Ping via prefix path
//! - Ping via query parameter
//! - JSON response handling
//!
//! ### Methods
//! - POST / PUT / DELETE request tunneling
//!
//! ### Protocol preservation
//! - Headers forwarding
//! - Status codes 201, 400, 500
//! - Slow request handling
//! - Large payload handling
//!
//! ### Negative addressing
//! - Non-existent client ID

mod standard;

pub use standard::{
    large_payload, CUSTOM_HEADER, LARGE_PAYLOAD_CHARS, LARGE_PAYLOAD_NUMBERS,
    NONEXISTENT_CLIENT_ID, NONEXISTENT_CLIENT_TIMEOUT, SLOW_SCENARIO_TIMEOUT, TEST_USER_AGENT,
};

use std::collections::HashSet;
use thiserror::Error;

use crate::models::ScenarioDefinition;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Duplicate scenario name: {0}")]
    DuplicateName(String),
}

/// Ordered scenario list with unique names
#[derive(Clone, Debug)]
pub struct ScenarioCatalog {
    scenarios: Vec<ScenarioDefinition>,
}

impl ScenarioCatalog {
    pub fn new(scenarios: Vec<ScenarioDefinition>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for scenario in &scenarios {
            if !seen.insert(scenario.name.as_str()) {
                return Err(CatalogError::DuplicateName(scenario.name.clone()));
            }
        }
        Ok(Self { scenarios })
    }

    /// The full tunnel verification catalog
    pub fn standard() -> Self {
        Self {
            scenarios: standard::all(),
        }
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScenarioDefinition> {
        self.scenarios.iter()
    }

    pub fn get(&self, name: &str) -> Option<&ScenarioDefinition> {
        self.scenarios.iter().find(|s| s.name == name)
    }
}

impl<'a> IntoIterator for &'a ScenarioCatalog {
    type Item = &'a ScenarioDefinition;
    type IntoIter = std::slice::Iter<'a, ScenarioDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.scenarios.iter()
    }
}
