//! Client-side filter and search reducer.
//!
//! The visible list is always derived from the accumulated list, the search
//! query and the [`FilterSelection`]; it is never edited directly.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::CharacterSummary;

// ---------------------------------------------------------------------------
// Picker options
// ---------------------------------------------------------------------------

/// Status values offered by the filter picker.
pub const STATUS_OPTIONS: &[&str] = &["Alive", "Dead", "unknown"];

/// Gender values offered by the filter picker.
pub const GENDER_OPTIONS: &[&str] = &["Female", "Male", "Genderless", "unknown"];

/// Species values offered by the filter picker.
pub const SPECIES_OPTIONS: &[&str] = &[
    "Human",
    "Alien",
    "Humanoid",
    "Robot",
    "Animal",
    "Mythological Creature",
    "Poopybutthole",
    "Cronenberg",
    "Disease",
    "unknown",
];

// ---------------------------------------------------------------------------
// FilterSelection
// ---------------------------------------------------------------------------

/// One of the three independent filter dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterDimension {
    Status,
    Species,
    Gender,
}

impl FilterDimension {
    pub fn options(self) -> &'static [&'static str] {
        match self {
            FilterDimension::Status => STATUS_OPTIONS,
            FilterDimension::Species => SPECIES_OPTIONS,
            FilterDimension::Gender => GENDER_OPTIONS,
        }
    }
}

/// Multi-select filter state.
///
/// Values within a dimension are OR-ed, dimensions are AND-ed, and an empty
/// dimension places no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub status: BTreeSet<String>,
    pub species: BTreeSet<String>,
    pub gender: BTreeSet<String>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert of a single value.
    pub fn with(mut self, dimension: FilterDimension, value: impl Into<String>) -> Self {
        self.values_mut(dimension).insert(value.into());
        self
    }

    pub fn values(&self, dimension: FilterDimension) -> &BTreeSet<String> {
        match dimension {
            FilterDimension::Status => &self.status,
            FilterDimension::Species => &self.species,
            FilterDimension::Gender => &self.gender,
        }
    }

    fn values_mut(&mut self, dimension: FilterDimension) -> &mut BTreeSet<String> {
        match dimension {
            FilterDimension::Status => &mut self.status,
            FilterDimension::Species => &mut self.species,
            FilterDimension::Gender => &mut self.gender,
        }
    }

    /// Select `value` if absent, deselect it otherwise. Returns whether it is
    /// selected afterwards.
    pub fn toggle(&mut self, dimension: FilterDimension, value: &str) -> bool {
        let values = self.values_mut(dimension);
        if values.remove(value) {
            false
        } else {
            values.insert(value.to_string());
            true
        }
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_empty() && self.species.is_empty() && self.gender.is_empty()
    }

    /// Whether `character` passes every non-empty dimension.
    pub fn matches(&self, character: &CharacterSummary) -> bool {
        allows(&self.status, &character.status)
            && allows(&self.species, &character.species)
            && allows(&self.gender, &character.gender)
    }
}

fn allows(selected: &BTreeSet<String>, value: &str) -> bool {
    selected.is_empty() || selected.contains(value)
}

// ---------------------------------------------------------------------------
// Reducer
// ---------------------------------------------------------------------------

/// Case-insensitive substring match on the character name. A blank query
/// matches everything.
pub fn matches_query(character: &CharacterSummary, query: &str) -> bool {
    if query.trim().is_empty() {
        return true;
    }
    character
        .name
        .to_lowercase()
        .contains(&query.to_lowercase())
}

/// Derive the visible list from the full list.
///
/// A full linear rescan; relative order of `full` is preserved.
pub fn visible(
    full: &[CharacterSummary],
    query: &str,
    filters: &FilterSelection,
) -> Vec<CharacterSummary> {
    full.iter()
        .filter(|c| filters.matches(c) && matches_query(c, query))
        .cloned()
        .collect()
}
