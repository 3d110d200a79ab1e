use std::collections::BTreeSet;
use std::ops::RangeInclusive;
use std::sync::Arc;

use super::model::{CityRecord, FullDataset};

// ---------------------------------------------------------------------------
// Filter predicate
// ---------------------------------------------------------------------------

/// A categorical selection: either match everything or only the given value(s).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<T> {
    All,
    Only(T),
}

impl Selection<BTreeSet<String>> {
    /// Build a country selection. An empty set collapses to [`Selection::All`],
    /// so `Only` always holds at least one country.
    pub fn countries<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: BTreeSet<String> = names.into_iter().map(Into::into).collect();
        if set.is_empty() {
            Selection::All
        } else {
            Selection::Only(set)
        }
    }

    fn matches(&self, country: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(set) => set.contains(country),
        }
    }
}

impl Selection<String> {
    fn matches(&self, city: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(name) => name == city,
        }
    }
}

/// The current values of every sidebar control.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    pub countries: Selection<BTreeSet<String>>,
    pub city: Selection<String>,
    pub wifi_speed: RangeInclusive<f64>,
    pub rent: RangeInclusive<f64>,
    pub sunshine_hours: RangeInclusive<f64>,
}

impl FilterState {
    /// Everything selected and every range at the dataset's observed bounds.
    pub fn for_dataset(dataset: &FullDataset) -> Self {
        let bounds = dataset.bounds();
        FilterState {
            countries: Selection::All,
            city: Selection::All,
            wifi_speed: bounds.wifi_speed.clone(),
            rent: bounds.rent.clone(),
            sunshine_hours: bounds.sunshine_hours.clone(),
        }
    }

    /// Whether a single record passes every predicate (logical AND).
    pub fn matches(&self, city: &CityRecord) -> bool {
        self.countries.matches(&city.country)
            && self.city.matches(&city.city)
            && self.wifi_speed.contains(&city.wifi_speed)
            && self.rent.contains(&city.rent)
            && self.sunshine_hours.contains(&city.sunshine_hours)
    }
}

// ---------------------------------------------------------------------------
// FilteredView
// ---------------------------------------------------------------------------

/// Read-only subset of a [`FullDataset`], in source order.
///
/// Holds indices into the shared dataset; a new view is built on every
/// filter change rather than updated in place.
#[derive(Debug, Clone)]
pub struct FilteredView {
    dataset: Arc<FullDataset>,
    indices: Vec<usize>,
}

impl FilteredView {
    /// A view over every row.
    pub fn all(dataset: Arc<FullDataset>) -> Self {
        let indices = (0..dataset.len()).collect();
        FilteredView { dataset, indices }
    }

    #[cfg(test)]
    pub fn dataset(&self) -> &FullDataset {
        &self.dataset
    }

    #[cfg(test)]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn rows(&self) -> impl Iterator<Item = &CityRecord> + '_ {
        self.indices.iter().map(|&i| &self.dataset.cities()[i])
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Apply every predicate in `filters` to the full dataset.
pub fn apply(dataset: &Arc<FullDataset>, filters: &FilterState) -> FilteredView {
    let indices = dataset
        .cities()
        .iter()
        .enumerate()
        .filter(|(_, city)| filters.matches(city))
        .map(|(i, _)| i)
        .collect();
    FilteredView {
        dataset: Arc::clone(dataset),
        indices,
    }
}
