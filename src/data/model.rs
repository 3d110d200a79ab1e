use std::collections::BTreeSet;
use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Source columns
// ---------------------------------------------------------------------------

/// Raw columns every source table must provide. Extra columns are ignored.
pub const REQUIRED_COLUMNS: [&str; 12] = [
    "Country",
    "City",
    "WiFi Speed",
    "Rent",
    "Sunshine Hours",
    "Coworking Spaces",
    "Instagram Photos",
    "Things To Do",
    "Meal Price",
    "Coffee Price",
    "Beer Price",
    "Taxi Price",
];

// ---------------------------------------------------------------------------
// Continent – fixed lookup with an explicit fallback
// ---------------------------------------------------------------------------

/// Continent of a city, resolved from its country name.
///
/// Countries missing from the lookup table resolve to [`Continent::Other`]
/// instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Continent {
    Europe,
    Asia,
    #[serde(rename = "South America")]
    SouthAmerica,
    #[serde(rename = "North America")]
    NorthAmerica,
    Other,
}

impl Continent {
    pub fn of_country(country: &str) -> Self {
        match country {
            "Portugal" | "Spain" | "Germany" | "France" => Continent::Europe,
            "Thailand" | "India" | "Vietnam" | "Indonesia" => Continent::Asia,
            "Argentina" | "Colombia" | "Brazil" => Continent::SouthAmerica,
            "USA" | "Mexico" => Continent::NorthAmerica,
            _ => Continent::Other,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Continent::Europe => "Europe",
            Continent::Asia => "Asia",
            Continent::SouthAmerica => "South America",
            Continent::NorthAmerica => "North America",
            Continent::Other => "Other",
        }
    }
}

impl fmt::Display for Continent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// RawCity – one row as it comes out of the source file
// ---------------------------------------------------------------------------

/// A city row with only the measured attributes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawCity {
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "WiFi Speed")]
    pub wifi_speed: f64,
    #[serde(rename = "Rent")]
    pub rent: f64,
    #[serde(rename = "Sunshine Hours")]
    pub sunshine_hours: f64,
    #[serde(rename = "Coworking Spaces")]
    pub coworking_spaces: f64,
    #[serde(rename = "Instagram Photos")]
    pub instagram_photos: f64,
    #[serde(rename = "Things To Do")]
    pub things_to_do: f64,
    #[serde(rename = "Meal Price")]
    pub meal_price: f64,
    #[serde(rename = "Coffee Price")]
    pub coffee_price: f64,
    #[serde(rename = "Beer Price")]
    pub beer_price: f64,
    #[serde(rename = "Taxi Price")]
    pub taxi_price: f64,
}

// ---------------------------------------------------------------------------
// CityRecord – raw attributes plus the derived columns
// ---------------------------------------------------------------------------

/// One row of the prepared dataset.
///
/// The struct is flat (no `#[serde(flatten)]`) because the `csv` writer
/// cannot serialize nested maps. Field order is the exported column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityRecord {
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "WiFi Speed")]
    pub wifi_speed: f64,
    #[serde(rename = "Rent")]
    pub rent: f64,
    #[serde(rename = "Sunshine Hours")]
    pub sunshine_hours: f64,
    #[serde(rename = "Coworking Spaces")]
    pub coworking_spaces: f64,
    #[serde(rename = "Instagram Photos")]
    pub instagram_photos: f64,
    #[serde(rename = "Things To Do")]
    pub things_to_do: f64,
    #[serde(rename = "Meal Price")]
    pub meal_price: f64,
    #[serde(rename = "Coffee Price")]
    pub coffee_price: f64,
    #[serde(rename = "Beer Price")]
    pub beer_price: f64,
    #[serde(rename = "Taxi Price")]
    pub taxi_price: f64,

    // -- derived --
    #[serde(rename = "Sunshine per Day")]
    pub sunshine_per_day: f64,
    #[serde(rename = "Workation Score")]
    pub workation_score: f64,
    #[serde(rename = "Total Cost")]
    pub total_cost: f64,
    #[serde(rename = "Rent_inv")]
    pub rent_inv: f64,
    #[serde(rename = "Composite Score")]
    pub composite_score: f64,
    #[serde(rename = "Continent")]
    pub continent: Continent,
}

impl CityRecord {
    /// Rent spread over a 30-day month.
    pub fn daily_rent(&self) -> f64 {
        self.rent / 30.0
    }
}

// ---------------------------------------------------------------------------
// FullDataset – the prepared, immutable table
// ---------------------------------------------------------------------------

/// Observed value bounds of the filterable numeric columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
    pub wifi_speed: RangeInclusive<f64>,
    pub rent: RangeInclusive<f64>,
    pub sunshine_hours: RangeInclusive<f64>,
}

/// All cities with derived columns, plus pre-computed indices for the UI.
#[derive(Debug, Clone, PartialEq)]
pub struct FullDataset {
    cities: Vec<CityRecord>,
    /// Sorted unique country names.
    countries: BTreeSet<String>,
    /// Sorted unique city names.
    city_names: BTreeSet<String>,
    bounds: Bounds,
}

impl FullDataset {
    /// Build the indices from already-prepared records.
    pub fn from_records(cities: Vec<CityRecord>) -> Self {
        let countries = cities.iter().map(|c| c.country.clone()).collect();
        let city_names = cities.iter().map(|c| c.city.clone()).collect();
        let bounds = Bounds {
            wifi_speed: observed_range(cities.iter().map(|c| c.wifi_speed)),
            rent: observed_range(cities.iter().map(|c| c.rent)),
            sunshine_hours: observed_range(cities.iter().map(|c| c.sunshine_hours)),
        };
        FullDataset {
            cities,
            countries,
            city_names,
            bounds,
        }
    }

    pub fn cities(&self) -> &[CityRecord] {
        &self.cities
    }

    pub fn countries(&self) -> &BTreeSet<String> {
        &self.countries
    }

    pub fn city_names(&self) -> &BTreeSet<String> {
        &self.city_names
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Number of cities.
    pub fn len(&self) -> usize {
        self.cities.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }
}

/// Min/max of a column; `0.0..=0.0` for an empty column.
pub fn observed_range(values: impl Iterator<Item = f64>) -> RangeInclusive<f64> {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if min > max {
        0.0..=0.0
    } else {
        min..=max
    }
}
