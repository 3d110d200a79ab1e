use super::error::{DataLoadError, Result};
use super::model::{CityRecord, Continent, FullDataset, RawCity, observed_range};

// ---------------------------------------------------------------------------
// Derived columns
// ---------------------------------------------------------------------------

const DAYS_PER_YEAR: f64 = 365.0;
const DAYS_PER_MONTH: f64 = 30.0;

pub fn workation_score(wifi_speed: f64, sunshine_hours: f64, rent: f64) -> f64 {
    wifi_speed * 2.0 + sunshine_hours - rent * 0.01
}

pub fn total_cost(raw: &RawCity) -> f64 {
    raw.meal_price + raw.rent / DAYS_PER_MONTH + raw.coffee_price + raw.beer_price + raw.taxi_price
}

/// Scales one column into `[0, 1]` using its own min and max.
///
/// A constant column maps to `0.0` everywhere.
fn min_max_normalize(values: &[f64]) -> Vec<f64> {
    let range = observed_range(values.iter().copied());
    let (min, max) = (*range.start(), *range.end());
    let span = max - min;
    values
        .iter()
        .map(|&v| if span > 0.0 { (v - min) / span } else { 0.0 })
        .collect()
}

/// Compute every derived column over the complete, unfiltered table.
///
/// Normalization bounds for the composite score come from all `raws`, so
/// this must only ever run on the full source, never on a filtered subset.
pub fn prepare(raws: Vec<RawCity>) -> Result<FullDataset> {
    if raws.is_empty() {
        return Err(DataLoadError::Empty);
    }

    for (row, raw) in raws.iter().enumerate() {
        let numeric = [
            raw.wifi_speed,
            raw.rent,
            raw.sunshine_hours,
            raw.coworking_spaces,
            raw.instagram_photos,
            raw.things_to_do,
            raw.meal_price,
            raw.coffee_price,
            raw.beer_price,
            raw.taxi_price,
        ];
        if numeric.iter().any(|v| !v.is_finite()) {
            return Err(DataLoadError::malformed(row, "non-finite numeric value"));
        }
    }

    let max_rent = raws.iter().map(|r| r.rent).fold(f64::NEG_INFINITY, f64::max);
    let rent_inv: Vec<f64> = raws.iter().map(|r| max_rent - r.rent).collect();
    let sunshine_per_day: Vec<f64> = raws
        .iter()
        .map(|r| r.sunshine_hours / DAYS_PER_YEAR)
        .collect();

    let features = [
        min_max_normalize(&raws.iter().map(|r| r.wifi_speed).collect::<Vec<_>>()),
        min_max_normalize(&raws.iter().map(|r| r.coworking_spaces).collect::<Vec<_>>()),
        min_max_normalize(&rent_inv),
        min_max_normalize(&sunshine_per_day),
        min_max_normalize(&raws.iter().map(|r| r.instagram_photos).collect::<Vec<_>>()),
    ];

    let cities = raws
        .into_iter()
        .enumerate()
        .map(|(i, raw)| {
            let composite_score =
                features.iter().map(|f| f[i]).sum::<f64>() / features.len() as f64;
            CityRecord {
                sunshine_per_day: sunshine_per_day[i],
                workation_score: workation_score(raw.wifi_speed, raw.sunshine_hours, raw.rent),
                total_cost: total_cost(&raw),
                rent_inv: rent_inv[i],
                composite_score,
                continent: Continent::of_country(&raw.country),
                country: raw.country,
                city: raw.city,
                wifi_speed: raw.wifi_speed,
                rent: raw.rent,
                sunshine_hours: raw.sunshine_hours,
                coworking_spaces: raw.coworking_spaces,
                instagram_photos: raw.instagram_photos,
                things_to_do: raw.things_to_do,
                meal_price: raw.meal_price,
                coffee_price: raw.coffee_price,
                beer_price: raw.beer_price,
                taxi_price: raw.taxi_price,
            }
        })
        .collect();

    Ok(FullDataset::from_records(cities))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn raw(country: &str, city: &str, wifi: f64, rent: f64, sunshine: f64) -> RawCity {
        RawCity {
            country: country.to_string(),
            city: city.to_string(),
            wifi_speed: wifi,
            rent,
            sunshine_hours: sunshine,
            coworking_spaces: 10.0,
            instagram_photos: 1000.0,
            things_to_do: 20.0,
            meal_price: 8.0,
            coffee_price: 2.0,
            beer_price: 3.0,
            taxi_price: 5.0,
        }
    }

    /// The Portugal / Thailand pair used throughout the tests.
    pub(crate) fn two_city_dataset() -> FullDataset {
        prepare(vec![
            raw("Portugal", "A", 100.0, 500.0, 2000.0),
            raw("Thailand", "B", 50.0, 1000.0, 1000.0),
        ])
        .unwrap()
    }

    fn varied_dataset() -> FullDataset {
        let mut rows = vec![
            raw("Portugal", "Lisbon", 80.0, 900.0, 2800.0),
            raw("Spain", "Valencia", 60.0, 700.0, 2600.0),
            raw("Kenya", "Nairobi", 20.0, 400.0, 2500.0),
            raw("USA", "Austin", 120.0, 1800.0, 2600.0),
        ];
        rows[0].coworking_spaces = 40.0;
        rows[1].instagram_photos = 9000.0;
        rows[2].things_to_do = 3.0;
        rows[3].taxi_price = 25.0;
        prepare(rows).unwrap()
    }

    #[test]
    fn two_city_example_scores() {
        let ds = two_city_dataset();
        let a = &ds.cities()[0];
        let b = &ds.cities()[1];
        assert_eq!(a.continent, Continent::Europe);
        assert_eq!(b.continent, Continent::Asia);
        assert!((a.workation_score - 2195.0).abs() < 1e-9);
        assert!((b.workation_score - 1090.0).abs() < 1e-9);
    }

    #[test]
    fn workation_score_and_total_cost_formulas_hold_for_every_row() {
        let ds = varied_dataset();
        for c in ds.cities() {
            let ws = c.wifi_speed * 2.0 + c.sunshine_hours - c.rent * 0.01;
            let tc = c.meal_price + c.rent / 30.0 + c.coffee_price + c.beer_price + c.taxi_price;
            assert!((c.workation_score - ws).abs() < 1e-9, "{}", c.city);
            assert!((c.total_cost - tc).abs() < 1e-9, "{}", c.city);
            assert!((c.sunshine_per_day - c.sunshine_hours / 365.0).abs() < 1e-9);
        }
    }

    #[test]
    fn rent_inv_is_distance_from_max_rent() {
        let ds = varied_dataset();
        let rents: Vec<f64> = ds.cities().iter().map(|c| c.rent_inv).collect();
        assert_eq!(rents, vec![900.0, 1100.0, 1400.0, 0.0]);
    }

    #[test]
    fn composite_score_is_bounded() {
        let ds = varied_dataset();
        for c in ds.cities() {
            assert!((0.0..=1.0).contains(&c.composite_score), "{}", c.city);
        }
    }

    #[test]
    fn all_max_row_has_composite_one() {
        let mut best = raw("France", "Best", 200.0, 100.0, 3500.0);
        best.coworking_spaces = 90.0;
        best.instagram_photos = 50_000.0;
        let mut worst = raw("France", "Worst", 10.0, 3000.0, 1200.0);
        worst.coworking_spaces = 1.0;
        worst.instagram_photos = 10.0;
        let ds = prepare(vec![worst, best]).unwrap();
        assert!((ds.cities()[1].composite_score - 1.0).abs() < 1e-12);
        assert!(ds.cities()[0].composite_score.abs() < 1e-12);
    }

    #[test]
    fn constant_feature_normalizes_to_zero() {
        assert_eq!(min_max_normalize(&[5.0, 5.0, 5.0]), vec![0.0, 0.0, 0.0]);
        assert_eq!(min_max_normalize(&[0.0, 5.0, 10.0]), vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn raw_columns_are_carried_unchanged() {
        let source = raw("Kenya", "Nairobi", 33.5, 420.0, 2480.0);
        let ds = prepare(vec![source.clone()]).unwrap();
        let c = &ds.cities()[0];
        assert_eq!(c.country, source.country);
        assert_eq!(c.wifi_speed, source.wifi_speed);
        assert_eq!(c.rent, source.rent);
        assert_eq!(c.taxi_price, source.taxi_price);
        assert_eq!(c.continent, Continent::Other);
    }

    #[test]
    fn empty_source_is_an_error() {
        assert!(matches!(prepare(Vec::new()), Err(DataLoadError::Empty)));
    }

    #[test]
    fn non_finite_value_is_rejected() {
        let mut bad = raw("Spain", "X", 10.0, 500.0, 2000.0);
        bad.beer_price = f64::NAN;
        let err = prepare(vec![raw("Spain", "Y", 1.0, 1.0, 1.0), bad]).unwrap_err();
        assert!(matches!(err, DataLoadError::Malformed { row: 1, .. }));
    }

    #[test]
    fn preparation_is_deterministic() {
        assert_eq!(varied_dataset(), varied_dataset());
    }
}
