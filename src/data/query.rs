//! Read-only ranking and aggregation queries over a [`FilteredView`].
//!
//! Every function here is pure: it borrows the view and returns a fresh
//! result. Zero-row views produce empty results or `None`, never a panic.

use std::collections::{BTreeMap, BTreeSet};

use super::filter::FilteredView;
use super::model::{CityRecord, FullDataset};

/// Rows shown by the ranked charts.
pub const TOP_N: usize = 10;
/// Rows shown by the expense comparison.
pub const TOP_FEW: usize = 5;

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

/// A numeric column a view can rank or average by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    WifiSpeed,
    Rent,
    SunshineHours,
    CoworkingSpaces,
    InstagramPhotos,
    WorkationScore,
    TotalCost,
    CompositeScore,
}

impl Metric {
    pub fn value(self, city: &CityRecord) -> f64 {
        match self {
            Metric::WifiSpeed => city.wifi_speed,
            Metric::Rent => city.rent,
            Metric::SunshineHours => city.sunshine_hours,
            Metric::CoworkingSpaces => city.coworking_spaces,
            Metric::InstagramPhotos => city.instagram_photos,
            Metric::WorkationScore => city.workation_score,
            Metric::TotalCost => city.total_cost,
            Metric::CompositeScore => city.composite_score,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Metric::WifiSpeed => "WiFi Speed",
            Metric::Rent => "Rent",
            Metric::SunshineHours => "Sunshine Hours",
            Metric::CoworkingSpaces => "Coworking Spaces",
            Metric::InstagramPhotos => "Instagram Photos",
            Metric::WorkationScore => "Workation Score",
            Metric::TotalCost => "Total Cost",
            Metric::CompositeScore => "Composite Score",
        }
    }
}

/// Scores computed on demand for one view; never stored in the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdHocScore {
    /// `WiFi Speed * 2 + Coworking Spaces`
    Remote,
    /// `Instagram Photos * 0.7 + Things To Do * 10`
    Social,
}

impl AdHocScore {
    pub fn value(self, city: &CityRecord) -> f64 {
        match self {
            AdHocScore::Remote => city.wifi_speed * 2.0 + city.coworking_spaces,
            AdHocScore::Social => city.instagram_photos * 0.7 + city.things_to_do * 10.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AdHocScore::Remote => "Remote Score",
            AdHocScore::Social => "Social Score",
        }
    }
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Descending,
    Ascending,
}

/// A row paired with the value it was ranked by.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scored<'a> {
    pub city: &'a CityRecord,
    pub value: f64,
}

/// Sort by value and keep the first `n`. The sort is stable, so ties keep
/// source order.
fn rank<'a>(mut rows: Vec<Scored<'a>>, order: Order, n: usize) -> Vec<Scored<'a>> {
    rows.sort_by(|a, b| match order {
        Order::Descending => b.value.total_cmp(&a.value),
        Order::Ascending => a.value.total_cmp(&b.value),
    });
    rows.truncate(n);
    rows
}

/// First `n` rows of the view ordered by `metric`.
pub fn top_n(view: &FilteredView, metric: Metric, order: Order, n: usize) -> Vec<Scored<'_>> {
    let rows = view
        .rows()
        .map(|city| Scored {
            city,
            value: metric.value(city),
        })
        .collect();
    rank(rows, order, n)
}

/// A view-local column: one ad hoc score per row of the view, source order.
#[derive(Debug, Clone)]
pub struct Projection<'a> {
    pub score: AdHocScore,
    pub rows: Vec<Scored<'a>>,
}

impl<'a> Projection<'a> {
    pub fn top(&self, order: Order, n: usize) -> Vec<Scored<'a>> {
        rank(self.rows.clone(), order, n)
    }
}

pub fn project(view: &FilteredView, score: AdHocScore) -> Projection<'_> {
    Projection {
        score,
        rows: view
            .rows()
            .map(|city| Scored {
                city,
                value: score.value(city),
            })
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKey {
    Country,
    Continent,
}

impl GroupKey {
    fn of(self, city: &CityRecord) -> String {
        match self {
            GroupKey::Country => city.country.clone(),
            GroupKey::Continent => city.continent.label().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupMean {
    pub key: String,
    pub mean: f64,
    pub count: usize,
}

/// Arithmetic mean of `metric` per group, sorted by group name.
/// Only groups present in the view appear.
pub fn group_mean(view: &FilteredView, key: GroupKey, metric: Metric) -> Vec<GroupMean> {
    let mut groups: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for city in view.rows() {
        let entry = groups.entry(key.of(city)).or_insert((0.0, 0));
        entry.0 += metric.value(city);
        entry.1 += 1;
    }
    groups
        .into_iter()
        .map(|(key, (sum, count))| GroupMean {
            key,
            mean: sum / count as f64,
            count,
        })
        .collect()
}

/// Sort group means by value; ties keep name order.
pub fn sort_groups(mut groups: Vec<GroupMean>, order: Order) -> Vec<GroupMean> {
    groups.sort_by(|a, b| match order {
        Order::Descending => b.mean.total_cmp(&a.mean),
        Order::Ascending => a.mean.total_cmp(&b.mean),
    });
    groups
}

// ---------------------------------------------------------------------------
// Summary metrics
// ---------------------------------------------------------------------------

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

fn view_mean(view: &FilteredView, metric: Metric) -> Option<f64> {
    mean(view.rows().map(|c| metric.value(c)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RentTrend {
    Low,
    Moderate,
    High,
}

impl RentTrend {
    pub fn of(avg_rent: f64) -> Self {
        if avg_rent < 500.0 {
            RentTrend::Low
        } else if avg_rent < 800.0 {
            RentTrend::Moderate
        } else {
            RentTrend::High
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RentTrend::Low => "Low",
            RentTrend::Moderate => "Moderate",
            RentTrend::High => "High",
        }
    }
}

/// Headline numbers for the current view. Averages are `None` when empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub countries: usize,
    pub cities: usize,
    pub avg_wifi_speed: Option<f64>,
    pub avg_rent: Option<f64>,
    pub avg_sunshine_hours: Option<f64>,
}

impl Summary {
    pub fn of(view: &FilteredView) -> Self {
        let countries: BTreeSet<&str> = view.rows().map(|c| c.country.as_str()).collect();
        Summary {
            countries: countries.len(),
            cities: view.len(),
            avg_wifi_speed: view_mean(view, Metric::WifiSpeed),
            avg_rent: view_mean(view, Metric::Rent),
            avg_sunshine_hours: view_mean(view, Metric::SunshineHours),
        }
    }

    pub fn rent_trend(&self) -> Option<RentTrend> {
        self.avg_rent.map(RentTrend::of)
    }
}

/// Size of the full dataset, for the about panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetOverview {
    pub countries: usize,
    pub cities: usize,
}

impl DatasetOverview {
    pub fn of(dataset: &FullDataset) -> Self {
        DatasetOverview {
            countries: dataset.countries().len(),
            cities: dataset.len(),
        }
    }
}

// ---------------------------------------------------------------------------
// Daily cost breakdown
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Expense {
    Meal,
    Coffee,
    Beer,
    Taxi,
    DailyRent,
}

impl Expense {
    pub const ALL: [Expense; 5] = [
        Expense::Meal,
        Expense::Coffee,
        Expense::Beer,
        Expense::Taxi,
        Expense::DailyRent,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Expense::Meal => "Meal",
            Expense::Coffee => "Coffee",
            Expense::Beer => "Beer",
            Expense::Taxi => "Taxi",
            Expense::DailyRent => "Rent (Daily)",
        }
    }

    pub fn cost(self, city: &CityRecord) -> f64 {
        match self {
            Expense::Meal => city.meal_price,
            Expense::Coffee => city.coffee_price,
            Expense::Beer => city.beer_price,
            Expense::Taxi => city.taxi_price,
            Expense::DailyRent => city.daily_rent(),
        }
    }
}

/// Estimated daily spend of one city, split by [`Expense`].
#[derive(Debug, Clone, PartialEq)]
pub struct CostBreakdown {
    pub city: String,
    pub items: [(Expense, f64); 5],
}

impl CostBreakdown {
    pub fn of(city: &CityRecord) -> Self {
        CostBreakdown {
            city: city.city.clone(),
            items: Expense::ALL.map(|e| (e, e.cost(city))),
        }
    }

    pub fn total(&self) -> f64 {
        self.items.iter().map(|(_, v)| v).sum()
    }
}

/// Breakdown for the first row of the view named `city`.
/// `None` means there is no data for it in the current view.
pub fn cost_breakdown(view: &FilteredView, city: &str) -> Option<CostBreakdown> {
    view.rows().find(|c| c.city == city).map(CostBreakdown::of)
}

/// Breakdowns of the `n` best cities by Workation Score.
pub fn expense_comparison(view: &FilteredView, n: usize) -> Vec<CostBreakdown> {
    top_n(view, Metric::WorkationScore, Order::Descending, n)
        .into_iter()
        .map(|s| CostBreakdown::of(s.city))
        .collect()
}

/// City names in the view, first occurrence order, without duplicates.
pub fn distinct_cities(view: &FilteredView) -> Vec<&str> {
    let mut seen = BTreeSet::new();
    view.rows()
        .map(|c| c.city.as_str())
        .filter(|name| seen.insert(*name))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::data::filter::{apply, FilterState, Selection};
    use crate::data::prepare::prepare;
    use crate::data::prepare::tests::{raw, two_city_dataset};

    fn view_of(ds: crate::data::model::FullDataset) -> FilteredView {
        FilteredView::all(Arc::new(ds))
    }

    fn names(rows: &[Scored<'_>]) -> Vec<String> {
        rows.iter().map(|s| s.city.city.clone()).collect()
    }

    fn sample() -> FilteredView {
        let mut rows = vec![
            raw("Portugal", "Lisbon", 80.0, 900.0, 2800.0),
            raw("Portugal", "Porto", 60.0, 700.0, 2500.0),
            raw("Spain", "Valencia", 60.0, 700.0, 2600.0),
            raw("Thailand", "Bangkok", 30.0, 500.0, 2600.0),
            raw("Kenya", "Nairobi", 20.0, 400.0, 2500.0),
        ];
        rows[3].coworking_spaces = 120.0;
        rows[4].things_to_do = 400.0;
        view_of(prepare(rows).unwrap())
    }

    #[test]
    fn top_one_by_workation_score_is_city_a() {
        let view = view_of(two_city_dataset());
        let top = top_n(&view, Metric::WorkationScore, Order::Descending, 1);
        assert_eq!(names(&top), ["A"]);
        assert!((top[0].value - 2195.0).abs() < 1e-9);
    }

    #[test]
    fn ties_keep_source_order() {
        let view = sample();
        let top = top_n(&view, Metric::WifiSpeed, Order::Descending, 3);
        assert_eq!(names(&top), ["Lisbon", "Porto", "Valencia"]);
        let bottom = top_n(&view, Metric::SunshineHours, Order::Ascending, 2);
        assert_eq!(names(&bottom), ["Porto", "Nairobi"]);
    }

    #[test]
    fn top_n_is_capped_by_view_size() {
        let view = sample();
        assert_eq!(top_n(&view, Metric::Rent, Order::Ascending, TOP_N).len(), 5);
    }

    #[test]
    fn group_mean_by_continent_on_filtered_two_city_example() {
        let view = view_of(two_city_dataset());
        let groups = group_mean(&view, GroupKey::Continent, Metric::CompositeScore);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key, "Asia");
        assert_eq!(groups[1].key, "Europe");
        assert!(groups.iter().all(|g| g.count == 1));

        let ds = Arc::new(two_city_dataset());
        let mut f = FilterState::for_dataset(&ds);
        f.countries = Selection::countries(["Thailand"]);
        let only_b = apply(&ds, &f);
        let groups = group_mean(&only_b, GroupKey::Continent, Metric::CompositeScore);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].key, "Asia");
    }

    #[test]
    fn group_mean_by_country_averages_members() {
        let view = sample();
        let groups = group_mean(&view, GroupKey::Country, Metric::WifiSpeed);
        let portugal = groups.iter().find(|g| g.key == "Portugal").unwrap();
        assert_eq!(portugal.count, 2);
        assert!((portugal.mean - 70.0).abs() < 1e-9);

        let sorted = sort_groups(groups, Order::Ascending);
        assert_eq!(sorted[0].key, "Kenya");
    }

    #[test]
    fn composite_scores_do_not_depend_on_filter() {
        let ds = Arc::new(sample().dataset().clone());
        let full = FilteredView::all(Arc::clone(&ds));
        let mut f = FilterState::for_dataset(&ds);
        f.countries = Selection::countries(["Portugal"]);
        let narrow = apply(&ds, &f);
        for city in narrow.rows() {
            let same = full.rows().find(|c| c.city == city.city).unwrap();
            assert_eq!(city.composite_score, same.composite_score);
        }
    }

    #[test]
    fn ad_hoc_scores_rank_without_touching_dataset() {
        let view = sample();
        let before = view.dataset().clone();

        let remote = project(&view, AdHocScore::Remote);
        assert_eq!(remote.rows.len(), 5);
        // Bangkok: 30 * 2 + 120 = 180, Lisbon: 80 * 2 + 10 = 170
        assert_eq!(names(&remote.top(Order::Descending, 2)), ["Bangkok", "Lisbon"]);

        let social = project(&view, AdHocScore::Social);
        assert_eq!(names(&social.top(Order::Descending, 1)), ["Nairobi"]);
        assert!((social.rows[0].value - (1000.0 * 0.7 + 20.0 * 10.0)).abs() < 1e-9);

        assert_eq!(*view.dataset(), before);
    }

    #[test]
    fn summary_of_view() {
        let view = sample();
        let s = Summary::of(&view);
        assert_eq!(s.countries, 4);
        assert_eq!(s.cities, 5);
        assert!((s.avg_rent.unwrap() - 640.0).abs() < 1e-9);
        assert_eq!(s.rent_trend(), Some(RentTrend::Moderate));
    }

    #[test]
    fn empty_view_yields_defined_results() {
        let ds = Arc::new(two_city_dataset());
        let mut f = FilterState::for_dataset(&ds);
        f.wifi_speed = 500.0..=600.0;
        let empty = apply(&ds, &f);

        let s = Summary::of(&empty);
        assert_eq!(s.cities, 0);
        assert_eq!(s.countries, 0);
        assert_eq!(s.avg_wifi_speed, None);
        assert_eq!(s.rent_trend(), None);
        assert!(top_n(&empty, Metric::WorkationScore, Order::Descending, TOP_N).is_empty());
        assert!(group_mean(&empty, GroupKey::Continent, Metric::CompositeScore).is_empty());
        assert!(project(&empty, AdHocScore::Social).rows.is_empty());
        assert!(expense_comparison(&empty, TOP_FEW).is_empty());
        assert_eq!(cost_breakdown(&empty, "A"), None);
        assert!(distinct_cities(&empty).is_empty());
    }

    #[test]
    fn rent_trend_thresholds() {
        assert_eq!(RentTrend::of(499.9), RentTrend::Low);
        assert_eq!(RentTrend::of(500.0), RentTrend::Moderate);
        assert_eq!(RentTrend::of(800.0), RentTrend::High);
    }

    #[test]
    fn cost_breakdown_sums_to_total_cost() {
        let view = sample();
        let b = cost_breakdown(&view, "Lisbon").unwrap();
        assert_eq!(b.items[4], (Expense::DailyRent, 30.0));
        let lisbon = view.rows().next().unwrap();
        assert!((b.total() - lisbon.total_cost).abs() < 1e-9);
        assert_eq!(cost_breakdown(&view, "Atlantis"), None);
    }

    #[test]
    fn expense_comparison_follows_workation_ranking() {
        let view = sample();
        let top = expense_comparison(&view, 2);
        let expected = names(&top_n(&view, Metric::WorkationScore, Order::Descending, 2));
        let got: Vec<String> = top.into_iter().map(|b| b.city).collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn distinct_cities_keeps_first_occurrence() {
        let view = view_of(
            prepare(vec![
                raw("Spain", "San Jose", 1.0, 1.0, 1.0),
                raw("USA", "Austin", 1.0, 1.0, 1.0),
                raw("USA", "San Jose", 1.0, 1.0, 1.0),
            ])
            .unwrap(),
        );
        assert_eq!(distinct_cities(&view), ["San Jose", "Austin"]);
    }

    #[test]
    fn overview_counts_full_dataset() {
        let view = sample();
        let o = DatasetOverview::of(view.dataset());
        assert_eq!(o, DatasetOverview { countries: 4, cities: 5 });
    }
}
