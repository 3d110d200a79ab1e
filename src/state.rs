use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use crate::color::ColorMap;
use crate::data::filter::{apply, FilterState, FilteredView, Selection};
use crate::data::model::{Continent, FullDataset};
use crate::data::query::distinct_cities;
use crate::data::source::DatasetSource;

// ---------------------------------------------------------------------------
// View choices
// ---------------------------------------------------------------------------

/// Display mode of the composite score panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompositeMode {
    TopCities,
    #[default]
    ByCountryAverage,
}

impl CompositeMode {
    pub const ALL: [CompositeMode; 2] = [CompositeMode::TopCities, CompositeMode::ByCountryAverage];

    pub fn label(self) -> &'static str {
        match self {
            CompositeMode::TopCities => "Top Cities",
            CompositeMode::ByCountryAverage => "By Country Average",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Insight {
    #[default]
    MostInstagrammed,
    AvgCoworkingPerCountry,
    ExpenseBreakdownTop5,
    WorstCities,
}

impl Insight {
    pub const ALL: [Insight; 4] = [
        Insight::MostInstagrammed,
        Insight::AvgCoworkingPerCountry,
        Insight::ExpenseBreakdownTop5,
        Insight::WorstCities,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Insight::MostInstagrammed => "Most Instagrammed Cities",
            Insight::AvgCoworkingPerCountry => "Avg Coworking Spaces per Country",
            Insight::ExpenseBreakdownTop5 => "Daily Expense Breakdown (Top 5 Cities)",
            Insight::WorstCities => "Worst Cities (Low Workation Score)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TravelerProfile {
    #[default]
    RemoteWorkers,
    BudgetTravelers,
    SocialExplorers,
}

impl TravelerProfile {
    pub const ALL: [TravelerProfile; 3] = [
        TravelerProfile::RemoteWorkers,
        TravelerProfile::BudgetTravelers,
        TravelerProfile::SocialExplorers,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TravelerProfile::RemoteWorkers => "Remote Workers",
            TravelerProfile::BudgetTravelers => "Budget Travelers",
            TravelerProfile::SocialExplorers => "Social Explorers",
        }
    }
}

// ---------------------------------------------------------------------------
// Session – everything tied to one loaded dataset
// ---------------------------------------------------------------------------

pub struct Session {
    pub dataset: Arc<FullDataset>,
    /// Current sidebar predicate values.
    pub filters: FilterState,
    /// Rows passing `filters`; rebuilt by [`Session::refilter`].
    pub view: FilteredView,
    pub country_colors: ColorMap,
    pub continent_colors: ColorMap,
}

impl Session {
    fn new(dataset: Arc<FullDataset>) -> Self {
        let continents: BTreeSet<String> = dataset
            .cities()
            .iter()
            .map(|c| c.continent)
            .chain([Continent::Other])
            .map(|c| c.label().to_string())
            .collect();
        Session {
            filters: FilterState::for_dataset(&dataset),
            view: FilteredView::all(Arc::clone(&dataset)),
            country_colors: ColorMap::new(dataset.countries()),
            continent_colors: ColorMap::new(&continents),
            dataset,
        }
    }

    /// Recompute the view after a filter change.
    pub fn refilter(&mut self) {
        self.view = apply(&self.dataset, &self.filters);
    }

    /// Add or remove one country. Removing the last one goes back to "all".
    pub fn toggle_country(&mut self, country: &str) {
        let mut selected = match &self.filters.countries {
            Selection::All => BTreeSet::new(),
            Selection::Only(set) => set.clone(),
        };
        if !selected.remove(country) {
            selected.insert(country.to_string());
        }
        self.filters.countries = Selection::countries(selected);
        self.refilter();
    }

    pub fn select_all_countries(&mut self) {
        self.filters.countries = Selection::All;
        self.refilter();
    }

    pub fn set_city(&mut self, city: Selection<String>) {
        self.filters.city = city;
        self.refilter();
    }

    /// Restore every control to its default.
    pub fn reset_filters(&mut self) {
        self.filters = FilterState::for_dataset(&self.dataset);
        self.refilter();
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Where the dataset comes from; owns the memoized load.
    pub source: DatasetSource,

    /// Loaded dataset with its filters (None until a load succeeds).
    pub session: Option<Session>,

    pub composite_mode: CompositeMode,
    pub insight: Insight,
    pub profile: TravelerProfile,

    /// City chosen for the daily cost breakdown.
    pub cost_city: Option<String>,

    /// Error message shown in the UI.
    pub status_message: Option<String>,

    /// Informational message (e.g. export result) shown in the UI.
    pub notice: Option<String>,
}

impl AppState {
    /// Bind the source and attempt the first load.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let mut state = Self {
            source: DatasetSource::new(path),
            session: None,
            composite_mode: CompositeMode::default(),
            insight: Insight::default(),
            profile: TravelerProfile::default(),
            cost_city: None,
            status_message: None,
            notice: None,
        };
        state.reload();
        state
    }

    /// Re-run the load. Filters survive when the source is unchanged.
    pub fn reload(&mut self) {
        match self.source.load() {
            Ok(dataset) => {
                let unchanged = self
                    .session
                    .as_ref()
                    .is_some_and(|s| Arc::ptr_eq(&s.dataset, &dataset));
                if !unchanged {
                    self.session = Some(Session::new(dataset));
                    self.cost_city = None;
                }
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to load {}: {e:#}", self.source.path().display());
                self.status_message = Some(format!("Error: {e}"));
                self.session = None;
            }
        }
    }

    /// Switch to another source file.
    pub fn open(&mut self, path: PathBuf) {
        self.source = DatasetSource::new(path);
        self.session = None;
        self.reload();
    }

    /// City whose daily costs are shown: the chosen one when it is still in
    /// the view, otherwise the first city of the view. `None` for an empty view.
    pub fn cost_breakdown_city(&self) -> Option<String> {
        let session = self.session.as_ref()?;
        let cities = distinct_cities(&session.view);
        self.cost_city
            .as_deref()
            .filter(|c| cities.contains(c))
            .or_else(|| cities.first().copied())
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const CSV: &str = "City,Country,WiFi Speed,Rent,Sunshine Hours,Coworking Spaces,\
Instagram Photos,Things To Do,Meal Price,Coffee Price,Beer Price,Taxi Price
Lisbon,Portugal,40,1300,2800,10,1500,500,10,1.5,2.5,5
Porto,Portugal,35,900,2500,6,800,200,8,1.2,2,4
Hanoi,Vietnam,30,500,1600,12,900,300,2,1,1,2
";

    fn source_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(CSV.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn first_load_shows_everything() {
        let file = source_file();
        let state = AppState::new(file.path());
        let session = state.session.as_ref().unwrap();
        assert_eq!(session.view.len(), 3);
        assert_eq!(state.status_message, None);
        assert_eq!(state.composite_mode, CompositeMode::ByCountryAverage);
    }

    #[test]
    fn toggling_countries_round_trips_to_all() {
        let file = source_file();
        let mut state = AppState::new(file.path());
        let session = state.session.as_mut().unwrap();

        session.toggle_country("Vietnam");
        assert_eq!(session.view.len(), 1);
        session.toggle_country("Portugal");
        assert_eq!(session.view.len(), 3);
        assert!(matches!(session.filters.countries, Selection::Only(ref s) if s.len() == 2));

        session.toggle_country("Vietnam");
        session.toggle_country("Portugal");
        assert_eq!(session.filters.countries, Selection::All);
        assert_eq!(session.view.len(), 3);
    }

    #[test]
    fn reload_of_unchanged_source_keeps_filters() {
        let file = source_file();
        let mut state = AppState::new(file.path());
        state.session.as_mut().unwrap().set_city(Selection::Only("Hanoi".into()));
        state.reload();
        let session = state.session.as_ref().unwrap();
        assert_eq!(session.view.len(), 1);

        state.session.as_mut().unwrap().reset_filters();
        assert_eq!(state.session.as_ref().unwrap().view.len(), 3);
    }

    #[test]
    fn reload_of_changed_source_resets_filters() {
        let file = source_file();
        let mut state = AppState::new(file.path());
        state.session.as_mut().unwrap().set_city(Selection::Only("Hanoi".into()));
        state.cost_city = Some("Hanoi".into());

        let mut appended = file.reopen().unwrap();
        let mut body = CSV.to_string();
        body.push_str("Tbilisi,Georgia,25,500,2200,8,700,150,6,1.1,1.5,3\n");
        appended.write_all(body.as_bytes()).unwrap();
        appended.flush().unwrap();

        state.reload();
        let session = state.session.as_ref().unwrap();
        assert_eq!(session.dataset.len(), 4);
        assert_eq!(session.view.len(), 4);
        assert_eq!(session.filters.city, Selection::All);
        assert_eq!(state.cost_city, None);
        assert_eq!(state.status_message, None);
    }

    #[test]
    fn open_switches_to_another_file() {
        let first = source_file();
        let mut state = AppState::new(first.path());
        state.session.as_mut().unwrap().toggle_country("Vietnam");
        state.cost_city = Some("Hanoi".into());

        let mut other = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        other
            .write_all(
                b"City,Country,WiFi Speed,Rent,Sunshine Hours,Coworking Spaces,\
Instagram Photos,Things To Do,Meal Price,Coffee Price,Beer Price,Taxi Price
Austin,USA,90,1900,2650,40,2500,900,15,4,6,12
",
            )
            .unwrap();
        other.flush().unwrap();

        state.open(other.path().to_path_buf());
        assert_eq!(state.source.path(), other.path());
        let session = state.session.as_ref().unwrap();
        assert_eq!(session.view.len(), 1);
        assert_eq!(session.filters.countries, Selection::All);
        assert_eq!(state.cost_breakdown_city().as_deref(), Some("Austin"));

        state.open("/nonexistent/other.csv".into());
        assert!(state.session.is_none());
        assert!(state.status_message.is_some());
    }

    #[test]
    fn failed_load_reports_status() {
        let state = AppState::new("/nonexistent/cities.csv");
        assert!(state.session.is_none());
        assert!(state.status_message.unwrap().starts_with("Error"));
    }

    #[test]
    fn cost_city_falls_back_to_first_in_view() {
        let file = source_file();
        let mut state = AppState::new(file.path());
        assert_eq!(state.cost_breakdown_city().as_deref(), Some("Lisbon"));

        state.cost_city = Some("Hanoi".into());
        assert_eq!(state.cost_breakdown_city().as_deref(), Some("Hanoi"));

        state.session.as_mut().unwrap().toggle_country("Portugal");
        assert_eq!(state.cost_breakdown_city().as_deref(), Some("Lisbon"));

        let session = state.session.as_mut().unwrap();
        session.filters.rent = 0.0..=1.0;
        session.refilter();
        assert_eq!(state.cost_breakdown_city(), None);
    }
}
