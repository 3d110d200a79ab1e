use eframe::egui::{self, RichText, ScrollArea, Ui};

use crate::color::{expense_color, sequential};
use crate::data::query::{
    cost_breakdown, distinct_cities, expense_comparison, group_mean, project, sort_groups, top_n,
    AdHocScore, DatasetOverview, GroupKey, Metric, Order, Summary, TOP_FEW, TOP_N,
};
use crate::state::{AppState, CompositeMode, Insight, Session, TravelerProfile};
use crate::ui::charts::{donut, expense_bars, group_bars, no_data, ranked_bars, Slice};
use crate::ui::table;

/// Hues for the continuous colour scales.
const HUE_SUN: f32 = 30.0;
const HUE_BLUE: f32 = 210.0;
const HUE_ORANGE: f32 = 25.0;

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render metrics and every chart from the current filtered view.
pub fn dashboard(ui: &mut Ui, state: &mut AppState) {
    let cost_city = state.cost_breakdown_city();
    let AppState {
        session,
        composite_mode,
        insight,
        profile,
        cost_city: chosen_cost_city,
        status_message,
        ..
    } = state;

    let Some(session) = session.as_ref() else {
        ui.centered_and_justified(|ui: &mut Ui| match status_message {
            Some(msg) => {
                ui.heading(RichText::new(msg.as_str()).color(egui::Color32::RED));
            }
            None => {
                ui.heading("Open a city table to start  (File → Open…)");
            }
        });
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            header(ui, session);
            metrics(ui, &Summary::of(&session.view));
            ui.separator();

            ui.columns(2, |cols| {
                best_cities(&mut cols[0], session);
                continent_average(&mut cols[1], session);
            });
            ui.separator();
            ui.columns(2, |cols| {
                sunniest_cities(&mut cols[0], session);
                daily_costs(&mut cols[1], session, cost_city.as_deref(), chosen_cost_city);
            });
            ui.separator();
            ui.columns(2, |cols| {
                composite_viewer(&mut cols[0], session, composite_mode);
                insights(&mut cols[1], session, insight);
            });
            ui.separator();
            traveler_profiles(ui, session, profile);
            ui.separator();

            egui::CollapsingHeader::new(RichText::new("Filtered cities").strong())
                .default_open(false)
                .show(ui, |ui: &mut Ui| table::cities_table(ui, &session.view));

            ui.add_space(8.0);
            ui.weak("Data source: Kaggle \"The Best Cities for a Workation\"");
        });
}

// ---------------------------------------------------------------------------
// Header & metrics
// ---------------------------------------------------------------------------

fn header(ui: &mut Ui, session: &Session) {
    ui.heading("Best Workation Cities Dashboard");
    ui.label(
        "Discover the world's best cities for combining work and leisure. Use the filters \
         on the left to narrow down by country, internet speed, rent, and sunshine hours.",
    );

    let overview = DatasetOverview::of(&session.dataset);
    egui::CollapsingHeader::new("About the Data & Scoring")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.label("Workation Score = WiFi × 2 + Sunshine Hours − (Rent × 0.01)");
            ui.label(
                "Composite Score = mean of min-max normalized WiFi Speed, Coworking Spaces, \
                 Sunshine per Day, inverse Rent and Instagram popularity, over the full dataset.",
            );
            ui.label("Rent is divided by 30 to approximate a daily cost.");
            ui.label(format!(
                "The dataset contains {} countries and {} cities.",
                overview.countries, overview.cities
            ));
        });
}

fn metric(ui: &mut Ui, label: &str, value: String, delta: Option<&str>) {
    ui.vertical(|ui: &mut Ui| {
        ui.weak(label);
        ui.label(RichText::new(value).size(22.0).strong());
        if let Some(delta) = delta {
            ui.small(delta);
        }
    });
}

fn fmt_avg(value: Option<f64>, fmt: impl Fn(f64) -> String) -> String {
    value.map(fmt).unwrap_or_else(|| "–".to_string())
}

fn metrics(ui: &mut Ui, summary: &Summary) {
    ui.columns(5, |cols| {
        metric(&mut cols[0], "Countries", summary.countries.to_string(), None);
        metric(&mut cols[1], "Cities", summary.cities.to_string(), None);
        metric(
            &mut cols[2],
            "Avg WiFi",
            fmt_avg(summary.avg_wifi_speed, |v| format!("{v:.1} Mbps")),
            None,
        );
        metric(
            &mut cols[3],
            "Avg Rent",
            fmt_avg(summary.avg_rent, |v| format!("${v:.0}")),
            summary.rent_trend().map(|t| t.label()),
        );
        metric(
            &mut cols[4],
            "Avg Sunshine",
            fmt_avg(summary.avg_sunshine_hours, |v| format!("{v:.0} hrs")),
            None,
        );
    });
}

// ---------------------------------------------------------------------------
// Row 1
// ---------------------------------------------------------------------------

fn best_cities(ui: &mut Ui, session: &Session) {
    ui.strong("Best Workation Cities");
    ui.small(
        "Fast internet, plenty of sunshine and lower rent. A higher Workation Score means \
         the city is more suitable for remote work.",
    );
    let top = top_n(&session.view, Metric::WorkationScore, Order::Descending, TOP_N);
    ranked_bars(ui, "best_cities", &top, Metric::WorkationScore.label(), |s| {
        session.country_colors.color_for(&s.city.country)
    });
}

fn continent_average(ui: &mut Ui, session: &Session) {
    ui.strong("Average Score by Continent");
    ui.small("Average composite score of cities grouped by continent.");
    let slices: Vec<Slice> = group_mean(&session.view, GroupKey::Continent, Metric::CompositeScore)
        .into_iter()
        .map(|g| Slice {
            color: session.continent_colors.color_for(&g.key),
            label: g.key,
            value: g.mean,
        })
        .collect();
    donut(ui, &slices);
}

// ---------------------------------------------------------------------------
// Row 2
// ---------------------------------------------------------------------------

fn sunniest_cities(ui: &mut Ui, session: &Session) {
    ui.strong("Sunniest Cities");
    ui.small("Cities with the most hours of sunshine per year.");
    let top = top_n(&session.view, Metric::SunshineHours, Order::Descending, TOP_N);
    let (lo, hi) = session.dataset.bounds().sunshine_hours.clone().into_inner();
    let span = (hi - lo).max(f64::EPSILON);
    ranked_bars(ui, "sunniest", &top, Metric::SunshineHours.label(), |s| {
        sequential(HUE_SUN, (s.value - lo) / span)
    });
}

fn daily_costs(ui: &mut Ui, session: &Session, city: Option<&str>, chosen: &mut Option<String>) {
    ui.strong("Daily Cost Breakdown");
    ui.small("Estimated share of daily spending. Rent is divided by 30.");

    let Some(city) = city else {
        no_data(ui);
        return;
    };

    egui::ComboBox::from_id_salt("cost_city")
        .selected_text(city)
        .show_ui(ui, |ui: &mut Ui| {
            for name in distinct_cities(&session.view) {
                if ui.selectable_label(name == city, name).clicked() {
                    *chosen = Some(name.to_string());
                }
            }
        });

    match cost_breakdown(&session.view, city) {
        Some(breakdown) => {
            let slices: Vec<Slice> = breakdown
                .items
                .iter()
                .map(|&(expense, value)| Slice {
                    label: expense.label().to_string(),
                    value,
                    color: expense_color(expense),
                })
                .collect();
            donut(ui, &slices);
            ui.label(
                RichText::new(format!(
                    "Total estimated daily cost in {}: ${:.2}",
                    breakdown.city,
                    breakdown.total()
                ))
                .strong(),
            );
        }
        None => no_data(ui),
    }
}

// ---------------------------------------------------------------------------
// Row 3
// ---------------------------------------------------------------------------

fn composite_viewer(ui: &mut Ui, session: &Session, mode: &mut CompositeMode) {
    ui.strong("Composite Score Viewer");
    ui.small("Higher scores indicate a better overall destination for a balanced workation.");
    ui.horizontal(|ui: &mut Ui| {
        for m in CompositeMode::ALL {
            ui.radio_value(mode, m, m.label());
        }
    });

    match mode {
        CompositeMode::TopCities => {
            let top = top_n(&session.view, Metric::CompositeScore, Order::Descending, TOP_N);
            ranked_bars(ui, "composite_top", &top, Metric::CompositeScore.label(), |s| {
                session.country_colors.color_for(&s.city.country)
            });
        }
        CompositeMode::ByCountryAverage => {
            let groups = sort_groups(
                group_mean(&session.view, GroupKey::Country, Metric::CompositeScore),
                Order::Descending,
            );
            group_bars(ui, "composite_country", &groups, Metric::CompositeScore.label(), HUE_ORANGE);
        }
    }
}

fn insights(ui: &mut Ui, session: &Session, insight: &mut Insight) {
    ui.strong("Explore Other Insights");
    egui::ComboBox::from_id_salt("insight")
        .selected_text(insight.label())
        .show_ui(ui, |ui: &mut Ui| {
            for i in Insight::ALL {
                ui.selectable_value(insight, i, i.label());
            }
        });

    let country_color = |s: &crate::data::query::Scored<'_>| {
        session.country_colors.color_for(&s.city.country)
    };
    match insight {
        Insight::MostInstagrammed => {
            ui.small("Cities with the most Instagram photos, reflecting social media popularity.");
            let top = top_n(&session.view, Metric::InstagramPhotos, Order::Descending, TOP_N);
            ranked_bars(ui, "instagram", &top, Metric::InstagramPhotos.label(), country_color);
        }
        Insight::AvgCoworkingPerCountry => {
            ui.small("Average number of coworking spaces per country.");
            let groups = sort_groups(
                group_mean(&session.view, GroupKey::Country, Metric::CoworkingSpaces),
                Order::Ascending,
            );
            group_bars(ui, "coworking", &groups, Metric::CoworkingSpaces.label(), HUE_BLUE);
        }
        Insight::ExpenseBreakdownTop5 => {
            ui.small("Estimated daily living costs of the 5 cities with the highest Workation Score.");
            expense_bars(ui, "expenses", &expense_comparison(&session.view, TOP_FEW));
        }
        Insight::WorstCities => {
            ui.small("Lowest Workation Scores: slow WiFi, high rent or little sunshine.");
            let worst = top_n(&session.view, Metric::WorkationScore, Order::Ascending, TOP_N);
            ranked_bars(ui, "worst", &worst, Metric::WorkationScore.label(), country_color);
        }
    }
}

// ---------------------------------------------------------------------------
// Traveler profiles
// ---------------------------------------------------------------------------

fn traveler_profiles(ui: &mut Ui, session: &Session, profile: &mut TravelerProfile) {
    ui.heading("Recommendations by traveler profile");
    ui.horizontal(|ui: &mut Ui| {
        for p in TravelerProfile::ALL {
            ui.selectable_value(profile, p, p.label());
        }
    });

    let country_color = |s: &crate::data::query::Scored<'_>| {
        session.country_colors.color_for(&s.city.country)
    };
    match profile {
        TravelerProfile::RemoteWorkers => {
            ui.small("High internet speed and coworking availability.");
            let remote = project(&session.view, AdHocScore::Remote);
            let top = remote.top(Order::Descending, TOP_N);
            ranked_bars(ui, "remote", &top, remote.score.label(), country_color);
        }
        TravelerProfile::BudgetTravelers => {
            ui.small("Most affordable cities by total daily living cost.");
            let cheapest = top_n(&session.view, Metric::TotalCost, Order::Ascending, TOP_N);
            ranked_bars(ui, "budget", &cheapest, Metric::TotalCost.label(), country_color);
        }
        TravelerProfile::SocialExplorers => {
            ui.small("Strong social appeal: Instagram activity and number of attractions.");
            let social = project(&session.view, AdHocScore::Social);
            let top = social.top(Order::Descending, TOP_N);
            ranked_bars(ui, "social", &top, social.score.label(), country_color);
        }
    }
}
