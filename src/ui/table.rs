use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::data::filter::FilteredView;
use crate::data::model::CityRecord;

const ROW_HEIGHT: f32 = 18.0;

const HEADERS: [&str; 10] = [
    "City",
    "Country",
    "Continent",
    "WiFi Speed",
    "Rent",
    "Sunshine Hours",
    "Coworking",
    "Workation Score",
    "Total Cost",
    "Composite Score",
];

fn cell_text(column: usize, c: &CityRecord) -> String {
    match column {
        0 => c.city.clone(),
        1 => c.country.clone(),
        2 => c.continent.to_string(),
        3 => format!("{:.0}", c.wifi_speed),
        4 => format!("{:.0}", c.rent),
        5 => format!("{:.0}", c.sunshine_hours),
        6 => format!("{:.0}", c.coworking_spaces),
        7 => format!("{:.1}", c.workation_score),
        8 => format!("{:.2}", c.total_cost),
        _ => format!("{:.3}", c.composite_score),
    }
}

/// Scrollable table of the rows in the view, source order.
pub fn cities_table(ui: &mut Ui, view: &FilteredView) {
    if view.is_empty() {
        ui.weak("No cities match the current filters.");
        return;
    }
    let rows: Vec<&CityRecord> = view.rows().collect();

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .max_scroll_height(360.0)
        .columns(Column::auto().at_least(60.0), HEADERS.len())
        .header(ROW_HEIGHT + 4.0, |mut header| {
            for title in HEADERS {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                let city = rows[row.index()];
                for column in 0..HEADERS.len() {
                    row.col(|ui| {
                        ui.label(cell_text(column, city));
                    });
                }
            });
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::prepare::tests::two_city_dataset;

    #[test]
    fn cells_follow_header_order() {
        let ds = two_city_dataset();
        let a = &ds.cities()[0];
        assert_eq!(cell_text(0, a), "A");
        assert_eq!(cell_text(2, a), "Europe");
        assert_eq!(cell_text(7, a), "2195.0");
    }
}
