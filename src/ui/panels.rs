use std::ops::RangeInclusive;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::export::{export_to_path, EXPORT_FILE_NAME, EXPORT_MIME};
use crate::data::filter::Selection;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Workation Explorer");
    ui.weak("Find your perfect balance between work & travel");
    ui.separator();

    let Some(session) = state.session.as_mut() else {
        ui.label("No dataset loaded.");
        return;
    };

    // Clone what we need so we can mutate the session inside the closures.
    let countries = session.dataset.countries().clone();
    let city_names = session.dataset.city_names().clone();
    let bounds = session.dataset.bounds().clone();
    let mut export_requested = false;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            egui::CollapsingHeader::new(RichText::new("Location Filter").strong())
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    // ---- Countries (multi-select) ----
                    let n_selected = match &session.filters.countries {
                        Selection::All => countries.len(),
                        Selection::Only(set) => set.len(),
                    };
                    egui::CollapsingHeader::new(format!(
                        "Countries  ({n_selected}/{})",
                        countries.len()
                    ))
                    .id_salt("countries")
                    .default_open(false)
                    .show(ui, |ui: &mut Ui| {
                        let mut all = session.filters.countries == Selection::All;
                        if ui.checkbox(&mut all, "All").changed() && all {
                            session.select_all_countries();
                        }
                        for country in &countries {
                            let mut checked = match &session.filters.countries {
                                Selection::All => false,
                                Selection::Only(set) => set.contains(country),
                            };
                            let text = RichText::new(country)
                                .color(session.country_colors.color_for(country));
                            if ui.checkbox(&mut checked, text).changed() {
                                session.toggle_country(country);
                            }
                        }
                    });

                    // ---- City (single select) ----
                    ui.label("Specific city (optional):");
                    let current = match &session.filters.city {
                        Selection::All => "All".to_string(),
                        Selection::Only(name) => name.clone(),
                    };
                    egui::ComboBox::from_id_salt("city_filter")
                        .selected_text(current.as_str())
                        .show_ui(ui, |ui: &mut Ui| {
                            if ui
                                .selectable_label(session.filters.city == Selection::All, "All")
                                .clicked()
                            {
                                session.set_city(Selection::All);
                            }
                            for name in &city_names {
                                if ui.selectable_label(current == *name, name.as_str()).clicked() {
                                    session.set_city(Selection::Only(name.clone()));
                                }
                            }
                        });
                });

            egui::CollapsingHeader::new(RichText::new("Environment Preferences").strong())
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    let filters = &mut session.filters;
                    let mut changed =
                        range_slider(ui, "WiFi Speed (Mbps)", &mut filters.wifi_speed, &bounds.wifi_speed);
                    changed |= range_slider(ui, "Rent (USD)", &mut filters.rent, &bounds.rent);
                    changed |= range_slider(
                        ui,
                        "Sunshine Hours",
                        &mut filters.sunshine_hours,
                        &bounds.sunshine_hours,
                    );
                    if changed {
                        session.refilter();
                    }
                });

            if ui.button("Reset filters").clicked() {
                session.reset_filters();
            }

            ui.separator();
            ui.strong("Download your selection");
            if session.view.is_empty() {
                ui.weak("Nothing to export.");
            } else if ui
                .button("Download CSV")
                .on_hover_text(format!("{EXPORT_FILE_NAME} ({EXPORT_MIME})"))
                .clicked()
            {
                export_requested = true;
            }
        });

    if export_requested {
        export_dialog(state);
    }
}

/// Two sliders bounding a closed interval. Returns whether it changed.
fn range_slider(
    ui: &mut Ui,
    label: &str,
    range: &mut RangeInclusive<f64>,
    bounds: &RangeInclusive<f64>,
) -> bool {
    let (mut lo, mut hi) = (*range.start(), *range.end());
    ui.label(label);
    let mut changed = ui
        .add(egui::Slider::new(&mut lo, bounds.clone()).text("min"))
        .changed();
    changed |= ui
        .add(egui::Slider::new(&mut hi, bounds.clone()).text("max"))
        .changed();
    if changed {
        *range = lo.min(hi)..=lo.max(hi);
    }
    changed
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                state.reload();
                ui.close_menu();
            }
            let can_export = state.session.as_ref().is_some_and(|s| !s.view.is_empty());
            if ui
                .add_enabled(can_export, egui::Button::new("Export CSV…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(session) = &state.session {
            ui.label(format!(
                "{} cities loaded, {} visible",
                session.dataset.len(),
                session.view.len()
            ));
        }

        ui.separator();

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        } else if let Some(msg) = &state.notice {
            ui.label(msg.as_str());
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open city table")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.notice = None;
        state.open(path);
    }
}

pub fn export_dialog(state: &mut AppState) {
    let Some(session) = &state.session else {
        return;
    };
    let file = rfd::FileDialog::new()
        .set_title("Export filtered cities")
        .set_file_name(EXPORT_FILE_NAME)
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        match export_to_path(&session.view, &path) {
            Ok(()) => {
                state.notice = Some(format!(
                    "Exported {} cities to {}",
                    session.view.len(),
                    path.display()
                ));
            }
            Err(e) => {
                log::error!("Failed to export: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
