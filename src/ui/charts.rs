use std::f32::consts::{FRAC_PI_2, TAU};

use eframe::egui::{self, Color32, RichText, Sense, Shape, Stroke, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot};

use crate::color::{expense_color, sequential};
use crate::data::query::{CostBreakdown, Expense, GroupMean, Scored};

const CHART_HEIGHT: f32 = 280.0;
const DONUT_SIZE: f32 = 200.0;
/// Fraction of the donut radius left empty in the middle.
const DONUT_HOLE: f32 = 0.4;

// ---------------------------------------------------------------------------
// Horizontal bar charts
// ---------------------------------------------------------------------------

/// Label for an axis tick at an integer position in `1..=labels.len()`.
fn tick_label(labels: &[String], value: f64) -> String {
    let pos = value.round();
    if (value - pos).abs() > 1e-6 || pos < 1.0 || pos > labels.len() as f64 {
        return String::new();
    }
    labels[pos as usize - 1].clone()
}

/// One bar per row, first row at the top.
pub fn ranked_bars(
    ui: &mut Ui,
    id: &str,
    rows: &[Scored<'_>],
    value_label: &str,
    color: impl Fn(&Scored<'_>) -> Color32,
) {
    if rows.is_empty() {
        no_data(ui);
        return;
    }

    let n = rows.len();
    // Bottom-up so the first row lands on the highest tick.
    let labels: Vec<String> = rows.iter().rev().map(|s| s.city.city.clone()).collect();
    let bars: Vec<Bar> = rows
        .iter()
        .enumerate()
        .map(|(i, s)| {
            Bar::new((n - i) as f64, s.value)
                .name(format!("{} ({})", s.city.city, s.city.country))
                .fill(color(s))
                .width(0.7)
        })
        .collect();

    Plot::new(id)
        .height(CHART_HEIGHT)
        .x_axis_label(value_label)
        .y_axis_formatter(move |mark, _| tick_label(&labels, mark.value))
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal().name(value_label));
        });
}

/// One bar per group, first group at the top, shaded by value.
pub fn group_bars(ui: &mut Ui, id: &str, groups: &[GroupMean], value_label: &str, hue: f32) {
    if groups.is_empty() {
        no_data(ui);
        return;
    }

    let n = groups.len();
    let (min, max) = groups.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), g| {
        (lo.min(g.mean), hi.max(g.mean))
    });
    let span = (max - min).max(f64::EPSILON);

    let labels: Vec<String> = groups.iter().rev().map(|g| g.key.clone()).collect();
    let bars: Vec<Bar> = groups
        .iter()
        .enumerate()
        .map(|(i, g)| {
            Bar::new((n - i) as f64, g.mean)
                .name(format!("{} ({} cities)", g.key, g.count))
                .fill(sequential(hue, (g.mean - min) / span))
                .width(0.7)
        })
        .collect();

    Plot::new(id)
        .height(CHART_HEIGHT.max(18.0 * n as f32))
        .x_axis_label(value_label)
        .y_axis_formatter(move |mark, _| tick_label(&labels, mark.value))
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal().name(value_label));
        });
}

/// Grouped vertical bars: one cluster per city, one bar per expense.
pub fn expense_bars(ui: &mut Ui, id: &str, breakdowns: &[CostBreakdown]) {
    if breakdowns.is_empty() {
        no_data(ui);
        return;
    }

    let labels: Vec<String> = breakdowns.iter().map(|b| b.city.clone()).collect();
    let width = 0.8 / Expense::ALL.len() as f64;

    Plot::new(id)
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .y_axis_label("Cost")
        .x_axis_formatter(move |mark, _| tick_label(&labels, mark.value))
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (j, expense) in Expense::ALL.into_iter().enumerate() {
                let offset = (j as f64 - (Expense::ALL.len() - 1) as f64 / 2.0) * width;
                let bars = breakdowns
                    .iter()
                    .enumerate()
                    .map(|(i, b)| {
                        Bar::new(1.0 + i as f64 + offset, b.items[j].1)
                            .name(format!("{}: {}", b.city, expense.label()))
                            .width(width * 0.9)
                    })
                    .collect();
                plot_ui.bar_chart(
                    BarChart::new(bars)
                        .color(expense_color(expense))
                        .name(expense.label()),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Donut chart
// ---------------------------------------------------------------------------

pub struct Slice {
    pub label: String,
    pub value: f64,
    pub color: Color32,
}

/// Fraction of the ring each slice takes. All zeros when nothing is positive.
fn shares(slices: &[Slice]) -> Vec<f64> {
    let total: f64 = slices.iter().map(|s| s.value.max(0.0)).sum();
    slices
        .iter()
        .map(|s| if total > 0.0 { s.value.max(0.0) / total } else { 0.0 })
        .collect()
}

/// A ring split proportionally to `slices`, with a legend beside it.
/// Slices that are all zero still get their legend over an empty ring.
pub fn donut(ui: &mut Ui, slices: &[Slice]) {
    if slices.is_empty() {
        no_data(ui);
        return;
    }
    let shares = shares(slices);

    ui.horizontal(|ui| {
        let (rect, _) = ui.allocate_exact_size(egui::vec2(DONUT_SIZE, DONUT_SIZE), Sense::hover());
        let painter = ui.painter_at(rect);
        let outer = DONUT_SIZE / 2.0 - 4.0;
        let thickness = outer * (1.0 - DONUT_HOLE);
        let mid = outer - thickness / 2.0;

        if shares.iter().all(|&f| f == 0.0) {
            painter.circle_stroke(rect.center(), mid, Stroke::new(1.0, Color32::GRAY));
        }

        let mut start = -FRAC_PI_2;
        for (slice, &share) in slices.iter().zip(&shares) {
            if share == 0.0 {
                continue;
            }
            let sweep = share as f32 * TAU;
            let steps = ((sweep / 0.05).ceil() as usize).max(2);
            let points: Vec<egui::Pos2> = (0..=steps)
                .map(|k| {
                    let a = start + sweep * k as f32 / steps as f32;
                    rect.center() + mid * egui::vec2(a.cos(), a.sin())
                })
                .collect();
            painter.add(Shape::line(points, Stroke::new(thickness, slice.color)));
            start += sweep;
        }

        ui.vertical(|ui| {
            for (slice, share) in slices.iter().zip(&shares) {
                ui.label(
                    RichText::new(format!(
                        "■ {}  {:.2} ({:.1}%)",
                        slice.label,
                        slice.value,
                        100.0 * share
                    ))
                    .color(slice.color),
                );
            }
        });
    });
}

pub fn no_data(ui: &mut Ui) {
    ui.weak("No data for the current filters.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_labels_only_on_integer_positions() {
        let labels = vec!["Bottom".to_string(), "Top".to_string()];
        assert_eq!(tick_label(&labels, 1.0), "Bottom");
        assert_eq!(tick_label(&labels, 2.0), "Top");
        assert_eq!(tick_label(&labels, 1.5), "");
        assert_eq!(tick_label(&labels, 0.0), "");
        assert_eq!(tick_label(&labels, 3.0), "");
    }

    fn slice(value: f64) -> Slice {
        Slice {
            label: "Europe".to_string(),
            value,
            color: Color32::GRAY,
        }
    }

    #[test]
    fn shares_split_the_ring() {
        let s = shares(&[slice(1.0), slice(3.0)]);
        assert!((s[0] - 0.25).abs() < 1e-12);
        assert!((s[1] - 0.75).abs() < 1e-12);
    }

    #[test]
    fn zero_slices_keep_their_entries() {
        assert_eq!(shares(&[slice(0.0), slice(0.0)]), vec![0.0, 0.0]);
        assert!(shares(&[]).is_empty());
    }
}
