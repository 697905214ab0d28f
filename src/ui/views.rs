use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};
use rusty_mandate::data::aggregate::{self, margin_distribution};
use rusty_mandate::data::filter::rows_in_region;
use rusty_mandate::data::model::Bucket;
use rusty_mandate::state::{AppState, SessionError, SessionState};
use rusty_mandate::view::{
    constituency_table, donut_slices, scatter_points, seat_matrix_table, seat_share_series,
    MarginOrder, Table, ViewBundle,
};

use super::{plot, ViewMode};

/// Render the central panel for the current session state.
pub fn central(ui: &mut Ui, state: &AppState, mode: ViewMode, selected_region: &mut Option<String>) {
    match &state.state {
        SessionState::Loading | SessionState::Ready => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.spinner();
            });
        }
        SessionState::Error(SessionError::Load(msg)) => {
            ui.heading(RichText::new("Could not load the dataset").color(Color32::RED));
            ui.label(msg.as_str());
            ui.label("Fix the source file and use File → Reload, or open another file.");
        }
        SessionState::Error(SessionError::NoMatches) => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading(
                    RichText::new("No data matches the current filters. Relax the filters in the sidebar.")
                        .color(Color32::RED),
                );
            });
        }
        SessionState::Filtered => {
            let Some(view) = &state.view else {
                return;
            };
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| match mode {
                    ViewMode::ExecutiveSummary => executive_summary(ui, view),
                    ViewMode::RegionalDeepDive => regional_deep_dive(ui, view, selected_region),
                    ViewMode::ConstituencyAnalysis => constituency_analysis(ui, view),
                });
        }
    }
}

fn metric(ui: &mut Ui, label: &str, value: String, delta: Option<String>) {
    ui.vertical(|ui: &mut Ui| {
        ui.label(RichText::new(label).small().weak());
        ui.heading(value);
        if let Some(delta) = delta {
            ui.label(RichText::new(delta).color(Color32::LIGHT_GREEN));
        }
    });
}

fn table(ui: &mut Ui, id: &str, table: &Table) {
    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .columns(Column::auto().at_least(60.0), table.headers.len())
            .header(20.0, |mut header| {
                for h in &table.headers {
                    header.col(|ui| {
                        ui.strong(h.as_str());
                    });
                }
            })
            .body(|mut body| {
                for cells in &table.rows {
                    body.row(18.0, |mut row| {
                        for cell in cells {
                            row.col(|ui| {
                                ui.label(cell.as_str());
                            });
                        }
                    });
                }
            });
    });
}

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

fn executive_summary(ui: &mut Ui, view: &ViewBundle) {
    let s = &view.summaries;
    ui.heading("Executive Summary");
    ui.label(RichText::new("Statewide figures use the full dataset; everything else follows the filters.").weak());

    ui.columns(4, |cols| {
        let count = |b: Bucket| s.bucket_counts_state.get(&b).copied().unwrap_or(0);
        metric(
            &mut cols[0],
            "Government Formed By (Statewide)",
            s.governing_bucket.map_or("-".to_string(), |b| b.to_string()),
            s.government_status.map(|g| g.to_string()),
        );
        metric(&mut cols[1], "INC Seats (Statewide)", count(Bucket::Inc).to_string(), None);
        metric(&mut cols[2], "BJP Seats (Statewide)", count(Bucket::Bjp).to_string(), None);
        metric(
            &mut cols[3],
            "Avg Turnout (Filtered View)",
            s.mean_turnout.map_or("-".to_string(), |t| format!("{t:.2}%")),
            Some(format!("Majority mark: {}", s.majority_threshold)),
        );
    });
    ui.separator();

    ui.heading("Seat Matrix by Region (Filtered Scope)");
    table(ui, "seat_matrix", &seat_matrix_table(&s.regional_matrix));
    ui.separator();

    ui.columns(2, |cols| {
        cols[0].heading("Assembly Composition by Region – Filtered");
        plot::region_composition(&mut cols[0], &s.regional_matrix);
        cols[1].heading("Seat Share – Filtered");
        plot::seat_share_slices(&mut cols[1], &donut_slices(&s.comparative_seat_share));
    });

    ui.heading("Statewide vs Filtered Seat Share");
    plot::seat_share_comparison(ui, &seat_share_series(&s.comparative_seat_share));
}

fn regional_deep_dive(ui: &mut Ui, view: &ViewBundle, selected_region: &mut Option<String>) {
    ui.heading("Regional Performance Deep-Dive");

    let regions = aggregate::regions(&view.filtered);
    let mut picked = match selected_region.as_ref() {
        Some(r) if regions.contains(r) => r.clone(),
        _ => match regions.first() {
            Some(r) => r.clone(),
            None => return,
        },
    };
    egui::ComboBox::from_label("Select Region")
        .selected_text(picked.clone())
        .show_ui(ui, |ui: &mut Ui| {
            for r in &regions {
                ui.selectable_value(&mut picked, r.clone(), r.as_str());
            }
        });
    *selected_region = Some(picked.clone());

    let regional: Vec<_> = rows_in_region(&view.filtered, &picked)
        .into_iter()
        .cloned()
        .collect();

    ui.columns(2, |cols| {
        cols[0].heading(format!("Party Strength in {picked}"));
        plot::bucket_histogram(&mut cols[0], &aggregate::bucket_counts(&regional));
        cols[1].heading("Victory Margin Distribution");
        plot::margin_boxes(&mut cols[1], &margin_distribution(&regional));
    });

    ui.separator();
    ui.heading(format!("Constituency List – {picked}"));
    table(ui, "region_list", &constituency_table(&regional, MarginOrder::Descending));
}

fn constituency_analysis(ui: &mut Ui, view: &ViewBundle) {
    let s = &view.summaries;
    ui.heading("Micro-Analysis: Safe vs Swing Seats");

    plot::margin_vs_turnout(
        ui,
        &scatter_points(&view.filtered),
        s.swing_vs_safe.threshold,
        s.median_turnout,
    );

    let split = &s.swing_vs_safe;
    ui.columns(3, |cols| {
        metric(&mut cols[0], "Total Seats (Filtered)", s.total_seats_filtered.to_string(), None);
        metric(
            &mut cols[1],
            &format!("Close Contests (<{})", split.threshold),
            split.swing_count.to_string(),
            None,
        );
        metric(
            &mut cols[2],
            &format!("Safe Seats (≥{})", split.threshold),
            split.safe_count.to_string(),
            None,
        );
    });

    ui.separator();
    ui.heading("Raw Data Explorer (Filtered)");
    ui.collapsing("Click to view full filtered dataset", |ui: &mut Ui| {
        table(ui, "raw_explorer", &constituency_table(&view.filtered, MarginOrder::Ascending));
    });
}
