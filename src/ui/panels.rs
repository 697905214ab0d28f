use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, Ui};
use rusty_mandate::color::{bucket_color, RegionColors};
use rusty_mandate::data::filter::{TURNOUT_CEILING, TURNOUT_FLOOR};
use rusty_mandate::data::model::Bucket;
use rusty_mandate::state::{AppState, SessionState};

use super::ViewMode;

// ---------------------------------------------------------------------------
// Left side panel – navigation and filter widgets
// ---------------------------------------------------------------------------

/// Render the left panel: page selector, then the global filters.
pub fn side_panel(ui: &mut Ui, state: &mut AppState, mode: &mut ViewMode) {
    ui.heading("🗳 Election Analytics");
    ui.label("Constituency-wise analysis of the assembly result.");
    ui.separator();

    ui.strong("Navigate to:");
    for m in ViewMode::ALL {
        ui.radio_value(mode, m, m.label());
    }
    ui.separator();

    ui.heading("Global Filters");

    let (Some(dataset), Some(selection)) = (state.dataset.clone(), state.selection.clone()) else {
        ui.label("No dataset loaded.");
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Regions ----
            let n_selected = selection.regions.len();
            let n_total = dataset.regions().len();
            egui::CollapsingHeader::new(
                RichText::new(format!("Region  ({n_selected}/{n_total})")).strong(),
            )
            .id_salt("regions")
            .default_open(true)
            .show(ui, |ui: &mut Ui| {
                ui.horizontal(|ui: &mut Ui| {
                    if ui.small_button("All").clicked() {
                        state.select_all_regions(true);
                    }
                    if ui.small_button("None").clicked() {
                        state.select_all_regions(false);
                    }
                });
                let colors = RegionColors::new(dataset.regions());
                for region in dataset.regions() {
                    let mut checked = selection.regions.contains(region);
                    let text = RichText::new(region.as_str()).color(colors.color_for(region));
                    if ui.checkbox(&mut checked, text).changed() {
                        state.toggle_region(region);
                    }
                }
            });

            // ---- Winning party bucket ----
            egui::CollapsingHeader::new(RichText::new("Winning Party (Bucket)").strong())
                .id_salt("buckets")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    for bucket in Bucket::DISPLAY_ORDER {
                        let mut checked = selection.buckets.contains(&bucket);
                        let text = RichText::new(bucket.label()).color(bucket_color(bucket));
                        if ui.checkbox(&mut checked, text).changed() {
                            state.toggle_bucket(bucket);
                        }
                    }
                });

            // ---- Turnout range ----
            ui.strong("Voter Turnout Range (%)");
            let mut lo = selection.turnout_min;
            let mut hi = selection.turnout_max;
            let lo_changed = ui
                .add(Slider::new(&mut lo, TURNOUT_FLOOR..=TURNOUT_CEILING).step_by(0.5).text("min"))
                .changed();
            let hi_changed = ui
                .add(Slider::new(&mut hi, TURNOUT_FLOOR..=TURNOUT_CEILING).step_by(0.5).text("max"))
                .changed();
            if lo_changed || hi_changed {
                state.set_turnout_range(lo, hi);
            }

            ui.separator();
            let coerced = dataset.coercions().total();
            if coerced > 0 {
                ui.label(
                    RichText::new(format!("{coerced} non-numeric cells replaced by defaults"))
                        .small()
                        .weak(),
                );
            }
        });
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
            let can_export = state.state == SessionState::Filtered;
            if ui
                .add_enabled(can_export, egui::Button::new("Export filtered CSV…"))
                .clicked()
            {
                save_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            let visible = state.view.as_ref().map_or(0, |v| v.filtered.len());
            ui.label(format!(
                "{}: {} constituencies loaded, {} in view",
                ds.name,
                ds.len(),
                visible
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::LIGHT_GREEN));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open election results")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.load(&path);
        if let Some(ds) = &state.dataset {
            log::info!("Opened {} with regions {:?}", ds.name, ds.regions());
        }
    }
}

pub fn save_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export filtered view")
        .set_file_name(state.export_file_name())
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        if let Err(e) = state.export_to(&path) {
            log::error!("Export failed: {e:#}");
            state.status_message = Some(format!("Export failed: {e:#}"));
        }
    }
}
