use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use crate::data::filter::{DateRange, PostTypeFilter};
use crate::state::{AppState, Status};
use crate::ui::{plot, summary, table};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let table = match &state.table {
        Some(t) => t,
        None => {
            ui.label("No file loaded.");
            return;
        }
    };

    // Widgets edit a copy; the state only changes through `apply_view`.
    let mut next = state.view.clone();

    if table.columns.post_type {
        ui.strong("Post Type");
        let selected = next.post_type.label().to_string();
        egui::ComboBox::from_id_salt("post_type")
            .selected_text(selected)
            .show_ui(ui, |ui: &mut Ui| {
                ui.selectable_value(&mut next.post_type, PostTypeFilter::All, "All");
                for post_type in table.post_types() {
                    let label = post_type.clone();
                    ui.selectable_value(&mut next.post_type, PostTypeFilter::Only(post_type), label);
                }
            });
        ui.separator();
    }

    if let (Some(range), Some((first, last))) = (next.date_range.as_mut(), table.date_bounds()) {
        ui.strong("Date Range");
        egui::Grid::new("date_range").num_columns(2).show(ui, |ui: &mut Ui| {
            ui.label("From");
            ui.add(DatePickerButton::new(&mut range.start).id_salt("date_from"));
            ui.end_row();
            ui.label("To");
            ui.add(DatePickerButton::new(&mut range.end).id_salt("date_to"));
            ui.end_row();
        });
        // Keep the range inside the data and ordered.
        range.start = range.start.clamp(first, last);
        range.end = range.end.clamp(range.start, last);

        if ui.small_button("Reset dates").clicked() {
            *range = DateRange {
                start: first,
                end: last,
            };
        }
        ui.separator();
    }

    if let Some(dash) = &state.dashboard {
        ui.label(format!("{} of {} posts selected", dash.filtered.len(), table.len()));
    }

    state.apply_view(next);
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
            let can_export = state.dashboard.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export CSV…"))
                .clicked()
            {
                save_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(name), Some(table)) = (&state.source_name, &state.table) {
            ui.label(format!("{name}: {} posts", table.len()));
            ui.separator();
        }

        match &state.status {
            Some(Status::Info(msg)) => {
                ui.label(RichText::new(msg).color(Color32::from_rgb(0x2c, 0xa0, 0x2c)));
            }
            Some(Status::Error(msg)) => {
                ui.label(RichText::new(msg).color(Color32::RED));
            }
            None => {}
        }
    });
}

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render metrics, charts, table and insights, or the welcome text.
pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    if state.dashboard.is_none() {
        welcome(ui);
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("LinkedIn Analytics Dashboard");
            ui.add_space(8.0);

            let Some(dash) = &state.dashboard else {
                return;
            };

            ui.heading("Key Metrics");
            summary::metric_cards(ui, &dash.summary);
            ui.add_space(12.0);

            ui.heading("Analytics Charts");
            ui.columns(2, |cols: &mut [Ui]| {
                if let Some(chart) = &dash.trend {
                    plot::trend_plot(&mut cols[0], chart);
                }
                if let Some(chart) = &dash.correlation {
                    plot::correlation_plot(&mut cols[1], chart, state.color_map.as_ref());
                }
            });
            ui.add_space(8.0);
            ui.columns(2, |cols: &mut [Ui]| {
                if let Some(chart) = &dash.top_engagement {
                    plot::ranking_plot(&mut cols[0], chart, "top_engagement_plot");
                }
                if let Some(chart) = &dash.top_ctr {
                    plot::ranking_plot(&mut cols[1], chart, "top_ctr_plot");
                }
            });
            ui.add_space(12.0);

            ui.heading("Post Performance Table");
            table::post_table(ui, state);
            ui.add_space(12.0);

            if let Some(dash) = &state.dashboard {
                ui.heading("Quick Insights");
                summary::insights(ui, &dash.insights);
            }
        });
}

fn welcome(ui: &mut Ui) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.add_space(40.0);
        ui.heading("LinkedIn Analytics Dashboard");
        ui.label("Open your LinkedIn content analytics export to get started  (File → Open…)");
    });
    ui.add_space(20.0);
    ui.strong("Expected file format");
    ui.label(
        "The workbook needs an 'All posts' sheet whose first row is a title and whose \
         second row holds the column names. Names are matched case-insensitively:",
    );
    for line in [
        "Post title – the full text of the post (required)",
        "Impressions – number of times the post was viewed",
        "Engagement rate – as a decimal, e.g. 0.05 for 5%",
        "Click through rate (CTR) – as a decimal",
        "Created date – when the post was created",
        "Post type – Organic, Sponsored or Total",
    ] {
        ui.label(format!("• {line}"));
    }
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open LinkedIn analytics export")
        .add_filter("Supported files", &["xlsx", "xls", "xlsm", "xlsb", "ods", "csv"])
        .add_filter("Excel", &["xlsx", "xls", "xlsm", "xlsb"])
        .add_filter("CSV export", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}

pub fn save_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Download filtered data as CSV")
        .set_file_name(state.export_file_name())
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        state.export_to(&path);
    }
}
