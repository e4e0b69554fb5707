use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::format::{format_date, format_impressions, format_rate};
use crate::data::model::{column, Columns, PostRecord};
use crate::state::AppState;

type Cell = fn(&PostRecord) -> String;

/// Display columns for the table view, in order, skipping absent ones.
fn display_columns(cols: &Columns) -> Vec<(&'static str, Cell)> {
    let mut out: Vec<(&'static str, Cell)> = Vec::new();
    out.push((column::SUMMARY, |p: &PostRecord| p.title_summary.clone()));
    if cols.created_date {
        out.push((column::CREATED_DATE, |p: &PostRecord| format_date(p.created_date)));
    }
    if cols.impressions {
        out.push((column::IMPRESSIONS, |p: &PostRecord| format_impressions(p.impressions)));
    }
    if cols.engagement_rate {
        out.push((column::ENGAGEMENT_RATE, |p: &PostRecord| format_rate(p.engagement_rate)));
    }
    if cols.click_through_rate {
        out.push((column::CLICK_THROUGH_RATE, |p: &PostRecord| {
            format_rate(p.click_through_rate)
        }));
    }
    if cols.post_type {
        out.push((column::POST_TYPE, |p: &PostRecord| p.post_type.clone().unwrap_or_default()));
    }
    out
}

/// Search box, post table and export button.
pub fn post_table(ui: &mut Ui, state: &mut AppState) {
    let mut next = state.view.clone();
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Search posts");
        ui.add(
            egui::TextEdit::singleline(&mut next.search)
                .hint_text("Enter keywords to search in post titles...")
                .desired_width(320.0),
        );
    });
    state.apply_view(next);

    let Some(dash) = &state.dashboard else {
        return;
    };
    if dash.table_rows.is_empty() {
        ui.label("No posts match the current filters.");
    } else {
        let columns = display_columns(&dash.filtered.columns);

        let mut builder = TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .max_scroll_height(400.0)
            .column(Column::initial(360.0).at_least(120.0).clip(true));
        for _ in 1..columns.len() {
            builder = builder.column(Column::auto().at_least(80.0));
        }

        builder
            .header(20.0, |mut header| {
                for (name, _) in &columns {
                    header.col(|ui: &mut Ui| {
                        ui.strong(*name);
                    });
                }
            })
            .body(|body| {
                body.rows(18.0, dash.table_rows.len(), |mut row| {
                    let post = &dash.filtered.posts[dash.table_rows[row.index()]];
                    for (_, cell) in &columns {
                        row.col(|ui: &mut Ui| {
                            ui.label(cell(post));
                        });
                    }
                });
            });
    }

    ui.add_space(4.0);
    if ui.button("Download filtered data as CSV").clicked() {
        super::panels::save_file_dialog(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_columns_follow_schema() {
        let names = |cols: Columns| -> Vec<&'static str> {
            display_columns(&cols).into_iter().map(|(n, _)| n).collect()
        };
        assert_eq!(names(Columns::default()), vec![column::SUMMARY]);

        let all = Columns {
            created_date: true,
            engagement_rate: true,
            click_through_rate: true,
            impressions: true,
            post_type: true,
        };
        assert_eq!(
            names(all),
            vec![
                column::SUMMARY,
                column::CREATED_DATE,
                column::IMPRESSIONS,
                column::ENGAGEMENT_RATE,
                column::CLICK_THROUGH_RATE,
                column::POST_TYPE,
            ]
        );
    }

    #[test]
    fn test_cells_are_formatted_for_display() {
        let cols = Columns {
            impressions: true,
            engagement_rate: true,
            ..Default::default()
        };
        let post = PostRecord {
            title_summary: "Hello".into(),
            engagement_rate: Some(0.1234),
            ..Default::default()
        };
        let rendered: Vec<String> = display_columns(&cols)
            .iter()
            .map(|(_, cell)| cell(&post))
            .collect();
        assert_eq!(rendered, vec!["Hello", "0", "12.34%"]);
    }
}
