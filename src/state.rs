use std::path::Path;

use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::data::dashboard::Dashboard;
use crate::data::export;
use crate::data::filter::ViewState;
use crate::data::loader::load_file;
use crate::data::model::PostTable;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Message shown in the top bar.
#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Info(String),
    Error(String),
}

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Loaded table (None until a file loads successfully).
    pub table: Option<PostTable>,

    /// File name of the loaded table.
    pub source_name: Option<String>,

    /// Current filter choices.
    pub view: ViewState,

    /// Outputs derived from `table` and `view`.
    pub dashboard: Option<Dashboard>,

    /// Post-type colours for the scatter plot.
    pub color_map: Option<ColorMap>,

    pub status: Option<Status>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            table: None,
            source_name: None,
            view: ViewState::default(),
            dashboard: None,
            color_map: None,
            status: None,
        }
    }

    /// Load a file, replacing whatever was loaded before.  On failure the
    /// previous table is dropped and the error goes to the status line.
    pub fn load_path(&mut self, path: &Path) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        match load_file(path, &self.config) {
            Ok(table) => {
                log::info!(
                    "Loaded {} posts from {name} (columns: {:?}, extra: {:?})",
                    table.len(),
                    table.columns,
                    table.extra_columns
                );
                self.set_table(table, name);
            }
            Err(e) => {
                log::error!("Failed to load {name}: {e}");
                self.table = None;
                self.source_name = None;
                self.dashboard = None;
                self.color_map = None;
                self.view = ViewState::default();
                self.status = Some(Status::Error(e.to_string()));
            }
        }
    }

    /// Ingest a newly loaded table and reset the filters.
    pub fn set_table(&mut self, table: PostTable, source_name: String) {
        let mut message = if table.is_empty() {
            "The file contains no posts.".to_string()
        } else {
            format!("Successfully loaded {} posts!", table.len())
        };
        if table.unreadable_cells > 0 {
            message.push_str(&format!(
                " ({} unreadable cells treated as missing)",
                table.unreadable_cells
            ));
        }

        self.view = ViewState::initial(&table);
        self.color_map = Some(ColorMap::new(&table.post_types()));
        self.dashboard = Some(Dashboard::build(&table, &self.view, &self.config));
        self.table = Some(table);
        self.source_name = Some(source_name);
        self.status = Some(Status::Info(message));
    }

    /// Replace the view; the dashboard is rebuilt only if something changed.
    pub fn apply_view(&mut self, view: ViewState) {
        if view == self.view {
            return;
        }
        self.view = view;
        if let Some(table) = &self.table {
            self.dashboard = Some(Dashboard::build(table, &self.view, &self.config));
        }
    }

    /// Default name for an export made now.
    pub fn export_file_name(&self) -> String {
        export::export_file_name(
            &self.config.export_prefix,
            chrono::Local::now().naive_local(),
        )
    }

    /// Write the filtered table to `path`.
    pub fn export_to(&mut self, path: &Path) {
        let Some(dash) = &self.dashboard else {
            return;
        };
        match export::save_to(path, &dash.filtered) {
            Ok(()) => {
                log::info!("Exported {} posts to {}", dash.filtered.len(), path.display());
                self.status = Some(Status::Info(format!(
                    "Exported {} posts to {}",
                    dash.filtered.len(),
                    path.display()
                )));
            }
            Err(e) => {
                log::warn!("Export to {} failed: {e:#}", path.display());
                self.status = Some(Status::Error(format!("Export failed: {e:#}")));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::PostTypeFilter;

    const SAMPLE: &str = "\
Post title,Post type,Engagement rate,Impressions
Product Launch Day is finally here,Organic,0.05,100
Sponsored reach test for the new campaign,Sponsored,0.02,5000
";

    fn write_sample(dir: &tempfile::TempDir) -> std::path::PathBuf {
        let path = dir.path().join("posts.csv");
        std::fs::write(&path, SAMPLE).unwrap();
        path
    }

    #[test]
    fn test_load_builds_dashboard() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut state = AppState::new(DashboardConfig::default());
        state.load_path(&write_sample(&dir));

        assert_eq!(state.source_name.as_deref(), Some("posts.csv"));
        let dash = state.dashboard.as_ref().unwrap();
        assert_eq!(dash.summary.total_impressions, 5100);
        assert!(matches!(state.status, Some(Status::Info(_))));
    }

    #[test]
    fn test_failed_load_clears_previous_table() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut state = AppState::new(DashboardConfig::default());
        state.load_path(&write_sample(&dir));

        let bad = dir.path().join("no_title.csv");
        std::fs::write(&bad, "impressions\n5\n").unwrap();
        state.load_path(&bad);

        assert!(state.table.is_none());
        assert!(state.dashboard.is_none());
        match &state.status {
            Some(Status::Error(msg)) => assert!(msg.contains("post title")),
            other => panic!("unexpected status {other:?}"),
        }
    }

    #[test]
    fn test_apply_view_rebuilds_and_export_uses_filtered_rows() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut state = AppState::new(DashboardConfig::default());
        state.load_path(&write_sample(&dir));

        let view = ViewState {
            post_type: PostTypeFilter::Only("Sponsored".into()),
            ..state.view.clone()
        };
        state.apply_view(view);
        assert_eq!(state.dashboard.as_ref().unwrap().filtered.len(), 1);

        let out = dir.path().join("export.csv");
        state.export_to(&out);
        let written = std::fs::read_to_string(&out).unwrap();
        assert_eq!(written.lines().count(), 2);
        assert!(written.contains("Sponsored"));
        assert!(!written.contains("Organic"));
    }

    #[test]
    fn test_export_file_name_uses_prefix() {
        let state = AppState::new(DashboardConfig::default());
        let name = state.export_file_name();
        assert!(name.starts_with("linkedin_analytics_"));
        assert!(name.ends_with(".csv"));
        assert_eq!(name.len(), "linkedin_analytics_20240101_000000.csv".len());
    }
}
