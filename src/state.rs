use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config::DashboardConfig;
use crate::data::filter::FilterSelection;
use crate::data::loader::DatasetCache;
use crate::data::model::{Bucket, Dataset};
use crate::export;
use crate::view::{compute_view, ViewBundle};

// ---------------------------------------------------------------------------
// Session state machine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The source could not be loaded; holds the user-facing message.
    Load(String),
    /// The selection matched no rows.
    NoMatches,
}

/// Coarse progress of a session. `Error` halts the dashboard until the
/// source is fixed (`Load`) or the filters are relaxed (`NoMatches`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Loading,
    Ready,
    Filtered,
    Error(SessionError),
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full dashboard state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    cache: DatasetCache,

    /// Path of the current source, if any load was attempted.
    pub source: Option<PathBuf>,

    /// Loaded dataset (None until a load succeeds).
    pub dataset: Option<Arc<Dataset>>,

    /// Current filter predicates.
    pub selection: Option<FilterSelection>,

    /// Output of the latest successful recomputation.
    pub view: Option<ViewBundle>,

    pub state: SessionState,

    /// Status line shown in the UI (export results and the like).
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self::with_cache(config, DatasetCache::new())
    }

    pub fn with_cache(config: DashboardConfig, cache: DatasetCache) -> Self {
        Self {
            config,
            cache,
            source: None,
            dataset: None,
            selection: None,
            view: None,
            state: SessionState::Loading,
            status_message: None,
        }
    }

    /// Load (or fetch from cache) a dataset and reset the filters.
    pub fn load(&mut self, path: &Path) {
        self.state = SessionState::Loading;
        self.source = Some(path.to_path_buf());
        match self.cache.get_or_load(path) {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                let e = anyhow::Error::new(e);
                log::error!("Failed to load {}: {e:#}", path.display());
                self.dataset = None;
                self.selection = None;
                self.view = None;
                self.state = SessionState::Error(SessionError::Load(format!("{e:#}")));
            }
        }
    }

    /// Load the configured dataset.
    pub fn load_configured(&mut self) {
        let path = self.config.dataset.clone();
        self.load(&path);
    }

    /// Re-read the current source if it changed on disk, keeping the
    /// selection when the dataset is unchanged.
    pub fn reload(&mut self) {
        let Some(path) = self.source.clone() else {
            return;
        };
        let previous = self.dataset.clone();
        let selection = self.selection.clone();
        self.load(&path);
        let unchanged = matches!((&previous, &self.dataset), (Some(a), Some(b)) if Arc::ptr_eq(a, b));
        if unchanged {
            self.selection = selection;
            self.refilter();
        }
    }

    /// Ingest a loaded dataset: select everything and wait for a recompute.
    pub fn set_dataset(&mut self, dataset: Arc<Dataset>) {
        self.selection = Some(FilterSelection::all(&dataset));
        self.dataset = Some(dataset);
        self.view = None;
        self.status_message = None;
        self.state = SessionState::Ready;
    }

    /// Run the pipeline for the current selection. The new result replaces
    /// whatever was computed before.
    pub fn refilter(&mut self) {
        let (Some(dataset), Some(selection)) = (&self.dataset, &self.selection) else {
            return;
        };
        match compute_view(dataset, selection, self.config.close_threshold) {
            Ok(bundle) => {
                self.view = Some(bundle);
                self.state = SessionState::Filtered;
            }
            Err(_) => {
                self.view = None;
                self.state = SessionState::Error(SessionError::NoMatches);
            }
        }
    }

    /// Edit the selection, then recompute.
    pub fn update_selection(&mut self, edit: impl FnOnce(&mut FilterSelection)) {
        if let Some(selection) = self.selection.as_mut() {
            edit(selection);
            self.refilter();
        }
    }

    pub fn toggle_region(&mut self, region: &str) {
        self.update_selection(|s| s.toggle_region(region));
    }

    pub fn toggle_bucket(&mut self, bucket: Bucket) {
        self.update_selection(|s| s.toggle_bucket(bucket));
    }

    pub fn set_turnout_range(&mut self, lo: f64, hi: f64) {
        self.update_selection(|s| s.set_turnout_range(lo, hi));
    }

    /// Select all regions (or none).
    pub fn select_all_regions(&mut self, all: bool) {
        let regions = match (&self.dataset, all) {
            (Some(ds), true) => ds.regions().clone(),
            _ => Default::default(),
        };
        self.update_selection(|s| s.regions = regions);
    }

    /// Export file name: explicit `--dataset-name`, else the loaded
    /// dataset's name, else the configured path's stem.
    pub fn export_file_name(&self) -> String {
        let name = self
            .config
            .dataset_name
            .clone()
            .or_else(|| self.dataset.as_ref().map(|d| d.name.clone()))
            .unwrap_or_else(|| self.config.dataset_name());
        export::export_file_name(&name)
    }

    /// Write the current filtered rows to `path`.
    pub fn export_to(&mut self, path: &Path) -> Result<()> {
        let view = self
            .view
            .as_ref()
            .context("no filtered view to export")?;
        export::export_to_path(&view.filtered, path)?;
        self.status_message = Some(format!(
            "Exported {} rows to {}",
            view.filtered.len(),
            path.display()
        ));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "Constituency_ID,Constituency_Name,Winner_Name,Winner_Party,Winner,Region,Margin,Turnout_Percentage,Seats\n\
        1,Udupi,A,INC,INC,Coastal,1500,78.0,1\n\
        2,Mangalore,B,BJP,BJP,Coastal,4200,74.5,1\n\
        3,Hassan,C,JD(S),JD(S),Old Mysore,900,80.2,1\n";

    fn write_dataset(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("karnataka_2023.csv");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn starts_loading_then_ready_then_filtered() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_dataset(dir.path(), CSV);
        let mut app = AppState::new(DashboardConfig::default());
        assert_eq!(app.state, SessionState::Loading);

        app.load(&path);
        assert_eq!(app.state, SessionState::Ready);
        assert!(app.view.is_none());

        app.refilter();
        assert_eq!(app.state, SessionState::Filtered);
        assert_eq!(app.view.as_ref().unwrap().filtered.len(), 3);
    }

    #[test]
    fn empty_result_is_recoverable() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_dataset(dir.path(), CSV);
        let mut app = AppState::new(DashboardConfig::default());
        app.load(&path);
        app.refilter();

        app.select_all_regions(false);
        assert_eq!(app.state, SessionState::Error(SessionError::NoMatches));
        assert!(app.view.is_none());

        app.toggle_region("Old Mysore");
        assert_eq!(app.state, SessionState::Filtered);
        assert_eq!(app.view.as_ref().unwrap().filtered.len(), 1);

        app.set_turnout_range(0.0, 50.0);
        assert_eq!(app.state, SessionState::Error(SessionError::NoMatches));
        app.set_turnout_range(100.0, 75.0);
        assert_eq!(app.state, SessionState::Filtered);
    }

    #[test]
    fn schema_failure_halts_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_dataset(dir.path(), "Constituency_ID,Region\n1,Coastal\n");
        let mut app = AppState::new(DashboardConfig::default());
        app.load(&path);
        match &app.state {
            SessionState::Error(SessionError::Load(msg)) => {
                assert!(msg.contains("missing required columns"), "{msg}");
                assert!(msg.contains("Winner_Party"), "{msg}");
            }
            other => panic!("unexpected state {other:?}"),
        }
        app.refilter();
        assert!(app.view.is_none());
    }

    #[test]
    fn reload_keeps_selection_when_file_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_dataset(dir.path(), CSV);
        let mut app = AppState::new(DashboardConfig::default());
        app.load(&path);
        app.toggle_bucket(Bucket::Bjp);
        assert_eq!(app.view.as_ref().unwrap().filtered.len(), 2);

        app.reload();
        assert_eq!(app.state, SessionState::Filtered);
        assert_eq!(app.view.as_ref().unwrap().filtered.len(), 2);
    }

    #[test]
    fn export_writes_filtered_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_dataset(dir.path(), CSV);
        let config = DashboardConfig {
            dataset: path.clone(),
            ..Default::default()
        };
        let mut app = AppState::new(config);
        app.load_configured();
        app.toggle_region("Coastal");

        let out = dir.path().join(app.export_file_name());
        assert!(out.ends_with("karnataka_2023_filtered_view.csv"));
        app.export_to(&out).unwrap();
        let text = std::fs::read_to_string(&out).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.contains(",JD(S),JDS,Old Mysore,"));
    }
}
