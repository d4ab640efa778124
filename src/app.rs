//! App Core for SplitScreen.
//!
//! Holds the page store, the persisted flags and the split layout, and
//! manages their lifecycle.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::managers::page_store::PageStore;
use crate::managers::split_layout::SplitPaneLayout;
use crate::platform;
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::types::layout::LayoutConfig;

/// Central application struct.
///
/// `store` is a cheap handle; clone it into web panels and list views.
pub struct App {
    pub store: PageStore,
    pub settings_engine: SettingsEngine,
    pub layout: SplitPaneLayout,
}

impl App {
    /// Opens the app with the database and flags file at explicit paths.
    pub fn with_paths(db_path: &Path, settings_path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let store = PageStore::open(db_path)?;

        let mut settings_engine =
            SettingsEngine::new(Some(settings_path.to_string_lossy().to_string()));
        if let Err(e) = settings_engine.load() {
            warn!(error = %e, "could not load settings; using defaults");
        }

        let hint_seen = settings_engine.get_settings().has_seen_split_hint;
        let layout = SplitPaneLayout::new(LayoutConfig::default(), hint_seen);

        info!(db = %db_path.display(), "app initialized");
        Ok(Self {
            store,
            settings_engine,
            layout,
        })
    }

    /// Keeps the database and the flags file side by side in `dir`.
    pub fn in_dir(dir: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        Self::with_paths(&dir.join("splitscreen.db"), &dir.join("settings.json"))
    }

    /// Uses the platform data and config directories.
    pub fn open_default() -> Result<Self, Box<dyn std::error::Error>> {
        let settings_path: PathBuf = platform::get_config_dir().join("settings.json");
        Self::with_paths(&platform::default_db_path(), &settings_path)
    }

    /// Starts a divider drag, persisting the hint dismissal the first time.
    pub fn begin_divider_drag(&mut self) {
        if self.layout.begin_drag() {
            self.persist_hint_dismissal();
        }
    }

    /// Hint overlay display timeout elapsed.
    pub fn hint_timed_out(&mut self) {
        if self.layout.hint_timed_out() {
            self.persist_hint_dismissal();
        }
    }

    /// Flushes queued writes and stops the store's writer thread.
    pub fn shutdown(&mut self) {
        self.store.shutdown();
        info!("app shut down");
    }

    /// Same as [`shutdown`](Self::shutdown), for hosts running a tokio runtime.
    pub async fn shutdown_async(&mut self) {
        self.store.shutdown_async().await;
        info!("app shut down");
    }

    fn persist_hint_dismissal(&mut self) {
        if let Err(e) = self.settings_engine.mark_split_hint_seen() {
            warn!(error = %e, "failed to persist split hint dismissal");
        }
    }
}
