//! App Core for timemark.
//!
//! Holds the settings, the shared store and the open panel, and hands out
//! capture agents bound to the same store.

use std::path::Path;
use std::sync::Arc;

use crate::database::{Database, SqliteSyncStore};
use crate::managers::capture_agent::{CaptureAgent, LogNotifier, NotePrompt};
use crate::managers::navigation_watcher::NavigationWatcher;
use crate::managers::panel_renderer::PanelRenderer;
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::services::sync_store::SyncStore;

pub struct App {
    pub settings_engine: SettingsEngine,
    pub store: Arc<dyn SyncStore>,
    pub panel: PanelRenderer,
    /// Location tracking for the page the host reports on.
    pub watcher: NavigationWatcher,
}

impl App {
    /// Opens the database at `db_path` and loads settings from the platform config path.
    pub fn new(db_path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        Self::open(db_path, None)
    }

    /// Like [`App::new`], with an explicit settings file.
    pub fn open(
        db_path: &str,
        settings_path: Option<String>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let mut settings_engine = SettingsEngine::new(settings_path);
        let settings = settings_engine.load()?;

        if let Some(parent) = Path::new(db_path).parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::open(db_path)?;
        let store = SqliteSyncStore::new(
            db,
            &settings.storage.area,
            settings.storage.quota_bytes_per_item,
        );

        Ok(Self::with_store(settings_engine, Arc::new(store)))
    }

    /// Opens the database named by `storage.database_file` inside `data_dir`.
    pub fn in_data_dir(
        data_dir: &Path,
        settings_path: Option<String>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let mut probe = SettingsEngine::new(settings_path.clone());
        let file = probe.load()?.storage.database_file;
        let db_path = data_dir.join(file);
        Self::open(&db_path.to_string_lossy(), settings_path)
    }

    /// Builds an app around an existing store.
    pub fn with_store(settings_engine: SettingsEngine, store: Arc<dyn SyncStore>) -> Self {
        let settings = settings_engine.get_settings();
        let panel = PanelRenderer::new(store.clone(), settings.panel.clone());
        let watcher = NavigationWatcher::new("", &settings.capture);
        Self {
            settings_engine,
            store,
            panel,
            watcher,
        }
    }

    /// A capture agent writing to this app's store.
    pub fn capture_agent(&self, prompt: Box<dyn NotePrompt + Send>) -> CaptureAgent {
        CaptureAgent::new(
            self.store.clone(),
            prompt,
            Box::new(LogNotifier),
            self.settings_engine.get_settings().capture.clone(),
        )
    }

    /// Startup sequence: render the panel from whatever is stored.
    pub fn startup(&mut self) {
        if let Err(e) = self.panel.load() {
            log::error!("[PANEL] Initial load failed: {}", e);
        }
    }

    /// Applies pending store notifications to the panel.
    pub fn sync_panel(&mut self) -> usize {
        match self.panel.pump() {
            Ok(n) => n,
            Err(e) => {
                log::error!("[PANEL] Refresh failed: {}", e);
                0
            }
        }
    }
}
