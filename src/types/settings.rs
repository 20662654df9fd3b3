use serde::{Deserialize, Serialize};

/// Top-level settings container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TimemarkSettings {
    pub storage: StorageSettings,
    pub capture: CaptureSettings,
    pub panel: PanelSettings,
}

/// Where and how bookmarks are persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageSettings {
    /// File name of the SQLite database inside the data directory.
    pub database_file: String,
    /// Storage area the collection is kept in.
    pub area: String,
    /// Maximum serialized size of one stored item, if any.
    pub quota_bytes_per_item: Option<usize>,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            database_file: "timemark.db".to_string(),
            area: "sync".to_string(),
            quota_bytes_per_item: None,
        }
    }
}

/// Capture-side behaviour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaptureSettings {
    pub note_prompt: String,
    pub untitled_placeholder: String,
    /// How often the capture button presence is re-checked.
    pub ensure_interval_ms: u64,
    /// Delay before re-injecting after a document mutation changed the location.
    pub mutation_settle_ms: u64,
    /// Delay before re-injecting after popstate or page-ready.
    pub navigation_settle_ms: u64,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            note_prompt: "Add a note for this timestamp:".to_string(),
            untitled_placeholder: "Untitled Video".to_string(),
            ensure_interval_ms: 3000,
            mutation_settle_ms: 1000,
            navigation_settle_ms: 500,
        }
    }
}

/// Panel rendering options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PanelSettings {
    pub empty_message: String,
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            empty_message:
                "No bookmarks yet. Go to YouTube and use the Save button to bookmark a video!"
                    .to_string(),
        }
    }
}
