// timemark state managers
// Managers own the stateful flows: capturing bookmarks, the panel, note editors and navigation.

pub mod capture_agent;
pub mod navigation_watcher;
pub mod note_editor;
pub mod panel_renderer;
