// timemark services
// Stateless helpers and long-lived services: settings, store contract, URL handling.

pub mod settings_engine;
pub mod sync_store;
pub mod video_url;
