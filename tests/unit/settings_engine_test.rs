//! Integration-level unit tests for the SettingsEngine public API.
//!
//! These tests exercise the SettingsEngine through its public trait interface:
//! default loading, persistence of single-key updates, validation, and reset.

use serde_json::json;
use tempfile::TempDir;
use timemark::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use timemark::types::errors::SettingsError;
use timemark::types::settings::TimemarkSettings;

/// Helper: create a SettingsEngine backed by a temp directory that lives for the
/// duration of the test (the caller holds the `TempDir` handle).
fn engine_in_temp(dir: &TempDir) -> SettingsEngine {
    let path = dir
        .path()
        .join("settings.json")
        .to_string_lossy()
        .to_string();
    SettingsEngine::new(Some(path))
}

#[test]
fn test_load_defaults_when_no_config_file_exists() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);

    let settings = engine.load().unwrap();

    assert_eq!(
        settings,
        TimemarkSettings::default(),
        "Loading without a config file must return default settings"
    );
}

#[test]
fn test_set_value_persists_changes() {
    let dir = TempDir::new().unwrap();

    {
        let mut engine = engine_in_temp(&dir);
        engine.load().unwrap();
        engine
            .set_value("capture.note_prompt", json!("What happens here?"))
            .unwrap();
    }

    let mut engine2 = engine_in_temp(&dir);
    let loaded = engine2.load().unwrap();
    assert_eq!(
        loaded.capture.note_prompt, "What happens here?",
        "set_value must persist the change so a new engine instance reads it back"
    );
}

#[test]
fn test_set_value_rejects_unknown_key() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    engine.load().unwrap();

    let result = engine.set_value("capture.volume", json!(3));
    assert!(matches!(result, Err(SettingsError::InvalidKey(_))));

    let result = engine.set_value("", json!(3));
    assert!(matches!(result, Err(SettingsError::InvalidKey(_))));
}

#[test]
fn test_set_value_rejects_wrong_type_and_keeps_old_value() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    engine.load().unwrap();

    let result = engine.set_value("capture.ensure_interval_ms", json!("soon"));

    assert!(matches!(result, Err(SettingsError::InvalidValue(_))));
    assert_eq!(engine.get_settings().capture.ensure_interval_ms, 3000);
}

#[test]
fn test_reset_restores_defaults() {
    let dir = TempDir::new().unwrap();

    {
        let mut engine = engine_in_temp(&dir);
        engine.load().unwrap();

        engine.set_value("storage.area", json!("local")).unwrap();
        engine
            .set_value("panel.empty_message", json!("Nothing saved"))
            .unwrap();
        assert_eq!(engine.get_settings().storage.area, "local");

        engine.reset().unwrap();

        assert_eq!(
            *engine.get_settings(),
            TimemarkSettings::default(),
            "In-memory settings must equal defaults after reset"
        );
    }

    let mut engine2 = engine_in_temp(&dir);
    assert_eq!(
        engine2.load().unwrap(),
        TimemarkSettings::default(),
        "Reset must persist defaults to disk so a new engine reads them back"
    );
}

#[test]
fn test_save_creates_missing_parent_directory() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("conf").join("settings.json");
    let engine = SettingsEngine::new(Some(path.to_string_lossy().to_string()));

    engine.save().unwrap();

    assert!(path.exists());
}
