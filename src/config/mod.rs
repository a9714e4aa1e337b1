use crate::action::catalog::{self, ActionParams};
use crate::action::ActionKind;
use crate::bindings::BindingStore;
use crate::error::{PadError, Result};
use crate::keys::KeyId;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

/// Persisted form of one key's binding. Order in the document follows
/// the pad layout; unknown fields and unknown action tags are tolerated
/// so documents written by newer or older versions still load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeyRecord {
    #[serde(default)]
    pub action: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scene: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct BindingsDoc {
    #[serde(default)]
    keys: Vec<KeyRecord>,
}

/// Load bindings from a TOML document.
///
/// Records map to keys by position. Missing records, unknown action
/// tags, and records that fail validation all degrade to `Unbound` for
/// that key only, with a warning.
///
/// # Errors
/// Returns `PadError::ConfigNotFound` if the file doesn't exist, `Io` on
/// read errors, or `TomlParse` if the document itself is malformed.
pub fn load(path: &Path) -> Result<BindingStore> {
    if !path.exists() {
        return Err(PadError::ConfigNotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path)?;
    let doc: BindingsDoc = toml::from_str(&content)?;

    let store = BindingStore::new();
    for (index, record) in doc.keys.iter().enumerate() {
        let Some(key) = KeyId::from_index(index) else {
            warn!("ignoring {} extra record(s) in {}", doc.keys.len() - index, path.display());
            break;
        };
        store.set(key, action_from_record(key, record));
    }
    Ok(store)
}

/// Load bindings, degrading any persistence failure to an empty store.
pub fn load_or_default(path: &Path) -> BindingStore {
    match load(path) {
        Ok(store) => store,
        Err(PadError::ConfigNotFound(_)) => {
            warn!("no config at {}, starting unbound", path.display());
            BindingStore::new()
        }
        Err(e) => {
            warn!("cannot load {}: {e}; starting unbound", path.display());
            BindingStore::new()
        }
    }
}

/// Write the whole store back out. Always a full rewrite.
///
/// # Errors
/// Returns `TomlWrite` on serialization failure or `Io` on write errors.
pub fn save(store: &BindingStore, path: &Path) -> Result<()> {
    let doc = BindingsDoc {
        keys: store.all().into_iter().map(|b| record_from_action(&b.action)).collect(),
    };
    let content = toml::to_string_pretty(&doc)?;
    std::fs::write(path, content)?;
    Ok(())
}

fn action_from_record(key: KeyId, record: &KeyRecord) -> ActionKind {
    let params = ActionParams {
        scene: record.scene.clone(),
        command: record.command.clone(),
        source: record.source.clone(),
        filter: record.filter.clone(),
    };
    let tag = if record.action.is_empty() { "unbound" } else { record.action.as_str() };
    match catalog::build(tag, params) {
        Ok(action) => action,
        Err(e) => {
            warn!("{key}: {e}; leaving unbound");
            ActionKind::Unbound
        }
    }
}

fn record_from_action(action: &ActionKind) -> KeyRecord {
    let mut record = KeyRecord {
        action: action.kind_name().to_string(),
        ..KeyRecord::default()
    };
    match action {
        ActionKind::SetScene { scene } => record.scene = Some(scene.clone()),
        ActionKind::RunProgram { command } => record.command = Some(command.clone()),
        ActionKind::ToggleFilter { source, filter } => {
            record.source = Some(source.clone());
            record.filter = Some(filter.clone());
        }
        _ => {}
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_store() -> BindingStore {
        let store = BindingStore::new();
        store.set(KeyId::Encoder(0), ActionKind::ToggleMic);
        store.set(KeyId::Key(0), ActionKind::SetScene { scene: "Scene 1".into() });
        store.set(
            KeyId::Key(6),
            ActionKind::ToggleFilter {
                source: "Webcam".into(),
                filter: "Color Correction".into(),
            },
        );
        store.set(KeyId::Key(14), ActionKind::RunProgram { command: "mpv intro.mp4".into() });
        store
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("obspad.toml");
        let store = sample_store();

        save(&store, &path).unwrap();
        let reloaded = load(&path).unwrap();

        for key in KeyId::layout() {
            assert_eq!(reloaded.get(key), store.get(key), "mismatch at {key}");
        }
    }

    #[test]
    fn missing_file_degrades_to_unbound() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        assert!(matches!(load(&path), Err(PadError::ConfigNotFound(_))));

        let store = load_or_default(&path);
        for key in KeyId::layout() {
            assert_eq!(store.get(key), ActionKind::Unbound);
        }
    }

    #[test]
    fn unknown_action_tag_defaults_that_key_only() {
        let doc = r#"
[[keys]]
action = "toggle_mic"

[[keys]]
action = "self_destruct"

[[keys]]
action = "toggle_recording"
"#;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("obspad.toml");
        std::fs::write(&path, doc).unwrap();

        let store = load(&path).unwrap();
        assert_eq!(store.get(KeyId::Encoder(0)), ActionKind::ToggleMic);
        assert_eq!(store.get(KeyId::Encoder(1)), ActionKind::Unbound);
        assert_eq!(store.get(KeyId::Encoder(2)), ActionKind::ToggleRecording);
    }

    #[test]
    fn incomplete_parameters_default_that_key() {
        // toggle_filter without a filter name fails validation on load.
        let doc = r#"
[[keys]]
action = "toggle_filter"
source = "Webcam"
"#;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("obspad.toml");
        std::fs::write(&path, doc).unwrap();

        let store = load(&path).unwrap();
        assert_eq!(store.get(KeyId::Encoder(0)), ActionKind::Unbound);
    }

    #[test]
    fn unknown_fields_and_short_documents_tolerated() {
        let doc = r#"
[[keys]]
action = "start_streaming"
color = "red"
"#;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("obspad.toml");
        std::fs::write(&path, doc).unwrap();

        let store = load(&path).unwrap();
        assert_eq!(store.get(KeyId::Encoder(0)), ActionKind::StartStreaming);
        // Keys beyond the records present stay unbound.
        assert_eq!(store.get(KeyId::Key(14)), ActionKind::Unbound);
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("obspad.toml");
        std::fs::write(&path, "keys = [ not toml").unwrap();
        assert!(matches!(load(&path), Err(PadError::TomlParse(_))));
    }
}
