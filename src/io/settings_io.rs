use std::fs;
use std::path::Path;

use crate::io::blob::PersistenceError;
use crate::model::settings::Settings;

pub const SETTINGS_FILE: &str = "settings.toml";

/// Read settings.toml; a missing file means defaults
pub fn read_settings(data_dir: &Path) -> Result<Settings, PersistenceError> {
    let path = data_dir.join(SETTINGS_FILE);
    if !path.exists() {
        return Ok(Settings::default());
    }
    let text = fs::read_to_string(&path).map_err(|e| PersistenceError::Read {
        path: path.clone(),
        source: e,
    })?;
    toml::from_str(&text).map_err(|e| PersistenceError::Corrupt(e.to_string()))
}

/// Write the full settings file
pub fn write_settings(data_dir: &Path, settings: &Settings) -> Result<(), PersistenceError> {
    let path = data_dir.join(SETTINGS_FILE);
    let text =
        toml::to_string_pretty(settings).map_err(|e| PersistenceError::Corrupt(e.to_string()))?;
    fs::write(&path, text).map_err(|e| PersistenceError::Write { path, source: e })
}

/// Update one top-level key in place, preserving the user's comments and
/// formatting around it. Used for quick edits like the API credential or
/// highlight color.
pub fn update_settings_key(
    data_dir: &Path,
    key: &str,
    value: &str,
) -> Result<(), PersistenceError> {
    let path = data_dir.join(SETTINGS_FILE);
    let text = if path.exists() {
        fs::read_to_string(&path).map_err(|e| PersistenceError::Read {
            path: path.clone(),
            source: e,
        })?
    } else {
        String::new()
    };
    let mut doc: toml_edit::DocumentMut = text
        .parse()
        .map_err(|e: toml_edit::TomlError| PersistenceError::Corrupt(e.to_string()))?;
    doc[key] = toml_edit::value(value);
    fs::write(&path, doc.to_string()).map_err(|e| PersistenceError::Write { path, source: e })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let tmp = TempDir::new().unwrap();
        let settings = read_settings(tmp.path()).unwrap();
        assert_eq!(settings.highlight_color, "#fff59d");
    }

    #[test]
    fn write_read_round_trip() {
        let tmp = TempDir::new().unwrap();
        let mut settings = Settings::default();
        settings.highlight_color = "#ff0000".into();
        settings.api_key = Some("sk-test".into());
        settings.phrase_list = Some("delve\n".into());

        write_settings(tmp.path(), &settings).unwrap();
        let loaded = read_settings(tmp.path()).unwrap();
        assert_eq!(loaded.highlight_color, "#ff0000");
        assert_eq!(loaded.api_key.as_deref(), Some("sk-test"));
        assert_eq!(loaded.phrase_list.as_deref(), Some("delve\n"));
    }

    #[test]
    fn key_update_preserves_comments() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(SETTINGS_FILE);
        fs::write(
            &path,
            "# my settings\nhighlight_color = \"#fff59d\" # the default\nmodel = \"openrouter/auto\"\n",
        )
        .unwrap();

        update_settings_key(tmp.path(), "model", "anthropic/claude-sonnet").unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("# my settings"));
        assert!(text.contains("# the default"));
        assert!(text.contains("model = \"anthropic/claude-sonnet\""));
    }

    #[test]
    fn key_update_creates_file_when_absent() {
        let tmp = TempDir::new().unwrap();
        update_settings_key(tmp.path(), "theme", "dark").unwrap();
        let loaded = read_settings(tmp.path()).unwrap();
        assert_eq!(loaded.theme, "dark");
    }

    #[test]
    fn malformed_file_reports_corrupt() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(SETTINGS_FILE), "not = = toml {{").unwrap();
        assert!(matches!(
            read_settings(tmp.path()),
            Err(PersistenceError::Corrupt(_))
        ));
    }
}
