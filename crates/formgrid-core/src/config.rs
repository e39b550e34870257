//! User settings loaded from TOML.
//!
//! ```toml
//! [date]
//! pattern = "dd.MM.yyyy"
//! filler = "_"
//! locale = "iso"
//!
//! [traversal]
//! advance_on_commit = true
//!
//! [traversal.mode]
//! axis = "by_row"
//! skip_non_editable = true
//! auto_edit = true
//! ```

use crate::error::Result;
use crate::table::FormTable;
use crate::traversal::TraversalMode;
use directories::ProjectDirs;
use formgrid_dates::dates::LocaleName;
use formgrid_dates::{DateLocale, DatePattern, ReferenceContext, ShortcutInterpreter};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const MAX_SETTINGS_FILE_BYTES: u64 = 1_048_576; // 1 MiB

pub const DEFAULT_DATE_PATTERN: &str = "MM/dd/yy";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub date: DateSettings,
    pub traversal: TraversalSettings,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DateSettings {
    pub pattern: String,
    /// Mask placeholder stripped before interpretation
    pub filler: Option<char>,
    pub locale: LocaleName,
}

impl Default for DateSettings {
    fn default() -> Self {
        DateSettings {
            pattern: DEFAULT_DATE_PATTERN.to_string(),
            filler: None,
            locale: LocaleName::default(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TraversalSettings {
    pub mode: TraversalMode,
    pub advance_on_commit: bool,
}

impl Settings {
    pub fn date_pattern(&self) -> Result<DatePattern> {
        let locale = DateLocale::named(self.date.locale);
        Ok(DatePattern::with_locale(&self.date.pattern, locale)?)
    }

    /// Interpreter relative to "now" with the configured pattern and filler.
    pub fn interpreter(&self) -> Result<ShortcutInterpreter> {
        let interpreter = ShortcutInterpreter::new(ReferenceContext::new(self.date_pattern()?));
        Ok(match self.date.filler {
            Some(filler) => interpreter.with_filler(filler),
            None => interpreter,
        })
    }

    /// Apply the traversal section to a table.
    pub fn configure_table(&self, table: &mut FormTable) {
        table.set_mode(self.traversal.mode);
        table.set_advance_on_commit(self.traversal.advance_on_commit);
    }
}

pub fn parse_settings(content: &str) -> Result<Settings> {
    Ok(toml::from_str(content)?)
}

/// Default settings file location.
pub fn settings_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "formgrid").map(|dirs| dirs.config_dir().join("settings.toml"))
}

/// Load settings, falling back to defaults.
///
/// Problems are returned as warnings rather than errors: a missing default
/// file is silent, a missing explicit file, an unreadable or invalid file, or
/// an unusable date pattern each add a warning.
pub fn load_settings(settings_file: Option<&Path>) -> (Settings, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();
    let config_path = settings_file.map(Path::to_path_buf).or_else(settings_path);
    let mut settings = Settings::default();

    if let Some(path) = config_path.as_ref() {
        if path.exists() {
            match std::fs::metadata(path) {
                Ok(meta) if meta.len() > MAX_SETTINGS_FILE_BYTES => {
                    warnings.push(format!(
                        "Refusing to read {}: file too large ({} bytes, max {})",
                        path.display(),
                        meta.len(),
                        MAX_SETTINGS_FILE_BYTES
                    ));
                }
                Ok(_) => match std::fs::read_to_string(path) {
                    Ok(content) => match parse_settings(&content) {
                        Ok(parsed) => settings = parsed,
                        Err(err) => {
                            warnings.push(format!("Failed to parse {}: {}", path.display(), err))
                        }
                    },
                    Err(err) => {
                        warnings.push(format!("Failed to read {}: {}", path.display(), err))
                    }
                },
                Err(err) => warnings.push(format!(
                    "Failed to read metadata for {}: {}",
                    path.display(),
                    err
                )),
            }
        } else if settings_file.is_some() {
            warnings.push(format!("Settings file not found: {}", path.display()));
        }
    }

    if let Err(err) = settings.date_pattern() {
        warnings.push(format!(
            "Ignoring date pattern {:?}: {}; using {:?}",
            settings.date.pattern, err, DEFAULT_DATE_PATTERN
        ));
        settings.date.pattern = DEFAULT_DATE_PATTERN.to_string();
    }

    if settings.traversal.mode.has_conflicting_wrap() {
        warnings.push(
            "traversal.mode sets both no_line_wrap and wrap_in_line; no_line_wrap applies"
                .to_string(),
        );
    }

    (settings, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traversal::Axis;

    #[test]
    fn test_parse_full_settings() {
        let settings = parse_settings(
            r#"
            [date]
            pattern = "dd.MM.yyyy"
            filler = "_"
            locale = "iso"

            [traversal]
            advance_on_commit = true

            [traversal.mode]
            axis = "by_row"
            skip_non_editable = true
            "#,
        )
        .unwrap();
        assert_eq!(settings.date.pattern, "dd.MM.yyyy");
        assert_eq!(settings.date.filler, Some('_'));
        assert_eq!(settings.date.locale, LocaleName::Iso);
        assert!(settings.traversal.advance_on_commit);
        assert_eq!(settings.traversal.mode.axis, Axis::ByRow);
        assert!(settings.traversal.mode.skip_non_editable);
        assert!(!settings.traversal.mode.auto_edit);
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        assert_eq!(parse_settings("").unwrap(), Settings::default());
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(parse_settings("[date]\npatern = \"x\"\n").is_err());
    }

    #[test]
    fn test_load_missing_explicit_file_warns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        let (settings, warnings) = load_settings(Some(&path));
        assert_eq!(settings, Settings::default());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("not found"));
    }

    #[test]
    fn test_load_bad_pattern_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "[date]\npattern = \"dd.QQ\"\n").unwrap();
        let (settings, warnings) = load_settings(Some(&path));
        assert_eq!(settings.date.pattern, DEFAULT_DATE_PATTERN);
        assert_eq!(warnings.len(), 1);
        assert!(settings.interpreter().is_ok());
    }

    #[test]
    fn test_configure_table() {
        let settings = parse_settings(
            "[traversal]\nadvance_on_commit = true\n\n[traversal.mode]\naxis = \"by_row\"\n",
        )
        .unwrap();
        let mut table = FormTable::new(vec![crate::table::ColumnSpec::new("A")], 1);
        assert_eq!(*table.mode(), TraversalMode::data_entry());
        settings.configure_table(&mut table);
        assert_eq!(table.mode().axis, Axis::ByRow);
        assert!(table.advance_on_commit());
    }
}
