//! Column layout (order, width, visibility) saved as TOML.
//!
//! Columns are matched by name, so a layout saved before a column was added
//! or removed still applies to the columns it knows about.

use crate::error::{FormGridError, Result};
use crate::table::FormTable;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const MAX_LAYOUT_FILE_BYTES: u64 = 1_048_576; // 1 MiB

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnLayout {
    #[serde(default)]
    pub columns: Vec<ColumnState>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnState {
    pub name: String,
    pub width: u16,
    pub visible: bool,
    /// Display position (0 = leftmost)
    pub position: usize,
}

impl ColumnLayout {
    pub fn capture(table: &FormTable) -> Self {
        let columns = table
            .columns()
            .iter()
            .enumerate()
            .map(|(position, column)| ColumnState {
                name: column.name.clone(),
                width: column.width,
                visible: column.visible,
                position,
            })
            .collect();
        ColumnLayout { columns }
    }

    /// Restore widths, visibility and order onto `table`.
    pub fn apply(&self, table: &mut FormTable) -> Result<()> {
        let mut known: Vec<&ColumnState> = self
            .columns
            .iter()
            .filter(|state| table.column_index(&state.name).is_some())
            .collect();

        for state in &known {
            let column = table.column_mut(&state.name)?;
            column.width = state.width;
            column.visible = state.visible;
        }

        known.sort_by_key(|state| state.position);
        let last = table.columns().len().saturating_sub(1);
        for state in known {
            let current = table
                .column_index(&state.name)
                .ok_or_else(|| FormGridError::UnknownColumn(state.name.clone()))?;
            table.move_column(current, state.position.min(last))?;
        }
        Ok(())
    }
}

/// Default location of the layout file for `table_id`.
pub fn layout_path(table_id: &str) -> Option<PathBuf> {
    ProjectDirs::from("", "", "formgrid").map(|dirs| {
        dirs.config_dir()
            .join("layouts")
            .join(format!("{}.toml", table_id))
    })
}

pub fn save_layout(path: &Path, layout: &ColumnLayout) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(layout)?;
    fs::write(path, content)?;
    debug!(path = %path.display(), columns = layout.columns.len(), "saved column layout");
    Ok(())
}

pub fn load_layout(path: &Path) -> Result<ColumnLayout> {
    let meta = fs::metadata(path)?;
    if meta.len() > MAX_LAYOUT_FILE_BYTES {
        return Err(FormGridError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!(
                "Refusing to read {}: layout file too large ({} bytes, max {})",
                path.display(),
                meta.len(),
                MAX_LAYOUT_FILE_BYTES
            ),
        )));
    }
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}
