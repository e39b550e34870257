//! Persistence of per-table user preferences.

mod layout;

pub use layout::{ColumnLayout, ColumnState, layout_path, load_layout, save_layout};
