//! Form fields backed by the interpreters in `formgrid_dates`.

mod date_field;

pub use date_field::DateField;
