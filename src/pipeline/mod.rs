//! # Data Pipeline
//!
//! The stages a user drives from the presentation layer, leaf first:
//!
//! - [`loader`]: parse an uploaded file into a [`Table`](crate::table::Table)
//! - [`cleaning`]: remove duplicate rows, fill missing numbers with the column mean
//! - [`projector`]: keep an ordered subset of columns
//! - [`visualization`]: pick the numeric columns to chart
//! - [`exporter`]: serialize a table as CSV or XLSX
//! - [`session`]: per-file state holding the current table between actions
pub mod cleaning;
pub mod exporter;
pub mod loader;
pub mod projector;
pub mod session;
pub mod visualization;

pub use cleaning::{fill_missing_with_mean, remove_duplicates, CleaningResult};
pub use exporter::{export, ExportArtifact, ExportFormat};
pub use loader::{load, UploadedFile};
pub use projector::select_columns;
pub use session::{FileEntry, Session, Workspace};
pub use visualization::chart_data;
