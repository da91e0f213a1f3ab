//! # Data Sweeper
//!
//! Load uploaded CSV and spreadsheet files into an in-memory table, clean it,
//! select columns, pick chart data and export the result again.
//!
//! ## Features
//!
//! - **Formats**: comma separated text (`.csv`) and Office Open XML workbooks
//!   (`.xlsx`, `.xlsm`) on input; CSV and XLSX on output
//! - **Type inference**: columns whose present values all parse as numbers are
//!   numeric, anything else is text
//! - **Cleaning**: duplicate row removal and mean imputation of numeric columns,
//!   each reporting what changed
//! - **Pure transformations**: every stage borrows a table and returns a new one,
//!   so a failed action never touches the current state
//!
//! ## Example
//!
//! ```
//! use data_sweeper::{export, load, remove_duplicates, ExportFormat, ExportOptions, LoadOptions, UploadedFile};
//!
//! let file = UploadedFile::new("people.csv", "id,name\n1,a\n1,a\n2,b\n");
//! let table = load(&file, &LoadOptions::default())?;
//! let cleaned = remove_duplicates(&table);
//! assert_eq!(cleaned.message, "1 duplicate row removed.");
//!
//! let artifact = export(&cleaned.table, file.name(), ExportFormat::Spreadsheet, &ExportOptions::default())?;
//! assert_eq!(artifact.file_name, "people.xlsx");
//! # Ok::<(), data_sweeper::SweeperError>(())
//! ```
//!
//! The library logs through `tracing` and installs no subscriber.
mod error;
mod helpers;
mod options;
pub mod pipeline;
mod spreadsheet;
mod table;

pub use error::SweeperError;
pub use options::{ExportOptions, LoadOptions, DEFAULT_NULLS, PREVIEW_ROWS};
pub use pipeline::{
    chart_data, export, fill_missing_with_mean, load, remove_duplicates, select_columns, CleaningResult,
    ExportArtifact, ExportFormat, FileEntry, Session, UploadedFile, Workspace,
};
pub use spreadsheet::SourceFormat;
pub use table::{Column, ColumnType, Table, TableError, Value};
