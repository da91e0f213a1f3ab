//! Per-file state held between user interactions.
//!
//! A [`Session`] owns every uploaded file. Each successfully loaded file gets
//! a [`Workspace`] with its current table and column selection; every action
//! re-derives its result from that state and only replaces it on success.

use crate::error::SweeperError;
use crate::options::ExportOptions;
use crate::options::LoadOptions;
use crate::options::PREVIEW_ROWS;
use crate::pipeline::cleaning::fill_missing_with_mean;
use crate::pipeline::cleaning::remove_duplicates;
use crate::pipeline::exporter::export;
use crate::pipeline::exporter::ExportArtifact;
use crate::pipeline::exporter::ExportFormat;
use crate::pipeline::loader::load;
use crate::pipeline::loader::UploadedFile;
use crate::pipeline::projector::select_columns;
use crate::pipeline::visualization::chart_data;
use crate::table::Table;
use tracing::warn;

/// Outcome of loading one uploaded file.
#[derive(Debug)]
pub enum FileEntry {
    Loaded(Workspace),
    /// The file could not be loaded; other files are unaffected
    Failed {
        name: String,
        error: SweeperError,
    },
}

impl FileEntry {
    pub fn name(&self) -> &str {
        match self {
            FileEntry::Loaded(workspace) => workspace.file().name(),
            FileEntry::Failed { name, .. } => name,
        }
    }

    pub fn workspace(&self) -> Option<&Workspace> {
        match self {
            FileEntry::Loaded(workspace) => Some(workspace),
            FileEntry::Failed { .. } => None,
        }
    }

    pub fn workspace_mut(&mut self) -> Option<&mut Workspace> {
        match self {
            FileEntry::Loaded(workspace) => Some(workspace),
            FileEntry::Failed { .. } => None,
        }
    }
}

/// Uploaded files in upload order.
#[derive(Debug, Default)]
pub struct Session {
    load_options: LoadOptions,
    export_options: ExportOptions,
    entries: Vec<FileEntry>,
}

impl Session {
    pub fn new(load_options: LoadOptions, export_options: ExportOptions) -> Self {
        Session {
            load_options,
            export_options,
            entries: Vec::new(),
        }
    }

    /// Loads the given files in order. A file that fails to load is kept as a
    /// failed entry and does not stop the remaining ones.
    pub fn upload<I>(&mut self, files: I)
    where
        I: IntoIterator<Item = UploadedFile>,
    {
        for file in files {
            let entry = match load(&file, &self.load_options) {
                Ok(table) => FileEntry::Loaded(Workspace::new(file, table, self.export_options.clone())),
                Err(error) => {
                    warn!("Failed to load '{}': {}", file.name(), error);
                    FileEntry::Failed {
                        name: file.name().to_owned(),
                        error,
                    }
                }
            };
            self.entries.push(entry);
        }
    }

    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    pub fn entry(&self, name: &str) -> Option<&FileEntry> {
        self.entries.iter().find(|entry| entry.name() == name)
    }

    /// Workspace of the first loaded file with this name
    pub fn workspace_mut(&mut self, name: &str) -> Option<&mut Workspace> {
        self.entries
            .iter_mut()
            .filter(|entry| entry.name() == name)
            .find_map(FileEntry::workspace_mut)
    }

    pub fn workspaces(&self) -> impl Iterator<Item = &Workspace> {
        self.entries.iter().filter_map(FileEntry::workspace)
    }
}

/// The table currently held for one file, with the user's column selection.
#[derive(Debug)]
pub struct Workspace {
    file: UploadedFile,
    table: Table,
    /// `None` selects every column
    selection: Option<Vec<String>>,
    export_options: ExportOptions,
}

impl Workspace {
    pub fn new(file: UploadedFile, table: Table, export_options: ExportOptions) -> Self {
        Workspace {
            file,
            table,
            selection: None,
            export_options,
        }
    }

    pub fn file(&self) -> &UploadedFile {
        &self.file
    }

    /// The full current table, before column selection
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Names of the selected columns, defaulting to all of them
    pub fn selection(&self) -> Vec<&str> {
        match &self.selection {
            Some(names) => names.iter().map(String::as_str).collect(),
            None => self.table.column_names(),
        }
    }

    /// Replaces the current table by its deduplicated version.
    pub fn remove_duplicates(&mut self) -> String {
        let result = remove_duplicates(&self.table);
        self.table = result.table;
        result.message
    }

    /// Replaces the current table by its mean-imputed version.
    pub fn fill_missing(&mut self) -> String {
        let result = fill_missing_with_mean(&self.table);
        self.table = result.table;
        result.message
    }

    /// Sets the column selection. An unknown name leaves the previous selection in place.
    pub fn select_columns<S: AsRef<str>>(&mut self, names: &[S]) -> Result<(), SweeperError> {
        let projected = select_columns(&self.table, names).inspect_err(|error| {
            warn!("Column selection on '{}' failed: {}", self.file.name(), error);
        })?;
        self.selection = Some(projected.column_names().into_iter().map(str::to_owned).collect());
        Ok(())
    }

    /// The current table restricted to the selected columns.
    pub fn view(&self) -> Result<Table, SweeperError> {
        match &self.selection {
            Some(names) => select_columns(&self.table, names),
            None => Ok(self.table.clone()),
        }
    }

    /// First rows of the selected columns.
    pub fn preview(&self) -> Result<Table, SweeperError> {
        Ok(self.view()?.head(PREVIEW_ROWS))
    }

    /// Numeric columns of the selection to plot.
    pub fn chart(&self) -> Result<Table, SweeperError> {
        Ok(chart_data(&self.view()?))
    }

    /// Serializes the selected columns.
    pub fn export(&self, format: ExportFormat) -> Result<ExportArtifact, SweeperError> {
        self.view()
            .and_then(|table| export(&table, self.file.name(), format, &self.export_options))
            .inspect_err(|error| warn!("Export of '{}' failed: {}", self.file.name(), error))
    }
}
