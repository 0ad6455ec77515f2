use std::path::PathBuf;

pub mod locator;
pub mod parameters;
pub mod placeholder;
pub mod project;
pub mod references;

pub use locator::{locate_descriptor, DESCRIPTOR_EXTENSIONS};
pub use parameters::{ParameterExtractor, ParameterMap};
pub use placeholder::{PlaceholderResolver, Resolution};
pub use project::{rename_project, rename_project_interactive};
pub use references::{LineChange, ReferenceRewriter, ReferenceUpdate, RenameMap, DOCUMENT_PATH_KEY};

/// Conditions that abort the whole run.
#[derive(thiserror::Error, Debug)]
pub enum RenameError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("No Altium project file (.PrjPcb, .PrjHar, or .PrjMbd) found in {directory:?}")]
    NoDescriptor { directory: PathBuf },
    #[error("Multiple Altium project files found, ensure only one exists: {}", .candidates.join(", "))]
    MultipleDescriptors { candidates: Vec<String> },
    #[error("Project file name '{name}' has missing parameters: {}", .missing.join(", "))]
    UnresolvedDescriptor { name: String, missing: Vec<String> },
    #[error("Cannot rename project file: {0}")]
    DescriptorRename(#[source] SkipReason),
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),
    #[error(transparent)]
    Confirmation(#[from] anyhow::Error),
}

/// Why a single entry was left untouched.
#[derive(thiserror::Error, Debug)]
pub enum SkipReason {
    #[error("'{name}' is missing values for parameters: {}", .missing.join(", "))]
    MissingParameters { name: String, missing: Vec<String> },
    #[error("'{target}' already exists, not renaming '{name}'")]
    TargetExists { name: String, target: String },
    #[error("rename of '{name}' declined")]
    Declined { name: String },
    #[error("failed to rename '{name}': {source}")]
    Failed {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// A completed (or, in a dry run, planned) rename within the target directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameRecord {
    pub original: String,
    pub renamed: String,
}

/// Tagged result of processing one directory entry.
#[derive(Debug)]
pub enum Outcome {
    Renamed(RenameRecord),
    Unchanged,
    Skipped(SkipReason),
}

#[derive(Debug, Clone, Default)]
pub struct RenameOptions {
    pub dry_run: bool,
}

#[derive(Debug)]
pub struct RenameSummary {
    pub descriptor: PathBuf,
    pub renamed: Vec<RenameRecord>,
    pub skipped: Vec<SkipReason>,
    pub references_updated: usize,
}

impl RenameSummary {
    pub fn files_renamed(&self) -> usize {
        self.renamed.len()
    }
}
