use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use crate::locator::locate_descriptor;
use crate::parameters::{ParameterExtractor, ParameterMap};
use crate::placeholder::PlaceholderResolver;
use crate::references::{ReferenceRewriter, RenameMap};
use crate::{Outcome, RenameError, RenameOptions, RenameRecord, RenameSummary, SkipReason};

/// Renames templated files in `dir` and updates the project file's
/// `DocumentPath` references to match.
pub fn rename_project(dir: &Path, options: &RenameOptions) -> Result<RenameSummary, RenameError> {
    info!("Starting project rename: {:?}", dir);

    let accept_content = |_: &Path, _: &str, _: &str, _: &str| -> Result<bool> { Ok(true) };
    let accept_path = |_: &Path, _: &Path, _: &str| -> Result<bool> { Ok(true) };
    let renamer = ProjectRenamer::new(options, &accept_content, &accept_path)?;

    let summary = renamer.run(dir)?;
    log_summary(&summary);
    Ok(summary)
}

/// Like [`rename_project`], but every rename and the project file update are
/// passed to a callback first. A callback returning `false` declines the change.
pub fn rename_project_interactive<F, G>(
    dir: &Path,
    options: &RenameOptions,
    content_callback: F,
    path_callback: G,
) -> Result<RenameSummary, RenameError>
where
    F: Fn(&Path, &str, &str, &str) -> Result<bool>,
    G: Fn(&Path, &Path, &str) -> Result<bool>,
{
    info!("Starting interactive project rename: {:?}", dir);

    let renamer = ProjectRenamer::new(options, &content_callback, &path_callback)?;

    let summary = renamer.run(dir)?;
    log_summary(&summary);
    Ok(summary)
}

fn log_summary(summary: &RenameSummary) {
    info!(
        "Rename complete: {} files renamed, {} skipped, {} references updated",
        summary.files_renamed(),
        summary.skipped.len(),
        summary.references_updated
    );
}

struct ProjectRenamer<'a, F, G> {
    options: &'a RenameOptions,
    extractor: ParameterExtractor,
    resolver: PlaceholderResolver,
    rewriter: ReferenceRewriter,
    content_callback: &'a F,
    path_callback: &'a G,
}

impl<'a, F, G> ProjectRenamer<'a, F, G>
where
    F: Fn(&Path, &str, &str, &str) -> Result<bool>,
    G: Fn(&Path, &Path, &str) -> Result<bool>,
{
    fn new(
        options: &'a RenameOptions,
        content_callback: &'a F,
        path_callback: &'a G,
    ) -> Result<Self, RenameError> {
        Ok(Self {
            options,
            extractor: ParameterExtractor::new()?,
            resolver: PlaceholderResolver::new()?,
            rewriter: ReferenceRewriter::default(),
            content_callback,
            path_callback,
        })
    }

    fn run(&self, dir: &Path) -> Result<RenameSummary, RenameError> {
        if self.options.dry_run {
            warn!("Dry run mode - no changes will be made");
        }

        let located = locate_descriptor(dir)?;
        let original_name = file_name_of(&located);

        let descriptor_record = self.rename_descriptor(&located, &original_name)?;
        let descriptor = match &descriptor_record {
            Some(record) if !self.options.dry_run => located.with_file_name(&record.renamed),
            _ => located.clone(),
        };
        info!("Operating on Altium project file: {}", file_name_of(&descriptor));

        let parameters = self.extractor.extract(&descriptor);
        if parameters.is_empty() {
            warn!("No parameters found in the project file. No files will be renamed based on parameters.");
        }

        let mut descriptor_names = vec![original_name];
        if let Some(record) = &descriptor_record {
            descriptor_names.push(record.renamed.clone());
        }

        let mut summary = RenameSummary {
            descriptor: descriptor.clone(),
            renamed: Vec::new(),
            skipped: Vec::new(),
            references_updated: 0,
        };

        let dir = located.parent().unwrap_or(dir);
        for path in list_files(dir)? {
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                warn!("Skipping non UTF-8 file name: {:?}", path);
                continue;
            };
            if descriptor_names.iter().any(|d| d == name) {
                continue;
            }

            match self.rename_entry(&path, name, &parameters)? {
                Outcome::Renamed(record) => summary.renamed.push(record),
                Outcome::Unchanged => {}
                Outcome::Skipped(reason) => {
                    warn!("Skipping: {}", reason);
                    summary.skipped.push(reason);
                }
            }
        }

        let mut renames: RenameMap = summary
            .renamed
            .iter()
            .map(|record| (record.original.clone(), record.renamed.clone()))
            .collect();
        if let Some(record) = descriptor_record {
            renames.insert(record.original, record.renamed);
        }

        summary.references_updated = self.update_references(&descriptor, &renames)?;
        Ok(summary)
    }

    /// Resolves the project file's own name against its own parameters.
    ///
    /// Any failure here is fatal since every later step works on the result.
    fn rename_descriptor(
        &self,
        descriptor: &Path,
        name: &str,
    ) -> Result<Option<RenameRecord>, RenameError> {
        let parameters = self.extractor.extract(descriptor);
        let resolution = self.resolver.resolve(name, &parameters);

        if resolution.resolved == name {
            return Ok(None);
        }
        if !resolution.is_complete() {
            return Err(RenameError::UnresolvedDescriptor {
                name: name.to_string(),
                missing: resolution.missing,
            });
        }

        match self.apply_rename(descriptor, name, &resolution.resolved, "Project file")? {
            Outcome::Renamed(record) => Ok(Some(record)),
            Outcome::Unchanged => Ok(None),
            Outcome::Skipped(reason) => Err(RenameError::DescriptorRename(reason)),
        }
    }

    fn rename_entry(
        &self,
        path: &Path,
        name: &str,
        parameters: &ParameterMap,
    ) -> Result<Outcome, RenameError> {
        if !self.resolver.has_placeholders(name) {
            return Ok(Outcome::Unchanged);
        }

        let resolution = self.resolver.resolve(name, parameters);
        if !resolution.is_complete() {
            return Ok(Outcome::Skipped(SkipReason::MissingParameters {
                name: name.to_string(),
                missing: resolution.missing,
            }));
        }
        if resolution.resolved == name {
            debug!("Resolved name unchanged: {}", name);
            return Ok(Outcome::Unchanged);
        }

        self.apply_rename(path, name, &resolution.resolved, "File")
    }

    fn apply_rename(
        &self,
        from: &Path,
        name: &str,
        new_name: &str,
        change_type: &str,
    ) -> Result<Outcome, RenameError> {
        let target = from.with_file_name(new_name);

        if target.exists() && target != from {
            return Ok(Outcome::Skipped(SkipReason::TargetExists {
                name: name.to_string(),
                target: new_name.to_string(),
            }));
        }

        if !(self.path_callback)(from, &target, change_type)? {
            return Ok(Outcome::Skipped(SkipReason::Declined {
                name: name.to_string(),
            }));
        }

        if self.options.dry_run {
            info!("Would rename {}: '{}' -> '{}'", change_type.to_lowercase(), name, new_name);
        } else {
            if let Err(source) = fs::rename(from, &target) {
                return Ok(Outcome::Skipped(SkipReason::Failed {
                    name: name.to_string(),
                    source,
                }));
            }
            info!("Renamed {}: '{}' -> '{}'", change_type.to_lowercase(), name, new_name);
        }

        Ok(Outcome::Renamed(RenameRecord {
            original: name.to_string(),
            renamed: new_name.to_string(),
        }))
    }

    /// Rewrites `DocumentPath` lines naming a renamed file. Returns the
    /// number of lines written. I/O failures are reported, not propagated.
    fn update_references(&self, descriptor: &Path, renames: &RenameMap) -> Result<usize, RenameError> {
        let display_name = file_name_of(descriptor);

        if renames.is_empty() {
            info!("No files were renamed, so no DocumentPath updates are necessary.");
            return Ok(0);
        }

        let content = match fs::read_to_string(descriptor) {
            Ok(content) => content,
            Err(e) => {
                error!("Error reading project file '{}': {}", display_name, e);
                return Ok(0);
            }
        };

        let Some(update) = self.rewriter.rewrite(&content, renames) else {
            info!("No DocumentPath changes were needed in '{}'.", display_name);
            return Ok(0);
        };

        for change in &update.changes {
            info!("DocumentPath change: '{}' -> '{}'", change.old, change.new);
        }

        if !(self.content_callback)(descriptor, &content, &update.content, "Reference update")? {
            info!("Reference update declined for '{}'", display_name);
            return Ok(0);
        }

        if self.options.dry_run {
            info!("Would write updated content to '{}'", display_name);
        } else {
            if let Err(e) = fs::write(descriptor, &update.content) {
                error!("Error updating project file content '{}': {}", display_name, e);
                return Ok(0);
            }
            info!("Successfully wrote updated content to '{}'", display_name);
        }

        Ok(update.changes.len())
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Regular files directly inside `dir`, sorted by path.
fn list_files(dir: &Path) -> Result<Vec<PathBuf>, RenameError> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    files.sort();
    Ok(files)
}
