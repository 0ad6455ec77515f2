use std::collections::HashMap;
use tracing::debug;

/// Original on-disk filename to the filename it was renamed to.
///
/// Keys are bare filenames. Entries of the target directory are assumed to
/// have unique basenames, which holds for a flat directory listing.
pub type RenameMap = HashMap<String, String>;

/// Key of the descriptor lines that point at project documents.
pub const DOCUMENT_PATH_KEY: &str = "DocumentPath";

pub struct ReferenceRewriter {
    prefix: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineChange {
    pub line_number: usize,
    pub old: String,
    pub new: String,
}

/// Rewritten descriptor content and the lines that changed.
#[derive(Debug, Clone)]
pub struct ReferenceUpdate {
    pub content: String,
    pub changes: Vec<LineChange>,
}

impl Default for ReferenceRewriter {
    fn default() -> Self {
        Self::new(DOCUMENT_PATH_KEY)
    }
}

impl ReferenceRewriter {
    pub fn new(key: &str) -> Self {
        Self {
            prefix: format!("{}=", key),
        }
    }

    /// Rewrites one reference line if its filename was renamed.
    ///
    /// `line` excludes the line terminator. Only the filename component of the
    /// path is replaced; the directory prefix and indentation survive.
    pub fn rewrite_line(&self, line: &str, renames: &RenameMap) -> Option<String> {
        let indent_len = line.len() - line.trim_start().len();
        let (indent, body) = line.split_at(indent_len);
        let path = body.trim_end().strip_prefix(&self.prefix)?;

        let (dir_prefix, file_name) = split_file_name(path);
        let new_file_name = renames.get(file_name)?;
        if new_file_name == file_name {
            return None;
        }

        debug!("Reference match: '{}' -> '{}'", file_name, new_file_name);
        Some(format!("{}{}{}{}", indent, self.prefix, dir_prefix, new_file_name))
    }

    /// Applies [`Self::rewrite_line`] to every line of `content`.
    ///
    /// Returns `None` when nothing changed. Untouched lines, and the line
    /// endings of rewritten ones, are preserved byte for byte.
    pub fn rewrite(&self, content: &str, renames: &RenameMap) -> Option<ReferenceUpdate> {
        if renames.is_empty() {
            return None;
        }

        let mut updated = String::with_capacity(content.len());
        let mut changes = Vec::new();

        for (index, raw_line) in content.split_inclusive('\n').enumerate() {
            let (line, ending) = split_line_ending(raw_line);

            match self.rewrite_line(line, renames) {
                Some(new_line) => {
                    changes.push(LineChange {
                        line_number: index + 1,
                        old: line.trim().to_string(),
                        new: new_line.trim().to_string(),
                    });
                    updated.push_str(&new_line);
                    updated.push_str(ending);
                }
                None => updated.push_str(raw_line),
            }
        }

        if changes.is_empty() {
            None
        } else {
            Some(ReferenceUpdate {
                content: updated,
                changes,
            })
        }
    }
}

/// Splits a descriptor path into its directory prefix (separator included)
/// and filename. Both `\` and `/` separate components.
fn split_file_name(path: &str) -> (&str, &str) {
    match path.rfind(['\\', '/']) {
        Some(index) => path.split_at(index + 1),
        None => ("", path),
    }
}

fn split_line_ending(raw_line: &str) -> (&str, &str) {
    if let Some(line) = raw_line.strip_suffix("\r\n") {
        (line, "\r\n")
    } else if let Some(line) = raw_line.strip_suffix('\n') {
        (line, "\n")
    } else {
        (raw_line, "")
    }
}
