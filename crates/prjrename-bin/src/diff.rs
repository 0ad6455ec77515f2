use anyhow::Result;
use inquire::Confirm;
use similar::{ChangeTag, TextDiff};
use std::fmt::Write;
use std::path::Path;

/// Renders a coloured line diff, or `None` when the contents are equal.
fn render_diff(old_content: &str, new_content: &str) -> Result<Option<String>> {
    let diff = TextDiff::from_lines(old_content, new_content);
    let mut output = String::new();
    let mut has_changes = false;

    for (i, group) in diff.grouped_ops(2).iter().enumerate() {
        if i > 0 {
            writeln!(output, "{:-^1$}", "", 40)?;
        }
        for op in group {
            for change in diff.iter_changes(op) {
                let (sign, style) = match change.tag() {
                    ChangeTag::Delete => ("- ", "\x1b[31m"),
                    ChangeTag::Insert => ("+ ", "\x1b[32m"),
                    ChangeTag::Equal => ("  ", "\x1b[0m"),
                };
                write!(output, "{}{}{}\x1b[0m", style, sign, change.value().replace("\r\n", "\n"))?;
                if change.missing_newline() {
                    writeln!(output)?;
                }
                if change.tag() != ChangeTag::Equal {
                    has_changes = true;
                }
            }
        }
    }

    Ok(has_changes.then_some(output))
}

pub fn show_diff_and_confirm(
    file_path: &Path,
    old_content: &str,
    new_content: &str,
    change_description: &str,
) -> Result<bool> {
    println!("\n📝 {}: {}", change_description, file_path.display());

    let Some(output) = render_diff(old_content, new_content)? else {
        println!("No changes detected.");
        return Ok(false);
    };

    println!("{}", output);

    let apply_change = Confirm::new("Apply this change?")
        .with_default(true)
        .prompt()?;

    Ok(apply_change)
}

/// One-line summary of a rename within the project directory.
fn describe_rename(old_path: &Path, new_path: &Path, change_type: &str) -> String {
    let name_of = |path: &Path| {
        path.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string())
    };
    format!(
        "{}: \x1b[31m{}\x1b[0m -> \x1b[32m{}\x1b[0m",
        change_type,
        name_of(old_path),
        name_of(new_path)
    )
}

pub fn show_path_change_and_confirm(
    old_path: &Path,
    new_path: &Path,
    change_type: &str,
) -> Result<bool> {
    println!("\n📁 {}", describe_rename(old_path, new_path, change_type));
    if let Some(dir) = old_path.parent() {
        println!("   in {}", dir.display());
    }

    let rename = Confirm::new(&format!("Rename this {}?", change_type.to_lowercase()))
        .with_default(true)
        .with_help_message("Declining leaves the file under its current name")
        .prompt()?;

    Ok(rename)
}
