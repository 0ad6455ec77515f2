use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::RenameError;

/// Altium project file extensions that may act as the descriptor.
pub const DESCRIPTOR_EXTENSIONS: [&str; 3] = ["PrjPcb", "PrjHar", "PrjMbd"];

pub fn is_descriptor(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| DESCRIPTOR_EXTENSIONS.contains(&ext))
}

/// Finds the single project file among the immediate entries of `dir`.
///
/// Returns its absolute path. Zero or several candidates abort the run.
pub fn locate_descriptor(dir: &Path) -> Result<PathBuf, RenameError> {
    let dir = std::path::absolute(dir)?;

    let mut candidates: Vec<PathBuf> = fs::read_dir(&dir)?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_descriptor(path))
        .collect();
    candidates.sort();

    debug!("Project file candidates in {:?}: {:?}", dir, candidates);

    match candidates.len() {
        0 => Err(RenameError::NoDescriptor { directory: dir }),
        1 => Ok(candidates.remove(0)),
        _ => Err(RenameError::MultipleDescriptors {
            candidates: candidates
                .iter()
                .filter_map(|path| path.file_name())
                .map(|name| name.to_string_lossy().into_owned())
                .collect(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_is_descriptor() {
        assert!(is_descriptor(Path::new("Board.PrjPcb")));
        assert!(is_descriptor(Path::new("Harness.PrjHar")));
        assert!(is_descriptor(Path::new("Multi.PrjMbd")));
        assert!(!is_descriptor(Path::new("Board.prjpcb")));
        assert!(!is_descriptor(Path::new("Board.SchDoc")));
        assert!(!is_descriptor(Path::new("PrjPcb")));
    }

    #[test]
    fn test_single_descriptor_found() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Board.PrjPcb"), "").unwrap();
        fs::write(dir.path().join("Sheet.SchDoc"), "").unwrap();

        let found = locate_descriptor(dir.path()).unwrap();

        assert!(found.is_absolute());
        assert_eq!(found.file_name().unwrap(), "Board.PrjPcb");
    }

    #[test]
    fn test_no_descriptor() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Sheet.SchDoc"), "").unwrap();

        let result = locate_descriptor(dir.path());

        assert!(matches!(result, Err(RenameError::NoDescriptor { .. })));
    }

    #[test]
    fn test_multiple_descriptors_named() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("B.PrjHar"), "").unwrap();
        fs::write(dir.path().join("A.PrjPcb"), "").unwrap();

        match locate_descriptor(dir.path()) {
            Err(RenameError::MultipleDescriptors { candidates }) => {
                assert_eq!(candidates, vec!["A.PrjPcb".to_string(), "B.PrjHar".to_string()]);
            }
            other => panic!("Expected MultipleDescriptors, got {:?}", other),
        }
    }

    #[test]
    fn test_descriptor_directories_are_ignored() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("Old.PrjPcb")).unwrap();
        fs::write(dir.path().join("Board.PrjPcb"), "").unwrap();

        let found = locate_descriptor(dir.path()).unwrap();

        assert_eq!(found.file_name().unwrap(), "Board.PrjPcb");
    }
}
