//! Path resolution: turns command-line arguments into a flat list of files.
//!
//! Other paths pass through. Directories contribute their immediate
//! children, sorted by file name; nothing below that level is visited.
//! Every returned path is absolute (made absolute against the current
//! directory, without resolving symlinks).
//!
//! Non-image children, subdirectories and special files (FIFOs, devices)
//! are included here and dropped later by the [format gate](crate::format).
//! A directory that cannot be listed aborts resolution with
//! [`ResolveError::ReadDir`].

use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("input path not found: {}: {source}", path.display())]
    PathNotFound {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot read directory {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        source: walkdir::Error,
    },
}

/// Expand user-supplied paths into absolute file paths.
///
/// The first missing or inaccessible argument aborts resolution.
pub fn resolve_paths<P: AsRef<Path>>(inputs: &[P]) -> Result<Vec<PathBuf>, ResolveError> {
    let mut files = Vec::new();

    for input in inputs {
        let input = input.as_ref();
        let not_found = |source| ResolveError::PathNotFound {
            path: input.to_path_buf(),
            source,
        };

        let metadata = std::fs::metadata(input).map_err(not_found)?;
        let absolute = std::path::absolute(input).map_err(not_found)?;

        if metadata.is_dir() {
            files.extend(list_children(&absolute)?);
        } else {
            files.push(absolute);
        }
    }

    Ok(files)
}

/// Immediate children of `dir`, sorted by file name.
fn list_children(dir: &Path) -> Result<Vec<PathBuf>, ResolveError> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .map(|entry| {
            entry
                .map(walkdir::DirEntry::into_path)
                .map_err(|source| ResolveError::ReadDir {
                    path: dir.to_path_buf(),
                    source,
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn regular_file_passes_through_as_absolute() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("photo.jpg");
        touch(&file);

        let files = resolve_paths(&[&file]).unwrap();
        assert_eq!(files, vec![file]);
        assert!(files[0].is_absolute());
    }

    #[test]
    fn directory_expands_to_sorted_children() {
        let tmp = TempDir::new().unwrap();
        for name in ["b.png", "notes.txt", "a.jpg"] {
            touch(&tmp.path().join(name));
        }

        let files = resolve_paths(&[tmp.path()]).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.jpg", "b.png", "notes.txt"]);
        assert!(files.iter().all(|p| p.is_absolute()));
    }

    #[test]
    fn directory_expansion_is_one_level_only() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("top.jpg"));
        let nested = tmp.path().join("nested");
        fs::create_dir(&nested).unwrap();
        touch(&nested.join("deep.jpg"));

        let files = resolve_paths(&[tmp.path()]).unwrap();
        assert_eq!(files, vec![nested.clone(), tmp.path().join("top.jpg")]);
        assert!(!files.contains(&nested.join("deep.jpg")));
    }

    #[test]
    fn argument_order_is_preserved() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("dir");
        fs::create_dir(&dir).unwrap();
        touch(&dir.join("inside.png"));
        let z = tmp.path().join("z.jpg");
        let a = tmp.path().join("a.jpg");
        touch(&z);
        touch(&a);

        let files = resolve_paths(&[z.clone(), dir.clone(), a.clone()]).unwrap();
        assert_eq!(files, vec![z, dir.join("inside.png"), a]);
    }

    #[test]
    fn relative_paths_become_absolute() {
        let files = resolve_paths(&["Cargo.toml"]).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].is_absolute());
        assert!(files[0].ends_with("Cargo.toml"));
    }

    #[test]
    fn missing_path_is_an_error_naming_the_path() {
        let tmp = TempDir::new().unwrap();
        let existing = tmp.path().join("ok.jpg");
        touch(&existing);
        let missing = tmp.path().join("missing.jpg");

        let err = resolve_paths(&[existing, missing.clone()]).unwrap_err();
        match &err {
            ResolveError::PathNotFound { path, .. } => assert_eq!(path, &missing),
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("missing.jpg"));
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_directory_is_read_dir_error() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let locked = tmp.path().join("locked");
        fs::create_dir(&locked).unwrap();
        touch(&locked.join("a.jpg"));
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Permission bits do not bind a privileged user.
        let result = fs::read_dir(&locked)
            .is_err()
            .then(|| resolve_paths(&[&locked]));
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        let Some(result) = result else {
            return;
        };

        match result.unwrap_err() {
            ResolveError::ReadDir { path, .. } => assert_eq!(path, locked),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn special_files_are_left_to_the_gate() {
        let tmp = TempDir::new().unwrap();
        let fifo = tmp.path().join("pipe.jpg");
        let status = std::process::Command::new("mkfifo")
            .arg(&fifo)
            .status()
            .unwrap();
        assert!(status.success());

        let files = resolve_paths(&[tmp.path()]).unwrap();
        assert_eq!(files, vec![fifo.clone()]);
        let (accepted, skipped) = crate::format::gate(files);
        assert!(accepted.is_empty());
        assert_eq!(skipped, vec![fifo]);
    }

    #[test]
    fn empty_directory_contributes_nothing() {
        let tmp = TempDir::new().unwrap();
        assert!(resolve_paths(&[tmp.path()]).unwrap().is_empty());
    }
}
