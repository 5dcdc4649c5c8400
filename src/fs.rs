//! Filesystem helpers for configuration discovery.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// How symlinks are handled while walking a directory tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymlinkMode {
    /// Symlinks are resolved and followed.
    Follow,
    /// Finding a symlink aborts the walk.
    Error,
}

/// Recursively walk `root`, calling `f` for every file found.
///
/// Entries are visited in file name order so results do not depend on the
/// directory listing order of the platform. The walk stops at the first error.
pub fn walk_files<F>(root: &Path, mode: SymlinkMode, f: &mut F) -> Result<()>
where
    F: FnMut(&Path) -> Result<()>,
{
    let mut entries = std::fs::read_dir(root)
        .map_err(|e| Error::io(root, e))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(|e| Error::io(root, e))?;
    entries.sort();

    for path in entries {
        let meta = std::fs::symlink_metadata(&path).map_err(|e| Error::io(&path, e))?;

        let (path, meta) = if meta.file_type().is_symlink() {
            match mode {
                SymlinkMode::Error => return Err(Error::Symlink { path }),
                SymlinkMode::Follow => {
                    let target = std::fs::canonicalize(&path).map_err(|e| Error::io(&path, e))?;
                    let meta = std::fs::metadata(&target).map_err(|e| Error::io(&target, e))?;
                    (target, meta)
                }
            }
        } else {
            (path, meta)
        };

        if meta.is_dir() {
            walk_files(&path, mode, f)?;
        } else {
            f(&path)?;
        }
    }

    Ok(())
}

/// Search `start` and each of its parents for a file called `filename`.
///
/// Returns the absolute path of the first match, or `None` when the
/// filesystem root is reached without finding it.
pub fn find_file_in_parent_dirs(start: &Path, filename: &str) -> Result<Option<PathBuf>> {
    let start = std::path::absolute(start).map_err(|e| Error::io(start, e))?;
    let mut dir = Some(start.as_path());

    while let Some(current) = dir {
        let candidate = current.join(filename);
        match std::fs::metadata(&candidate) {
            Ok(_) => return Ok(Some(candidate)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(Error::io(candidate, e)),
        }
        dir = current.parent();
    }

    Ok(None)
}

/// Find files called `filename` in `dir` and its subdirectories, descending
/// at most `max_depth` levels below `dir`.
///
/// Results are absolute and sorted.
pub fn find_files_in_sub_dir(dir: &Path, filename: &str, max_depth: usize) -> Result<Vec<PathBuf>> {
    let dir = std::path::absolute(dir).map_err(|e| Error::io(dir, e))?;
    let mut result = Vec::new();
    collect_named(&dir, filename, max_depth, &mut result)?;
    result.sort();
    Ok(result)
}

fn collect_named(dir: &Path, filename: &str, depth_left: usize, out: &mut Vec<PathBuf>) -> Result<()> {
    let candidate = dir.join(filename);
    if candidate.is_file() {
        out.push(candidate);
    }

    if depth_left == 0 {
        return Ok(());
    }

    for entry in std::fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let path = entry.path();
        if path.is_dir() {
            collect_named(&path, filename, depth_left - 1, out)?;
        }
    }

    Ok(())
}

/// Check that every path exists and is a directory.
pub fn dirs_exist<P: AsRef<Path>>(paths: &[P]) -> Result<()> {
    for path in paths {
        let path = path.as_ref();
        let meta = std::fs::metadata(path).map_err(|e| Error::io(path, e))?;
        if !meta.is_dir() {
            return Err(Error::io(
                path,
                std::io::Error::new(std::io::ErrorKind::Other, "not a directory"),
            ));
        }
    }

    Ok(())
}
