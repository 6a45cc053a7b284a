//! Filesystem helpers.
//!
//! - `normalize_path` - absolute path form (canonicalize + fallback)
//! - `expand_path` - tilde expansion, then resolve against a base directory
//! - `write_atomic` - whole-file replacement through a sibling temp file

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to:
/// - Return as-is if already absolute
/// - Join with current directory if relative
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Expand `~` and resolve a relative path against `base`.
pub fn expand_path(path: &Path, base: &Path) -> PathBuf {
    let expanded = shellexpand::tilde(&path.to_string_lossy()).into_owned();
    let path = PathBuf::from(expanded);
    let full = if path.is_relative() {
        base.join(&path)
    } else {
        path
    };
    normalize_path(&full)
}

/// Replace `path` with `contents` in one step.
///
/// Parent directories are created as needed. The bytes go to a temp file
/// next to the target, which is then renamed over it, so readers see either
/// the old document or the new one, never a partial write.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("`{}` has no parent directory", path.display()))?;
    fs::create_dir_all(parent)
        .with_context(|| format!("Failed to create directory `{}`", parent.display()))?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp = parent.join(format!(".{file_name}.tmp"));

    fs::write(&tmp, contents).with_context(|| format!("Failed to write `{}`", tmp.display()))?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e).with_context(|| format!("Failed to replace `{}`", path.display()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_normalize_path_relative() {
        let normalized = normalize_path(Path::new("relative/path/file.txt"));
        assert!(normalized.is_absolute());
    }

    #[test]
    fn test_expand_path_relative_to_base() {
        let expanded = expand_path(Path::new("dist"), Path::new("/project"));
        assert_eq!(expanded, PathBuf::from("/project/dist"));
    }

    #[test]
    fn test_expand_path_absolute_kept() {
        let expanded = expand_path(Path::new("/opt/chrome"), Path::new("/project"));
        assert_eq!(expanded, PathBuf::from("/opt/chrome"));
    }

    #[test]
    fn test_write_atomic_creates_dirs() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("a/b/index.html");

        write_atomic(&target, "<html></html>").unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "<html></html>");
        assert!(!dir.path().join("a/b/.index.html.tmp").exists());
    }

    #[test]
    fn test_write_atomic_replaces_whole_file() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("index.html");
        fs::write(&target, "a much longer previous document body").unwrap();

        write_atomic(&target, "short").unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "short");
    }
}
