//! Small filesystem helpers shared across pipeline stages.

use std::fs;
use std::io;
use std::path::Path;

/// Delete every child of `dir` while preserving `dir` itself.
///
/// A missing directory is a no-op, not an error: callers use this for
/// clean-rebuild semantics where "already empty" and "not yet created" are
/// equivalent starting states.
pub fn clear_dir(dir: &Path) -> io::Result<()> {
    if !dir.exists() {
        return Ok(());
    }
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            fs::remove_dir_all(entry.path())?;
        } else {
            fs::remove_file(entry.path())?;
        }
    }
    Ok(())
}

/// Binary file copy that creates intermediate destination directories.
pub fn copy_with_parents(src: &Path, dst: &Path) -> io::Result<u64> {
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(src, dst)
}

/// Write `content` to `path` only when the file does not already exist.
/// Used for seed files that users may hand-edit. Returns whether the file
/// was written.
pub fn write_text_if_absent(path: &Path, content: &str) -> io::Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn clear_dir_removes_children_keeps_root() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.txt"), "a").unwrap();
        fs::create_dir_all(tmp.path().join("nested/deep")).unwrap();
        fs::write(tmp.path().join("nested/deep/b.txt"), "b").unwrap();

        clear_dir(tmp.path()).unwrap();

        assert!(tmp.path().exists());
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[test]
    fn clear_dir_missing_is_noop() {
        let tmp = TempDir::new().unwrap();
        clear_dir(&tmp.path().join("nope")).unwrap();
    }

    #[test]
    fn copy_creates_parent_dirs() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src.md");
        fs::write(&src, "hello").unwrap();

        let dst = tmp.path().join("a/b/c/dst.md");
        copy_with_parents(&src, &dst).unwrap();

        assert_eq!(fs::read_to_string(dst).unwrap(), "hello");
    }

    #[test]
    fn write_if_absent_preserves_existing() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("seed.txt");
        fs::write(&path, "edited by hand").unwrap();

        assert!(!write_text_if_absent(&path, "fresh seed").unwrap());

        assert_eq!(fs::read_to_string(&path).unwrap(), "edited by hand");
    }

    #[test]
    fn write_if_absent_seeds_missing_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested/seed.txt");

        assert!(write_text_if_absent(&path, "fresh seed").unwrap());

        assert_eq!(fs::read_to_string(&path).unwrap(), "fresh seed");
    }
}
