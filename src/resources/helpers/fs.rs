//! File-system resource helpers.
use anyhow::{Context as _, Result};
use std::path::Path;

/// Ensure the parent directory of `path` exists, creating it (and any
/// ancestors) if necessary.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create parent: {}", parent.display()))?;
    }
    Ok(())
}

/// Remove an existing file or symlink at `path`, including broken symlinks.
///
/// Does nothing if `path` does not exist.
///
/// # Errors
///
/// Returns an error if the path exists but cannot be removed.
pub fn remove_existing(path: &Path) -> Result<()> {
    if path.symlink_metadata().is_ok() {
        std::fs::remove_file(path)
            .with_context(|| format!("remove existing: {}", path.display()))?;
    }
    Ok(())
}

/// Remove whatever lives at `path`: a directory tree, a file or a symlink.
///
/// A nonexistent path is not an error.  Symlinks are removed without
/// touching their targets.
///
/// # Errors
///
/// Returns an error if the path exists but cannot be removed.
pub fn remove_path(path: &Path) -> Result<()> {
    let Ok(meta) = path.symlink_metadata() else {
        return Ok(());
    };
    if meta.is_dir() {
        std::fs::remove_dir_all(path)
            .with_context(|| format!("remove directory: {}", path.display()))
    } else {
        std::fs::remove_file(path).with_context(|| format!("remove file: {}", path.display()))
    }
}

/// Copy `src` to `dst`.
///
/// Directories are merged into `dst` with [`copy_dir_recursive`].  A single
/// file is copied with [`copy_file`].
///
/// # Errors
///
/// Returns an error if `src` does not exist or any copy step fails.
pub fn copy_path(src: &Path, dst: &Path) -> Result<()> {
    if src.is_dir() {
        copy_dir_recursive(src, dst)
            .with_context(|| format!("copying {} to {}", src.display(), dst.display()))
    } else {
        copy_file(src, dst)
    }
}

/// Copy a single file, keeping a symlink as a symlink.
///
/// Parent directories of `dst` are created first.  When `dst` is an existing
/// directory the file lands inside it under its own name.  An existing file
/// at the destination is overwritten.
///
/// # Errors
///
/// Returns an error if `src` cannot be read or `dst` cannot be written.
pub fn copy_file(src: &Path, dst: &Path) -> Result<()> {
    let meta = src
        .symlink_metadata()
        .with_context(|| format!("source not found: {}", src.display()))?;

    ensure_parent_dir(dst)?;
    let target = match src.file_name() {
        Some(name) if dst.is_dir() => dst.join(name),
        _ => dst.to_path_buf(),
    };

    if meta.is_symlink() {
        let link_target = std::fs::read_link(src)
            .with_context(|| format!("reading link: {}", src.display()))?;
        remove_existing(&target)?;
        create_symlink(&link_target, &target)?;
    } else {
        std::fs::copy(src, &target)
            .with_context(|| format!("copying {} to {}", src.display(), target.display()))?;
    }
    Ok(())
}

/// Recursively copy a directory tree, merging into an existing `dst`.
///
/// Files already present in `dst` are overwritten; files only present in
/// `dst` are left alone.  Symlinks within the source tree are *followed*:
/// their content is copied rather than the link itself.
///
/// # Errors
///
/// Returns an error if the destination directory cannot be created, a source
/// entry cannot be read, or a file cannot be copied.
pub fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<()> {
    std::fs::create_dir_all(dst)
        .with_context(|| format!("creating directory {}", dst.display()))?;
    for entry in
        std::fs::read_dir(src).with_context(|| format!("reading directory {}", src.display()))?
    {
        let entry = entry.with_context(|| format!("reading entry in {}", src.display()))?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());
        if src_path.is_dir() {
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path).with_context(|| {
                format!("copying {} to {}", src_path.display(), dst_path.display())
            })?;
        }
    }
    Ok(())
}

/// Create a symlink at `link` pointing to `target`.
fn create_symlink(target: &Path, link: &Path) -> Result<()> {
    #[cfg(unix)]
    std::os::unix::fs::symlink(target, link).with_context(|| {
        format!(
            "creating symlink {} -> {}",
            link.display(),
            target.display()
        )
    })?;

    #[cfg(windows)]
    {
        let resolved = link
            .parent()
            .map_or_else(|| target.to_path_buf(), |p| p.join(target));
        let result = if resolved.is_dir() {
            std::os::windows::fs::symlink_dir(target, link)
        } else {
            std::os::windows::fs::symlink_file(target, link)
        };
        result.with_context(|| {
            format!(
                "creating symlink {} -> {}",
                link.display(),
                target.display()
            )
        })?;
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // copy_dir_recursive / copy_path
    // -----------------------------------------------------------------------

    #[test]
    fn copies_files_and_subdirectories() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();

        std::fs::write(src.path().join("a.txt"), b"aaa").unwrap();
        std::fs::create_dir(src.path().join("sub")).unwrap();
        std::fs::write(src.path().join("sub/b.txt"), b"bbb").unwrap();

        let target = dst.path().join("out");
        copy_path(src.path(), &target).unwrap();

        assert_eq!(std::fs::read(target.join("a.txt")).unwrap(), b"aaa");
        assert_eq!(std::fs::read(target.join("sub/b.txt")).unwrap(), b"bbb");
    }

    #[test]
    fn directory_copy_merges_into_existing_destination() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();

        std::fs::write(src.path().join("shared.txt"), b"new").unwrap();
        std::fs::write(dst.path().join("shared.txt"), b"old").unwrap();
        std::fs::write(dst.path().join("unrelated.txt"), b"keep").unwrap();

        copy_path(src.path(), dst.path()).unwrap();

        assert_eq!(std::fs::read(dst.path().join("shared.txt")).unwrap(), b"new");
        assert_eq!(
            std::fs::read(dst.path().join("unrelated.txt")).unwrap(),
            b"keep",
            "files only present in the destination must survive"
        );
    }

    #[test]
    fn copies_git_directory_too() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();

        std::fs::create_dir(src.path().join(".git")).unwrap();
        std::fs::write(src.path().join(".git/HEAD"), b"ref: refs/heads/main").unwrap();

        let target = dst.path().join("out");
        copy_path(src.path(), &target).unwrap();
        assert!(target.join(".git/HEAD").exists());
    }

    // -----------------------------------------------------------------------
    // copy_file
    // -----------------------------------------------------------------------

    #[test]
    fn copy_file_creates_missing_parents() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("a.txt");
        std::fs::write(&src, b"payload").unwrap();

        let dst = dir.path().join("x/y/b.txt");
        copy_path(&src, &dst).unwrap();
        assert_eq!(std::fs::read(&dst).unwrap(), b"payload");
    }

    #[test]
    fn copy_file_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("a.txt");
        let dst = dir.path().join("b.txt");
        std::fs::write(&src, b"new").unwrap();
        std::fs::write(&dst, b"old contents").unwrap();

        copy_file(&src, &dst).unwrap();
        assert_eq!(std::fs::read(&dst).unwrap(), b"new");
    }

    #[test]
    fn copy_file_into_existing_directory_keeps_name() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("a.txt");
        std::fs::write(&src, b"payload").unwrap();
        let dst = dir.path().join("target");
        std::fs::create_dir(&dst).unwrap();

        copy_file(&src, &dst).unwrap();
        assert_eq!(std::fs::read(dst.join("a.txt")).unwrap(), b"payload");
    }

    #[test]
    fn copy_file_missing_source_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = copy_path(&dir.path().join("absent"), &dir.path().join("dst")).unwrap_err();
        assert!(err.to_string().contains("source not found"), "{err:#}");
    }

    #[cfg(unix)]
    #[test]
    fn copy_file_preserves_symlink() {
        let dir = tempfile::tempdir().unwrap();
        let real = dir.path().join("real.txt");
        std::fs::write(&real, b"data").unwrap();
        let link = dir.path().join("link.txt");
        std::os::unix::fs::symlink("real.txt", &link).unwrap();

        let dst = dir.path().join("out/copied.txt");
        copy_path(&link, &dst).unwrap();

        let meta = dst.symlink_metadata().unwrap();
        assert!(meta.is_symlink(), "destination should be a symlink");
        assert_eq!(
            std::fs::read_link(&dst).unwrap(),
            std::path::PathBuf::from("real.txt")
        );
    }

    #[cfg(unix)]
    #[test]
    fn copy_file_replaces_existing_link_destination() {
        let dir = tempfile::tempdir().unwrap();
        let link = dir.path().join("link");
        std::os::unix::fs::symlink("/nonexistent/one", &link).unwrap();
        let dst = dir.path().join("dst");
        std::os::unix::fs::symlink("/nonexistent/two", &dst).unwrap();

        copy_file(&link, &dst).unwrap();
        assert_eq!(
            std::fs::read_link(&dst).unwrap(),
            std::path::PathBuf::from("/nonexistent/one")
        );
    }

    // -----------------------------------------------------------------------
    // ensure_parent_dir
    // -----------------------------------------------------------------------

    #[test]
    fn ensure_parent_dir_creates_missing_parents() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b").join("file.txt");
        ensure_parent_dir(&nested).unwrap();
        assert!(dir.path().join("a").join("b").exists());
    }

    #[test]
    fn ensure_parent_dir_accepts_bare_file_name() {
        ensure_parent_dir(Path::new("file.txt")).unwrap();
    }

    // -----------------------------------------------------------------------
    // remove_existing / remove_path
    // -----------------------------------------------------------------------

    #[test]
    fn remove_existing_noop_when_path_absent() {
        let dir = tempfile::tempdir().unwrap();
        remove_existing(&dir.path().join("nonexistent")).unwrap();
    }

    #[test]
    fn remove_path_deletes_directory_tree() {
        let dir = tempfile::tempdir().unwrap();
        let tree = dir.path().join("tree");
        std::fs::create_dir_all(tree.join("a/b")).unwrap();
        std::fs::write(tree.join("a/b/c.txt"), b"c").unwrap();

        remove_path(&tree).unwrap();
        assert!(!tree.exists());
    }

    #[test]
    fn remove_path_deletes_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("f.txt");
        std::fs::write(&file, b"f").unwrap();
        remove_path(&file).unwrap();
        assert!(!file.exists());
    }

    #[test]
    fn remove_path_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        remove_path(&missing).unwrap();
        remove_path(&missing).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn remove_path_keeps_symlink_target() {
        let dir = tempfile::tempdir().unwrap();
        let real = dir.path().join("real");
        std::fs::create_dir(&real).unwrap();
        std::fs::write(real.join("keep.txt"), b"k").unwrap();
        let link = dir.path().join("link");
        std::os::unix::fs::symlink(&real, &link).unwrap();

        remove_path(&link).unwrap();
        assert!(link.symlink_metadata().is_err());
        assert!(real.join("keep.txt").exists());
    }
}
