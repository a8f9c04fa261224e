//! Filesystem helpers for seeding, copying and cleaning trees on disk.

use crate::error::TreeError;
use crate::tree::path;
use crate::tree::FileTree;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Create a directory and all missing parents.
pub fn ensure_dir(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path)
}

/// Resolve `rel` under `root` for writing.
///
/// Missing parent directories are created. A parent that is a symlink or a
/// regular file is refused, so the write can never land outside `root`. A
/// symlink at the leaf is unlinked; the new file replaces the link, not its
/// target. A directory at the leaf is refused.
pub fn writable_target(root: &Path, rel: &str) -> io::Result<PathBuf> {
    let (parent, leaf) = walk_parents(root, rel, true)?;
    let target = parent.join(leaf);
    match fs::symlink_metadata(&target) {
        Ok(meta) if meta.file_type().is_symlink() => fs::remove_file(&target)?,
        Ok(meta) if meta.is_dir() => {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is a directory", target.display()),
            ))
        }
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }
    Ok(target)
}

/// Stream `reader` into `root/rel`, truncating any existing file.
pub fn write_contained<R: Read + ?Sized>(
    reader: &mut R,
    root: &Path,
    rel: &str,
) -> io::Result<u64> {
    let target = writable_target(root, rel)?;
    let mut file = fs::File::create(&target)?;
    io::copy(reader, &mut file)
}

/// Remove `root/rel` without following symlinks on the way. A missing entry
/// is not an error; a symlinked parent is refused.
pub fn remove_contained(root: &Path, rel: &str) -> io::Result<()> {
    let (parent, leaf) = match walk_parents(root, rel, false) {
        Ok(found) => found,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };
    let target = parent.join(leaf);
    match fs::symlink_metadata(&target) {
        Ok(meta) if meta.is_dir() => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} is a directory", target.display()),
        )),
        Ok(_) => fs::remove_file(&target),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

/// Check every parent segment of `rel` below `root` is a real directory,
/// creating missing ones when `create` is set. Returns the parent path and
/// the leaf name.
fn walk_parents<'r>(root: &Path, rel: &'r str, create: bool) -> io::Result<(PathBuf, &'r str)> {
    path::validate_relative(rel)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;
    let segments: Vec<&str> = rel.split('/').filter(|s| !s.is_empty()).collect();
    let (leaf, parents) = segments
        .split_last()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "empty path"))?;

    if create {
        ensure_dir(root)?;
    }
    let mut current = root.to_path_buf();
    for segment in parents {
        current.push(segment);
        match fs::symlink_metadata(&current) {
            Ok(meta) if meta.file_type().is_symlink() => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("refusing to write through symlink {}", current.display()),
                ))
            }
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("{} is not a directory", current.display()),
                ))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound && create => {
                fs::create_dir(&current)?
            }
            Err(e) => return Err(e),
        }
    }
    Ok((current, *leaf))
}

/// Copy one file of a tree to `root/rel`.
pub fn copy_tree_file(tree: &dyn FileTree, rel: &str, root: &Path) -> Result<u64, TreeError> {
    let mut reader = tree.open(rel)?;
    write_contained(&mut reader, root, rel).map_err(|source| TreeError::Read {
        path: path::join_relative(root, rel).display().to_string(),
        source,
    })
}

/// Recursively copy every file of `tree` under `dst`. Returns the file count.
pub fn copy_tree(tree: &dyn FileTree, dst: &Path) -> Result<usize, TreeError> {
    ensure_dir(dst).map_err(|source| TreeError::Read {
        path: dst.display().to_string(),
        source,
    })?;
    let files = tree.list()?;
    for rel in &files {
        copy_tree_file(tree, rel, dst)?;
    }
    Ok(files.len())
}

/// Recursively copy a directory on disk, including empty directories.
///
/// Symlinks are recreated as symlinks on unix and skipped elsewhere.
pub fn copy_dir(src: &Path, dst: &Path) -> io::Result<()> {
    if !fs::metadata(src)?.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} is not a directory", src.display()),
        ));
    }
    ensure_dir(dst)?;

    for entry in WalkDir::new(src).min_depth(1).follow_links(false) {
        let entry = entry.map_err(io::Error::from)?;
        let rel = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;
        let target = dst.join(rel);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            ensure_dir(&target)?;
        } else if file_type.is_file() {
            fs::copy(entry.path(), &target)?;
        } else if file_type.is_symlink() {
            copy_symlink(entry.path(), &target)?;
        }
    }
    Ok(())
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dst: &Path) -> io::Result<()> {
    let link = fs::read_link(src)?;
    std::os::unix::fs::symlink(link, dst)
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, _dst: &Path) -> io::Result<()> {
    tracing::warn!(path = %src.display(), "Skipping symlink");
    Ok(())
}

/// Remove a directory tree; a missing directory is not an error.
pub fn remove_dir_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_dir_all(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}
