//! Building tree entries from a local directory.

use crate::error::{Error, Result};
use crate::hash::ObjectId;
use crate::mode::{Mode, type_from_mode};
use crate::path::PathComponent;
use crate::tree::{EntryAuxData, EntryType, TreeEntry, serialize_entries};
use std::ffi::OsStr;
use std::fs;
use std::path::Path;

/// Build the entry describing `path` as a child of its parent directory.
///
/// Files are named by the BLAKE3 of their content and symlinks by the BLAKE3
/// of their target; both carry size and SHA-1 aux data. Directories are named
/// by the BLAKE3 of their serialized, sorted children and carry no aux data.
///
/// Returns `Ok(None)` for objects no entry type can describe (sockets,
/// devices, fifos).
pub fn entry_for_path(path: &Path) -> Result<Option<TreeEntry>> {
    let file_name = path
        .file_name()
        .ok_or_else(|| Error::invalid_path_component(path.display().to_string(), "no file name"))?;
    let name = PathComponent::new(file_name_bytes(path, file_name)?)?;

    let metadata = fs::symlink_metadata(path)?;
    let mode = get_mode(&metadata);

    let Some(entry_type) = type_from_mode(mode) else {
        tracing::warn!(path = %path.display(), "skipping unsupported file type, mode {:o}", mode);
        return Ok(None);
    };

    let entry = match entry_type {
        EntryType::Tree => {
            let children = scan_dir(path)?;
            let hash = ObjectId::hash_bytes(&serialize_entries(&children));
            TreeEntry::new(hash, name, entry_type)
        }
        EntryType::Symlink => {
            let target = link_target_bytes(path)?;
            blob_entry(&target, name, entry_type)
        }
        EntryType::RegularFile | EntryType::ExecutableFile => {
            let content = fs::read(path)?;
            blob_entry(&content, name, entry_type)
        }
    };

    tracing::trace!("scanned {}", entry);
    Ok(Some(entry))
}

/// Entries for the immediate children of a directory, sorted by name.
///
/// Hidden files are included; paths matched by `.gitignore` files are not.
pub fn scan_dir(path: &Path) -> Result<Vec<TreeEntry>> {
    let mut entries = Vec::new();

    let walker = ignore::WalkBuilder::new(path)
        .max_depth(Some(1)) // Only immediate children
        .hidden(false) // Include hidden files
        .git_ignore(true) // Respect .gitignore
        .require_git(false)
        .build();

    for entry in walker {
        let entry = entry?;
        let entry_path = entry.path();

        // Skip the directory itself
        if entry_path == path {
            continue;
        }

        if let Some(tree_entry) = entry_for_path(entry_path)? {
            entries.push(tree_entry);
        }
    }

    entries.sort();
    Ok(entries)
}

fn blob_entry(content: &[u8], name: PathComponent, entry_type: EntryType) -> TreeEntry {
    let aux = EntryAuxData::compute(content);
    TreeEntry::with_aux(
        ObjectId::hash_bytes(content),
        name,
        entry_type,
        Some(aux.size),
        Some(aux.content_sha1),
    )
}

/// Get the mode bits from metadata.
#[cfg(unix)]
fn get_mode(metadata: &fs::Metadata) -> Mode {
    use std::os::unix::fs::MetadataExt;
    metadata.mode()
}

/// Synthesize mode bits from metadata (non-unix fallback).
#[cfg(not(unix))]
fn get_mode(metadata: &fs::Metadata) -> Mode {
    use crate::mode::{S_IFDIR, S_IFLNK, S_IFREG};

    let file_type = metadata.file_type();
    if file_type.is_dir() {
        S_IFDIR | 0o755
    } else if file_type.is_symlink() {
        S_IFLNK | 0o777
    } else if file_type.is_file() {
        S_IFREG | 0o644
    } else {
        0
    }
}

#[cfg(unix)]
fn file_name_bytes(_path: &Path, name: &OsStr) -> Result<Vec<u8>> {
    use std::os::unix::ffi::OsStrExt;
    Ok(name.as_bytes().to_vec())
}

/// Names that do not convert to UTF-8 have no portable byte form here.
#[cfg(not(unix))]
fn file_name_bytes(path: &Path, name: &OsStr) -> Result<Vec<u8>> {
    name.to_str()
        .map(|n| n.as_bytes().to_vec())
        .ok_or_else(|| {
            Error::invalid_path_component(path.display().to_string(), "no UTF-8 file name")
        })
}

#[cfg(unix)]
fn link_target_bytes(path: &Path) -> Result<Vec<u8>> {
    use std::os::unix::ffi::OsStrExt;
    Ok(fs::read_link(path)?.as_os_str().as_bytes().to_vec())
}

#[cfg(not(unix))]
fn link_target_bytes(path: &Path) -> Result<Vec<u8>> {
    Ok(fs::read_link(path)?
        .to_string_lossy()
        .into_owned()
        .into_bytes())
}
