//! Mapping between entry types and filesystem mode bits.
//!
//! Mode values use the POSIX `st_mode` layout on every host. Windows has
//! neither symlinks nor an execute bit in the sense a tree entry needs, so
//! its table reports symlinks as executable regular files and reads every
//! regular file back as [`EntryType::RegularFile`]. That loss is intended:
//! it matches what Windows checkouts of the same repository look like.

use crate::tree::EntryType;

/// File mode bits (POSIX `st_mode` layout).
pub type Mode = u32;

/// Bit mask for the file type field.
pub const S_IFMT: Mode = 0o170000;
/// Directory.
pub const S_IFDIR: Mode = 0o040000;
/// Regular file.
pub const S_IFREG: Mode = 0o100000;
/// Symbolic link.
pub const S_IFLNK: Mode = 0o120000;
/// Owner execute permission.
pub const S_IXUSR: Mode = 0o100;

/// Which mode table to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Symlinks and the execute bit are represented natively.
    Posix,
    /// No symlinks, no execute bit.
    Windows,
}

impl Platform {
    /// The table for the platform this crate was compiled for.
    #[cfg(windows)]
    pub const NATIVE: Platform = Platform::Windows;
    /// The table for the platform this crate was compiled for.
    #[cfg(not(windows))]
    pub const NATIVE: Platform = Platform::Posix;

    /// Mode used to present an entry of the given type.
    pub fn mode_from_type(self, entry_type: EntryType) -> Mode {
        match entry_type {
            EntryType::Tree => S_IFDIR | 0o755,
            EntryType::RegularFile => S_IFREG | 0o644,
            EntryType::ExecutableFile => S_IFREG | 0o755,
            EntryType::Symlink => match self {
                Platform::Posix => S_IFLNK | 0o755,
                Platform::Windows => S_IFREG | 0o755,
            },
        }
    }

    /// Entry type for a mode, or `None` when the mode is not a directory,
    /// regular file, or (on POSIX) symlink.
    pub fn type_from_mode(self, mode: Mode) -> Option<EntryType> {
        let entry_type = match (mode & S_IFMT, self) {
            (S_IFDIR, _) => Some(EntryType::Tree),
            (S_IFREG, Platform::Windows) => Some(EntryType::RegularFile),
            (S_IFREG, Platform::Posix) if mode & S_IXUSR != 0 => Some(EntryType::ExecutableFile),
            (S_IFREG, Platform::Posix) => Some(EntryType::RegularFile),
            (S_IFLNK, Platform::Posix) => Some(EntryType::Symlink),
            _ => None,
        };

        if entry_type.is_none() {
            tracing::debug!(platform = ?self, "unsupported mode {:o}", mode);
        }

        entry_type
    }

    /// Parse a platform name (`posix`, `windows`, or `native`).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "posix" => Some(Platform::Posix),
            "windows" => Some(Platform::Windows),
            "native" => Some(Platform::NATIVE),
            _ => None,
        }
    }
}

/// Mode used to present an entry on this platform.
pub fn mode_from_type(entry_type: EntryType) -> Mode {
    Platform::NATIVE.mode_from_type(entry_type)
}

/// Entry type for a mode on this platform.
pub fn type_from_mode(mode: Mode) -> Option<EntryType> {
    Platform::NATIVE.type_from_mode(mode)
}
