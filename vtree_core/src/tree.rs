//! Tree entries and their serialized form.
//!
//! An entry is encoded as a fixed sequence of fields, integers little-endian,
//! with no magic or version (the containing tree object carries those):
//!
//! ```text
//! 1        entry type (0=tree, 1=file, 2=executable, 3=symlink)
//! 2        hash length N
//! N        hash
//! 2        name length M
//! M        name
//! 8        size, u64::MAX when unknown
//! 20       content SHA-1, all zero when unknown
//! ```
//!
//! The all-zero SHA-1 is a sentinel, so an entry whose content really hashes
//! to zero reads back without a checksum. Likewise a size of `u64::MAX` reads
//! back as unknown. Both are properties of the stored format.

use crate::error::{Error, Result};
use crate::hash::{HASH20_SIZE, Hash20, ObjectId};
use crate::memory;
use crate::mode::{self, Mode};
use crate::path::PathComponent;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

/// Stored in place of a size that has not been computed.
const NO_SIZE: u64 = u64::MAX;

/// Kind of object an entry points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntryType {
    /// A subtree (directory).
    Tree = 0,
    /// A non-executable file.
    RegularFile = 1,
    /// An executable file.
    ExecutableFile = 2,
    /// A symbolic link; the blob holds the link target.
    Symlink = 3,
}

impl EntryType {
    /// Convert to byte representation.
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    /// Parse from byte representation.
    pub fn from_u8(value: u8) -> Result<Self> {
        match value {
            0 => Ok(EntryType::Tree),
            1 => Ok(EntryType::RegularFile),
            2 => Ok(EntryType::ExecutableFile),
            3 => Ok(EntryType::Symlink),
            _ => Err(Error::invalid_entry_type(value)),
        }
    }

    /// One-letter tag used in log output.
    pub fn type_char(self) -> char {
        match self {
            EntryType::Tree => 'd',
            EntryType::RegularFile => 'f',
            EntryType::ExecutableFile => 'x',
            EntryType::Symlink => 'l',
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EntryType::Tree => "TREE",
            EntryType::RegularFile => "REGULAR_FILE",
            EntryType::ExecutableFile => "EXECUTABLE_FILE",
            EntryType::Symlink => "SYMLINK",
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Size and SHA-1 of an entry's content, computed together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryAuxData {
    pub size: u64,
    pub content_sha1: Hash20,
}

impl EntryAuxData {
    /// Compute aux data from the full content of a blob.
    pub fn compute(content: &[u8]) -> Self {
        Self {
            size: content.len() as u64,
            content_sha1: Hash20::sha1(content),
        }
    }
}

/// One child of a tree object.
///
/// Identity is `(hash, entry_type, name)`. Size and content SHA-1 are
/// cached metadata: they may be filled in after construction, once each,
/// and never take part in comparisons.
#[derive(Debug, Clone)]
pub struct TreeEntry {
    hash: ObjectId,
    name: PathComponent,
    entry_type: EntryType,
    size: OnceLock<u64>,
    content_sha1: OnceLock<Hash20>,
}

impl TreeEntry {
    /// Create an entry without aux data.
    pub fn new(hash: ObjectId, name: PathComponent, entry_type: EntryType) -> Self {
        Self {
            hash,
            name,
            entry_type,
            size: OnceLock::new(),
            content_sha1: OnceLock::new(),
        }
    }

    /// Create an entry with whatever aux data is already known.
    pub fn with_aux(
        hash: ObjectId,
        name: PathComponent,
        entry_type: EntryType,
        size: Option<u64>,
        content_sha1: Option<Hash20>,
    ) -> Self {
        let entry = Self::new(hash, name, entry_type);
        if let Some(size) = size {
            entry.size.get_or_init(|| size);
        }
        if let Some(sha1) = content_sha1 {
            entry.content_sha1.get_or_init(|| sha1);
        }
        entry
    }

    pub fn hash(&self) -> &ObjectId {
        &self.hash
    }

    pub fn name(&self) -> &PathComponent {
        &self.name
    }

    pub fn entry_type(&self) -> EntryType {
        self.entry_type
    }

    pub fn is_tree(&self) -> bool {
        self.entry_type == EntryType::Tree
    }

    /// Mode bits for presenting this entry on the current platform.
    pub fn mode(&self) -> Mode {
        mode::mode_from_type(self.entry_type)
    }

    /// Content size in bytes, if known.
    pub fn size(&self) -> Option<u64> {
        self.size.get().copied()
    }

    /// SHA-1 of the content, if known.
    pub fn content_sha1(&self) -> Option<Hash20> {
        self.content_sha1.get().copied()
    }

    /// Record the content size.
    ///
    /// Setting the value it already holds is a no-op.
    ///
    /// # Panics
    ///
    /// Panics if a different size was already recorded.
    pub fn set_size(&self, size: u64) {
        if let Err(e) = self.try_set_size(size) {
            panic!("{}", e);
        }
    }

    /// Record the content size, or report a conflict with the stored one.
    pub fn try_set_size(&self, size: u64) -> Result<()> {
        let existing = *self.size.get_or_init(|| size);
        if existing != size {
            return Err(Error::aux_data_conflict(
                self.name.to_string(),
                "size",
                existing,
                size,
            ));
        }
        Ok(())
    }

    /// Record the content SHA-1.
    ///
    /// # Panics
    ///
    /// Panics if a different SHA-1 was already recorded.
    pub fn set_content_sha1(&self, sha1: Hash20) {
        if let Err(e) = self.try_set_content_sha1(sha1) {
            panic!("{}", e);
        }
    }

    /// Record the content SHA-1, or report a conflict with the stored one.
    pub fn try_set_content_sha1(&self, sha1: Hash20) -> Result<()> {
        let existing = *self.content_sha1.get_or_init(|| sha1);
        if existing != sha1 {
            return Err(Error::aux_data_conflict(
                self.name.to_string(),
                "content sha1",
                existing,
                sha1,
            ));
        }
        Ok(())
    }

    /// Record both aux values.
    ///
    /// # Panics
    ///
    /// Panics if either value conflicts with one already recorded.
    pub fn attach_aux(&self, aux: &EntryAuxData) {
        self.set_size(aux.size);
        self.set_content_sha1(aux.content_sha1);
    }

    /// Short form for log messages: `(name, hash, type)`.
    pub fn to_log_string(&self) -> String {
        format!(
            "({}, {}, {})",
            self.name,
            self.hash,
            self.entry_type.type_char()
        )
    }

    /// Heap bytes owned by this entry's name, as reported by `estimate`.
    ///
    /// `estimate` sees the name's owned buffer, so it can account for spare
    /// capacity as well as length.
    pub fn indirect_size_bytes_with<F>(&self, estimate: F) -> usize
    where
        F: FnOnce(&Vec<u8>) -> usize,
    {
        estimate(self.name.value())
    }

    /// Heap bytes owned by this entry's name.
    pub fn indirect_size_bytes(&self) -> usize {
        self.indirect_size_bytes_with(|name| memory::estimate_indirect_memory_usage(name))
    }

    /// Exact length of [`serialize`](Self::serialize)'s output.
    pub fn serialized_size(&self) -> usize {
        1 + 2 + self.hash.len() + 2 + self.name.as_bytes().len() + 8 + HASH20_SIZE
    }

    /// Encode the entry to bytes.
    ///
    /// # Panics
    ///
    /// Panics if the hash or the name is longer than `u16::MAX` bytes.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.serialized_size());
        self.serialize_into(&mut buf);
        buf
    }

    /// Append the encoded entry to `buf`.
    ///
    /// # Panics
    ///
    /// Panics if the hash or the name is longer than `u16::MAX` bytes.
    pub fn serialize_into(&self, buf: &mut Vec<u8>) {
        buf.push(self.entry_type.to_u8());

        let hash = self.hash.as_bytes();
        assert!(
            hash.len() <= u16::MAX as usize,
            "tree entry hash too long: {} bytes",
            hash.len()
        );
        buf.extend_from_slice(&(hash.len() as u16).to_le_bytes());
        buf.extend_from_slice(hash);

        let name = self.name.as_bytes();
        assert!(
            name.len() <= u16::MAX as usize,
            "tree entry name too long: {} bytes",
            name.len()
        );
        buf.extend_from_slice(&(name.len() as u16).to_le_bytes());
        buf.extend_from_slice(name);

        buf.extend_from_slice(&self.size().unwrap_or(NO_SIZE).to_le_bytes());

        let sha1 = self.content_sha1().unwrap_or(Hash20::ZERO);
        buf.extend_from_slice(sha1.as_bytes());
    }

    /// Decode one entry from the front of `data`.
    ///
    /// On success `data` is advanced past the entry. On failure the reason is
    /// logged and `None` returned; use [`try_deserialize`](Self::try_deserialize)
    /// to get it as an error instead.
    pub fn deserialize(data: &mut &[u8]) -> Option<Self> {
        match Self::try_deserialize(data) {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::error!("{}", e);
                None
            }
        }
    }

    /// Decode one entry from the front of `data`, advancing it on success.
    ///
    /// `data` is left untouched on failure.
    pub fn try_deserialize(data: &mut &[u8]) -> Result<Self> {
        let mut cursor = *data;

        let entry_type = EntryType::from_u8(take(&mut cursor, "type", 1)?[0])?;

        let hash_len = read_u16(&mut cursor, "hash size")?;
        let hash = ObjectId::from_bytes(take(&mut cursor, "hash", hash_len as usize)?);

        let name_len = read_u16(&mut cursor, "name size")?;
        let name = PathComponent::from_bytes(take(&mut cursor, "name", name_len as usize)?)?;

        let size = match read_u64(&mut cursor, "size")? {
            NO_SIZE => None,
            size => Some(size),
        };

        let mut sha1_bytes = [0u8; HASH20_SIZE];
        sha1_bytes.copy_from_slice(take(&mut cursor, "sha1", HASH20_SIZE)?);
        let sha1 = Some(Hash20::from_bytes(sha1_bytes)).filter(|h| !h.is_zero());

        *data = cursor;
        Ok(Self::with_aux(hash, name, entry_type, size, sha1))
    }
}

fn take<'a>(cursor: &mut &'a [u8], field: &'static str, needed: usize) -> Result<&'a [u8]> {
    if cursor.len() < needed {
        return Err(Error::truncated(field, cursor.len(), needed));
    }
    let (head, tail) = cursor.split_at(needed);
    *cursor = tail;
    Ok(head)
}

fn read_u16(cursor: &mut &[u8], field: &'static str) -> Result<u16> {
    let mut buf = [0u8; 2];
    buf.copy_from_slice(take(cursor, field, 2)?);
    Ok(u16::from_le_bytes(buf))
}

fn read_u64(cursor: &mut &[u8], field: &'static str) -> Result<u64> {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(take(cursor, field, 8)?);
    Ok(u64::from_le_bytes(buf))
}

impl PartialEq for TreeEntry {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.entry_type == other.entry_type && self.name == other.name
    }
}

impl Eq for TreeEntry {}

impl Hash for TreeEntry {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash.hash(state);
        self.entry_type.hash(state);
        self.name.hash(state);
    }
}

impl PartialOrd for TreeEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TreeEntry {
    /// Compare by name (bytewise UTF-8), then type and hash.
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .as_bytes()
            .cmp(other.name.as_bytes())
            .then_with(|| self.entry_type.cmp(&other.entry_type))
            .then_with(|| self.hash.cmp(&other.hash))
    }
}

impl fmt::Display for TreeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_log_string())
    }
}

/// Encode entries back to back, in the order given.
pub fn serialize_entries(entries: &[TreeEntry]) -> Vec<u8> {
    let len = entries.iter().map(TreeEntry::serialized_size).sum();
    let mut buf = Vec::with_capacity(len);
    for entry in entries {
        entry.serialize_into(&mut buf);
    }
    buf
}

/// Decode back-to-back entries until `data` is exhausted.
pub fn deserialize_entries(mut data: &[u8]) -> Result<Vec<TreeEntry>> {
    let mut entries = Vec::new();
    while !data.is_empty() {
        entries.push(TreeEntry::try_deserialize(&mut data)?);
    }
    Ok(entries)
}
