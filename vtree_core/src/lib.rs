//! # vtree core
//!
//! Tree entries for a content-addressed virtual filesystem.
//!
//! A tree object lists the children of one directory. Each child is a
//! [`TreeEntry`]: a name, an [`EntryType`], and the [`ObjectId`] of the tree or
//! blob it points to, plus optional size and SHA-1 of that content. This crate
//! holds the entry model, its stored binary form, and the mapping between
//! entry types and filesystem mode bits.
//!
//! ## Features
//!
//! - Byte-exact entry encoding shared by the local store and transport
//! - Identity (hash, type, name) kept apart from lazily computed aux data
//! - Per-platform mode tables (POSIX vs. Windows)
//! - Building entries from a local directory
//!
//! ## Example
//!
//! ```
//! use vtree_core::{EntryType, ObjectId, PathComponent, TreeEntry};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let entry = TreeEntry::new(
//!     ObjectId::hash_bytes(b"fn main() {}"),
//!     PathComponent::new("main.rs")?,
//!     EntryType::RegularFile,
//! );
//! entry.set_size(12);
//!
//! let bytes = entry.serialize();
//! assert_eq!(bytes.len(), entry.serialized_size());
//!
//! let mut data = bytes.as_slice();
//! let decoded = TreeEntry::try_deserialize(&mut data)?;
//! assert_eq!(decoded, entry);
//! assert_eq!(decoded.size(), Some(12));
//! assert!(data.is_empty());
//! # Ok(())
//! # }
//! ```

mod error;
mod hash;
pub mod memory;
pub mod mode;
mod path;
mod tree;
mod walk;

pub use error::{Error, Result};
pub use hash::{HASH20_SIZE, Hash20, ObjectId};
pub use mode::{Mode, Platform, mode_from_type, type_from_mode};
pub use path::PathComponent;
pub use tree::{EntryAuxData, EntryType, TreeEntry, deserialize_entries, serialize_entries};
pub use walk::{entry_for_path, scan_dir};
