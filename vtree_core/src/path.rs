//! Single path segments used as tree entry names.

use crate::error::{Error, Result};
use serde::{Serialize, Serializer};
use std::fmt;

/// A validated file or directory name: one path segment, never a path.
///
/// Names are raw bytes. They are usually UTF-8 but nothing requires it, so
/// display and serialization go through a lossy conversion.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PathComponent(Vec<u8>);

impl PathComponent {
    /// Validate and wrap a name.
    pub fn new(name: impl Into<Vec<u8>>) -> Result<Self> {
        let name = name.into();

        if name.is_empty() {
            return Err(Error::invalid_path_component("", "cannot be empty"));
        }

        if name == b"." || name == b".." {
            return Err(Error::invalid_path_component(
                String::from_utf8_lossy(&name),
                "cannot be a relative directory reference",
            ));
        }

        if name.contains(&b'/') || (cfg!(windows) && name.contains(&b'\\')) {
            return Err(Error::invalid_path_component(
                String::from_utf8_lossy(&name),
                "cannot contain a path separator",
            ));
        }

        if name.contains(&0) {
            return Err(Error::invalid_path_component(
                String::from_utf8_lossy(&name),
                "cannot contain null bytes",
            ));
        }

        Ok(Self(name))
    }

    /// Validate a name read from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::new(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The name as `&str`, if it is valid UTF-8.
    pub fn to_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }

    /// The owned buffer backing this name.
    pub fn value(&self) -> &Vec<u8> {
        &self.0
    }
}

impl AsRef<[u8]> for PathComponent {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for PathComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

impl fmt::Debug for PathComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PathComponent({:?})", String::from_utf8_lossy(&self.0))
    }
}

impl Serialize for PathComponent {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&String::from_utf8_lossy(&self.0))
    }
}
