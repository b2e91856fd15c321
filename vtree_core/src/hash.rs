//! Content identifiers and content checksums.
//!
//! [`ObjectId`] names the object an entry points to. Its bytes are opaque and
//! may be of any length; the store that fetches objects decides what they
//! mean. [`Hash20`] is the fixed-width SHA-1 checksum kept as aux data.

use crate::error::{Error, Result};
use serde::{Serialize, Serializer};
use sha1::{Digest, Sha1};
use std::fmt;

/// Size of a [`Hash20`] in bytes.
pub const HASH20_SIZE: usize = 20;

/// Opaque, variable-length identifier of a tree or blob.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(Vec<u8>);

impl ObjectId {
    /// Create an ObjectId from raw bytes.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        ObjectId(bytes.into())
    }

    /// Create an ObjectId from a hex string of any even length.
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        let bytes =
            hex::decode(hex_str).map_err(|e| Error::invalid_hash(format!("Invalid hex: {}", e)))?;
        Ok(ObjectId(bytes))
    }

    /// Name content by its BLAKE3-256 digest.
    pub fn hash_bytes(data: &[u8]) -> Self {
        ObjectId(blake3::hash(data).as_bytes().to_vec())
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Number of raw bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.to_hex())
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// A 20-byte SHA-1 digest of an entry's content.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Hash20([u8; HASH20_SIZE]);

impl Hash20 {
    /// The all-zero digest. Serialized entries use it to mean "no checksum".
    pub const ZERO: Hash20 = Hash20([0u8; HASH20_SIZE]);

    /// Create a Hash20 from raw bytes.
    pub fn from_bytes(bytes: [u8; HASH20_SIZE]) -> Self {
        Hash20(bytes)
    }

    /// Create a Hash20 from a hex string (40 hex characters).
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        if hex_str.len() != HASH20_SIZE * 2 {
            return Err(Error::invalid_hash(format!(
                "Expected {} hex characters, got {}",
                HASH20_SIZE * 2,
                hex_str.len()
            )));
        }

        let mut hash = [0u8; HASH20_SIZE];
        hex::decode_to_slice(hex_str, &mut hash)
            .map_err(|e| Error::invalid_hash(format!("Invalid hex: {}", e)))?;
        Ok(Hash20(hash))
    }

    /// SHA-1 of raw bytes.
    pub fn sha1(data: &[u8]) -> Self {
        Hash20(Sha1::digest(data).into())
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8; HASH20_SIZE] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Convert to hex string (40 characters).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Hash20 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Hash20 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash20({})", self.to_hex())
    }
}

impl Serialize for Hash20 {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}
