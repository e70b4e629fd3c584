//! Double-array trie serialization support.
//!
//! Several formats share the [`DictionarySerializer`] trait:
//!
//! - [`RawSerializer`]: little-endian units, no header (the native format)
//! - [`BincodeSerializer`]: bincode encoding of the unit array
//! - [`JsonSerializer`]: JSON encoding of the unit array
//! - [`PlainTextSerializer`]: one `key<TAB>value` line per entry, rebuilt on load
//! - [`GzipSerializer`]: gzip wrapper around any of the above (`compression` feature)
//!
//! # Example
//!
//! ```rust
//! use libdarts::prelude::*;
//! use libdarts::serialization::{BincodeSerializer, DictionarySerializer};
//!
//! let dict = DoubleArrayTrie::from_entries([("test", 1), ("testing", 2)]).unwrap();
//!
//! let mut buffer = Vec::new();
//! BincodeSerializer::serialize(&dict, &mut buffer).unwrap();
//!
//! let loaded = BincodeSerializer::deserialize(&buffer[..]).unwrap();
//! assert_eq!(loaded.get("testing"), Some(2));
//! ```

use crate::dictionary::double_array_trie::DoubleArrayTrie;
use crate::error::BuildError;
use std::io::{Read, Write};

// Serializer implementations
mod bincode_impl;
mod json_impl;
mod plaintext_impl;
mod raw_impl;

#[cfg(feature = "compression")]
mod compression_impl;

// Re-exports
pub use self::bincode_impl::BincodeSerializer;
pub use self::json_impl::JsonSerializer;
pub use self::plaintext_impl::PlainTextSerializer;
pub use self::raw_impl::RawSerializer;

#[cfg(feature = "compression")]
pub use self::compression_impl::GzipSerializer;

/// Trait for serializing and deserializing double-array tries.
pub trait DictionarySerializer {
    /// Serialize a trie to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails or writing fails.
    fn serialize<W>(dict: &DoubleArrayTrie, writer: W) -> Result<(), SerializationError>
    where
        W: Write;

    /// Deserialize a trie from a reader.
    ///
    /// # Errors
    ///
    /// Returns an error if decoding fails or reading fails.
    fn deserialize<R>(reader: R) -> Result<DoubleArrayTrie, SerializationError>
    where
        R: Read;
}

/// Errors that can occur during serialization/deserialization.
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    /// Error during bincode serialization
    #[error("Bincode error")]
    Bincode(#[from] bincode::Error),
    /// Error during JSON serialization
    #[error("JSON error")]
    Json(#[from] serde_json::Error),
    /// I/O error
    #[error("I/O error")]
    Io(#[from] std::io::Error),
    /// Rebuilding a trie from entries failed
    #[error("Build error")]
    Build(#[from] BuildError),
    /// Malformed entry data
    #[error("Dictionary error: {0}")]
    DictionaryError(String),
}
