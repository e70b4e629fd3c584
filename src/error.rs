//! Error types for trie construction.

use thiserror::Error;

/// Errors raised while building a double-array trie.
///
/// Every variant is fatal to the build attempt that produced it: a builder that
/// returned an error must not be used to produce a trie.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// A key of length zero was supplied
    #[error("failed to insert key: zero-length key")]
    EmptyKey,

    /// A negative value was supplied
    #[error("failed to insert key: negative value {0}")]
    NegativeValue(i32),

    /// Keys were not supplied in strictly increasing byte order
    #[error("failed to insert key: wrong key order")]
    WrongOrder,

    /// A key contained a zero byte, which is reserved as the end-of-key label
    #[error("failed to insert key: invalid null character")]
    InvalidNullCharacter,

    /// The same key was supplied twice
    #[error("failed to insert key: duplicate key {0:?}")]
    DuplicateKey(Vec<u8>),

    /// An offset does not fit the 29-bit field of a packed unit
    #[error("failed to modify unit: too large offset {0}")]
    OffsetOverflow(u32),
}

/// Errors raised by operations that both build and write a trie.
#[derive(Debug, Error)]
pub enum Error {
    /// Construction failed
    #[error(transparent)]
    Build(#[from] BuildError),

    /// Writing the packed array failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
