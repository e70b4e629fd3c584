//! # libdarts
//!
//! Compact, immutable double-array tries mapping byte-string keys to
//! non-negative integers.
//!
//! Construction follows the darts-clone design:
//!
//! 1. sorted keys are minimized into a DAWG, sharing common suffixes
//! 2. the DAWG is packed into a single array of 32-bit units with XOR-addressed
//!    offsets
//! 3. lookups walk that array with a handful of bit operations per key byte
//!
//! The finished trie is immutable and can be queried from any number of
//! threads at once.
//!
//! ## Example
//!
//! ```rust
//! use libdarts::prelude::*;
//!
//! let mut builder = DoubleArrayTrieBuilder::new();
//! builder.put("ARPA", 4).unwrap();
//! builder.put("ARPANET", 5).unwrap();
//! builder.put("ALGOL", 1).unwrap();
//! let trie = builder.build().unwrap();
//!
//! assert_eq!(trie.get("ALGOL"), Some(1));
//! assert_eq!(trie.get("ARP"), None);
//!
//! let prefixes: Vec<i32> = trie.find_by_common_prefix("ARPANET").collect();
//! assert_eq!(prefixes, vec![4, 5]);
//!
//! // Raw little-endian format
//! let mut bytes = Vec::new();
//! trie.write_to(&mut bytes).unwrap();
//! let loaded = DoubleArrayTrie::load(&bytes[..]).unwrap();
//! assert_eq!(loaded, trie);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod dictionary;
pub mod error;

#[cfg(feature = "serialization")]
pub mod serialization;

/// Common imports for convenient usage
pub mod prelude {
    pub use crate::dictionary::dawg::{Dawg, DawgBuilder};
    pub use crate::dictionary::double_array_builder::DoubleArrayBuilder;
    pub use crate::dictionary::double_array_trie::{
        DoubleArrayTrie, DoubleArrayTrieBuilder, DoubleArrayTrieNode,
    };
    pub use crate::dictionary::iterator::{CommonPrefixIter, EntryIter, PrefixMatch};
    pub use crate::dictionary::{Dictionary, DictionaryNode};
    pub use crate::error::{BuildError, Error};

    #[cfg(feature = "serialization")]
    pub use crate::serialization::{
        BincodeSerializer, DictionarySerializer, JsonSerializer, PlainTextSerializer,
        RawSerializer, SerializationError,
    };

    #[cfg(feature = "compression")]
    pub use crate::serialization::GzipSerializer;
}
