//! Double-Array Trie (DAT) lookup and construction front end.
//!
//! The trie is a single array of 32-bit units (see [`unit`](super::unit)).
//! Child addresses are computed by XOR:
//!
//! ```text
//! child = node ^ offset(unit[node]) ^ byte
//! valid iff label(unit[child]) == byte
//! ```
//!
//! ## Performance Characteristics
//!
//! - **Memory**: 4 bytes per unit, suffixes shared through the DAWG
//! - **Lookup**: O(m) where m is the key length, one array load per byte
//! - **Construction**: keys are sorted, minimized and packed once
//! - **Thread-safety**: immutable after construction, clones share the array
//!
//! ## Binary format
//!
//! [`write_to`](DoubleArrayTrie::write_to) emits the units as little-endian
//! `u32`s with no header; [`load`](DoubleArrayTrie::load) reads them back.

use std::collections::btree_map::{BTreeMap, Entry};
use std::io::{self, Read, Write};
use std::sync::Arc;

#[cfg(feature = "serialization")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::dictionary::dawg::DawgBuilder;
use crate::dictionary::double_array_builder::DoubleArrayBuilder;
use crate::dictionary::iterator::{CommonPrefixIter, EntryIter, PrefixMatch};
use crate::dictionary::unit::{Unit, UNIT_SIZE};
use crate::dictionary::{Dictionary, DictionaryNode};
use crate::error::{BuildError, Error};

/// Custom serialization for Arc<Vec<T>> - serializes the inner Vec directly
#[cfg(feature = "serialization")]
fn serialize_arc_vec<S, T>(arc: &Arc<Vec<T>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Serialize,
{
    arc.as_ref().serialize(serializer)
}

/// Custom deserialization for Arc<Vec<T>> - wraps deserialized Vec in Arc
#[cfg(feature = "serialization")]
fn deserialize_arc_vec<'de, D, T>(deserializer: D) -> Result<Arc<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Vec::<T>::deserialize(deserializer).map(Arc::new)
}

/// An immutable double-array trie mapping byte strings to `i32` values.
///
/// Cloning is cheap: clones share the unit array.
///
/// # Example
///
/// ```
/// use libdarts::prelude::*;
///
/// let trie = DoubleArrayTrie::from_entries([
///     ("ALGOL", 1),
///     ("ANSI", 2),
///     ("ARCO", 3),
///     ("ARPA", 4),
///     ("ARPANET", 5),
///     ("ASCII", 6),
/// ])
/// .unwrap();
///
/// assert_eq!(trie.get("ARPANET"), Some(5));
/// assert_eq!(trie.get("APPARE"), None);
/// assert_eq!(trie.find_by_common_prefix("ARPANET").collect::<Vec<_>>(), vec![4, 5]);
/// ```
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct DoubleArrayTrie {
    #[cfg_attr(
        feature = "serialization",
        serde(
            serialize_with = "serialize_arc_vec",
            deserialize_with = "deserialize_arc_vec"
        )
    )]
    units: Arc<Vec<u32>>,
}

impl DoubleArrayTrie {
    /// Adopt an already packed unit array.
    pub fn from_units(units: Vec<u32>) -> Self {
        Self {
            units: Arc::new(units),
        }
    }

    /// Start a builder that accepts keys in any order.
    pub fn builder() -> DoubleArrayTrieBuilder {
        DoubleArrayTrieBuilder::new()
    }

    /// Build a trie from `(key, value)` pairs in any order.
    pub fn from_entries<I, K>(entries: I) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = (K, i32)>,
        K: AsRef<[u8]>,
    {
        let mut builder = DoubleArrayTrieBuilder::new();
        for (key, value) in entries {
            builder.put(key, value)?;
        }
        builder.build()
    }

    /// Look up the value stored for `key`.
    pub fn get<K: AsRef<[u8]>>(&self, key: K) -> Option<i32> {
        let units = self.units.as_slice();

        let mut unit = Unit::from(*units.first()?);
        let mut pos = unit.offset();
        for &c in key.as_ref() {
            pos ^= u32::from(c);
            unit = Unit::from(*units.get(pos as usize)?);
            if unit.label() != u32::from(c) {
                return None;
            }
            pos ^= unit.offset();
        }

        if !unit.has_leaf() {
            return None;
        }
        Some(Unit::from(*units.get(pos as usize)?).value())
    }

    /// Check if `key` is stored.
    pub fn contains<K: AsRef<[u8]>>(&self, key: K) -> bool {
        self.get(key).is_some()
    }

    /// Every stored key that is a prefix of `key`, with its length, shortest
    /// first.
    pub fn common_prefix_search<'a, K>(&'a self, key: &'a K) -> CommonPrefixIter<'a>
    where
        K: AsRef<[u8]> + ?Sized,
    {
        CommonPrefixIter::new(self.units.as_slice(), key.as_ref())
    }

    /// Values of every stored key that is a prefix of `key`, shortest first.
    pub fn find_by_common_prefix<'a, K>(&'a self, key: &'a K) -> impl Iterator<Item = i32> + 'a
    where
        K: AsRef<[u8]> + ?Sized,
    {
        self.common_prefix_search(key)
            .map(|PrefixMatch { value, .. }| value)
    }

    /// All stored `(key, value)` pairs in increasing key order.
    pub fn iter(&self) -> EntryIter<DoubleArrayTrieNode> {
        EntryIter::new(self.root())
    }

    /// Number of units in the array.
    pub fn size(&self) -> usize {
        self.units.len()
    }

    /// Size in bytes of one unit.
    pub fn unit_size(&self) -> usize {
        UNIT_SIZE
    }

    /// Size in bytes of the whole array.
    pub fn total_size(&self) -> usize {
        self.size() * UNIT_SIZE
    }

    /// Whether the trie has no units at all.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// The raw unit array.
    pub fn as_units(&self) -> &[u32] {
        &self.units
    }

    /// Serialize the units as little-endian bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.total_size());
        for &unit in self.units.iter() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        bytes
    }

    /// Reassemble a trie from little-endian bytes.
    ///
    /// Fails with [`io::ErrorKind::InvalidData`] when the length is not a
    /// multiple of the unit size.
    pub fn from_bytes(bytes: &[u8]) -> io::Result<Self> {
        if bytes.len() % UNIT_SIZE != 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "double array length {} is not a multiple of {}",
                    bytes.len(),
                    UNIT_SIZE
                ),
            ));
        }
        let units = bytes
            .chunks_exact(UNIT_SIZE)
            .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect();
        Ok(Self::from_units(units))
    }

    /// Write the units to `writer` in the raw binary format.
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_all(&self.to_bytes())?;
        writer.flush()
    }

    /// Read a trie written by [`write_to`](DoubleArrayTrie::write_to),
    /// consuming `reader` to its end.
    pub fn load<R: Read>(mut reader: R) -> io::Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let trie = Self::from_bytes(&bytes)?;

        tracing::debug!(units = trie.size(), "double array loaded");
        Ok(trie)
    }
}

impl From<Vec<u32>> for DoubleArrayTrie {
    fn from(units: Vec<u32>) -> Self {
        Self::from_units(units)
    }
}

impl<'a> IntoIterator for &'a DoubleArrayTrie {
    type Item = (Vec<u8>, i32);
    type IntoIter = EntryIter<DoubleArrayTrieNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Dictionary for DoubleArrayTrie {
    type Node = DoubleArrayTrieNode;

    fn root(&self) -> Self::Node {
        DoubleArrayTrieNode {
            pos: 0,
            units: Arc::clone(&self.units),
        }
    }

    fn get(&self, key: &[u8]) -> Option<i32> {
        DoubleArrayTrie::get(self, key)
    }
}

/// Node reference for Dictionary trait implementation.
#[derive(Clone, Debug)]
pub struct DoubleArrayTrieNode {
    /// Unit id of this node
    pos: u32,
    units: Arc<Vec<u32>>,
}

impl DoubleArrayTrieNode {
    fn unit(&self, id: u32) -> Option<Unit> {
        self.units.get(id as usize).map(|&unit| Unit::from(unit))
    }
}

impl DictionaryNode for DoubleArrayTrieNode {
    fn value(&self) -> Option<i32> {
        let unit = self.unit(self.pos)?;
        if !unit.has_leaf() {
            return None;
        }
        self.unit(self.pos ^ unit.offset()).map(Unit::value)
    }

    fn transition(&self, label: u8) -> Option<Self> {
        if label == 0 {
            return None;
        }
        let child = self.pos ^ self.unit(self.pos)?.offset() ^ u32::from(label);
        if self.unit(child)?.label() != u32::from(label) {
            return None;
        }
        Some(DoubleArrayTrieNode {
            pos: child,
            units: Arc::clone(&self.units),
        })
    }

    fn edges(&self) -> Box<dyn Iterator<Item = (u8, Self)> + '_> {
        Box::new((1..=u8::MAX).filter_map(move |label| {
            self.transition(label).map(|child| (label, child))
        }))
    }
}

/// Collects `(key, value)` pairs in any order and builds a [`DoubleArrayTrie`].
///
/// Entries are kept sorted by byte-wise key order, shorter keys first on a
/// shared prefix, which is the order the DAWG builder requires.
#[derive(Clone, Debug, Default)]
pub struct DoubleArrayTrieBuilder {
    entries: BTreeMap<Vec<u8>, i32>,
}

impl DoubleArrayTrieBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key.
    ///
    /// Rejects empty keys, negative values, keys containing a zero byte and
    /// keys that were already added.
    pub fn put<K: AsRef<[u8]>>(&mut self, key: K, value: i32) -> Result<&mut Self, BuildError> {
        let key = key.as_ref();
        if key.is_empty() {
            return Err(BuildError::EmptyKey);
        }
        if value < 0 {
            return Err(BuildError::NegativeValue(value));
        }
        if key.contains(&0) {
            return Err(BuildError::InvalidNullCharacter);
        }

        match self.entries.entry(key.to_vec()) {
            Entry::Vacant(entry) => {
                entry.insert(value);
                Ok(self)
            }
            Entry::Occupied(entry) => Err(BuildError::DuplicateKey(entry.key().clone())),
        }
    }

    /// Number of keys added so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no key has been added.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build the trie. The builder keeps its entries and can build again.
    pub fn build(&self) -> Result<DoubleArrayTrie, BuildError> {
        let mut dawg = DawgBuilder::new();
        for (key, &value) in &self.entries {
            dawg.insert(key, value)?;
        }
        let dawg = dawg.finish();

        let units = DoubleArrayBuilder::new().build(&dawg)?;
        tracing::debug!(
            keys = self.entries.len(),
            units = units.len(),
            "double array trie built"
        );
        Ok(DoubleArrayTrie::from_units(units))
    }

    /// Build the trie and write it in the raw binary format.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<(), Error> {
        self.build()?.write_to(writer)?;
        Ok(())
    }
}
