//! Lazy iterators over a double-array trie.
//!
//! - [`CommonPrefixIter`] walks a single query key and yields every stored key
//!   that is a prefix of it, shortest first.
//! - [`EntryIter`] enumerates all stored `(key, value)` pairs depth-first, in
//!   increasing byte order, through the [`DictionaryNode`] abstraction.
//!
//! ```
//! use libdarts::prelude::*;
//!
//! let trie = DoubleArrayTrie::from_entries([("cat", 1), ("cats", 2), ("dog", 3)]).unwrap();
//!
//! let prefixes: Vec<i32> = trie.find_by_common_prefix("catsup").collect();
//! assert_eq!(prefixes, vec![1, 2]);
//!
//! let keys: Vec<Vec<u8>> = trie.iter().map(|(key, _)| key).collect();
//! assert_eq!(keys, vec![b"cat".to_vec(), b"cats".to_vec(), b"dog".to_vec()]);
//! ```

use std::iter::FusedIterator;

use smallvec::SmallVec;

use super::unit::Unit;
use super::DictionaryNode;

/// A stored key found as a prefix of a query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PrefixMatch {
    /// Value of the matching key
    pub value: i32,
    /// Length in bytes of the matching key
    pub len: usize,
}

/// Iterator over the stored prefixes of a query key.
///
/// Single pass: once a byte fails to match, the iterator is exhausted.
#[derive(Clone, Debug)]
pub struct CommonPrefixIter<'a> {
    units: &'a [u32],
    key: &'a [u8],
    /// Base address of the children of the current node
    pos: u32,
    key_pos: usize,
}

impl<'a> CommonPrefixIter<'a> {
    pub(crate) fn new(units: &'a [u32], key: &'a [u8]) -> Self {
        match units.first() {
            Some(&root) => Self {
                units,
                key,
                pos: Unit::from(root).offset(),
                key_pos: 0,
            },
            None => Self {
                units,
                key,
                pos: 0,
                key_pos: key.len(),
            },
        }
    }

    fn exhaust(&mut self) -> Option<PrefixMatch> {
        self.key_pos = self.key.len();
        None
    }
}

impl Iterator for CommonPrefixIter<'_> {
    type Item = PrefixMatch;

    fn next(&mut self) -> Option<Self::Item> {
        while self.key_pos < self.key.len() {
            let c = self.key[self.key_pos];
            self.key_pos += 1;

            self.pos ^= u32::from(c);
            let unit = match self.units.get(self.pos as usize) {
                Some(&unit) => Unit::from(unit),
                None => return self.exhaust(),
            };
            if unit.label() != u32::from(c) {
                return self.exhaust();
            }
            self.pos ^= unit.offset();

            if unit.has_leaf() {
                let leaf = match self.units.get(self.pos as usize) {
                    Some(&leaf) => Unit::from(leaf),
                    None => return self.exhaust(),
                };
                return Some(PrefixMatch {
                    value: leaf.value(),
                    len: self.key_pos,
                });
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.key.len() - self.key_pos))
    }
}

impl FusedIterator for CommonPrefixIter<'_> {}

/// Depth-first iterator over every `(key, value)` pair below a node.
pub struct EntryIter<N: DictionaryNode> {
    stack: Vec<(N, Vec<u8>)>,
}

impl<N: DictionaryNode> EntryIter<N> {
    /// Start enumerating from `root`; yielded keys are relative to it.
    pub fn new(root: N) -> Self {
        let mut stack = Vec::with_capacity(16);
        stack.push((root, Vec::new()));
        Self { stack }
    }
}

impl<N: DictionaryNode> Iterator for EntryIter<N> {
    type Item = (Vec<u8>, i32);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node, key)) = self.stack.pop() {
            let children: SmallVec<[(u8, N); 8]> = node.edges().collect();
            // Reverse so the smallest label is popped first.
            for (label, child) in children.into_iter().rev() {
                let mut child_key = Vec::with_capacity(key.len() + 1);
                child_key.extend_from_slice(&key);
                child_key.push(label);
                self.stack.push((child, child_key));
            }

            if let Some(value) = node.value() {
                return Some((key, value));
            }
        }
        None
    }
}

impl<N: DictionaryNode> FusedIterator for EntryIter<N> {}
