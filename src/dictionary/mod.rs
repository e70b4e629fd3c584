//! Dictionary construction and traversal.
//!
//! Keys flow through three stages:
//!
//! 1. [`dawg::DawgBuilder`] minimizes the sorted key set into a DAWG
//! 2. [`double_array_builder::DoubleArrayBuilder`] packs the DAWG into units
//! 3. [`double_array_trie::DoubleArrayTrie`] answers queries over those units
//!
//! The traits below abstract node-by-node traversal so generic code (entry
//! iteration, custom walkers) does not depend on the unit layout.

pub mod bit_vector;
pub mod dawg;
pub mod double_array_builder;
pub mod double_array_trie;
pub mod iterator;
pub mod unit;

/// A dictionary mapping byte-string keys to non-negative values.
pub trait Dictionary {
    /// The node type used for dictionary traversal
    type Node: DictionaryNode;

    /// Get the root node of the dictionary
    fn root(&self) -> Self::Node;

    /// Look up the value stored for `key`
    fn get(&self, key: &[u8]) -> Option<i32> {
        let mut node = self.root();
        for &byte in key {
            node = node.transition(byte)?;
        }
        node.value()
    }

    /// Check if a key exists in the dictionary
    fn contains(&self, key: &[u8]) -> bool {
        self.get(key).is_some()
    }
}

/// Traversable dictionary node.
///
/// Nodes form a graph whose edges are labeled with non-zero bytes. A node
/// carries a value when the path leading to it is a stored key.
pub trait DictionaryNode: Clone + Send + Sync {
    /// Value of the key ending at this node
    fn value(&self) -> Option<i32>;

    /// Check if this node marks the end of a stored key
    fn is_final(&self) -> bool {
        self.value().is_some()
    }

    /// Transition to a child node via the given byte
    ///
    /// Returns `None` if no such transition exists
    fn transition(&self, label: u8) -> Option<Self>;

    /// Iterate over all outgoing edges as (byte, child_node) pairs, in
    /// increasing byte order
    fn edges(&self) -> Box<dyn Iterator<Item = (u8, Self)> + '_>;

    /// Check if a specific edge exists
    fn has_edge(&self, label: u8) -> bool {
        self.transition(label).is_some()
    }

    /// Get the number of outgoing edges
    fn edge_count(&self) -> usize {
        self.edges().count()
    }
}
