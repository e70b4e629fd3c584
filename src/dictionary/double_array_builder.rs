//! Packing a finished DAWG into a double array.
//!
//! Every DAWG state is placed by choosing an *offset*: its children live at
//! `offset ^ label`. The packer walks the DAWG depth-first and, for each state,
//! searches the free list for an offset whose child slots are all still free.
//! States reachable along several paths (intersections) are placed once and
//! later parents point at the same offset whenever the XOR distance still fits
//! the packed layout.
//!
//! Only the newest [`NUM_EXTRA_BLOCKS`] blocks keep free-list bookkeeping. Older
//! blocks are *fixed*: each remaining free slot gets a label that no parent can
//! ever match, which keeps the offset search bounded.

use smallvec::SmallVec;

use crate::dictionary::dawg::Dawg;
use crate::dictionary::unit::{Unit, UNIT_SIZE};
use crate::error::BuildError;

const BLOCK_SIZE: u32 = 256;
/// Number of trailing blocks whose free slots are still tracked.
pub const NUM_EXTRA_BLOCKS: u32 = 16;
const NUM_EXTRAS: u32 = BLOCK_SIZE * NUM_EXTRA_BLOCKS;

const UPPER_MASK: u32 = 0xFF << 21;
const LOWER_MASK: u32 = 0xFF;

/// Free-list record of one array slot.
#[derive(Clone, Copy, Debug, Default)]
struct ExtraUnit {
    prev: u32,
    next: u32,
    /// The slot has been handed to a node
    is_fixed: bool,
    /// The slot id has been chosen as some state's offset
    is_used: bool,
}

/// Builds the flat unit array from a [`Dawg`].
///
/// ```
/// use libdarts::dictionary::dawg::DawgBuilder;
/// use libdarts::dictionary::double_array_builder::DoubleArrayBuilder;
///
/// let mut dawg = DawgBuilder::new();
/// dawg.insert(b"key", 7).unwrap();
/// let units = DoubleArrayBuilder::new().build(&dawg.finish()).unwrap();
/// assert_eq!(units.len() % 256, 0);
/// ```
#[derive(Debug)]
pub struct DoubleArrayBuilder {
    units: Vec<Unit>,
    /// Ring of `NUM_EXTRAS` records, slot `id` lives at `id % NUM_EXTRAS`
    extras: Vec<ExtraUnit>,
    extras_head: u32,
    /// Offset chosen for each intersection state, 0 while unplaced
    table: Vec<u32>,
}

impl DoubleArrayBuilder {
    /// Create an empty packer.
    pub fn new() -> Self {
        Self {
            units: Vec::new(),
            extras: vec![ExtraUnit::default(); NUM_EXTRAS as usize],
            extras_head: 0,
            table: Vec::new(),
        }
    }

    /// Place every state of `dawg` and return the packed units.
    pub fn build(mut self, dawg: &Dawg) -> Result<Vec<u32>, BuildError> {
        self.table = vec![0; dawg.num_intersections()];

        self.reserve_id(0);
        self.extras_mut(0).is_used = true;
        self.units[0].set_offset(1)?;
        self.units[0].set_label(0);

        if dawg.child(dawg.root()) != 0 {
            self.build_from_dawg(dawg)?;
        } else {
            // The root keeps offset 1; keep its children from looking valid.
            self.extras_mut(1).is_used = true;
        }

        self.fix_all_blocks();

        tracing::debug!(
            units = self.units.len(),
            bytes = self.units.len() * UNIT_SIZE,
            intersections = self.table.len(),
            "double array packed"
        );

        Ok(self.units.into_iter().map(u32::from).collect())
    }

    fn extras(&self, id: u32) -> &ExtraUnit {
        &self.extras[(id % NUM_EXTRAS) as usize]
    }

    fn extras_mut(&mut self, id: u32) -> &mut ExtraUnit {
        &mut self.extras[(id % NUM_EXTRAS) as usize]
    }

    fn num_units(&self) -> u32 {
        self.units.len() as u32
    }

    fn num_blocks(&self) -> u32 {
        self.num_units() / BLOCK_SIZE
    }

    /// Depth-first placement driven by an explicit stack of
    /// `(dawg_id, dic_id)` pairs. Children are pushed in reverse so states are
    /// placed in the same order a recursive walk would place them.
    fn build_from_dawg(&mut self, dawg: &Dawg) -> Result<(), BuildError> {
        let mut stack: Vec<(u32, u32)> = vec![(dawg.root(), 0)];

        while let Some((dawg_id, dic_id)) = stack.pop() {
            let mut dawg_child_id = dawg.child(dawg_id);

            if dawg.is_intersection(dawg_child_id) {
                let offset = self.table[dawg.intersection_id(dawg_child_id)];
                if offset != 0 {
                    let offset = offset ^ dic_id;
                    if offset & UPPER_MASK == 0 || offset & LOWER_MASK == 0 {
                        if dawg.is_leaf(dawg_child_id) {
                            self.units[dic_id as usize].set_has_leaf(true);
                        }
                        self.units[dic_id as usize].set_offset(offset)?;
                        continue;
                    }
                }
            }

            let offset = self.arrange_from_dawg(dawg, dawg_id, dic_id)?;
            if dawg.is_intersection(dawg_child_id) {
                self.table[dawg.intersection_id(dawg_child_id)] = offset;
            }

            let first = stack.len();
            while dawg_child_id != 0 {
                let child_label = dawg.label(dawg_child_id);
                if child_label != 0 {
                    stack.push((dawg_child_id, offset ^ u32::from(child_label)));
                }
                dawg_child_id = dawg.sibling(dawg_child_id);
            }
            stack[first..].reverse();
        }

        Ok(())
    }

    /// Choose an offset for the children of `dawg_id` and reserve their slots.
    fn arrange_from_dawg(
        &mut self,
        dawg: &Dawg,
        dawg_id: u32,
        dic_id: u32,
    ) -> Result<u32, BuildError> {
        let mut labels: SmallVec<[u8; 16]> = SmallVec::new();
        let mut dawg_child_id = dawg.child(dawg_id);
        while dawg_child_id != 0 {
            labels.push(dawg.label(dawg_child_id));
            dawg_child_id = dawg.sibling(dawg_child_id);
        }

        let offset = self.find_valid_offset(dic_id, &labels);
        self.units[dic_id as usize].set_offset(dic_id ^ offset)?;

        dawg_child_id = dawg.child(dawg_id);
        for &label in &labels {
            let dic_child_id = offset ^ u32::from(label);
            self.reserve_id(dic_child_id);

            if dawg.is_leaf(dawg_child_id) {
                self.units[dic_id as usize].set_has_leaf(true);
                self.units[dic_child_id as usize].set_value(dawg.value(dawg_child_id));
            } else {
                self.units[dic_child_id as usize].set_label(label);
            }

            dawg_child_id = dawg.sibling(dawg_child_id);
        }
        self.extras_mut(offset).is_used = true;

        Ok(offset)
    }

    /// Scan the free list, starting at its head, for an offset that fits
    /// `labels`; fall back to a fresh offset past the end of the array.
    fn find_valid_offset(&self, id: u32, labels: &[u8]) -> u32 {
        let fresh = self.num_units() | (id & LOWER_MASK);
        if self.extras_head >= self.num_units() {
            return fresh;
        }

        let mut unfixed_id = self.extras_head;
        loop {
            let offset = unfixed_id ^ u32::from(labels[0]);
            if self.is_valid_offset(id, offset, labels) {
                return offset;
            }
            unfixed_id = self.extras(unfixed_id).next;
            if unfixed_id == self.extras_head {
                break;
            }
        }

        fresh
    }

    fn is_valid_offset(&self, id: u32, offset: u32, labels: &[u8]) -> bool {
        if self.extras(offset).is_used {
            return false;
        }

        let rel_offset = id ^ offset;
        if rel_offset & LOWER_MASK != 0 && rel_offset & UPPER_MASK != 0 {
            return false;
        }

        labels[1..]
            .iter()
            .all(|&label| !self.extras(offset ^ u32::from(label)).is_fixed)
    }

    /// Unlink slot `id` from the free list, growing the array first if needed.
    fn reserve_id(&mut self, id: u32) {
        if id >= self.num_units() {
            self.expand_units();
        }

        if id == self.extras_head {
            self.extras_head = self.extras(id).next;
            if self.extras_head == id {
                self.extras_head = self.num_units();
            }
        }

        let ExtraUnit { prev, next, .. } = *self.extras(id);
        self.extras_mut(prev).next = next;
        self.extras_mut(next).prev = prev;
        self.extras_mut(id).is_fixed = true;
    }

    /// Append one block and splice its slots into the free list.
    fn expand_units(&mut self) {
        let src_num_units = self.num_units();
        let src_num_blocks = self.num_blocks();

        let dest_num_units = src_num_units + BLOCK_SIZE;
        let dest_num_blocks = src_num_blocks + 1;

        if dest_num_blocks > NUM_EXTRA_BLOCKS {
            self.fix_block(src_num_blocks - NUM_EXTRA_BLOCKS);
        }

        self.units.resize(dest_num_units as usize, Unit::default());
        tracing::trace!(units = dest_num_units, "double array grown");

        if dest_num_blocks > NUM_EXTRA_BLOCKS {
            for id in src_num_units..dest_num_units {
                let extra = self.extras_mut(id);
                extra.is_used = false;
                extra.is_fixed = false;
            }
        }

        for i in src_num_units + 1..dest_num_units {
            self.extras_mut(i - 1).next = i;
            self.extras_mut(i).prev = i - 1;
        }

        self.extras_mut(src_num_units).prev = dest_num_units - 1;
        self.extras_mut(dest_num_units - 1).next = src_num_units;

        let head = self.extras_head;
        let head_prev = self.extras(head).prev;
        self.extras_mut(src_num_units).prev = head_prev;
        self.extras_mut(dest_num_units - 1).next = head;

        self.extras_mut(head_prev).next = src_num_units;
        self.extras_mut(head).prev = dest_num_units - 1;
    }

    fn fix_all_blocks(&mut self) {
        let end = self.num_blocks();
        let begin = end.saturating_sub(NUM_EXTRA_BLOCKS);

        for block_id in begin..end {
            self.fix_block(block_id);
        }
    }

    /// Reserve every free slot of `block_id` with a label derived from an
    /// offset that no state uses.
    fn fix_block(&mut self, block_id: u32) {
        let begin = block_id * BLOCK_SIZE;
        let end = begin + BLOCK_SIZE;

        let unused_offset = (begin..end)
            .find(|&offset| !self.extras(offset).is_used)
            .unwrap_or(0);

        let mut fixed = 0usize;
        for id in begin..end {
            if !self.extras(id).is_fixed {
                self.reserve_id(id);
                self.units[id as usize].set_label((id ^ unused_offset) as u8);
                fixed += 1;
            }
        }

        tracing::trace!(block = block_id, fixed, "block fixed");
    }
}

impl Default for DoubleArrayBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::dawg::DawgBuilder;
    use crate::dictionary::double_array_trie::DoubleArrayTrie;

    fn pack(keys: &[(&[u8], i32)]) -> Vec<u32> {
        let mut dawg = DawgBuilder::new();
        for (key, value) in keys {
            dawg.insert(key, *value).unwrap();
        }
        DoubleArrayBuilder::new().build(&dawg.finish()).unwrap()
    }

    #[test]
    fn test_empty_dawg() {
        let units = pack(&[]);
        assert_eq!(units.len(), BLOCK_SIZE as usize);

        let root = Unit::from(units[0]);
        assert_eq!(root.offset(), 1);
        assert_eq!(root.label(), 0);
        assert!(!root.has_leaf());

        let trie = DoubleArrayTrie::from_units(units);
        for byte in 1..=255u8 {
            assert_eq!(trie.get([byte]), None);
        }
    }

    #[test]
    fn test_single_key_layout() {
        let units = pack(&[(b"a", 5)]);
        let root = Unit::from(units[0]);

        let a_id = root.offset() ^ u32::from(b'a');
        let a = Unit::from(units[a_id as usize]);
        assert_eq!(a.label(), u32::from(b'a'));
        assert!(a.has_leaf());

        let leaf = Unit::from(units[(a_id ^ a.offset()) as usize]);
        assert!(leaf.is_leaf());
        assert_eq!(leaf.value(), 5);
    }

    #[test]
    fn test_array_is_whole_blocks() {
        let keys: Vec<Vec<u8>> = (0..2000u32)
            .map(|i| format!("{:06}", i * 13).into_bytes())
            .collect();
        let entries: Vec<(&[u8], i32)> = keys
            .iter()
            .enumerate()
            .map(|(i, k)| (k.as_slice(), i as i32))
            .collect();
        let units = pack(&entries);
        assert_eq!(units.len() % BLOCK_SIZE as usize, 0);

        let trie = DoubleArrayTrie::from_units(units);
        for (key, value) in entries {
            assert_eq!(trie.get(key), Some(value));
        }
    }

    #[test]
    fn test_shared_suffixes_reuse_offsets() {
        // Many keys ending in the same long suffix.
        let suffix = "-suffix-shared-by-all";
        let mut keys: Vec<String> = (b'a'..=b'z')
            .map(|c| format!("{}{}", c as char, suffix))
            .collect();
        keys.sort();

        let mut dawg = DawgBuilder::new();
        for key in &keys {
            dawg.insert(key.as_bytes(), 1).unwrap();
        }
        let dawg = dawg.finish();
        assert!(dawg.num_intersections() > 0);

        let units = DoubleArrayBuilder::new().build(&dawg).unwrap();
        // Without offset reuse every key would need its own suffix chain.
        assert!(units.len() < keys.len() * suffix.len());

        let trie = DoubleArrayTrie::from_units(units);
        for key in &keys {
            assert_eq!(trie.get(key), Some(1));
        }
        assert_eq!(trie.get("a-suffix-shared-by"), None);
    }

    #[test]
    fn test_deep_key_does_not_recurse() {
        let key = vec![b'x'; 20_000];
        let units = pack(&[(key.as_slice(), 3)]);
        let trie = DoubleArrayTrie::from_units(units);
        assert_eq!(trie.get(&key), Some(3));
        assert_eq!(trie.get(&key[..19_999]), None);
    }

    #[test]
    fn test_deterministic_output() {
        let keys: [(&[u8], i32); 3] = [(b"ab", 1), (b"abc", 2), (b"b", 3)];
        assert_eq!(pack(&keys), pack(&keys));
    }
}
