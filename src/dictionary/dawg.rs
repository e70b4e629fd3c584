//! DAWG (Directed Acyclic Word Graph) construction.
//!
//! A DAWG is a minimized trie that shares both prefixes and suffixes. It is the
//! intermediate form between a sorted key set and the packed double array: the
//! packer walks the finished [`Dawg`] and places each state once, reusing the
//! placement of states that are reachable along several paths.
//!
//! ## Construction
//!
//! Keys arrive in strictly increasing byte order. Each key extends the current
//! path from the root; once a key diverges from the previous one, every node
//! below the branch point can never change again and is *flushed*: the sibling
//! run is hashed, looked up in an open-addressing table of already emitted
//! states and either merged with an identical state or emitted as new units.
//!
//! ## Layout
//!
//! A finished DAWG is a flat array of units. Each state is a run of consecutive
//! units sorted by label; the last unit of a run has no sibling bit. A unit with
//! label `0` is a terminal leaf whose payload is the stored value.

use crate::error::BuildError;
use crate::dictionary::bit_vector::BitVector;

const INITIAL_TABLE_SIZE: usize = 1 << 10;

/// Label of the root node. Never part of a key.
const ROOT_LABEL: u8 = 0xFF;

/// Integer hash used to spread unit signatures over the table.
#[inline]
fn hash(key: u32) -> u32 {
    let mut key = (!key).wrapping_add(key << 15);
    key ^= key >> 12;
    key = key.wrapping_add(key << 2);
    key ^= key >> 4;
    key = key.wrapping_mul(2057);
    key ^= key >> 16;
    key
}

/// A mutable node of the partially built trie.
#[derive(Clone, Copy, Debug, Default)]
struct DawgNode {
    /// First child id, or the stored value for a terminal node
    child: u32,
    /// Next (smaller-label) sibling id, 0 if none
    sibling: u32,
    label: u8,
    /// First child appended under its parent
    is_state: bool,
    has_sibling: bool,
}

impl DawgNode {
    /// Packed representation compared against emitted units.
    fn unit(&self) -> u32 {
        let has_sibling = u32::from(self.has_sibling);
        if self.label == 0 {
            (self.child << 1) | has_sibling
        } else {
            (self.child << 2) | (u32::from(self.is_state) << 1) | has_sibling
        }
    }
}

#[inline]
fn unit_has_sibling(unit: u32) -> bool {
    unit & 1 == 1
}

#[inline]
fn unit_is_state(unit: u32) -> bool {
    unit & 2 == 2
}

/// Incremental builder of a minimized DAWG.
///
/// ```
/// use libdarts::dictionary::dawg::DawgBuilder;
///
/// let mut builder = DawgBuilder::new();
/// builder.insert(b"apple", 1).unwrap();
/// builder.insert(b"apply", 2).unwrap();
/// let dawg = builder.finish();
///
/// assert!(dawg.size() > 1);
/// ```
#[derive(Clone, Debug)]
pub struct DawgBuilder {
    nodes: Vec<DawgNode>,
    /// Recycled node ids, reused before the arena grows
    recycle_bin: Vec<u32>,
    /// Chain heads along the path of the previous key, root at the bottom
    node_stack: Vec<u32>,

    units: Vec<u32>,
    labels: Vec<u8>,
    is_intersections: BitVector,
    table: Vec<u32>,
    num_states: usize,
}

impl DawgBuilder {
    /// Create a builder holding only the root node.
    pub fn new() -> Self {
        let mut builder = Self {
            nodes: Vec::new(),
            recycle_bin: Vec::new(),
            node_stack: Vec::new(),
            units: Vec::new(),
            labels: Vec::new(),
            is_intersections: BitVector::new(),
            table: Vec::new(),
            num_states: 0,
        };
        builder.init();
        builder
    }

    fn init(&mut self) {
        self.table.resize(INITIAL_TABLE_SIZE, 0);

        let root = self.append_node();
        self.append_unit();

        self.num_states = 1;

        self.nodes[root as usize].label = ROOT_LABEL;
        self.node_stack.push(root);
    }

    /// Insert `key` with `value`.
    ///
    /// Keys must be non-empty, free of zero bytes and strictly greater than the
    /// previously inserted key in byte order. A failed insert leaves the builder
    /// unchanged.
    pub fn insert(&mut self, key: &[u8], value: i32) -> Result<(), BuildError> {
        if value < 0 {
            return Err(BuildError::NegativeValue(value));
        }
        if key.is_empty() {
            return Err(BuildError::EmptyKey);
        }
        if key.contains(&0) {
            return Err(BuildError::InvalidNullCharacter);
        }

        let length = key.len();
        let mut id = 0u32;
        let mut key_pos = 0usize;

        while key_pos <= length {
            let child_id = self.nodes[id as usize].child;
            if child_id == 0 {
                break;
            }

            let key_label = key.get(key_pos).copied().unwrap_or(0);
            let unit_label = self.nodes[child_id as usize].label;
            if key_label < unit_label {
                return Err(BuildError::WrongOrder);
            } else if key_label > unit_label {
                self.nodes[child_id as usize].has_sibling = true;
                self.flush(child_id);
                break;
            }
            id = child_id;
            key_pos += 1;
        }

        if key_pos > length {
            return Err(BuildError::DuplicateKey(key.to_vec()));
        }

        for pos in key_pos..=length {
            let key_label = key.get(pos).copied().unwrap_or(0);
            let child_id = self.append_node();

            let parent = self.nodes[id as usize];
            let child = &mut self.nodes[child_id as usize];
            child.is_state = parent.child == 0;
            child.sibling = parent.child;
            child.label = key_label;
            self.nodes[id as usize].child = child_id;
            self.node_stack.push(child_id);

            id = child_id;
        }
        self.nodes[id as usize].child = value as u32;

        Ok(())
    }

    /// Minimize everything that is still pending and freeze the automaton.
    pub fn finish(mut self) -> Dawg {
        self.flush(0);

        self.units[0] = self.nodes[0].unit();
        self.labels[0] = self.nodes[0].label;

        self.is_intersections.build();

        tracing::debug!(
            units = self.units.len(),
            states = self.num_states,
            intersections = self.is_intersections.num_ones(),
            "dawg finished"
        );

        Dawg {
            units: self.units,
            labels: self.labels,
            is_intersections: self.is_intersections,
        }
    }

    /// Discard every inserted key and start over with an empty automaton.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    fn append_node(&mut self) -> u32 {
        match self.recycle_bin.pop() {
            Some(id) => {
                self.nodes[id as usize] = DawgNode::default();
                id
            }
            None => {
                self.nodes.push(DawgNode::default());
                (self.nodes.len() - 1) as u32
            }
        }
    }

    fn append_unit(&mut self) -> u32 {
        self.is_intersections.add();
        self.units.push(0);
        self.labels.push(0);
        (self.units.len() - 1) as u32
    }

    /// Minimize pending chains from the top of the stack down to `id`, then pop
    /// `id` itself.
    fn flush(&mut self, id: u32) {
        while let Some(&node_id) = self.node_stack.last() {
            if node_id == id {
                break;
            }
            self.node_stack.pop();

            if self.num_states >= self.table.len() - (self.table.len() >> 2) {
                self.expand_table();
            }

            let mut num_siblings = 0;
            let mut i = node_id;
            while i != 0 {
                num_siblings += 1;
                i = self.nodes[i as usize].sibling;
            }

            let (found, hash_id) = self.find_node(node_id);
            let match_id = match found {
                Some(match_id) => {
                    self.is_intersections.set(match_id as usize, true);
                    match_id
                }
                None => {
                    let mut unit_id = 0;
                    for _ in 0..num_siblings {
                        unit_id = self.append_unit();
                    }
                    let mut i = node_id;
                    while i != 0 {
                        let node = self.nodes[i as usize];
                        self.units[unit_id as usize] = node.unit();
                        self.labels[unit_id as usize] = node.label;
                        unit_id -= 1;
                        i = node.sibling;
                    }
                    let match_id = unit_id + 1;
                    self.table[hash_id] = match_id;
                    self.num_states += 1;
                    match_id
                }
            };

            let mut i = node_id;
            while i != 0 {
                let next = self.nodes[i as usize].sibling;
                self.recycle_bin.push(i);
                i = next;
            }

            if let Some(&parent) = self.node_stack.last() {
                self.nodes[parent as usize].child = match_id;
            }
        }
        self.node_stack.pop();
    }

    fn expand_table(&mut self) {
        let table_size = self.table.len() << 1;
        self.table.clear();
        self.table.resize(table_size, 0);

        for id in 1..self.units.len() as u32 {
            if self.labels[id as usize] == 0 || unit_is_state(self.units[id as usize]) {
                let hash_id = self.find_unit(id);
                self.table[hash_id] = id;
            }
        }
    }

    /// First empty slot on the probe sequence of unit `id`.
    fn find_unit(&self, id: u32) -> usize {
        let mut hash_id = self.hash_unit(id) as usize % self.table.len();
        while self.table[hash_id] != 0 {
            hash_id = (hash_id + 1) % self.table.len();
        }
        hash_id
    }

    /// Look for an emitted state equal to the chain at `node_id`. Returns the
    /// matching unit id, if any, and the probed slot where a new state goes.
    fn find_node(&self, node_id: u32) -> (Option<u32>, usize) {
        let mut hash_id = self.hash_node(node_id) as usize % self.table.len();
        loop {
            let unit_id = self.table[hash_id];
            if unit_id == 0 {
                return (None, hash_id);
            }
            if self.are_equal(node_id, unit_id) {
                return (Some(unit_id), hash_id);
            }
            hash_id = (hash_id + 1) % self.table.len();
        }
    }

    /// Compare a whole sibling chain against the run of units at `unit_id`.
    fn are_equal(&self, node_id: u32, mut unit_id: u32) -> bool {
        let mut i = self.nodes[node_id as usize].sibling;
        while i != 0 {
            if !unit_has_sibling(self.units[unit_id as usize]) {
                return false;
            }
            unit_id += 1;
            i = self.nodes[i as usize].sibling;
        }
        if unit_has_sibling(self.units[unit_id as usize]) {
            return false;
        }

        let mut i = node_id;
        while i != 0 {
            let node = &self.nodes[i as usize];
            if node.unit() != self.units[unit_id as usize]
                || node.label != self.labels[unit_id as usize]
            {
                return false;
            }
            i = node.sibling;
            unit_id = unit_id.wrapping_sub(1);
        }
        true
    }

    fn hash_unit(&self, mut id: u32) -> u32 {
        let mut hash_value = 0;
        while id != 0 {
            let unit = self.units[id as usize];
            let label = u32::from(self.labels[id as usize]);
            hash_value ^= hash((label << 24) ^ unit);

            if !unit_has_sibling(unit) {
                break;
            }
            id += 1;
        }
        hash_value
    }

    fn hash_node(&self, mut id: u32) -> u32 {
        let mut hash_value = 0;
        while id != 0 {
            let node = &self.nodes[id as usize];
            hash_value ^= hash((u32::from(node.label) << 24) ^ node.unit());
            id = node.sibling;
        }
        hash_value
    }
}

impl Default for DawgBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A finished, minimized DAWG.
///
/// Read-only view consumed by the double-array packer. Unit ids are dense;
/// `0` is the root and doubles as "no child / no sibling".
#[derive(Clone, Debug)]
pub struct Dawg {
    units: Vec<u32>,
    labels: Vec<u8>,
    is_intersections: BitVector,
}

impl Dawg {
    /// Id of the root unit.
    pub fn root(&self) -> u32 {
        0
    }

    /// First unit of the state below `id`, or 0 when there is none.
    pub fn child(&self, id: u32) -> u32 {
        self.units[id as usize] >> 2
    }

    /// Next unit of the same state, or 0 after the last one.
    pub fn sibling(&self, id: u32) -> u32 {
        if unit_has_sibling(self.units[id as usize]) {
            id + 1
        } else {
            0
        }
    }

    /// Value stored in the terminal unit `id`.
    pub fn value(&self, id: u32) -> i32 {
        (self.units[id as usize] >> 1) as i32
    }

    /// Byte on the edge into unit `id`; 0 for terminal units.
    pub fn label(&self, id: u32) -> u8 {
        self.labels[id as usize]
    }

    /// Whether `id` is a terminal unit (label 0).
    pub fn is_leaf(&self, id: u32) -> bool {
        self.label(id) == 0
    }

    /// Whether the state starting at `id` is shared by several parents.
    pub fn is_intersection(&self, id: u32) -> bool {
        self.is_intersections.get(id as usize).unwrap_or(false)
    }

    /// Dense index of the intersection state starting at `id`.
    pub fn intersection_id(&self, id: u32) -> usize {
        self.is_intersections.rank(id as usize)
    }

    /// Number of shared states.
    pub fn num_intersections(&self) -> usize {
        self.is_intersections.num_ones()
    }

    /// Number of units, root included.
    pub fn size(&self) -> usize {
        self.units.len()
    }
}
