//! Append-only bit vector with constant-time rank.
//!
//! The DAWG builder marks intersection states here and later asks for the dense
//! index of each marked state, which is exactly `rank`.

const UNIT_SIZE: usize = u32::BITS as usize;

/// Counts the set bits of `unit` with the mask-shift-add cascade.
#[inline]
fn pop_count(mut unit: u32) -> u32 {
    unit = ((unit & 0xAAAA_AAAA) >> 1) + (unit & 0x5555_5555);
    unit = ((unit & 0xCCCC_CCCC) >> 2) + (unit & 0x3333_3333);
    unit = ((unit >> 4) + unit) & 0x0F0F_0F0F;
    unit += unit >> 8;
    unit += unit >> 16;
    unit & 0xFF
}

/// A growable bit vector whose rank directory is computed once by [`build`].
///
/// Bits are appended with [`push`] and flipped with [`set`] until [`build`] is
/// called; after that the vector is frozen and [`rank`] becomes available.
///
/// [`build`]: BitVector::build
/// [`push`]: BitVector::push
/// [`set`]: BitVector::set
/// [`rank`]: BitVector::rank
#[derive(Clone, Debug, Default)]
pub struct BitVector {
    units: Vec<u32>,
    /// `ranks[i]` is the number of set bits in `units[..i]`. One entry longer
    /// than `units` so that `rank(len)` needs no special case.
    ranks: Vec<u32>,
    num_ones: usize,
    size: usize,
    built: bool,
}

impl BitVector {
    /// Create an empty bit vector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a bit.
    pub fn push(&mut self, bit: bool) {
        debug_assert!(!self.built, "bit vector is frozen after build()");
        if self.size % UNIT_SIZE == 0 {
            self.units.push(0);
        }
        self.size += 1;
        if bit {
            self.set(self.size - 1, true);
        }
    }

    /// Append a cleared bit.
    pub fn add(&mut self) {
        self.push(false);
    }

    /// Read bit `id`, or `None` when `id` is out of range.
    pub fn get(&self, id: usize) -> Option<bool> {
        if id >= self.size {
            return None;
        }
        Some((self.units[id / UNIT_SIZE] >> (id % UNIT_SIZE)) & 1 == 1)
    }

    /// Overwrite bit `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not smaller than [`len`](BitVector::len).
    pub fn set(&mut self, id: usize, bit: bool) {
        debug_assert!(!self.built, "bit vector is frozen after build()");
        assert!(
            id < self.size,
            "bit index {} out of range for length {}",
            id,
            self.size
        );
        let mask = 1u32 << (id % UNIT_SIZE);
        let unit = &mut self.units[id / UNIT_SIZE];
        if bit {
            *unit |= mask;
        } else {
            *unit &= !mask;
        }
    }

    /// Number of set bits in positions `< id`.
    ///
    /// Only meaningful after [`build`](BitVector::build); `id` may equal `len()`.
    pub fn rank(&self, id: usize) -> usize {
        debug_assert!(self.built, "rank() requires build()");
        debug_assert!(id <= self.size);
        let unit_id = id / UNIT_SIZE;
        let rest = id % UNIT_SIZE;
        let unit = self.units.get(unit_id).copied().unwrap_or(0);
        let below = if rest == 0 {
            0
        } else {
            pop_count(unit & (u32::MAX >> (UNIT_SIZE - rest)))
        };
        (self.ranks[unit_id] + below) as usize
    }

    /// Compute the rank directory and freeze the vector.
    pub fn build(&mut self) {
        self.ranks.clear();
        self.ranks.reserve(self.units.len() + 1);

        let mut num_ones = 0u32;
        for &unit in &self.units {
            self.ranks.push(num_ones);
            num_ones += pop_count(unit);
        }
        self.ranks.push(num_ones);

        self.num_ones = num_ones as usize;
        self.built = true;
    }

    /// Total number of set bits. Valid after [`build`](BitVector::build).
    pub fn num_ones(&self) -> usize {
        self.num_ones
    }

    /// Number of bits.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Whether no bit has been appended.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Drop all bits and the rank directory.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pop_count() {
        assert_eq!(pop_count(0), 0);
        assert_eq!(pop_count(1), 1);
        assert_eq!(pop_count(0xFFFF_FFFF), 32);
        assert_eq!(pop_count(0x8000_0001), 2);
        for x in [0x1234_5678u32, 0xDEAD_BEEF, 0x0F0F_F0F0, 0x7FFF_FFFF] {
            assert_eq!(pop_count(x), x.count_ones());
        }
    }

    #[test]
    fn test_get_and_set() {
        let mut bits = BitVector::new();
        for _ in 0..70 {
            bits.add();
        }
        bits.set(3, true);
        bits.set(64, true);
        bits.set(3, false);
        bits.set(69, true);

        assert_eq!(bits.len(), 70);
        assert_eq!(bits.get(3), Some(false));
        assert_eq!(bits.get(64), Some(true));
        assert_eq!(bits.get(69), Some(true));
        assert_eq!(bits.get(70), None);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_set_out_of_range() {
        let mut bits = BitVector::new();
        bits.add();
        bits.set(1, true);
    }

    #[test]
    fn test_rank_counts_strictly_below() {
        let mut bits = BitVector::new();
        let set = [0usize, 5, 31, 32, 33, 95, 96];
        for i in 0..100 {
            bits.push(set.contains(&i));
        }
        bits.build();

        assert_eq!(bits.num_ones(), set.len());
        assert_eq!(bits.rank(0), 0);
        assert_eq!(bits.rank(1), 1);
        assert_eq!(bits.rank(5), 1);
        assert_eq!(bits.rank(6), 2);
        assert_eq!(bits.rank(32), 3);
        assert_eq!(bits.rank(33), 4);
        assert_eq!(bits.rank(96), 6);
        assert_eq!(bits.rank(100), 7);

        // Dense numbering of the set positions.
        for (expected, &id) in set.iter().enumerate() {
            assert_eq!(bits.rank(id), expected);
        }
    }

    #[test]
    fn test_rank_at_word_boundary_end() {
        let mut bits = BitVector::new();
        for i in 0..64 {
            bits.push(i % 2 == 0);
        }
        bits.build();
        assert_eq!(bits.rank(64), 32);
    }

    #[test]
    fn test_clear() {
        let mut bits = BitVector::new();
        bits.push(true);
        bits.build();
        bits.clear();
        assert!(bits.is_empty());
        assert_eq!(bits.num_ones(), 0);
    }
}
