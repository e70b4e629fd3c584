//! Bit layout of a packed double-array unit.
//!
//! ```text
//!  31  30 ........ 10   9    8    7 ...... 0
//! +---+--------------+----+----+-----------+
//! | L |    offset    | X  | HL |   label   |   inner unit
//! +---+--------------+----+----+-----------+
//! | 1 |            value (31 bits)          |   leaf unit
//! +---+-------------------------------------+
//! ```
//!
//! - `L`: set on leaf units only, so a leaf never matches a label byte
//! - `X`: offset is stored shifted by 8 instead of 0 (offsets `>= 1 << 21`)
//! - `HL`: a leaf hangs off this unit at `id ^ offset`

use crate::error::BuildError;

/// Size in bytes of one serialized unit.
pub const UNIT_SIZE: usize = std::mem::size_of::<u32>();

/// Offsets must stay strictly below this bound.
pub const OFFSET_LIMIT: u32 = 1 << 29;

const LABEL_MASK: u32 = 0xFF;
const HAS_LEAF_BIT: u32 = 1 << 8;
const EXTENDED_OFFSET_BIT: u32 = 1 << 9;
const LEAF_BIT: u32 = 1 << 31;

/// One slot of the double array.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Unit(u32);

impl Unit {
    /// Wrap a raw unit word.
    pub const fn from_u32(raw: u32) -> Self {
        Unit(raw)
    }

    /// The raw unit word.
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Whether a leaf unit is derived from this unit.
    #[inline]
    pub const fn has_leaf(self) -> bool {
        self.0 & HAS_LEAF_BIT != 0
    }

    /// Whether this unit stores a value instead of a label and offset.
    #[inline]
    pub const fn is_leaf(self) -> bool {
        self.0 & LEAF_BIT != 0
    }

    /// Value of a leaf unit.
    #[inline]
    pub const fn value(self) -> i32 {
        (self.0 & !LEAF_BIT) as i32
    }

    /// Label of the unit. Leaf units keep the MSB, so they compare unequal to
    /// every byte.
    #[inline]
    pub const fn label(self) -> u32 {
        self.0 & (LEAF_BIT | LABEL_MASK)
    }

    /// XOR distance from this unit to its children.
    #[inline]
    pub const fn offset(self) -> u32 {
        (self.0 >> 10) << ((self.0 & EXTENDED_OFFSET_BIT) >> 6)
    }

    pub(crate) fn set_has_leaf(&mut self, has_leaf: bool) {
        if has_leaf {
            self.0 |= HAS_LEAF_BIT;
        } else {
            self.0 &= !HAS_LEAF_BIT;
        }
    }

    pub(crate) fn set_value(&mut self, value: i32) {
        self.0 = (value as u32) | LEAF_BIT;
    }

    pub(crate) fn set_label(&mut self, label: u8) {
        self.0 = (self.0 & !LABEL_MASK) | u32::from(label);
    }

    pub(crate) fn set_offset(&mut self, offset: u32) -> Result<(), BuildError> {
        if offset >= OFFSET_LIMIT {
            return Err(BuildError::OffsetOverflow(offset));
        }
        self.0 &= LEAF_BIT | HAS_LEAF_BIT | LABEL_MASK;
        if offset < 1 << 21 {
            self.0 |= offset << 10;
        } else {
            self.0 |= (offset << 2) | EXTENDED_OFFSET_BIT;
        }
        Ok(())
    }
}

impl From<u32> for Unit {
    fn from(raw: u32) -> Self {
        Unit(raw)
    }
}

impl From<Unit> for u32 {
    fn from(unit: Unit) -> Self {
        unit.0
    }
}
