//! The pending-event flag set shared by both decoders.

use core::ops::BitOr;

/// A set of pending encoder events, packed into one byte.
///
/// Flags are independent. Inserting a flag never disturbs the others, and a
/// flag stays set until it is taken.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct Events(u8);

impl Events {
    /// One detent to the right.
    pub const RIGHT: Events = Events(0b0000_0001);
    /// One detent to the left.
    pub const LEFT: Events = Events(0b0000_0010);
    /// One detent to the right while the button was pressed.
    pub const HOLD_RIGHT: Events = Events(0b0000_0100);
    /// One detent to the left while the button was pressed.
    pub const HOLD_LEFT: Events = Events(0b0000_1000);
    /// A debounced press released before the hold timeout.
    pub const BUTTON_CLICK: Events = Events(0b0001_0000);
    /// A press sustained for the hold timeout.
    pub const BUTTON_HOLD: Events = Events(0b0010_0000);

    /// The empty set.
    pub const fn empty() -> Self {
        Events(0)
    }

    /// Build a set from raw bits. Bits outside the six flags are kept as-is.
    pub const fn from_bits(bits: u8) -> Self {
        Events(bits)
    }

    /// Raw bit representation.
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Return `true` if no flag is set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Return `true` if every flag in `other` is set.
    pub const fn contains(self, other: Events) -> bool {
        self.0 & other.0 == other.0
    }

    /// Set the flags in `other`, leaving all others untouched.
    pub fn insert(&mut self, other: Events) {
        self.0 |= other.0;
    }

    /// Clear the flags in `other`.
    pub fn remove(&mut self, other: Events) {
        self.0 &= !other.0;
    }

    /// Test-and-clear a single flag.
    ///
    /// Returns `true` and clears the flag if it was set, `false` otherwise.
    pub fn take(&mut self, flag: Events) -> bool {
        if self.0 & flag.0 != 0 {
            self.remove(flag);
            true
        } else {
            false
        }
    }
}

impl BitOr for Events {
    type Output = Events;

    fn bitor(self, rhs: Events) -> Events {
        Events(self.0 | rhs.0)
    }
}
