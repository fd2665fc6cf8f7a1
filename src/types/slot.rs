//! Numbered image slots.

use std::fmt;
use std::num::NonZeroU32;

/// One of the `N` numbered image positions exposed by the gateway.
///
/// A `Slot` can only be built for a value inside `[1, N]`, so holding one
/// is proof the request is in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slot(NonZeroU32);

impl Slot {
    /// Build a slot if `number` lies in `[1, image_count]`.
    pub fn new(number: u32, image_count: NonZeroU32) -> Option<Self> {
        let number = NonZeroU32::new(number)?;
        (number <= image_count).then_some(Self(number))
    }

    /// Slot for the zero-based position `index` in a rotation.
    pub(crate) fn from_index(index: usize, image_count: NonZeroU32) -> Option<Self> {
        let number = u32::try_from(index).ok()?.checked_add(1)?;
        Self::new(number, image_count)
    }

    /// All slots `1..=image_count`, in order.
    pub fn all(image_count: NonZeroU32) -> impl Iterator<Item = Slot> {
        (1..=image_count.get()).filter_map(move |n| Self::new(n, image_count))
    }

    /// The 1-based slot number.
    pub fn number(self) -> u32 {
        self.0.get()
    }

    /// Zero-based index into a rotation.
    pub fn index(self) -> usize {
        (self.0.get() - 1) as usize
    }

    /// Synthetic request path for this slot (`/{n}.jpg`).
    pub fn path(self) -> String {
        format!("/{}.jpg", self.0)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
