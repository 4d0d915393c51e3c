//! Run-scoped element identifiers.
//!
//! Every element gets a typed, sequentially issued id. Ids are unique within
//! one generation run only; two runs from the same seed issue the same ids.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! element_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl From<u32> for $name {
            fn from(raw: u32) -> Self {
                Self(raw)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

element_id!(RoomId, "R");
element_id!(WallId, "W");
element_id!(DoorId, "D");
element_id!(WindowId, "N");
element_id!(ZoneId, "Z");
element_id!(LevelId, "L");
element_id!(
    /// Shared by every view kind so viewports can reference any of them.
    ViewId,
    "V"
);
element_id!(SheetId, "S");

/// Monotonic counter handing out ids of one kind, starting at 1.
#[derive(Debug, Clone, Default)]
pub struct IdSequence {
    last: u32,
}

impl IdSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue<T: From<u32>>(&mut self) -> T {
        self.last += 1;
        T::from(self.last)
    }

    /// Number of ids issued so far.
    pub fn issued(&self) -> u32 {
        self.last
    }
}
