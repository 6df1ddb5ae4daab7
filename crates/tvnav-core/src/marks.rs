#![forbid(unsafe_code)]

//! Per-item marker flags.
//!
//! The focus engine owns one [`Marks`] value per item of every menu. The view
//! layer reads them to decide how to draw an item; it never writes them.

use bitflags::bitflags;

bitflags! {
    /// Marker flags carried by one item.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Marks: u8 {
        /// Item holds the focus marker of the active menu.
        const FOCUSED  = 0b01;
        /// Item is the confirmed selection of a menu with visible selection.
        const SELECTED = 0b10;
    }
}

impl Marks {
    #[inline]
    #[must_use]
    pub const fn is_focused(self) -> bool {
        self.contains(Self::FOCUSED)
    }

    #[inline]
    #[must_use]
    pub const fn is_selected(self) -> bool {
        self.contains(Self::SELECTED)
    }
}
