//! Tracking which parts of a volume are still free for pieces to occupy.

use crate::math::{Cell, CellBox};

mod octree;
pub use octree::FreeSpace;

/// Read-only view of a region of free space, as offered to
/// [`PieceGenerator`](crate::generator::PieceGenerator)s so they can shape their candidates.
pub trait AvailableSpace {
    /// Returns whether every cell of `bounds` is free.
    fn contains(&self, bounds: CellBox) -> bool;

    /// Returns whether `cell` is free.
    fn contains_cell(&self, cell: Cell) -> bool;
}

impl<T: AvailableSpace + ?Sized> AvailableSpace for &T {
    fn contains(&self, bounds: CellBox) -> bool {
        (**self).contains(bounds)
    }

    fn contains_cell(&self, cell: Cell) -> bool {
        (**self).contains_cell(cell)
    }
}
