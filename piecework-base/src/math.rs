//! Integer grid geometry: cells, inclusive boxes, directions, and rotations.

mod axis;
pub use axis::*;
mod cell;
pub use cell::*;
mod cell_box;
pub use cell_box::*;
mod face;
pub use face::*;
mod octant;
pub use octant::*;
mod rotation;
pub use rotation::*;
#[cfg(feature = "serde")]
mod serde_impls;

/// Coordinates that are locked to the cell grid.
pub type GridCoordinate = i32;

/// Vectors that are locked to the cell grid.
pub type GridVector = euclid::Vector3D<GridCoordinate, Cell>;
