use core::{fmt, ops};

use crate::math::{Axis, Face6, GridCoordinate, GridVector};

/// “A cell”, in this documentation, is one unit cube of the integer grid that structures are
/// assembled on. This type identifies such a cube by its integer coordinates.
///
/// Cells are distinct from vectors: a [`GridVector`] is an offset between cells, and adding one
/// to a cell produces another cell.
///
/// The valid coordinate range is that of [`GridCoordinate`]. Arithmetic that leaves that range
/// panics (overflow checks are enabled in all profiles).
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[allow(missing_docs, clippy::exhaustive_structs)]
pub struct Cell {
    pub x: GridCoordinate,
    pub y: GridCoordinate,
    pub z: GridCoordinate,
}

impl Cell {
    /// Equal to `Cell::new(0, 0, 0)`.
    pub const ORIGIN: Self = Self::new(0, 0, 0);

    /// Construct `Cell { x, y, z }` from the given coordinates.
    #[inline]
    pub const fn new(x: GridCoordinate, y: GridCoordinate, z: GridCoordinate) -> Self {
        Self { x, y, z }
    }

    /// Returns the cell adjacent to this one across the given face.
    ///
    /// ```
    /// # extern crate piecework_base as piecework;
    /// use piecework::math::{Cell, Face6};
    ///
    /// assert_eq!(Cell::new(1, 2, 3).adjacent(Face6::PX), Cell::new(2, 2, 3));
    /// ```
    #[inline]
    #[must_use]
    pub fn adjacent(self, face: Face6) -> Self {
        self + face.normal_vector()
    }

    /// Returns the cell `distance` steps away from this one in the direction of `face`.
    #[inline]
    #[must_use]
    pub fn relative(self, face: Face6, distance: GridCoordinate) -> Self {
        self + face.normal_vector() * distance
    }

    /// Componentwise [`GridCoordinate::checked_add()`].
    #[must_use]
    #[inline]
    pub fn checked_add(self, v: GridVector) -> Option<Self> {
        Some(Self {
            x: self.x.checked_add(v.x)?,
            y: self.y.checked_add(v.y)?,
            z: self.z.checked_add(v.z)?,
        })
    }

    /// Returns the vector from the origin to this cell.
    #[inline]
    pub fn to_vector(self) -> GridVector {
        GridVector::new(self.x, self.y, self.z)
    }

    /// Componentwise minimum.
    #[inline]
    #[must_use]
    pub fn min(self, other: Self) -> Self {
        Self::new(
            self.x.min(other.x),
            self.y.min(other.y),
            self.z.min(other.z),
        )
    }

    /// Componentwise maximum.
    #[inline]
    #[must_use]
    pub fn max(self, other: Self) -> Self {
        Self::new(
            self.x.max(other.x),
            self.y.max(other.y),
            self.z.max(other.z),
        )
    }
}

impl fmt::Debug for Cell {
    #[mutants::skip]
    #[inline(never)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { x, y, z } = self;
        write!(f, "({x:+}, {y:+}, {z:+})")
    }
}

impl From<[GridCoordinate; 3]> for Cell {
    #[inline]
    fn from([x, y, z]: [GridCoordinate; 3]) -> Self {
        Self { x, y, z }
    }
}
impl From<Cell> for [GridCoordinate; 3] {
    #[inline]
    fn from(Cell { x, y, z }: Cell) -> [GridCoordinate; 3] {
        [x, y, z]
    }
}

impl ops::Index<Axis> for Cell {
    type Output = GridCoordinate;
    #[inline]
    fn index(&self, index: Axis) -> &Self::Output {
        match index {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }
}
impl ops::IndexMut<Axis> for Cell {
    #[inline]
    fn index_mut(&mut self, index: Axis) -> &mut Self::Output {
        match index {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
            Axis::Z => &mut self.z,
        }
    }
}

impl ops::Add<GridVector> for Cell {
    type Output = Self;
    #[inline]
    fn add(self, rhs: GridVector) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}
impl ops::AddAssign<GridVector> for Cell {
    #[inline]
    fn add_assign(&mut self, rhs: GridVector) {
        *self = *self + rhs;
    }
}
impl ops::Sub<GridVector> for Cell {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: GridVector) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}
impl ops::Sub<Cell> for Cell {
    type Output = GridVector;
    #[inline]
    fn sub(self, rhs: Cell) -> Self::Output {
        GridVector::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}
