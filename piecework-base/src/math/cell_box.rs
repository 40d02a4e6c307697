use core::fmt;
use core::iter::FusedIterator;
use core::ops::RangeInclusive;

use rand::Rng;

use crate::math::{Axis, Cell, GridCoordinate, GridVector, Octant};

/// An axis-aligned box of [`Cell`]s, with **inclusive** lower and upper bounds.
///
/// A [`CellBox`] always contains at least one cell. Operations which could produce an empty
/// result, such as [`CellBox::intersection()`], return [`Option`] instead.
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct CellBox {
    lower: Cell,
    upper: Cell,
}

impl CellBox {
    /// The largest possible box, containing every representable cell.
    ///
    /// Used as the “infinite” placeholder space when nothing constrains placement yet.
    pub const EVERYWHERE: Self = Self {
        lower: Cell::new(
            GridCoordinate::MIN,
            GridCoordinate::MIN,
            GridCoordinate::MIN,
        ),
        upper: Cell::new(
            GridCoordinate::MAX,
            GridCoordinate::MAX,
            GridCoordinate::MAX,
        ),
    };

    /// Constructs a [`CellBox`] from inclusive lower and upper bounds.
    ///
    /// Panics if any lower bound is greater than the corresponding upper bound.
    /// Use [`CellBox::checked_from_lower_upper()`] to handle that case.
    ///
    /// ```
    /// # extern crate piecework_base as piecework;
    /// use piecework::math::CellBox;
    ///
    /// let b = CellBox::from_lower_upper([0, 0, 0], [3, 3, 3]);
    /// assert_eq!(b.volume(), Some(64));
    /// ```
    #[track_caller]
    #[allow(clippy::missing_inline_in_public_items, reason = "is generic already")]
    pub fn from_lower_upper(lower: impl Into<Cell>, upper: impl Into<Cell>) -> Self {
        match Self::checked_from_lower_upper(lower, upper) {
            Ok(b) => b,
            Err(e) => panic!("{e}"),
        }
    }

    /// Constructs a [`CellBox`] from inclusive lower and upper bounds,
    /// or returns an error if they are inverted.
    #[allow(clippy::missing_inline_in_public_items, reason = "is generic already")]
    pub fn checked_from_lower_upper(
        lower: impl Into<Cell>,
        upper: impl Into<Cell>,
    ) -> Result<Self, CellBoxError> {
        let lower = lower.into();
        let upper = upper.into();
        if upper.x < lower.x || upper.y < lower.y || upper.z < lower.z {
            return Err(CellBoxError::Inverted { lower, upper });
        }
        Ok(Self { lower, upper })
    }

    /// Constructs the smallest [`CellBox`] containing both of the given cells, which may be
    /// any two opposite corners.
    #[inline]
    pub fn from_corners(a: Cell, b: Cell) -> Self {
        Self {
            lower: a.min(b),
            upper: a.max(b),
        }
    }

    /// Constructs a [`CellBox`] containing exactly one cell.
    #[inline]
    pub const fn single_cell(cell: Cell) -> Self {
        Self {
            lower: cell,
            upper: cell,
        }
    }

    /// Returns the inclusive lower bounds.
    #[inline]
    pub const fn lower(self) -> Cell {
        self.lower
    }

    /// Returns the inclusive upper bounds.
    #[inline]
    pub const fn upper(self) -> Cell {
        self.upper
    }

    /// Returns the inclusive range of coordinates this box occupies on the given axis.
    #[inline]
    pub fn axis_range(self, axis: Axis) -> RangeInclusive<GridCoordinate> {
        self.lower[axis]..=self.upper[axis]
    }

    /// Returns the number of cells along the given axis. Never zero.
    #[inline]
    pub fn size_on(self, axis: Axis) -> u64 {
        (i64::from(self.upper[axis]) - i64::from(self.lower[axis]) + 1) as u64
    }

    /// Returns the number of cells in the box, or [`None`] if that does not fit in a [`u64`].
    #[inline]
    pub fn volume(self) -> Option<u64> {
        self.size_on(Axis::X)
            .checked_mul(self.size_on(Axis::Y))?
            .checked_mul(self.size_on(Axis::Z))
    }

    /// Returns whether the box contains exactly one cell.
    #[inline]
    pub fn is_single_cell(self) -> bool {
        self.lower == self.upper
    }

    /// Returns whether the given cell is within this box.
    #[inline]
    pub fn contains_cell(self, cell: Cell) -> bool {
        Axis::ALL
            .into_iter()
            .all(|axis| self.axis_range(axis).contains(&cell[axis]))
    }

    /// Returns whether `inner` lies entirely within `self` (they may be equal).
    ///
    /// ```
    /// # extern crate piecework_base as piecework;
    /// use piecework::math::CellBox;
    ///
    /// let outer = CellBox::from_lower_upper([0, 0, 0], [9, 9, 9]);
    /// assert!(outer.encapsulates(CellBox::from_lower_upper([1, 2, 3], [9, 9, 9])));
    /// assert!(!outer.encapsulates(CellBox::from_lower_upper([1, 2, 3], [9, 10, 9])));
    /// ```
    #[inline]
    pub fn encapsulates(self, inner: CellBox) -> bool {
        self.contains_cell(inner.lower) && self.contains_cell(inner.upper)
    }

    /// Returns whether `self` and `other` have at least one cell in common.
    #[inline]
    pub fn intersects(self, other: CellBox) -> bool {
        self.intersection(other).is_some()
    }

    /// Returns the box of cells that are in both `self` and `other`,
    /// or [`None`] if they do not overlap.
    ///
    /// ```
    /// # extern crate piecework_base as piecework;
    /// use piecework::math::CellBox;
    ///
    /// let a = CellBox::from_lower_upper([0, 0, 0], [3, 3, 3]);
    /// assert_eq!(
    ///     a.intersection(CellBox::from_lower_upper([2, -5, 1], [8, 1, 1])),
    ///     Some(CellBox::from_lower_upper([2, 0, 1], [3, 1, 1])),
    /// );
    /// assert_eq!(a.intersection(CellBox::from_lower_upper([4, 0, 0], [6, 3, 3])), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn intersection(self, other: CellBox) -> Option<CellBox> {
        Self::checked_from_lower_upper(self.lower.max(other.lower), self.upper.min(other.upper))
            .ok()
    }

    /// Returns the smallest box containing both `self` and `other`.
    #[inline]
    #[must_use]
    pub fn union(self, other: CellBox) -> CellBox {
        Self {
            lower: self.lower.min(other.lower),
            upper: self.upper.max(other.upper),
        }
    }

    /// Splits the box into two along `axis`, such that the second box starts at coordinate
    /// `second_start`.
    ///
    /// Returns an error unless both halves would be non-empty, i.e. unless
    /// `lower < second_start <= upper` on that axis.
    ///
    /// ```
    /// # extern crate piecework_base as piecework;
    /// use piecework::math::{Axis, CellBox};
    ///
    /// let room = CellBox::from_lower_upper([0, 0, 0], [5, 4, 5]);
    /// let (floor, hall) = room.split(Axis::Y, 1).unwrap();
    /// assert_eq!(floor, CellBox::from_lower_upper([0, 0, 0], [5, 0, 5]));
    /// assert_eq!(hall, CellBox::from_lower_upper([0, 1, 0], [5, 4, 5]));
    /// assert!(room.split(Axis::Y, 0).is_err());
    /// ```
    #[inline]
    pub fn split(
        self,
        axis: Axis,
        second_start: GridCoordinate,
    ) -> Result<(CellBox, CellBox), CellBoxError> {
        if !(self.lower[axis] < second_start && second_start <= self.upper[axis]) {
            return Err(CellBoxError::InvalidSplit {
                bounds: self,
                axis,
                second_start,
            });
        }
        let mut first = self;
        first.upper[axis] = second_start - 1;
        let mut second = self;
        second.lower[axis] = second_start;
        Ok((first, second))
    }

    /// Translates the box by the given offset.
    ///
    /// Panics if the result would be out of range of [`GridCoordinate`].
    #[inline]
    #[must_use]
    #[track_caller]
    pub fn translate(self, offset: GridVector) -> Self {
        Self {
            lower: self.lower + offset,
            upper: self.upper + offset,
        }
    }

    /// Constructs the box extending `horizontal` cells from `center` along X and Z and
    /// `vertical` cells along Y, in both directions.
    ///
    /// Bounds which would be out of range of [`GridCoordinate`] are clamped to it.
    ///
    /// ```
    /// # extern crate piecework_base as piecework;
    /// use piecework::math::{Cell, CellBox};
    ///
    /// assert_eq!(
    ///     CellBox::around(Cell::new(10, 0, -10), 2, 1),
    ///     CellBox::from_lower_upper([8, -1, -12], [12, 1, -8]),
    /// );
    /// ```
    #[inline]
    pub fn around(center: Cell, horizontal: u32, vertical: u32) -> Self {
        let mut lower = center;
        let mut upper = center;
        for axis in Axis::ALL {
            let distance = i64::from(if axis.is_horizontal() {
                horizontal
            } else {
                vertical
            });
            let c = i64::from(center[axis]);
            lower[axis] = clamp_coordinate(c - distance);
            upper[axis] = clamp_coordinate(c + distance);
        }
        Self { lower, upper }
    }

    /// Returns the cell at the center of the box, rounding toward the upper bounds.
    ///
    /// On each axis, this is `lower + (upper - lower + 1) / 2`. When the box is more than one
    /// cell wide on an axis, the center is strictly greater than the lower bound on that axis,
    /// so it is a valid divider for [`CellBox::octant_clip()`] that leaves both sides non-empty.
    ///
    /// ```
    /// # extern crate piecework_base as piecework;
    /// use piecework::math::{Cell, CellBox};
    ///
    /// assert_eq!(
    ///     CellBox::from_lower_upper([0, 0, 5], [1, 3, 5]).center(),
    ///     Cell::new(1, 2, 5),
    /// );
    /// assert_eq!(CellBox::EVERYWHERE.center(), Cell::ORIGIN);
    /// ```
    #[inline]
    pub fn center(self) -> Cell {
        let mut center = self.lower;
        for axis in Axis::ALL {
            let lower = i64::from(self.lower[axis]);
            let upper = i64::from(self.upper[axis]);
            // Cannot overflow because the result lies within lower..=upper.
            center[axis] = (lower + (upper - lower + 1) / 2) as GridCoordinate;
        }
        center
    }

    /// Returns the part of this box which lies in the given octant of the space divided at
    /// `divider`, or [`None`] if there is no such part.
    ///
    /// On each axis, the negative side contains coordinates less than the divider's and the
    /// positive side contains coordinates greater than or equal to the divider's.
    #[inline]
    #[must_use]
    pub fn octant_clip(self, divider: Cell, octant: Octant) -> Option<CellBox> {
        let mut lower = self.lower;
        let mut upper = self.upper;
        for axis in Axis::ALL {
            if octant.is_positive_on(axis) {
                lower[axis] = lower[axis].max(divider[axis]);
            } else {
                upper[axis] = upper[axis].min(divider[axis].checked_sub(1)?);
            }
        }
        Self::checked_from_lower_upper(lower, upper).ok()
    }

    /// Calls `f` once for every cell in the box.
    ///
    /// The order is X outermost, then Y, then Z innermost; this is the same order as
    /// [`CellBox::interior_iter()`].
    #[inline]
    pub fn for_each_cell(self, mut f: impl FnMut(Cell)) {
        for x in self.axis_range(Axis::X) {
            for y in self.axis_range(Axis::Y) {
                for z in self.axis_range(Axis::Z) {
                    f(Cell::new(x, y, z));
                }
            }
        }
    }

    /// Iterates over every cell in the box, with X outermost and Z innermost.
    #[inline]
    pub fn interior_iter(self) -> CellBoxIter {
        CellBoxIter {
            bounds: self,
            next: Some(self.lower),
        }
    }

    /// Returns a cell chosen uniformly at random from within the box.
    #[inline]
    pub fn random_cell<R: Rng + ?Sized>(self, rng: &mut R) -> Cell {
        Cell::new(
            rng.random_range(self.axis_range(Axis::X)),
            rng.random_range(self.axis_range(Axis::Y)),
            rng.random_range(self.axis_range(Axis::Z)),
        )
    }
}

#[inline]
fn clamp_coordinate(value: i64) -> GridCoordinate {
    GridCoordinate::try_from(value).unwrap_or(if value < 0 {
        GridCoordinate::MIN
    } else {
        GridCoordinate::MAX
    })
}

impl fmt::Debug for CellBox {
    #[allow(clippy::missing_inline_in_public_items)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CellBox")
            .field(&self.axis_range(Axis::X))
            .field(&self.axis_range(Axis::Y))
            .field(&self.axis_range(Axis::Z))
            .finish()
    }
}

/// Iterator produced by [`CellBox::interior_iter()`].
#[derive(Clone, Debug)]
pub struct CellBoxIter {
    bounds: CellBox,
    next: Option<Cell>,
}

impl Iterator for CellBoxIter {
    type Item = Cell;

    #[inline]
    fn next(&mut self) -> Option<Cell> {
        let current = self.next?;
        let CellBox { lower, upper } = self.bounds;
        let mut next = current;
        self.next = 'advance: {
            for axis in [Axis::Z, Axis::Y, Axis::X] {
                if next[axis] < upper[axis] {
                    next[axis] += 1;
                    break 'advance Some(next);
                }
                next[axis] = lower[axis];
            }
            None
        };
        Some(current)
    }
}

impl FusedIterator for CellBoxIter {}

/// Error when a [`CellBox`] cannot be constructed or split as requested.
#[derive(Clone, Copy, Debug, displaydoc::Display, Eq, PartialEq)]
#[non_exhaustive]
pub enum CellBoxError {
    /// box lower bounds {lower:?} were greater than upper bounds {upper:?}
    Inverted {
        /// The requested lower bounds.
        lower: Cell,
        /// The requested upper bounds.
        upper: Cell,
    },
    /// cannot split {bounds:?} at {axis} = {second_start}; both halves must be non-empty
    InvalidSplit {
        /// The box that was to be split.
        bounds: CellBox,
        /// The axis to split along.
        axis: Axis,
        /// The requested first coordinate of the second half.
        second_start: GridCoordinate,
    },
}

impl core::error::Error for CellBoxError {}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools as _;
    use pretty_assertions::assert_eq;
    use rand::SeedableRng as _;
    use std::string::ToString as _;
    use std::vec::Vec;

    fn b(lower: [i32; 3], upper: [i32; 3]) -> CellBox {
        CellBox::from_lower_upper(lower, upper)
    }

    #[test]
    fn inverted_is_error() {
        assert_eq!(
            CellBox::checked_from_lower_upper([0, 0, 0], [1, -1, 1]),
            Err(CellBoxError::Inverted {
                lower: Cell::new(0, 0, 0),
                upper: Cell::new(1, -1, 1)
            })
        );
    }

    #[test]
    fn error_display() {
        assert_eq!(
            CellBoxError::Inverted {
                lower: Cell::new(0, 0, 0),
                upper: Cell::new(1, -1, 1)
            }
            .to_string(),
            "box lower bounds (+0, +0, +0) were greater than upper bounds (+1, -1, +1)"
        );
    }

    #[test]
    fn intersection_is_symmetric_and_encapsulated() {
        let boxes = [
            b([0, 0, 0], [3, 3, 3]),
            b([2, 2, 2], [5, 5, 5]),
            b([4, 0, 0], [6, 3, 3]),
            b([-10, 1, -10], [10, 1, 10]),
            b([3, 3, 3], [3, 3, 3]),
        ];
        for (&a, &c) in boxes.iter().cartesian_product(boxes.iter()) {
            let i = a.intersection(c);
            assert_eq!(i, c.intersection(a), "{a:?} {c:?}");
            if let Some(i) = i {
                assert!(a.encapsulates(i));
                assert!(c.encapsulates(i));
            }
        }
    }

    #[test]
    fn touching_boxes_do_not_intersect() {
        assert_eq!(b([0, 0, 0], [3, 3, 3]).intersection(b([4, 0, 0], [6, 3, 3])), None);
        assert_eq!(
            b([0, 0, 0], [3, 3, 3]).intersection(b([3, 0, 0], [6, 3, 3])),
            Some(b([3, 0, 0], [3, 3, 3]))
        );
    }

    #[test]
    fn split_bounds() {
        let bounds = b([0, 0, 0], [4, 0, 0]);
        assert_eq!(
            bounds.split(Axis::X, 4),
            Ok((b([0, 0, 0], [3, 0, 0]), b([4, 0, 0], [4, 0, 0])))
        );
        assert!(bounds.split(Axis::X, 5).is_err());
        assert!(bounds.split(Axis::X, 0).is_err());
        assert!(bounds.split(Axis::Y, 0).is_err());
    }

    #[test]
    fn center_of_single_cell_axis() {
        assert_eq!(b([5, 5, 5], [5, 5, 5]).center(), Cell::new(5, 5, 5));
        assert_eq!(b([-4, -4, -4], [-1, -2, -3]).center(), Cell::new(-2, -3, -3));
    }

    #[test]
    fn around_clamps_at_extremes() {
        let edge = Cell::new(GridCoordinate::MAX - 1, GridCoordinate::MIN, 0);
        assert_eq!(
            CellBox::around(edge, 5, 3),
            b(
                [GridCoordinate::MAX - 6, GridCoordinate::MIN, -5],
                [GridCoordinate::MAX, GridCoordinate::MIN + 3, 5]
            )
        );
    }

    #[test]
    fn octant_clips_partition_the_box() {
        let bounds = b([0, 0, 0], [4, 1, 0]);
        let divider = bounds.center();
        let mut total = 0;
        let mut seen = Vec::new();
        for octant in Octant::ALL {
            if let Some(part) = bounds.octant_clip(divider, octant) {
                assert!(bounds.encapsulates(part));
                total += part.volume().unwrap();
                part.for_each_cell(|cell| {
                    assert_eq!(Octant::containing(cell, divider), octant);
                    seen.push(cell);
                });
            }
        }
        assert_eq!(total, bounds.volume().unwrap());
        seen.sort();
        assert_eq!(seen, bounds.interior_iter().sorted().collect::<Vec<_>>());
    }

    #[test]
    fn octant_clip_at_minimum_divider() {
        let divider = Cell::new(i32::MIN, 0, 0);
        assert_eq!(CellBox::EVERYWHERE.octant_clip(divider, Octant::Nnn), None);
        assert!(CellBox::EVERYWHERE.octant_clip(divider, Octant::Ppp).is_some());
    }

    #[test]
    fn iteration_order() {
        let bounds = b([0, 0, 0], [1, 1, 1]);
        let mut via_callback = Vec::new();
        bounds.for_each_cell(|c| via_callback.push(<[i32; 3]>::from(c)));
        assert_eq!(
            via_callback,
            vec![
                [0, 0, 0],
                [0, 0, 1],
                [0, 1, 0],
                [0, 1, 1],
                [1, 0, 0],
                [1, 0, 1],
                [1, 1, 0],
                [1, 1, 1]
            ]
        );
        assert_eq!(
            bounds.interior_iter().map(<[i32; 3]>::from).collect::<Vec<_>>(),
            via_callback
        );
    }

    #[test]
    fn random_cell_is_inside() {
        let mut rng = rand_xoshiro::Xoshiro256Plus::seed_from_u64(1);
        let bounds = b([-3, 10, 0], [3, 12, 0]);
        for _ in 0..100 {
            assert!(bounds.contains_cell(bounds.random_cell(&mut rng)));
        }
    }

    #[test]
    fn everywhere_volume_overflows() {
        assert_eq!(CellBox::EVERYWHERE.volume(), None);
        assert_eq!(CellBox::EVERYWHERE.size_on(Axis::Y), 1_u64 << 32);
    }

    #[test]
    fn debug() {
        assert_eq!(
            format!("{:?}", b([0, 1, 2], [3, 4, 5])),
            "CellBox(0..=3, 1..=4, 2..=5)"
        );
    }
}
