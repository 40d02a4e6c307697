use core::fmt;

use crate::math::{Axis, GridVector};

/// Identifies a face of a cell or an orthogonal unit vector.
///
/// Structures are assembled with +Y as “up”. The horizontal faces double as compass directions:
/// [`Face6::NZ`] is north, [`Face6::PX`] is east, [`Face6::PZ`] is south and [`Face6::NX`]
/// is west.
#[expect(clippy::exhaustive_enums)]
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, exhaust::Exhaust)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Face6 {
    /// Negative X; the face whose normal vector is `(-1, 0, 0)`; west.
    NX = 1,
    /// Negative Y; the face whose normal vector is `(0, -1, 0)`; downward.
    NY = 2,
    /// Negative Z; the face whose normal vector is `(0, 0, -1)`; north.
    NZ = 3,
    /// Positive X; the face whose normal vector is `(1, 0, 0)`; east.
    PX = 4,
    /// Positive Y; the face whose normal vector is `(0, 1, 0)`; upward.
    PY = 5,
    /// Positive Z; the face whose normal vector is `(0, 0, 1)`; south.
    PZ = 6,
}

impl Face6 {
    /// All the values of [`Face6`].
    pub const ALL: [Face6; 6] = [
        Face6::NX,
        Face6::NY,
        Face6::NZ,
        Face6::PX,
        Face6::PY,
        Face6::PZ,
    ];

    /// The four horizontal faces, in clockwise order (viewed from above) starting at north.
    pub const HORIZONTAL: [Face6; 4] = [Face6::NZ, Face6::PX, Face6::PZ, Face6::NX];

    /// Returns which axis this face's normal vector is parallel to.
    #[inline]
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::NX | Self::PX => Axis::X,
            Self::NY | Self::PY => Axis::Y,
            Self::NZ | Self::PZ => Axis::Z,
        }
    }

    /// Returns whether this face is a “positive” face: one whose unit vector's nonzero
    /// coordinate is positive.
    ///
    /// ```
    /// # extern crate piecework_base as piecework;
    /// use piecework::math::Face6;
    ///
    /// assert_eq!(Face6::PX.is_positive(), true);
    /// assert_eq!(Face6::NX.is_positive(), false);
    /// ```
    #[inline]
    pub const fn is_positive(self) -> bool {
        matches!(self, Self::PX | Self::PY | Self::PZ)
    }

    /// Returns whether this face lies in the horizontal plane.
    #[inline]
    pub const fn is_horizontal(self) -> bool {
        self.axis().is_horizontal()
    }

    /// Returns the opposite face (maps [`PX`](Self::PX) to [`NX`](Self::NX) and so on).
    #[inline]
    #[must_use]
    pub const fn opposite(self) -> Face6 {
        match self {
            Face6::NX => Face6::PX,
            Face6::NY => Face6::PY,
            Face6::NZ => Face6::PZ,
            Face6::PX => Face6::NX,
            Face6::PY => Face6::NY,
            Face6::PZ => Face6::NZ,
        }
    }

    /// Returns the face reached by turning a quarter turn clockwise about +Y, viewed from above.
    /// Vertical faces are unchanged.
    #[inline]
    #[must_use]
    pub const fn clockwise(self) -> Face6 {
        match self {
            Face6::NZ => Face6::PX,
            Face6::PX => Face6::PZ,
            Face6::PZ => Face6::NX,
            Face6::NX => Face6::NZ,
            Face6::NY | Face6::PY => self,
        }
    }

    /// Inverse of [`Face6::clockwise()`].
    #[inline]
    #[must_use]
    pub const fn counterclockwise(self) -> Face6 {
        match self {
            Face6::NZ => Face6::NX,
            Face6::NX => Face6::PZ,
            Face6::PZ => Face6::PX,
            Face6::PX => Face6::NZ,
            Face6::NY | Face6::PY => self,
        }
    }

    /// Returns the vector normal to this face, of length 1.
    #[inline]
    pub fn normal_vector(self) -> GridVector {
        match self {
            Face6::NX => GridVector::new(-1, 0, 0),
            Face6::NY => GridVector::new(0, -1, 0),
            Face6::NZ => GridVector::new(0, 0, -1),
            Face6::PX => GridVector::new(1, 0, 0),
            Face6::PY => GridVector::new(0, 1, 0),
            Face6::PZ => GridVector::new(0, 0, 1),
        }
    }
}

impl fmt::Display for Face6 {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Face6::NX => "-X",
            Face6::NY => "-Y",
            Face6::NZ => "-Z",
            Face6::PX => "+X",
            Face6::PY => "+Y",
            Face6::PZ => "+Z",
        })
    }
}
