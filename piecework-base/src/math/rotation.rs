use rand::Rng;
use rand::seq::SliceRandom as _;

use crate::math::{Cell, Face6, GridVector};

/// A rotation of the grid about the +Y axis by a multiple of 90°.
///
/// Rotations are described as seen from above; [`Rotation::Clockwise90`] maps north
/// ([`Face6::NZ`]) to east ([`Face6::PX`]).
///
/// These are the only rotations pieces are assembled with, since pieces are expected to
/// keep their notion of “up”.
#[expect(clippy::exhaustive_enums)]
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, exhaust::Exhaust)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Rotation {
    /// No rotation.
    #[default]
    None,
    /// A quarter turn clockwise.
    Clockwise90,
    /// A half turn.
    Clockwise180,
    /// A quarter turn counterclockwise.
    Counterclockwise90,
}

impl Rotation {
    /// All four rotations, in order of increasing clockwise angle.
    pub const ALL: [Self; 4] = [
        Self::None,
        Self::Clockwise90,
        Self::Clockwise180,
        Self::Counterclockwise90,
    ];

    /// Number of clockwise quarter turns this rotation performs, in `0..4`.
    #[inline]
    pub const fn quarter_turns(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Clockwise90 => 1,
            Self::Clockwise180 => 2,
            Self::Counterclockwise90 => 3,
        }
    }

    #[inline]
    const fn from_quarter_turns(turns: u8) -> Self {
        Self::ALL[(turns % 4) as usize]
    }

    /// Returns the rotation which performs `self` and then `other`.
    #[inline]
    #[must_use]
    pub const fn then(self, other: Self) -> Self {
        Self::from_quarter_turns(self.quarter_turns() + other.quarter_turns())
    }

    /// Returns the rotation which undoes this one.
    #[inline]
    #[must_use]
    pub const fn inverse(self) -> Self {
        Self::from_quarter_turns(4 - self.quarter_turns())
    }

    /// Rotates a face (direction). Vertical faces are unchanged.
    ///
    /// ```
    /// # extern crate piecework_base as piecework;
    /// use piecework::math::{Face6, Rotation};
    ///
    /// assert_eq!(Rotation::Clockwise90.rotate_face(Face6::NZ), Face6::PX);
    /// assert_eq!(Rotation::Counterclockwise90.rotate_face(Face6::NZ), Face6::NX);
    /// ```
    #[inline]
    pub const fn rotate_face(self, face: Face6) -> Face6 {
        match self {
            Self::None => face,
            Self::Clockwise90 => face.clockwise(),
            Self::Clockwise180 => face.opposite_if_horizontal(),
            Self::Counterclockwise90 => face.counterclockwise(),
        }
    }

    /// Rotates a vector about the origin.
    #[inline]
    pub fn rotate_vector(self, v: GridVector) -> GridVector {
        match self {
            Self::None => v,
            Self::Clockwise90 => GridVector::new(-v.z, v.y, v.x),
            Self::Clockwise180 => GridVector::new(-v.x, v.y, -v.z),
            Self::Counterclockwise90 => GridVector::new(v.z, v.y, -v.x),
        }
    }

    /// Rotates a cell about the given pivot cell.
    #[inline]
    pub fn rotate_cell_about(self, cell: Cell, pivot: Cell) -> Cell {
        pivot + self.rotate_vector(cell - pivot)
    }

    /// Chooses a rotation uniformly at random.
    #[inline]
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::from_quarter_turns(rng.random_range(0..4))
    }

    /// Returns all four rotations in a random order.
    #[inline]
    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> [Self; 4] {
        let mut all = Self::ALL;
        all.shuffle(rng);
        all
    }
}

impl Face6 {
    #[inline]
    const fn opposite_if_horizontal(self) -> Face6 {
        if self.is_horizontal() {
            self.opposite()
        } else {
            self
        }
    }
}
