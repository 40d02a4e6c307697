use core::{fmt, ops};

use crate::math::{Axis, Cell};

/// One of the eight regions a box is cut into when it is divided at a single cell.
///
/// The name spells the side of the divider on each of X, Y, Z in turn: `n` for below the
/// divider's coordinate, `p` for at or above it.
#[expect(clippy::exhaustive_enums)]
#[derive(Clone, Copy, Eq, Hash, PartialEq, exhaust::Exhaust)]
#[repr(u8)]
pub enum Octant {
    #[allow(missing_docs)]
    Nnn = 0b000,
    #[allow(missing_docs)]
    Nnp = 0b001,
    #[allow(missing_docs)]
    Npn = 0b010,
    #[allow(missing_docs)]
    Npp = 0b011,
    #[allow(missing_docs)]
    Pnn = 0b100,
    #[allow(missing_docs)]
    Pnp = 0b101,
    #[allow(missing_docs)]
    Ppn = 0b110,
    #[allow(missing_docs)]
    Ppp = 0b111,
}

impl Octant {
    /// Every octant, ordered by its sign bits.
    pub const ALL: [Self; 8] = [
        Self::Nnn,
        Self::Nnp,
        Self::Npn,
        Self::Npp,
        Self::Pnn,
        Self::Pnp,
        Self::Ppn,
        Self::Ppp,
    ];

    const fn bit(axis: Axis) -> u8 {
        match axis {
            Axis::X => 0b100,
            Axis::Y => 0b010,
            Axis::Z => 0b001,
        }
    }

    #[inline]
    const fn slot(self) -> usize {
        self as usize
    }

    /// Returns the octant of the space around `divider` that `cell` falls in.
    ///
    /// A coordinate equal to the divider's counts as positive, matching
    /// [`CellBox::octant_clip()`](crate::math::CellBox::octant_clip).
    #[inline]
    pub fn containing(cell: Cell, divider: Cell) -> Self {
        let bits = Axis::ALL
            .into_iter()
            .filter(|&axis| cell[axis] >= divider[axis])
            .fold(0, |bits, axis| bits | Self::bit(axis));
        Self::ALL[usize::from(bits)]
    }

    /// Returns whether this octant lies at or above the divider on `axis`.
    #[inline]
    pub const fn is_positive_on(self, axis: Axis) -> bool {
        self as u8 & Self::bit(axis) != 0
    }
}

impl fmt::Debug for Octant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for axis in Axis::ALL {
            let sign = if self.is_positive_on(axis) { '+' } else { '-' };
            write!(f, "{sign}{axis:?}")?;
        }
        Ok(())
    }
}

/// Exactly one `T` per [`Octant`]; the children of an octree branch.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct OctantMap<T>([T; 8]);

impl<T> OctantMap<T> {
    /// Computes each octant's value with `function`, in [`Octant::ALL`] order.
    #[inline]
    #[must_use]
    pub fn from_fn(mut function: impl FnMut(Octant) -> T) -> Self {
        Self(Octant::ALL.map(&mut function))
    }

    /// Iterates over octants and their values.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (Octant, &T)> {
        Octant::ALL.into_iter().zip(&self.0)
    }

    /// Iterates over octants and mutable references to their values.
    #[inline]
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Octant, &mut T)> {
        Octant::ALL.into_iter().zip(&mut self.0)
    }

    /// Iterates over the values alone.
    #[inline]
    pub fn values(&self) -> core::slice::Iter<'_, T> {
        self.0.iter()
    }
}

impl<T> ops::Index<Octant> for OctantMap<T> {
    type Output = T;
    #[inline]
    fn index(&self, octant: Octant) -> &T {
        &self.0[octant.slot()]
    }
}
impl<T> ops::IndexMut<Octant> for OctantMap<T> {
    #[inline]
    fn index_mut(&mut self, octant: Octant) -> &mut T {
        &mut self.0[octant.slot()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn containing_matches_sign_bits() {
        let divider = Cell::new(5, 5, 5);
        assert_eq!(Octant::containing(Cell::new(0, 0, 0), divider), Octant::Nnn);
        assert_eq!(Octant::containing(Cell::new(5, 5, 5), divider), Octant::Ppp);
        assert_eq!(Octant::containing(Cell::new(5, 4, 9), divider), Octant::Pnp);
        for octant in Octant::ALL {
            let cell = Cell::new(
                if octant.is_positive_on(Axis::X) { 6 } else { 4 },
                if octant.is_positive_on(Axis::Y) { 6 } else { 4 },
                if octant.is_positive_on(Axis::Z) { 6 } else { 4 },
            );
            assert_eq!(Octant::containing(cell, divider), octant);
        }
    }

    #[test]
    fn map_index_matches_from_fn() {
        let map = OctantMap::from_fn(|octant| octant as u8);
        for octant in Octant::ALL {
            assert_eq!(map[octant], octant as u8);
        }
        assert_eq!(map.values().count(), 8);
    }

    #[test]
    fn debug() {
        assert_eq!(format!("{:?}", Octant::Pnp), "+X-Y+Z");
    }
}
