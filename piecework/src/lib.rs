//! Piecework assembles branching structures (buildings, dungeons, cave networks) out of
//! axis-aligned boxes called *pieces*, whose sizes and shapes are chosen at generation time.
//!
//! ## Overview
//!
//! * A [`PieceGenerator`](generator::PieceGenerator) proposes a [`Candidate`](generator::Candidate)
//!   piece: a box in its own local coordinates, a content descriptor, and *sockets*
//!   ([`ParentSocket`](socket::ParentSocket)s it can be attached by, and
//!   [`ChildSocket`](socket::ChildSocket)s further pieces can attach to).
//! * Generators are grouped into weighted [`Pool`](pool::Pool)s, looked up by
//!   [`Name`] in a [`PoolRegistry`](pool::PoolRegistry).
//! * [`assemble()`](assemble::assemble) grows a structure from a start pool: it repeatedly
//!   takes the highest-priority piece with open child sockets, tries candidates in random
//!   order, and commits the first one whose box fits in the remaining
//!   [`FreeSpace`](space::FreeSpace).
//! * The result is a [`Structure`](piece::Structure) of serializable
//!   [`Piece`](piece::Piece)s, whose descriptors implement [`Filler`](piece::Filler) to
//!   write their content into any region of an output world later.
//!
//! Assembly is deterministic given the random number generator it is passed.

#![cfg_attr(test, allow(clippy::redundant_clone))]

pub mod math {
    //! Integer grid geometry.
    pub use piecework_base::math::*;
}

pub mod util {
    //! Tools that we could imagine being in the Rust standard library, but aren't.
    pub use piecework_base::util::*;
}

pub mod assemble;
pub mod generator;
mod name;
pub use name::Name;
pub mod piece;
pub mod pool;
pub mod socket;
pub mod space;
