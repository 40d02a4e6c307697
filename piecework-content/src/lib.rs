//! Example content for [`piecework`]: piece generators which produce rooms and corridors,
//! the fillers which draw them into a [`SparseCanvas`], and a ready-made set of pools to
//! assemble them from ([`demo_pools()`]).
//!
//! These are small on purpose. They exist to exercise the assembler and to show how a
//! [`PieceGenerator`](piecework::generator::PieceGenerator) uses its
//! [`BakeContext`](piecework::generator::BakeContext); other items should be assumed not
//! particularly stable.

#![deny(rust_2018_idioms)]
#![warn(unused_extern_crates)]
#![warn(clippy::cast_lossless)]
#![warn(clippy::exhaustive_enums)]
#![warn(clippy::exhaustive_structs)]

mod canvas;
pub use canvas::*;
mod demo;
pub use demo::*;
mod filler;
pub use filler::*;
mod looper;
pub use looper::*;
mod material;
pub use material::*;
mod room;
pub use room::*;
mod subpool;
pub use subpool::*;

#[cfg(test)]
mod testing;
