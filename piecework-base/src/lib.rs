//! This library is an internal component of [`piecework`],
//! which defines the integer geometry used by structure assembly.
//! Do not depend on this library; use only [`piecework`] instead.
//!
//! [`piecework`]: https://crates.io/crates/piecework/

#![no_std]
// Crate-specific lint settings. (General settings can be found in the workspace manifest.)
#![cfg_attr(
    not(test),
    warn(clippy::std_instead_of_core, clippy::std_instead_of_alloc)
)]
#![warn(clippy::missing_inline_in_public_items)]

#[cfg(test)]
#[macro_use]
extern crate std;

/// Do not use this module directly; its contents are re-exported from `piecework`.
pub mod math;

/// Do not use this module directly; its contents are re-exported from `piecework`.
pub mod util;

// reexport for convenience of our tests
#[doc(hidden)]
pub use euclid;
