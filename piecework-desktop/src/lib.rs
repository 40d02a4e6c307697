//! Command-line front end for [`piecework`], assembling the structures that
//! [`piecework_content::demo_pools()`] describes.
//!
//! The library part of this package exists for the binary's sake and so that its pieces can
//! be tested; it is not a stable API.

// Crate-specific lint settings. (General settings can be found in the workspace manifest.)
#![forbid(unsafe_code)]

pub mod config_files;
mod generate;
pub use generate::*;
pub mod logging;
