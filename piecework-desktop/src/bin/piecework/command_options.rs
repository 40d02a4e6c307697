//! Command line option parsing.

use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;
use clap::builder::{PossibleValue, PossibleValuesParser, TypedValueParser as _};
use strum::IntoEnumIterator as _;

use piecework_content::DemoPool;
use piecework_desktop::logging::LoggingArgs;

#[derive(Clone, Debug, Parser)]
#[command(name = "piecework", author, about, version)]
pub(crate) struct PieceworkArgs {
    /// Seed value for the random choices made during assembly.
    ///
    /// May be an integer between 0 and 18446744073709551615 (2⁶⁴ - 1).
    ///
    /// If not specified, a randomly chosen seed will be used, and logged.
    #[arg(long = "seed")]
    pub(crate) seed: Option<u64>,

    /// Maximum depth of the tree of pieces, overriding the parameters file.
    #[arg(long = "size", value_name = "DEPTH")]
    pub(crate) size: Option<u32>,

    /// Pool to choose the first piece from, overriding the parameters file.
    #[arg(
        long = "start-pool",
        short = 'p',
        value_name = "POOL",
        value_parser = PossibleValuesParser::new(
            DemoPool::iter().map(|pool| PossibleValue::new(<&str>::from(pool))),
        ).try_map(|string| DemoPool::from_str(&string)),
    )]
    pub(crate) start_pool: Option<DemoPool>,

    /// JSON file of assembly parameters; created with default values if it does not exist.
    ///
    /// If not specified, default parameters are used.
    #[arg(long = "config", short = 'c', value_name = "FILE")]
    pub(crate) config: Option<PathBuf>,

    /// Write the assembled structure, as JSON, to this file.
    #[arg(long = "output", short = 'o', value_name = "FILE")]
    pub(crate) output: Option<PathBuf>,

    /// Print a top-down map of the structure to stdout.
    #[arg(long = "map")]
    pub(crate) map: bool,

    #[command(flatten)]
    pub(crate) logging: LoggingArgs,
}
