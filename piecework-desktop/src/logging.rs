//! Logging to stderr.

use anyhow::Context as _;

/// A [`clap::Args`] struct for options controlling log output to stderr.
#[derive(Clone, Debug, clap::Args)]
#[expect(clippy::module_name_repetitions)]
pub struct LoggingArgs {
    /// Additional logging to stderr. Repeat for more detail.
    #[arg(long = "verbose", short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Remove timestamps from logs so that they are deterministic.
    ///
    /// This option is intended for internal tests only.
    #[arg(long = "simplify-log-format", hide = true)]
    pub simplify_log_format: bool,
}

impl LoggingArgs {
    /// The most detailed level which will be written.
    pub fn level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Info,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

/// Install a [`log`] global logger based on user-provided `options`.
pub fn install(options: &LoggingArgs) -> Result<(), anyhow::Error> {
    use log::LevelFilter::{Error, Off};

    let stderr_logger = *simplelog::WriteLogger::new(
        options.level(),
        // Note: This has no target filters because `PieceworkLogger` calls
        // `util::log::standard_filter` to do it.
        simplelog::ConfigBuilder::new()
            .set_target_level(Off)
            .set_location_level(Off)
            .set_time_level(if options.simplify_log_format {
                Off
            } else {
                Error
            })
            .build(),
        std::io::stderr(),
    );
    let max_level = simplelog::SharedLogger::level(&stderr_logger);

    log::set_boxed_logger(Box::new(PieceworkLogger { stderr_logger }))
        .context("failed to initialize logging")?;
    log::set_max_level(max_level);
    Ok(())
}

/// [`log::Log`] implementation that [`install()`] registers globally.
struct PieceworkLogger {
    stderr_logger: simplelog::WriteLogger<std::io::Stderr>,
}

impl log::Log for PieceworkLogger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        piecework::util::log::standard_filter(metadata)
            && log::Log::enabled(&self.stderr_logger, metadata)
    }

    fn log(&self, record: &log::Record<'_>) {
        if !piecework::util::log::standard_filter(record.metadata()) {
            return;
        }
        log::Log::log(&self.stderr_logger, record);
    }

    fn flush(&self) {
        log::Log::flush(&self.stderr_logger);
    }
}
