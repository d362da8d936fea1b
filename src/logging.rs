pub use log::LevelFilter::*;

/// Route the `log` macros to stdout. Calling this twice in one process is an
/// error, which hosts that reuse the module across ticks should ignore.
pub fn setup_logging(verbosity: log::LevelFilter) -> Result<(), String> {
    fern::Dispatch::new()
        .level(verbosity)
        .format(|out, message, record| out.finish(format_args!("({}) {}: {}", record.level(), record.target(), message)))
        .chain(std::io::stdout())
        .apply()
        .map_err(|e| e.to_string())
}
