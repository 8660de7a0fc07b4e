use tracing_subscriber::filter::{Directive, EnvFilter, LevelFilter};
use tracing_subscriber::fmt::format;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::prelude::*;

/// Environment variable that overrides the default log level
pub const LOG_ENV_VAR: &str = "TOOLCYCLE_LOG";

/// Custom logger initialization to exclude timestamps but keep colors.
/// This provides cleaner logs by removing the timestamp prefix.
///
/// Use TOOLCYCLE_LOG=info or TOOLCYCLE_LOG=debug to increase verbosity.
/// Example: TOOLCYCLE_LOG=debug cargo run
pub fn init_custom_logger() {
    // Empty time formatter that doesn't print anything
    struct EmptyTime;
    impl FormatTime for EmptyTime {
        fn format_time(
            &self,
            _: &mut tracing_subscriber::fmt::format::Writer<'_>,
        ) -> std::fmt::Result {
            Ok(())
        }
    }

    let default_level =
        std::env::var(LOG_ENV_VAR).unwrap_or_else(|_| "warn".to_string());

    let format = format()
        .with_timer(EmptyTime)
        .with_level(true)
        .with_target(true)
        .with_ansi(true);

    let filter = log_filter(&default_level);

    // `log` records from the core modules reach tracing through tracing-log
    if let Err(e) = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().event_format(format).with_filter(filter))
        .try_init()
    {
        eprintln!("Logger already initialized: {e}");
    }
}

/// Build the filter: the requested default level with the render backends
/// kept quiet
fn log_filter(default_level: &str) -> EnvFilter {
    let default: Directive = default_level.parse().unwrap_or_else(|_| {
        eprintln!("Invalid {LOG_ENV_VAR} value '{default_level}', using warn");
        LevelFilter::WARN.into()
    });

    let mut directives = vec!["wgpu_core=error", "wgpu_hal=error", "bevy_render=error"];
    // Keep this crate's startup messages unless something more verbose was asked for
    if matches!(default.to_string().as_str(), "warn" | "error" | "off") {
        directives.push("toolcycle=info");
    }

    directives
        .into_iter()
        .filter_map(|d| d.parse::<Directive>().ok())
        .fold(
            EnvFilter::from_default_env().add_directive(default),
            EnvFilter::add_directive,
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_level_falls_back_to_warn() {
        let filter = log_filter("toolcycle=deafening");
        assert!(filter.to_string().contains("warn"));
    }

    #[test]
    fn crate_is_logged_at_info_by_default() {
        assert!(log_filter("error").to_string().contains("toolcycle=info"));
        assert!(!log_filter("debug").to_string().contains("toolcycle=info"));
    }
}
