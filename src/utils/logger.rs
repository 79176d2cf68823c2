use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// How log lines are rendered on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Compact human-readable lines for terminal runs.
    Compact,
    /// One JSON object per event, for piping run logs into other tools.
    Json,
}

impl LogFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            Self::Json
        } else {
            Self::Compact
        }
    }
}

/// Directives used when `RUST_LOG` is unset.
///
/// Verbose runs trace chunk streaming and per-tick collisions, which are
/// logged at debug level.
pub fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "mam=debug,info"
    } else {
        "mam=info,warn"
    }
}

pub fn init_logger(format: LogFormat, verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_file(false)
        .with_line_number(false);

    let registry = tracing_subscriber::registry().with(filter);
    let result = match format {
        LogFormat::Compact => registry.with(layer.compact()).try_init(),
        LogFormat::Json => registry.with(layer.json().flatten_event(true)).try_init(),
    };
    // a subscriber set earlier in the process wins
    if let Err(e) = result {
        eprintln!("⚠️ Logger already initialised: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_flag() {
        assert_eq!(LogFormat::from_json_flag(true), LogFormat::Json);
        assert_eq!(LogFormat::from_json_flag(false), LogFormat::Compact);
    }

    #[test]
    fn test_verbose_enables_debug_for_crate() {
        assert!(default_directives(true).contains("mam=debug"));
        assert!(!default_directives(false).contains("debug"));
        for verbose in [true, false] {
            assert!(EnvFilter::try_new(default_directives(verbose)).is_ok());
        }
    }

    #[test]
    fn test_second_init_does_not_panic() {
        init_logger(LogFormat::Compact, false);
        init_logger(LogFormat::Json, true);
    }
}
