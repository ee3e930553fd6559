use anyhow::{Result, anyhow};
use clap::ValueEnum;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

/// Log line format on stderr.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

/// Install the global subscriber. `RUST_LOG` overrides the verbosity flag.
pub fn init(verbose: bool, format: LogFormat) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(directives(verbose)));
    let builder = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    match format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
    .map_err(|e| anyhow!("failed to install logger: {e}"))
}

fn directives(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    format!("warn,czds={level},czds_api={level},czds_fetch={level}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directives_scope_own_crates() {
        assert_eq!(
            directives(false),
            "warn,czds=info,czds_api=info,czds_fetch=info"
        );
        assert!(directives(true).contains("czds_fetch=debug"));
        assert!(EnvFilter::try_new(directives(true)).is_ok());
    }
}
