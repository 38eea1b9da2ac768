use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, fmt, prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt,
};

fn default_directives(level: LevelFilter) -> String {
    format!("fxdate={level},tower_http={level}")
}

/// Installs the global subscriber.
///
/// `level` applies to this crate and to the HTTP trace layer; everything
/// else stays quiet. `RUST_LOG` replaces these defaults when set. With a
/// `log_file` the output is appended to that file instead of stderr.
pub fn init_logging(level: LevelFilter, log_file: Option<&Path>) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));

    let registry = tracing_subscriber::registry().with(env_filter);

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;
            registry
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .init();
        }
        None => {
            registry
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives() {
        assert_eq!(
            default_directives(LevelFilter::INFO),
            "fxdate=info,tower_http=info"
        );
        assert_eq!(
            default_directives(LevelFilter::OFF),
            "fxdate=off,tower_http=off"
        );
    }
}
