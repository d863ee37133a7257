//! Log output for reprkit's own events.
//!
//! Registry mutations and settings changes are logged at `debug`, a move that
//! stops halfway at `warn`, and rendering at `trace`. [`init_tracing`] prints
//! them to stderr for binaries that have no subscriber of their own.

use thiserror::Error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;

/// Directives used when `RUST_LOG` is unset or blank.
pub const DEFAULT_FILTER: &str = "warn,reprkit_core=debug";

#[derive(Debug, Error)]
pub enum TelemetryInitError {
    #[error("invalid log filter `{directives}`: {source}")]
    InvalidFilter {
        directives: String,
        #[source]
        source: ParseError,
    },
    #[error("failed to install tracing subscriber: {0}")]
    Install(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Installs a compact stderr subscriber filtered by `RUST_LOG`.
///
/// Does nothing when a global subscriber is already installed, so it is safe
/// to call more than once. A malformed `RUST_LOG` is an error rather than
/// being silently replaced by [`DEFAULT_FILTER`].
pub fn init_tracing() -> Result<(), TelemetryInitError> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .with_env_filter(filter_from(directives.as_deref())?)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn filter_from(directives: Option<&str>) -> Result<EnvFilter, TelemetryInitError> {
    let directives = directives
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or(DEFAULT_FILTER);
    EnvFilter::try_new(directives).map_err(|source| TelemetryInitError::InvalidFilter {
        directives: directives.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use tracing_subscriber::filter::LevelFilter;

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("   "))]
    fn unset_or_blank_uses_default(#[case] directives: Option<&str>) {
        let filter = filter_from(directives).unwrap();
        assert_eq!(filter.to_string(), EnvFilter::new(DEFAULT_FILTER).to_string());
    }

    #[test]
    fn explicit_directives_are_kept() {
        let filter = filter_from(Some("reprkit_core=trace")).unwrap();
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::TRACE));
    }

    #[test]
    fn malformed_directives_are_reported() {
        let err = filter_from(Some("reprkit_core=loud")).unwrap_err();
        assert!(matches!(
            &err,
            TelemetryInitError::InvalidFilter { directives, .. } if directives == "reprkit_core=loud"
        ));
    }

    #[test]
    fn second_init_is_a_no_op() {
        init_tracing().unwrap();
        init_tracing().unwrap();
    }
}
