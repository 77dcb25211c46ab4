use thiserror::Error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("invalid log level/filter '{value}': unable to build EnvFilter")]
    EnvFilter {
        value: String,
        #[source]
        source: ParseError,
    },
    #[error("telemetry error: {0}")]
    Subscriber(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Installs the global subscriber. `RUST_LOG` wins over `default_level`.
pub fn init(default_level: &str) -> Result<(), TelemetryError> {
    let env_filter = resolve_filter(EnvFilter::DEFAULT_ENV, default_level)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(TelemetryError::Subscriber)
}

fn resolve_filter(env_var: &str, default_level: &str) -> Result<EnvFilter, TelemetryError> {
    match EnvFilter::try_from_env(env_var) {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(default_level).map_err(|source| TelemetryError::EnvFilter {
            value: default_level.to_string(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNSET_VAR: &str = "LIFEPLAN_TEST_FILTER_NEVER_SET";

    #[test]
    fn falls_back_to_default_level_when_env_is_unset() {
        let filter = resolve_filter(UNSET_VAR, "lifeplan=debug").expect("valid default");
        assert!(filter.to_string().contains("lifeplan=debug"));
    }

    #[test]
    fn rejects_unparseable_default_level() {
        let err = resolve_filter(UNSET_VAR, "lifeplan=verbose").expect_err("filter must not parse");
        assert!(matches!(err, TelemetryError::EnvFilter { ref value, .. } if value == "lifeplan=verbose"));
        assert!(err.to_string().contains("lifeplan=verbose"));
    }
}
