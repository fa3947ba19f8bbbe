//! Opt-in `tracing` subscriber for tick-placement diagnostics.
//!
//! Events emitted under the `axis_ticks` target:
//! - `trace`: every recorded improvement (`spacing`, `start`, `end`, `total`;
//!   joint passes add `driver`, `driver_spacing`, `follower_spacing`);
//! - `debug`: each finished single-axis or joint search, and the final
//!   placement chosen by `place_ticks`;
//! - `warn`: a search that hit `max_iterations`, or an aspect ratio the axis
//!   box cannot honor.
//!
//! Hosts with their own subscriber can ignore this module.

/// Filter used when `RUST_LOG` is unset: search failures and nothing chattier.
pub const DEFAULT_FILTER: &str = "axis_ticks=warn";

/// Installs a compact `fmt` subscriber filtered by `RUST_LOG` or [`DEFAULT_FILTER`].
///
/// Returns `false` without the `telemetry` feature, or when the host already
/// installed a global subscriber.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        use tracing_subscriber::EnvFilter;

        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact()
            .try_init()
            .is_ok()
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_FILTER, init_default_tracing};

    #[test]
    fn default_filter_targets_this_crate() {
        assert!(DEFAULT_FILTER.starts_with("axis_ticks="));
    }

    #[cfg(not(feature = "telemetry"))]
    #[test]
    fn tracing_init_is_noop_without_feature() {
        assert!(!init_default_tracing());
    }

    #[cfg(feature = "telemetry")]
    #[test]
    fn default_filter_parses_and_second_init_is_rejected() {
        assert!(tracing_subscriber::EnvFilter::try_new(DEFAULT_FILTER).is_ok());
        let _ = init_default_tracing();
        assert!(!init_default_tracing());
    }
}
