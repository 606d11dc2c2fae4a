//! `tracing` subscriber setup.
//!
//! The subscriber is installed before the site is loaded so that config
//! diagnostics are visible. The site's `log_level` is applied afterwards
//! through [`LogHandle::set_level`].

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, fmt, reload};

/// Level used until the site's own `log_level` is known.
pub const BOOTSTRAP_LEVEL: &str = "info";

/// Handle for changing the active filter after startup.
pub struct LogHandle {
    filter: reload::Handle<EnvFilter, Registry>,
    from_env: bool,
}

impl LogHandle {
    /// Switch the filter to `level`.
    ///
    /// Does nothing when `RUST_LOG` chose the filter. An unparsable level
    /// keeps the current filter.
    pub fn set_level(&self, level: &str) {
        if self.from_env {
            return;
        }
        match EnvFilter::try_new(level) {
            Ok(filter) => {
                if let Err(e) = self.filter.reload(filter) {
                    tracing::warn!(error = %e, "failed to apply log level");
                }
            }
            Err(e) => {
                tracing::warn!(level, error = %e, "invalid log level, keeping current filter");
            }
        }
    }
}

/// Initialize the global tracing subscriber with stderr output.
///
/// `RUST_LOG` takes precedence over `level` when set. Returns `None` if a
/// global subscriber was already installed.
pub fn init_subscriber(level: &str) -> Option<LogHandle> {
    let (filter, from_env) = match EnvFilter::try_from_default_env() {
        Ok(filter) => (filter, true),
        Err(_) => (EnvFilter::new(level), false),
    };
    let (filter, handle) = reload::Layer::new(filter);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .try_init()
        .ok()
        .map(|()| LogHandle {
            filter: handle,
            from_env,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;

    fn local(level: &str) -> (impl tracing::Subscriber + Send + Sync, LogHandle) {
        let (filter, handle) = reload::Layer::new(EnvFilter::new(level));
        let subscriber = tracing_subscriber::registry().with(filter);
        (
            subscriber,
            LogHandle {
                filter: handle,
                from_env: false,
            },
        )
    }

    #[test]
    fn init_subscriber_second_call_is_noop() {
        let _ = init_subscriber("warn");
        assert!(init_subscriber("debug").is_none());
    }

    #[test]
    fn set_level_reloads_filter() {
        let (subscriber, handle) = local("warn");
        tracing::subscriber::with_default(subscriber, || {
            assert!(!tracing::enabled!(Level::DEBUG));
            handle.set_level("debug");
            assert!(tracing::enabled!(Level::DEBUG));
        });
    }

    #[test]
    fn invalid_level_keeps_filter() {
        let (subscriber, handle) = local("warn");
        tracing::subscriber::with_default(subscriber, || {
            handle.set_level("hrms=loud");
            assert!(tracing::enabled!(Level::WARN));
            assert!(!tracing::enabled!(Level::INFO));
        });
    }

    #[test]
    fn env_chosen_filter_is_not_replaced() {
        let (subscriber, mut handle) = local("warn");
        handle.from_env = true;
        tracing::subscriber::with_default(subscriber, || {
            handle.set_level("trace");
            assert!(!tracing::enabled!(Level::INFO));
        });
    }
}
