//! Log output and error reporting.

use folio_config::SentryConfig;
use folio_utils::folio_version;
use sentry::{integrations::tracing::EventFilter, ClientInitGuard};
use tracing::{Level, Metadata};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Install the global subscriber: formatted output on stderr, filtered by
/// `RUST_LOG`, plus the sentry layer (a no-op until sentry is initialized).
pub fn init_tracing() {
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    #[cfg(tracing_pretty)]
    let fmt_layer = fmt_layer.pretty();

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(EnvFilter::from_default_env()))
        .with(sentry::integrations::tracing::layer().event_filter(sentry_event_filter))
        .init();
}

/// The returned guard flushes pending events when dropped.
pub fn init_sentry(config: &SentryConfig) -> ClientInitGuard {
    sentry::init((
        config.dsn.as_str(),
        sentry::ClientOptions {
            release: Some(folio_version().into()),
            attach_stacktrace: true,
            ..Default::default()
        },
    ))
}

fn sentry_event_filter(meta: &Metadata<'_>) -> EventFilter {
    level_filter(*meta.level())
}

fn level_filter(level: Level) -> EventFilter {
    match level {
        Level::ERROR => EventFilter::Exception,
        Level::WARN => EventFilter::Event,
        Level::INFO | Level::DEBUG => EventFilter::Breadcrumb,
        Level::TRACE => EventFilter::Ignore,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_are_reported_as_exceptions() {
        assert!(matches!(level_filter(Level::ERROR), EventFilter::Exception));
        assert!(matches!(level_filter(Level::WARN), EventFilter::Event));
    }

    #[test]
    fn info_becomes_breadcrumb() {
        assert!(matches!(level_filter(Level::INFO), EventFilter::Breadcrumb));
        assert!(matches!(level_filter(Level::DEBUG), EventFilter::Breadcrumb));
        assert!(matches!(level_filter(Level::TRACE), EventFilter::Ignore));
    }
}
