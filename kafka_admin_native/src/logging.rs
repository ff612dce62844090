use std::sync::Once;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: Once = Once::new();

/// Installs the stderr subscriber the first time a context is created.
///
/// A host that already installed its own global subscriber keeps it.
pub fn init_logging() {
    INIT.call_once(|| {
        let log_level = std::env::var("RUST_LOG").unwrap_or("info".to_owned());

        let filter = EnvFilter::builder()
            .with_default_directive(LevelFilter::INFO.into())
            .parse_lossy(log_level);

        let _ = tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_filter(filter),
            )
            .try_init();
    });
}
