use std::sync::Once;
use tracing_subscriber::{filter::filter_fn, fmt, prelude::*, EnvFilter};

use crate::util::is_noisy;

static TEST_SETUP: Once = Once::new();

/// Installs a stderr subscriber for tests once per process.
///
/// `RUST_LOG` wins over the default `debug` level.
pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        let layer = fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_filter(filter_fn(|metadata| !is_noisy(metadata.target())))
            .with_filter(env_filter);

        if let Err(e) = tracing_subscriber::registry().with(layer).try_init() {
            eprintln!("Error: Failed to set up logging: {}", e);
        }
    });
}
