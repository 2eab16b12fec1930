//! Tracing setup for the binary.
//!
//! Frames are drawn on stdout, so log output goes to stderr. The level is
//! controlled with `RUST_LOG` and defaults to `info`.

use tracing_subscriber::{EnvFilter, FmtSubscriber};

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
