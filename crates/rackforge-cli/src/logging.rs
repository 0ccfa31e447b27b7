//! Diagnostic logging setup.
//!
//! Logs go to stderr so stdout stays clean for JSON output. `RUST_LOG`
//! overrides the default filter.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter directives for a verbosity setting.
pub fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "rackforge=debug,rackforge_cli=debug,rackforge_spec=debug,rackforge_layout=debug,rackforge_generate=debug"
    } else {
        "warn"
    }
}

/// Installs the global subscriber. Later calls are ignored.
pub fn init(verbose: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_directives(verbose).into());

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}
