//! Log output for the binary
//!
//! The library only emits `tracing` events. `main` installs the subscriber
//! here, on stderr, so envelopes written to stdout stay clean for pipes.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when neither `RUST_LOG` nor `--verbose` is given
pub const DEFAULT_FILTER: &str = "aead_codec=warn";

/// Filter for `--verbose`: KDF timing and rejection reasons
pub const VERBOSE_FILTER: &str = "aead_codec=debug";

/// Pick the filter directive. An explicit `RUST_LOG` beats `--verbose`.
pub fn filter_directive(rust_log: Option<String>, verbose: bool) -> String {
    match rust_log.filter(|directive| !directive.trim().is_empty()) {
        Some(directive) => directive,
        None if verbose => VERBOSE_FILTER.to_string(),
        None => DEFAULT_FILTER.to_string(),
    }
}

/// Install the global subscriber, as text or as JSON lines
pub fn init_tracing(verbose: bool, log_json: bool) {
    let directive = filter_directive(std::env::var("RUST_LOG").ok(), verbose);

    let json = log_json.then(|| fmt::layer().json().with_writer(std::io::stderr));
    let text = (!log_json).then(|| fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(EnvFilter::new(directive))
        .with(json)
        .with(text)
        .init();
}
