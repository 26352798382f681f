pub mod app;
pub mod domain;
pub mod infra;
pub mod ui;

/// Install the global tracing subscriber. Diagnostics go to stderr so they
/// never interleave with shell output; level defaults to `warn` and follows
/// `RUST_LOG` when set.
pub fn init() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}
