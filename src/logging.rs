use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Default filter for a `-v` count: warnings and above, then debug, then
/// trace for this crate.
pub fn filter_for(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn,ui_test_synth=info",
        1 => "warn,ui_test_synth=debug",
        _ => "info,ui_test_synth=trace",
    }
}

/// Install the global subscriber. `RUST_LOG` overrides the `-v` level.
///
/// Logs go to stderr so stdout carries only the result document.
pub fn init_logging(verbose: u8, json: bool) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_for(verbose)));

    let registry = tracing_subscriber::registry().with(env_filter);

    // A second init (tests, embedding) keeps the first subscriber.
    let result = if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .compact()
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    if let Err(e) = result {
        eprintln!("logging already initialized: {}", e);
    }
}
