use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

const DEFAULT_DIRECTIVES: &str = "docagent=debug,tool=info";

/// `RUST_LOG` when set, otherwise warnings plus debug output from this crate.
fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::builder()
            .with_default_directive(tracing::Level::WARN.into())
            .parse_lossy(DEFAULT_DIRECTIVES)
    })
}

/// Human readable output on stderr. Closed spans are logged with their timings.
pub fn init_default_tracing() {
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_span_events(FmtSpan::CLOSE);

    if let Err(e) = Registry::default().with(filter()).with(fmt_layer).try_init() {
        eprintln!("tracing already initialised: {e}");
    }
}

/// One JSON object per event on stderr, for log collectors.
pub fn init_json_tracing() {
    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_writer(std::io::stderr);

    if let Err(e) = Registry::default().with(filter()).with(json_layer).try_init() {
        eprintln!("tracing already initialised: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_does_not_panic() {
        init_default_tracing();
        init_default_tracing();
        init_json_tracing();
    }
}
