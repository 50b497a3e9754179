use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber. Env-driven filter, `info` baseline;
/// `TELLER_LOG_JSON=1` switches to JSON lines on stderr. Safe to call
/// more than once - later calls lose the `try_init` race and no-op.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let json = matches!(std::env::var("TELLER_LOG_JSON").as_deref(), Ok("1"));
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.pretty().try_init()
    };
}
