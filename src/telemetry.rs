use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Registry};

/// Build a subscriber that writes JSON lines to `sink`.
///
/// `RUST_LOG` overrides `default_filter`. The binary passes `std::io::stdout`;
/// tests pass `std::io::sink` unless they want to see the output.
pub fn get_subscriber<Sink>(default_filter: &str, sink: Sink) -> impl Subscriber + Send + Sync
where
    Sink: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let formatting_layer = tracing_subscriber::fmt::layer()
        .with_writer(sink)
        .json()
        .with_current_span(true);

    Registry::default().with(env_filter).with(formatting_layer)
}

/// Install `subscriber` globally and route `log` records (actix-web's access
/// log) through it. Fails if a global subscriber is already set.
pub fn init_subscriber(subscriber: impl Subscriber + Send + Sync + 'static) -> Result<(), TryInitError> {
    subscriber.try_init()
}

/// JSON logs to stdout, `info` unless `RUST_LOG` says otherwise.
pub fn init_telemetry() -> Result<(), TryInitError> {
    init_subscriber(get_subscriber("info", std::io::stdout))
}
