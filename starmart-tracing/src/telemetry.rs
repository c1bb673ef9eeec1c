use starmart_types::models::telemetry::{LogFormat, TelemetryConfig};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

const DEFAULT_FILTER: &str = "info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn log_format(telemetry_config: Option<&TelemetryConfig>) -> LogFormat {
    telemetry_config.map(|c| c.format).unwrap_or_default()
}

// Init telemetry by setting a global handler
pub fn init_telemetry(app_name: Option<&str>, telemetry_config: Option<TelemetryConfig>) {
    let app_name = app_name.unwrap_or("starmart");
    let format = log_format(telemetry_config.as_ref());

    let (plain, json) = match format {
        LogFormat::Plain => (
            Some(fmt::layer().with_target(false).with_filter(env_filter())),
            None,
        ),
        LogFormat::Json => (
            None,
            Some(fmt::layer().json().with_filter(env_filter())),
        ),
    };

    // A subscriber may already be installed when running inside tests.
    if tracing_subscriber::registry()
        .with(plain)
        .with(json)
        .try_init()
        .is_ok()
    {
        starmart_types::tracing::debug!("Initialized {format:?} logging for {app_name}");
    }
}

// Init telemetry with a closure without setting a global subscriber
pub fn init_telemetry_closure<T>(
    app_name: Option<&str>,
    telemetry_config: Option<TelemetryConfig>,
    closure: impl FnOnce() -> T,
) -> T {
    let app_name = app_name.unwrap_or("starmart");
    let format = log_format(telemetry_config.as_ref());

    let (plain, json) = match format {
        LogFormat::Plain => (
            Some(fmt::layer().with_target(false).with_filter(env_filter())),
            None,
        ),
        LogFormat::Json => (
            None,
            Some(fmt::layer().json().with_filter(env_filter())),
        ),
    };

    let subscriber = tracing_subscriber::registry().with(plain).with(json);

    starmart_types::tracing::subscriber::with_default(subscriber, || {
        starmart_types::tracing::debug!("Scoped {format:?} logging for {app_name}");
        closure()
    })
}
