use std::sync::Once;

use metrics::{Unit, describe_counter};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

static METRIC_DESCRIPTIONS: Once = Once::new();

pub const HTTP_RESPONSES_TOTAL: &str = "giftlink_http_responses_total";
pub const DB_CONNECT_FAILURES_TOTAL: &str = "giftlink_db_connect_failures_total";

/// Install a global tracing subscriber using the provided logging settings.
///
/// `RUST_LOG` directives refine the configured base level.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| InfraError::Telemetry(err.to_string()))
}

fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            HTTP_RESPONSES_TOTAL,
            Unit::Count,
            "Total number of HTTP responses, labelled by status class."
        );
        describe_counter!(
            DB_CONNECT_FAILURES_TOTAL,
            Unit::Count,
            "Total number of failed database bootstrap attempts."
        );
    });
}
