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

pub const RENDER_REQUESTS_TOTAL: &str = "jamdesk_render_requests_total";
pub const RENDER_STALE_TOTAL: &str = "jamdesk_render_stale_total";
pub const ACTION_REQUESTS_TOTAL: &str = "jamdesk_action_requests_total";

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Install a global tracing subscriber using the provided logging settings.
///
/// Logs go to stderr so command output on stdout stays machine-readable.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| {
            InfraError::telemetry(format!("failed to install tracing subscriber: {err}"))
        })
}

fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            RENDER_REQUESTS_TOTAL,
            Unit::Count,
            "Total number of render requests issued by the preview refresher."
        );
        describe_counter!(
            RENDER_STALE_TOTAL,
            Unit::Count,
            "Render responses discarded because a newer request was issued."
        );
        describe_counter!(
            ACTION_REQUESTS_TOTAL,
            Unit::Count,
            "Total number of action requests, labelled by outcome."
        );
    });
}
