//! Tracing setup: env-filtered console output, JSON lines in production.

use tracing_subscriber::{
    fmt::format::Format, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

pub fn init_telemetry(is_production: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "pixlift_api=debug,pixlift_db=debug,pixlift_storage=debug,pixlift_genai=debug,tower_http=debug"
            .into()
    });

    if is_production {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        // Console: compact format (message string for convenience)
        let console_fmt = tracing_subscriber::fmt::layer().event_format(
            Format::default()
                .compact()
                .with_target(false)
                .without_time(),
        );
        tracing_subscriber::registry()
            .with(filter)
            .with(console_fmt)
            .init();
    }
}
