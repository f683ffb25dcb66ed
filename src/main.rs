use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, router};
use prontuario_core::constants::{
    DEFAULT_REST_ADDR, ENV_EXCLUDE_PAST, ENV_REST_ADDR, ENV_UPCOMING_LIMIT, ENV_UTC_OFFSET,
};
use prontuario_core::{CoreConfig, SystemClock};

/// Main entry point for the prontuário server
///
/// Resolves configuration once from the environment (and `.env`, if present), then serves the
/// REST API until the process is stopped.
///
/// # Environment Variables
/// - `PRONTUARIO_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `PRONTUARIO_UTC_OFFSET`: local offset used for calendar days (default: "-03:00")
/// - `PRONTUARIO_UPCOMING_LIMIT`: default size of the upcoming-events list (default: 5)
/// - `PRONTUARIO_EXCLUDE_PAST`: whether the upcoming list drops past events (default: true)
/// - `RUST_LOG`: tracing filter, on top of `prontuario=info,api_rest=info`
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("prontuario=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = Arc::new(CoreConfig::from_env_values(
        std::env::var(ENV_UTC_OFFSET).ok(),
        std::env::var(ENV_UPCOMING_LIMIT).ok(),
        std::env::var(ENV_EXCLUDE_PAST).ok(),
    )?);
    let rest_addr = std::env::var(ENV_REST_ADDR).unwrap_or_else(|_| DEFAULT_REST_ADDR.into());

    tracing::info!(
        utc_offset = %cfg.utc_offset(),
        upcoming_limit = cfg.upcoming_limit(),
        exclude_past = cfg.exclude_past(),
        "++ Starting prontuário REST on {}",
        rest_addr
    );

    let app = router(AppState::new(cfg, Arc::new(SystemClock)));
    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
