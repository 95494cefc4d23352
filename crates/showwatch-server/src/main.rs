mod api;
mod middleware;
mod scheduler;
mod shutdown;
mod state;
#[cfg(test)]
mod test_support;

use tracing_subscriber::EnvFilter;

use crate::{api::build_app, shutdown::ShutdownSignal, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = showwatch_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(
        env = %config.env,
        channel = %config.channel.kind,
        schedule = %config.schedule,
        "starting showwatch server"
    );

    let state = AppState::new(showwatch_pipeline::from_app_config(&config)?);
    let _scheduler = scheduler::build_scheduler(&config.schedule, state.clone()).await?;

    // First check on startup rather than waiting for the first tick.
    let startup = state.clone();
    tokio::spawn(async move {
        startup.run_once("startup").await;
    });

    let app = build_app(state);
    let shutdown = ShutdownSignal::install()?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.recv().await;
        })
        .await?;
    Ok(())
}
