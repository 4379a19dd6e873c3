mod analysis;
mod app;
mod config;
mod db;
mod error;
mod images;
mod inference;
mod lenient;
mod profiles;
mod results;
mod routes;
mod state;
mod storage;

#[cfg(test)]
mod testing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "cheek_analysis=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let app_state = state::AppState::init().await?;

    if app_state.config.cleanup_on_startup {
        let images = app_state.images.clone();
        tokio::spawn(async move {
            let deleted = images.sweep_expired().await;
            tracing::info!(deleted, "startup image sweep finished");
        });
    }

    app::serve(app::build_app(app_state)).await
}
