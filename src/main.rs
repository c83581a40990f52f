use std::net::SocketAddr;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use parking_reservation_api::{
    app::build_app,
    config::AppConfig,
    db::{create_pool, run_migrations},
    services::auth_service::ensure_default_admin,
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,parking_reservation_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    let addr = SocketAddr::from((config.host.parse::<std::net::IpAddr>()?, config.port));

    let pool = create_pool(&config.database_url).await?;
    let state = AppState::new(pool, config);

    run_migrations(&state.orm).await?;
    if let Some(admin_id) = ensure_default_admin(&state).await? {
        tracing::info!(%admin_id, "bootstrap admin created");
    }

    let app = build_app(state);
    tracing::info!("listening on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;

    Ok(())
}
