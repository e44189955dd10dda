use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use waypoint_api::api::{create_router, AppState};
use waypoint_api::auth::{HttpTokenVerifier, TokenVerifier};
use waypoint_api::config::Config;
use waypoint_api::crypto::{BodyCipher, RsaBodyCipher};
use waypoint_api::db::{create_redis_client, PersistenceGateway, RedisGateway};
use waypoint_api::services::{
    sweeper, ContextAwareApi, FriendshipService, HttpContextApi, LiveEventService,
    RecommendationService,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let pem = tokio::fs::read_to_string(&config.private_key_path).await?;
    let cipher: Arc<dyn BodyCipher> = Arc::new(RsaBodyCipher::from_pem(&pem)?);

    let redis_client = create_redis_client(&config.redis_url)?;
    let gateway: Arc<dyn PersistenceGateway> = Arc::new(RedisGateway::new(redis_client));

    let context_api: Arc<dyn ContextAwareApi> =
        Arc::new(HttpContextApi::new(config.context_api_url.clone()));
    let verifier: Arc<dyn TokenVerifier> =
        Arc::new(HttpTokenVerifier::new(config.auth_api_url.clone()));

    let recommendations = Arc::new(RecommendationService::new(
        gateway.clone(),
        context_api.clone(),
    ));
    let live_events = Arc::new(LiveEventService::new(gateway.clone()));
    let friendships = Arc::new(FriendshipService::new(gateway));

    // Expiry sweepers run on their own schedule for the life of the process
    tokio::spawn(sweeper::run(
        recommendations.clone(),
        live_events.clone(),
        Duration::from_secs(config.sweep_interval_secs),
    ));

    let state = AppState::new(recommendations, live_events, friendships, verifier, cipher);
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
