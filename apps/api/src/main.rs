//! Contacts API - REST server

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use axum_helpers::health::{HealthCheckFuture, run_health_checks};
use axum_helpers::{create_app, create_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use database::postgres::DatabaseConnection;
use database::redis::ConnectionManager;
use domain_contacts::{ContactsState, PgContactRepository, contacts_router, per_ip_rate_limiter};
use domain_users::handlers::UsersState;
use domain_users::{
    AuthState, LocalAvatarStorage, PgUserRepository, RedisSessionCache, TokenService, UserService,
    auth_router, require_auth, users_router,
};
use email::{EmailProvider, EmailQueue, MockSmtpProvider, SmtpProvider};
use std::sync::Arc;
use tracing::{info, warn};

mod config;
mod openapi;

use config::Config;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    // Postgres and Redis come up concurrently
    let (db, redis) = tokio::try_join!(
        async {
            database::postgres::connect_with_retry(&config.database.url, None)
                .await
                .map_err(eyre::Report::new)
        },
        async {
            database::redis::connect_with_retry(&config.redis.uri, None)
                .await
                .map_err(eyre::Report::new)
        },
    )?;

    database::postgres::run_migrations::<migration::Migrator>(&db, "contacts-api").await?;

    let provider: Arc<dyn EmailProvider> = match SmtpProvider::from_env() {
        Ok(smtp) => Arc::new(smtp),
        Err(e) => {
            warn!("SMTP not configured ({}), outgoing email will be dropped", e);
            Arc::new(MockSmtpProvider::new())
        }
    };
    let (mailer, _email_worker) = EmailQueue::start(provider, 256);

    let user_repository = Arc::new(PgUserRepository::new(db.clone()));
    let auth_state = AuthState {
        service: UserService::new(user_repository.clone()),
        tokens: TokenService::new(&config.jwt.secret),
        cache: Arc::new(RedisSessionCache::new(redis.clone())),
        mailer,
        frontend_url: config.frontend_url.clone(),
    };
    let users_state = UsersState {
        service: UserService::new(user_repository),
        storage: Arc::new(LocalAvatarStorage::new(
            config.avatar_dir.clone(),
            config.avatar_base_url.clone(),
        )),
    };
    let contacts_state = ContactsState::new(Arc::new(PgContactRepository::new(db.clone())));

    let rate_limit = per_ip_rate_limiter(config.rate_limit_per_second, config.rate_limit_burst);
    if rate_limit.is_none() {
        warn!("Rate limiting disabled for contact creation");
    }

    let protected = users_router(users_state)
        .merge(contacts_router(contacts_state, rate_limit))
        .layer(axum::middleware::from_fn_with_state(
            auth_state.clone(),
            require_auth::<PgUserRepository, RedisSessionCache>,
        ));
    let api_routes = auth_router(auth_state).merge(protected);

    let readiness = Router::new()
        .route("/ready", get(ready))
        .with_state(ReadyState {
            db,
            redis,
        });

    let router = create_router::<openapi::ApiDoc>(api_routes).merge(readiness);

    info!("Starting Contacts API on port {}", config.server.port);
    create_app(router, &config.server).await?;

    info!("Contacts API shutdown complete");
    Ok(())
}

#[derive(Clone)]
struct ReadyState {
    db: DatabaseConnection,
    redis: ConnectionManager,
}

/// Readiness: Postgres and Redis are checked concurrently
async fn ready(State(state): State<ReadyState>) -> impl IntoResponse {
    let mut redis = state.redis.clone();
    let checks = vec![
        (
            "database",
            Box::pin(async {
                database::postgres::check_health(&state.db)
                    .await
                    .map_err(|e| e.to_string())
            }) as HealthCheckFuture,
        ),
        (
            "redis",
            Box::pin(async move {
                database::redis::check_health(&mut redis)
                    .await
                    .map_err(|e| e.to_string())
            }) as HealthCheckFuture,
        ),
    ];

    match run_health_checks(checks).await {
        Ok(response) => response.into_response(),
        Err(response) => response.into_response(),
    }
}
