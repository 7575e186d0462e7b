use std::sync::Arc;

use anyhow::Context;
use posts_api::{
    config::Config,
    logging::init_tracing,
    repositories::PostgresRepo,
    routes::{configure_cors, create_routes},
    services::{posts::PostsService, user::UserService},
    AppState,
};
use sqlx::postgres::PgPoolOptions;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = Config::init()?;

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to the database")?;
    tracing::info!("✅ Connection to the database is successful!");

    let repo = Arc::new(PostgresRepo::new(pool));

    let app_state = AppState {
        posts_service: PostsService::new(repo.clone()),
        users_service: UserService::new(repo, config.jwt_secret.clone(), config.jwt_maxage),
    };

    let app = create_routes(Arc::new(app_state)).layer(configure_cors());

    let listener = tokio::net::TcpListener::bind(format!("[::]:{}", config.port)).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
