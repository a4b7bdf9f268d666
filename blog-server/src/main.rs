use blog_server::infrastructure::{
    config::{AppConfig, Environment},
    database::{create_pool, run_migrations},
    logging::init_logging,
    storage::{build_storage, AssetClass},
};
use blog_server::presentation::routes::{configure, configure_cors};
use blog_server::state::AppState;
use dotenvy::dotenv;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Config parsing may warn, so logging comes first.
    let environment = std::env::var("APP_ENV")
        .ok()
        .and_then(|raw| raw.parse::<Environment>().ok())
        .unwrap_or(Environment::Local);
    init_logging(environment);

    let config = AppConfig::from_env()?;

    tracing::info!("Starting blog server ({:?})...", config.environment);
    tracing::debug!("Configuration: {:?}", config);

    tracing::info!("Connecting to database...");
    let pool = create_pool(&config.database_url, config.database_max_connections).await?;

    tracing::info!("Running database migrations...");
    run_migrations(&pool).await?;

    let media_storage = build_storage(&config.storage, AssetClass::Media).await;
    let static_storage = build_storage(&config.storage, AssetClass::Static).await;

    tracing::info!("Initializing services...");
    let state = AppState::build(pool, &config, media_storage, static_storage)?;
    tracing::info!("Services initialized successfully");

    run_http_server(config, state).await?;

    tracing::info!("Shutting down...");
    Ok(())
}

async fn run_http_server(config: AppConfig, state: AppState) -> anyhow::Result<()> {
    use actix_web::{middleware::Logger, App, HttpServer};

    let addr = config.http_addr.clone();
    let cors = config.cors.clone();

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(configure_cors(&cors))
            .configure(|cfg| configure(cfg, &state))
    })
    .bind(&addr)?
    .run();

    tracing::info!("HTTP server running on {}", addr);

    server.await?;

    Ok(())
}
