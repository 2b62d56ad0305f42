use pathmatch_api::{
    AppState,
    config::{AppConfig, Env},
    create_router,
    identity::{AuthProviderState, SupabaseAuthClient},
    mailer::{HttpMailer, MailerState},
    repository::{PostgresRepository, RepositoryState},
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// The asynchronous entry point, responsible for initializing all core
/// components: Configuration, Logging, Database, Identity, Mail, and the
/// HTTP server.
#[tokio::main]
async fn main() {
    // Configuration & Environment Loading (fail-fast on missing Production secrets).
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // Log level: prioritize RUST_LOG, with sensible local defaults.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "pathmatch_api=debug,tower_http=info,axum=trace".into());

    // Structured logging format is selected per environment: pretty print for
    // humans locally, JSON for log aggregators in production.
    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);

    // Database Initialization (Postgres).
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.db_url)
        .await
        .expect("FATAL: Failed to connect to Postgres. Check DATABASE_URL.");

    let repo = Arc::new(PostgresRepository::new(pool)) as RepositoryState;

    // Identity provider client (Supabase GoTrue REST surface).
    let auth = Arc::new(SupabaseAuthClient::new(
        &config.supabase_url,
        &config.supabase_anon_key,
    )) as AuthProviderState;

    // Outbound mail gateway for application notifications.
    let mailer = Arc::new(HttpMailer::new(
        &config.mail_api_url,
        &config.mail_api_key,
        &config.mail_from,
        &config.team_inbox,
    )) as MailerState;

    let app_state = AppState {
        repo,
        auth,
        mailer,
        config: config.clone(),
    };

    let app = create_router(app_state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .expect("FATAL: Failed to bind HTTP listener.");

    tracing::info!("HTTP server bound successfully.");
    tracing::info!("Listening on {addr}");
    tracing::info!(
        "API Documentation (Swagger UI) available at: http://localhost:{}/swagger-ui",
        config.port
    );

    axum::serve(listener, app)
        .await
        .expect("FATAL: HTTP server terminated unexpectedly.");
}
