//! HealthyWell backend entrypoint.
//!
//! Loads configuration, connects PostgreSQL and runs migrations, wires the
//! adapters into the application services, and serves the HTTP router.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use healthywell::adapters::ai::{GroqClient, GroqConfig, ResilientCompletionClient};
use healthywell::adapters::auth::{ArgonPasswordHasher, JwtTokenService};
use healthywell::adapters::http::{build_router, AppServices};
use healthywell::adapters::postgres::{
    PostgresConsultationRepository, PostgresDoctorRepository, PostgresUserRepository,
};
use healthywell::application::{
    ConsultationService, DirectoryService, IdentityService, SupportService,
};
use healthywell::config::AppConfig;
use healthywell::ports::{
    ConsultationRepository, DoctorRepository, PasswordHasher, TokenService, UserRepository,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level)),
        )
        .init();

    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await?;

    sqlx::migrate!().run(&pool).await?;
    tracing::info!("Database migrations applied");

    // Repositories
    let users: Arc<dyn UserRepository> = Arc::new(PostgresUserRepository::new(pool.clone()));
    let doctors: Arc<dyn DoctorRepository> = Arc::new(PostgresDoctorRepository::new(pool.clone()));
    let consultations: Arc<dyn ConsultationRepository> =
        Arc::new(PostgresConsultationRepository::new(pool));

    // Completion provider, explicitly constructed and injected
    let groq = Arc::new(GroqClient::new(
        GroqConfig::new(config.ai.api_key())
            .with_model(config.ai.model.clone())
            .with_base_url(config.ai.base_url.clone())
            .with_timeout(config.ai.timeout()),
    ));
    let completion = Arc::new(ResilientCompletionClient::new(groq, config.ai.max_retries));

    // Identity primitives
    let hasher: Arc<dyn PasswordHasher> = Arc::new(ArgonPasswordHasher::new());
    let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(
        config.auth.jwt_secret(),
        config.auth.token_ttl(),
    ));

    // Services
    let identity = Arc::new(IdentityService::new(users.clone(), hasher, tokens.clone()));
    let directory = Arc::new(DirectoryService::new(doctors.clone()));
    let consultation_service = Arc::new(ConsultationService::new(
        consultations,
        doctors,
        users,
        completion.clone(),
    ));
    let support = Arc::new(SupportService::new(completion));

    let app = build_router(
        AppServices {
            identity,
            directory,
            consultations: consultation_service,
            support,
            tokens,
        },
        &config.server,
    );

    let addr = config.server.socket_addr();
    tracing::info!(%addr, "HealthyWell backend listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
