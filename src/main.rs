use actix_web::{App, HttpServer, middleware::Logger, web};
use clap::Parser;
use sqlx::{Pool, Postgres};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer, filter::LevelFilter};
mod api;
use crate::api::{
    auth::JwtKeys,
    health::health_config,
    job::{handlers::job_config, JobService, JobSettings},
    validation,
};
mod cli;
mod config;
mod db;
mod shutdown;
use crate::cli::{Cli, Command};
use crate::config::{AuthConfig, Config};
use crate::db::PgJobStore;
use crate::shutdown::ShutdownCoordinator;

/// Console output plus one daily-rotating file per level,
/// e.g. logs/info.log.2024-12-22, logs/error.log.2024-12-22
fn init_logging(log_dir: &str) -> std::io::Result<()> {
    std::fs::create_dir_all(log_dir)?;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());

    let info_file = tracing_appender::rolling::daily(log_dir, "info.log");
    let warn_file = tracing_appender::rolling::daily(log_dir, "warn.log");
    let error_file = tracing_appender::rolling::daily(log_dir, "error.log");
    let debug_file = tracing_appender::rolling::daily(log_dir, "debug.log");

    let info_layer = tracing_subscriber::fmt::layer()
        .with_writer(info_file)
        .with_ansi(false)
        .with_filter(LevelFilter::INFO);

    let warn_layer = tracing_subscriber::fmt::layer()
        .with_writer(warn_file)
        .with_ansi(false)
        .with_filter(LevelFilter::WARN);

    let error_layer = tracing_subscriber::fmt::layer()
        .with_writer(error_file)
        .with_ansi(false)
        .with_filter(LevelFilter::ERROR);

    let debug_layer = tracing_subscriber::fmt::layer()
        .with_writer(debug_file)
        .with_ansi(false)
        .with_filter(LevelFilter::DEBUG);

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(info_layer)
        .with(warn_layer)
        .with(error_layer)
        .with(debug_layer)
        .init();

    Ok(())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let command = Cli::parse().command();

    if let Command::Token { user, test_user } = &command {
        let auth = AuthConfig::from_env().map_err(std::io::Error::other)?;
        let token = JwtKeys::new(&auth.jwt_secret)
            .issue(user, *test_user, chrono::Duration::hours(auth.token_ttl_hours))
            .map_err(std::io::Error::other)?;
        println!("{}", token);
        return Ok(());
    }

    let config = Config::from_env().map_err(std::io::Error::other)?;

    init_logging(&config.log_dir)?;

    let pool = db::connection::get_connection(&config.database_url, config.max_db_connections)
        .await
        .map_err(std::io::Error::other)?;
    info!("Database connection pool established");

    db::migrations::run_migrations(&pool)
        .await
        .map_err(std::io::Error::other)?;

    if command == Command::Migrate {
        pool.close().await;
        return Ok(());
    }

    serve(config, pool).await
}

async fn serve(config: Config, pool: Pool<Postgres>) -> std::io::Result<()> {
    info!("Starting job-tracker application");
    info!("Configuration loaded successfully:");
    info!("  - Max payload size: {} bytes", config.max_payload_size);
    info!("  - Max database connections: {}", config.max_db_connections);
    info!("  - Default job location: {}", config.default_job_location);
    info!("  - Update validation: {:?}", config.update_validation);

    let job_service = web::Data::new(JobService::new(
        PgJobStore::new(pool.clone()),
        JobSettings {
            default_location: config.default_job_location.clone(),
            update_validation: config.update_validation,
        },
    ));
    let jwt_keys = web::Data::new(JwtKeys::new(&config.auth.jwt_secret));
    let max_payload_size = config.max_payload_size;

    let server = HttpServer::new(move || {
        let payload_config = web::PayloadConfig::default()
            .limit(max_payload_size);

        App::new()
            .wrap(Logger::default())
            .app_data(job_service.clone())
            .app_data(jwt_keys.clone())
            .app_data(payload_config) // Global payload size limit
            .app_data(validation::json_config()) // Global validation config
            .configure(health_config::<PgJobStore>)
            .configure(job_config::<PgJobStore>)
    })
    // Signals are handled by the shutdown coordinator
    .disable_signals();

    info!("Server starting on http://{}:{}", config.host, config.port);

    let server = server
        .bind((config.host.as_str(), config.port))?
        .run();

    let server_handle = server.handle();
    let server_task = tokio::spawn(server);

    ShutdownCoordinator::new(server_handle, server_task, pool)
        .wait_for_shutdown()
        .await
}
