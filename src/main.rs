use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ripple::routes::configure_routes;
use ripple::security::{jwt, password};
use ripple::services::MediaStorage;
use ripple::{db, validators, Config};

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = jwt::initialize_keys(&config.auth.private_key_pem, &config.auth.public_key_pem)
    {
        return Err(io::Error::new(
            io::ErrorKind::Other,
            format!("Failed to initialize JWT keys: {e}"),
        ));
    }

    let pool = match PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await
    {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Database pool creation failed: {}", e);
            eprintln!("ERROR: Failed to create database pool: {}", e);
            std::process::exit(1);
        }
    };

    sqlx::migrate!()
        .run(&pool)
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("Migrations failed: {e}")))?;

    // CLI subcommand: `ripple create-admin <email> <password>`
    {
        let args: Vec<String> = std::env::args().collect();
        if args.get(1).map(String::as_str) == Some("create-admin") {
            return create_admin(&pool, args.get(2), args.get(3)).await;
        }
    }

    let storage = MediaStorage::new(&config.media.root);
    storage.ensure_dirs()?;

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting ripple v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);
    tracing::info!("Starting HTTP server at {}", bind_address);

    let public_read = config.auth.public_read;
    let cors_config = config.cors.clone();

    HttpServer::new(move || {
        let mut cors = Cors::default();
        for origin in cors_config.allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else if !origin.is_empty() {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors
            .allow_any_method()
            .allow_any_header()
            .max_age(cors_config.max_age as usize);

        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(storage.clone()))
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(|cfg| configure_routes(cfg, public_read))
    })
    .bind(&bind_address)?
    .workers(4)
    .run()
    .await
}

/// Bootstrap a staff + superuser account from the command line.
async fn create_admin(
    pool: &PgPool,
    email: Option<&String>,
    raw_password: Option<&String>,
) -> io::Result<()> {
    let (email, raw_password) = match (email, raw_password) {
        (Some(e), Some(p)) => (e, p),
        _ => {
            eprintln!("Usage: ripple create-admin <email> <password>");
            std::process::exit(2);
        }
    };

    if !validators::validate_email(email) {
        eprintln!("ERROR: invalid email address");
        std::process::exit(2);
    }
    if !validators::validate_password(raw_password) {
        eprintln!(
            "ERROR: password must be at least 8 characters with upper and lower case letters, \
             a digit, and a special character"
        );
        std::process::exit(2);
    }

    let exists = db::user_repo::email_exists(pool, email)
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
    if exists {
        eprintln!("ERROR: email already registered");
        std::process::exit(2);
    }

    let hash = password::hash_password(raw_password)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
    let admin = db::user_repo::create_admin(pool, email, &hash)
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;

    println!("Created admin account {} ({})", admin.email, admin.id);
    Ok(())
}
