//! Portfolio backend - content API and static file server.
//!
//! This binary starts the HTTP server and wires up all components.

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use portfolio_backend::{
    config::Config,
    db,
    server::{auth::hash_password, create_router, RouterConfig},
    upload::{CloudinaryCredentials, CloudinaryStore, UploadService},
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    // Initialize logging
    init_logging(config.verbose);

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    // Print startup banner and info
    print_banner();

    info!("Configuration:");
    info!("  Database: {}", config.database_url);
    info!("  Upload dir: {}", config.upload_dir.display());
    info!("  Image dir: {}", config.image_dir.display());
    info!("  Site root: {}", config.site_dir.display());
    info!("  Session TTL: {}s", config.session_ttl_secs);

    // Default credentials still work, but loudly
    if config.using_default_password() {
        warn!("  Admin password: still the built-in default");
        warn!("                  Set ADMIN_PASSWORD before exposing this server");
    } else {
        info!("  Admin user: {}", config.admin_username);
    }

    // Open the database and create missing tables
    info!("");
    info!("Opening database...");
    let pool = match db::connect(&config.database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("  Failed to open database: {}", e);
            error!("");
            error!("  Please check:");
            error!("    - DATABASE_URL '{}' is a valid sqlite URL", config.database_url);
            error!("    - The parent directory exists and is writable");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = db::init_schema(&pool).await {
        error!("  Failed to initialize schema: {}", e);
        return ExitCode::FAILURE;
    }
    info!("  Database ready");

    // Set up uploads: Cloudinary when configured, local disk otherwise
    let store = build_image_store(&config);
    if store.is_none() {
        info!("  Uploads: local disk only");
    }
    let uploads = UploadService::new(store, &config.upload_dir);

    if let Err(e) = tokio::fs::create_dir_all(&config.upload_dir).await {
        error!(
            "Failed to create upload directory {}: {}",
            config.upload_dir.display(),
            e
        );
        return ExitCode::FAILURE;
    }

    // Hash the admin password once at startup; login compares against the hash
    let password_hash = match hash_password(&config.admin_password) {
        Ok(hash) => hash,
        Err(e) => {
            error!("Failed to hash admin password: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Build router
    let router_config = build_router_config(&config, password_hash);
    let router = create_router(pool, uploads, router_config);

    // Bind and serve
    let addr = config.bind_address();

    info!("");
    info!("────────────────────────────────────────────────────────────────");
    info!("  Server listening on: http://{}", addr);
    info!("");
    info!("  Try these endpoints:");
    info!("    curl http://{}/health", addr);
    info!("    curl http://{}/get-all", addr);
    info!("");
    info!("  Log in as the admin:");
    info!(
        "    curl -X POST http://{}/admin/login -H 'Content-Type: application/json' \\",
        addr
    );
    info!(
        "         -d '{{\"username\":\"{}\",\"password\":\"...\"}}'",
        config.admin_username
    );
    info!("────────────────────────────────────────────────────────────────");
    info!("");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Print the startup banner.
fn print_banner() {
    let version = env!("CARGO_PKG_VERSION");
    info!("");
    info!("██████╗  ██████╗ ██████╗ ████████╗███████╗ ██████╗ ██╗     ██╗ ██████╗ ");
    info!("██╔══██╗██╔═══██╗██╔══██╗╚══██╔══╝██╔════╝██╔═══██╗██║     ██║██╔═══██╗");
    info!("██████╔╝██║   ██║██████╔╝   ██║   █████╗  ██║   ██║██║     ██║██║   ██║");
    info!("██╔═══╝ ██║   ██║██╔══██╗   ██║   ██╔══╝  ██║   ██║██║     ██║██║   ██║");
    info!("██║     ╚██████╔╝██║  ██║   ██║   ██║     ╚██████╔╝███████╗██║╚██████╔╝");
    info!("╚═╝      ╚═════╝ ╚═╝  ╚═╝   ╚═╝   ╚═╝      ╚═════╝ ╚══════╝╚═╝ ╚═════╝ ");
    info!("");
    info!("                        backend v{}", version);
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "portfolio_backend=debug,tower_http=debug"
    } else {
        "portfolio_backend=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build the Cloudinary store from CLOUDINARY_URL, if it is set and usable.
///
/// Any problem here leaves the store empty rather than failing startup; the
/// upload service writes to local disk in that case.
fn build_image_store(config: &Config) -> Option<CloudinaryStore> {
    let url = config.cloudinary_url.as_deref()?;

    let credentials = match CloudinaryCredentials::parse(url) {
        Ok(credentials) => credentials,
        Err(e) => {
            warn!("  CLOUDINARY_URL is invalid ({}); uploads stay on local disk", e);
            return None;
        }
    };

    match CloudinaryStore::new(credentials, config.upload_timeout()) {
        Ok(store) => {
            info!("  Uploads: cloudinary ({})", store.cloud_name());
            Some(store)
        }
        Err(e) => {
            warn!("  Cloudinary client failed to build ({}); uploads stay on local disk", e);
            None
        }
    }
}

/// Build RouterConfig from the application Config.
fn build_router_config(config: &Config, password_hash: String) -> RouterConfig {
    let mut router_config = RouterConfig::new(
        config.session_secret_or_empty(),
        &config.admin_username,
        password_hash,
    )
    .with_session_ttl_secs(config.session_ttl_secs)
    .with_image_dir(&config.image_dir)
    .with_site_dir(&config.site_dir);

    // Apply CORS origins
    if let Some(ref origins) = config.cors_origins {
        router_config = router_config.with_cors_origins(origins.clone());
    }

    // Apply tracing setting
    router_config = router_config.with_tracing(!config.no_tracing);

    router_config
}
