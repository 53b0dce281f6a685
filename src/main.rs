//! Audit WebUI - web service for browsing and auditing admin activity logs
//!
//! Fronts the admin backend's activity endpoint with mapped domain models,
//! derived security events and statistics, CSV/JSON exports, and a live
//! auto-refreshing activity feed, and optionally serves the dashboard SPA.

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{info, warn, Level};

use audit_webui::{
    api,
    config::LogFormat,
    models::ActivityQuery,
    services::{ActivityFeed, AdminApiClient, AuditService, FeedRefreshJob},
    AppConfig, AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        print_help();
        return Ok(());
    }

    if args.iter().any(|arg| arg == "--version" || arg == "-V") {
        println!("Audit WebUI {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // Load configuration first (before logging, so we know the log format)
    let config = AppConfig::load().context("Failed to load configuration")?;

    init_logging(&config);

    info!("Audit WebUI starting up");

    info!("Initializing admin API client: {}", config.admin_api.url);
    let client = Arc::new(
        AdminApiClient::new(&config.admin_api).context("Failed to initialize admin API client")?,
    );

    let audit = Arc::new(AuditService::new(client.clone()));

    let feed_query = ActivityQuery::new().limit(config.dashboard.feed_limit);
    let feed = Arc::new(ActivityFeed::new(client, feed_query));

    // Start the background feed refresh job unless disabled
    let _feed_job = if config.dashboard.refresh_interval_secs > 0 {
        Some(
            FeedRefreshJob::new(feed.clone(), config.dashboard.refresh_interval_secs).start(),
        )
    } else {
        info!("Feed auto-refresh is disabled");
        None
    };

    let state = AppState {
        config: config.clone(),
        audit,
        feed,
    };

    let app = create_router(state, &config);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address configuration")?;

    info!("Starting HTTP server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .await
        .context("HTTP server error")?;

    Ok(())
}

/// Build the application router with middleware and optional SPA serving.
fn create_router(state: AppState, config: &AppConfig) -> Router {
    // CORS is only needed when the dashboard is served separately (development)
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let api_router = Router::new()
        .nest("/api/v1", api::routes())
        .with_state(state)
        .layer(cors)
        .layer(trace_layer)
        .layer(CompressionLayer::new());

    // Optionally serve the dashboard build with SPA fallback
    if config.server.serve_frontend {
        if let Some(ref static_dir) = config.server.static_dir {
            if static_dir.exists() {
                info!("Serving dashboard from {:?}", static_dir);
                let index_file = static_dir.join("index.html");
                if index_file.exists() {
                    let serve_dir =
                        ServeDir::new(static_dir).not_found_service(ServeFile::new(&index_file));
                    return api_router.fallback_service(serve_dir);
                }
                warn!(
                    "index.html not found in {:?}, SPA fallback disabled",
                    static_dir
                );
                return api_router.fallback_service(ServeDir::new(static_dir));
            }
            warn!("Static directory {:?} does not exist", static_dir);
        }
    }

    api_router
}

/// Initialize tracing from the logging configuration.
fn init_logging(config: &AppConfig) {
    use tracing_subscriber::{prelude::*, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format {
        LogFormat::Pretty => {
            registry.with(tracing_subscriber::fmt::layer().pretty()).init();
        }
        LogFormat::Json => {
            registry.with(tracing_subscriber::fmt::layer().json()).init();
        }
        LogFormat::Compact => {
            registry.with(tracing_subscriber::fmt::layer().compact()).init();
        }
    }
}

fn print_help() {
    println!("Audit WebUI {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("USAGE:");
    println!("    audit-webui [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Print this help message");
    println!("    -V, --version    Print version information");
    println!();
    println!("CONFIGURATION:");
    println!("    Config file locations (first found wins):");
    println!("        ./config.yaml");
    println!("        ./config/config.yaml");
    println!("        /etc/audit-webui/config.yaml");
    println!();
    println!("    Environment overrides: AUDIT_CONFIG, AUDIT_HOST, AUDIT_PORT,");
    println!("    ADMIN_API_URL, ADMIN_API_TOKEN, AUDIT_LOG_FORMAT, RUST_LOG,");
    println!("    AUDIT_REFRESH_INTERVAL, AUDIT_STATIC_DIR, AUDIT_SERVE_FRONTEND");
}
