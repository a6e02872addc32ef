//! PDF Pages Web - Web server for converting PDF pages to PNG images.

mod helpers;
mod routes;
mod state;
mod templates;

use anyhow::{Context, Result};
use axum::http::{HeaderValue, header};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use clap::Parser;
use pdf_pages_core::AppConfig;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, services::ServeDir,
    set_header::SetResponseHeaderLayer, trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use state::AppState;

/// How often expired runs are dropped
const CLEANUP_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Resolve the static files directory.
///
/// Priority:
/// 1. Explicit path if provided
/// 2. ./static if it exists
/// 3. Crate's built-in static directory
fn resolve_static_dir(explicit_path: Option<&str>) -> PathBuf {
    if let Some(path) = explicit_path {
        return PathBuf::from(path);
    }

    let local_static = PathBuf::from("static");
    if local_static.is_dir() {
        return local_static;
    }

    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/static"))
}

#[derive(Parser, Debug)]
#[command(name = "pdf-pages-web")]
#[command(author, version, about = "PDF to PNG converter web server", long_about = None)]
struct Args {
    /// Host to bind to
    #[arg(long, env = "PDF_PAGES_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to bind to
    #[arg(short, long, env = "PDF_PAGES_PORT", default_value = "3000")]
    port: u16,

    /// Config file path (defaults to ~/.config/pdf-pages/config.toml or ./config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Rendering scale relative to the page's native size (overrides config)
    #[arg(long)]
    scale: Option<f32>,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Static files directory (defaults to ./static or crate's static dir)
    #[arg(long, env = "STATIC_DIR")]
    static_dir: Option<String>,
}

fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => AppConfig::from_file(path).context("Failed to load config file")?,
        None => AppConfig::load(),
    };

    if let Some(scale) = args.scale {
        config.render_scale = scale;
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (before parsing args so env vars are available)
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let default_level = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();

    let config = load_config(&args)?;
    let body_limit = config.max_upload_bytes();
    info!(
        "Render scale {}, upload limit {} MB, runs kept {}s",
        config.render_scale, config.max_upload_mb, config.run_ttl_secs
    );

    let state = Arc::new(AppState::new(config).context("Failed to initialize application state")?);

    // Background task for dropping expired runs
    let cleanup_state = Arc::clone(&state);
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(CLEANUP_INTERVAL).await;
            let removed = cleanup_state.cleanup_old_runs().await;
            if removed > 0 {
                info!("Dropped {} expired runs", removed);
            }
        }
    });

    let app = Router::new()
        // Pages
        .route("/", get(routes::index))
        .route("/run/{run_id}", get(routes::view_run))
        // API endpoints - HTML fragments (HTMX)
        .route("/api/upload", post(routes::upload_pdfs))
        .route("/api/run/{run_id}/select-all", post(routes::select_all))
        .route("/api/run/{run_id}/select", post(routes::select_page))
        // API endpoints - binary responses
        .route("/api/run/{run_id}/page/{output_name}", get(routes::get_page_image))
        .route("/api/run/{run_id}/download", get(routes::download_archive))
        // Static files with Cache-Control: no-cache (cache but always revalidate via ETag)
        .nest_service(
            "/static",
            ServiceBuilder::new()
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::CACHE_CONTROL,
                    HeaderValue::from_static("no-cache"),
                ))
                .service(ServeDir::new(resolve_static_dir(args.static_dir.as_deref()))),
        )
        // Middleware
        // HTML fragments must not be restored from bfcache with stale checkboxes
        // (images/downloads set their own headers, so this only affects HTML)
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store, max-age=0"),
        ))
        .layer(CompressionLayer::new())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
