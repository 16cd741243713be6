use axum::{
    Router,
    routing::{get, post},
};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

mod middleware;
mod models;
mod routes;
mod views;


use models::VisitorRegistry;
use routes::{api, games, pages, preferences, users};

#[derive(Parser, Debug)]
#[command(version, about = "Casino Vitrine demo site", long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(long, env = "VITRINE_BIND", default_value = "0.0.0.0:6957")]
    bind: SocketAddr,

    /// Directory holding one storage file per visitor. Storage stays in
    /// memory when unset.
    #[arg(long, env = "VITRINE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Visitors held in memory at once; the least used are dropped first
    #[arg(long, env = "VITRINE_MAX_VISITORS", default_value_t = models::DEFAULT_MAX_VISITORS)]
    max_visitors: u64,

    /// Seconds before an idle visitor is dropped
    #[arg(long, env = "VITRINE_VISITOR_IDLE_SECS", default_value_t = models::DEFAULT_VISITOR_IDLE.as_secs())]
    visitor_idle_secs: u64,

    /// Log filter, e.g. `info` or `vitrine=debug`
    #[arg(long, env = "VITRINE_LOG", default_value = "info")]
    log: String,
}

// Application state: one controller per visitor
#[derive(Clone)]
pub struct AppState {
    pub visitors: VisitorRegistry,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::home))
        .route("/casino", get(pages::casino))
        .route("/promos", get(pages::promos))
        .route("/dashboard", get(pages::dashboard))
        .route("/dashboard/claim", post(games::claim_bonus))
        .route("/login", get(pages::login).post(users::login))
        .route("/register", get(pages::register).post(users::register))
        .route("/logout", post(users::logout))
        .route("/deposit", get(pages::deposit).post(games::deposit))
        .route("/play/{game_id}", post(games::play))
        .route("/game/close", post(games::close_game))
        .route("/cta", post(games::hero_cta))
        .route("/cookies/accept", post(preferences::accept_cookies))
        .route("/cookies/decline", post(preferences::decline_cookies))
        .route("/theme", post(preferences::toggle_theme))
        .route("/api/categories", get(api::get_categories))
        .route("/api/games", get(api::get_games))
        .route("/api/session", get(api::get_session))
        .route("/health", get(health_check))
        .layer(
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .layer(axum::middleware::from_fn(middleware::assign_visitor)),
        )
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&args.log)?)
        .init();

    let visitors = match &args.data_dir {
        Some(dir) => {
            tracing::info!("Visitor storage in {}", dir.display());
            VisitorRegistry::with_data_dir(dir.clone())
        }
        None => {
            tracing::info!("Visitor storage in memory");
            VisitorRegistry::in_memory()
        }
    }
    .with_limits(args.max_visitors, Duration::from_secs(args.visitor_idle_secs));

    let app = app(AppState { visitors });

    let listener = tokio::net::TcpListener::bind(args.bind).await?;
    tracing::info!("Casino Vitrine running on http://{}", args.bind);
    axum::serve(listener, app).await?;

    Ok(())
}

// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
