// Arena Server - wallet-authenticated social backend

use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use arena_server::{app_state::AppState, config::Config, routes::create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration; a missing DATABASE_URL aborts here
    let config = Config::from_env()?;

    // Initialize application state (pool + schema + services)
    let app_state = AppState::new(config.clone()).await?;

    // Permissive CORS: the browser frontend is served from another origin
    let app = create_router(app_state).layer(CorsLayer::permissive());

    let addr = config.server_address();
    tracing::info!("Arena server listening on http://{}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
