mod api_client;
mod chart;
mod config;
mod error;
mod i18n;
mod indicators;
mod lookup;
mod models;
mod routes;
mod services;
mod signals;
mod state;

use axum::Router;
use config::AppConfig;
use lookup::SymbolLookup;
use state::AppState;
use tower_http::{cors::CorsLayer, services::ServeDir};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env()?;

    // A missing lookup file only disables name search, tickers still work
    let lookup = if config.stocks_file.exists() {
        SymbolLookup::load(&config.stocks_file)?
    } else {
        warn!("{} not found, starting with an empty symbol table", config.stocks_file.display());
        SymbolLookup::default()
    };
    info!("Loaded {} symbol names", lookup.len());

    let state = AppState::from_config(&config, lookup);

    let app = Router::new()
        .nest("/api", routes::api_router())
        .nest_service("/", ServeDir::new(&config.static_dir))
        .layer(CorsLayer::permissive())
        .with_state(state);

    info!("Server listening on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
