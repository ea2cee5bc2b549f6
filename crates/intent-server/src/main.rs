//! Payment Intent GraphQL Server
//!
//! Axum server exposing the `createPaymentIntent` mutation, which turns an
//! order into a Stripe Payment Intent for headless checkouts.

mod config;
mod graphql;
mod handlers;
mod state;

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use payment_intents::{
    ConfigProvider, EnvConfigProvider, MemoryOrderRepository, PaymentIntentResolver,
    StaticConfigProvider, StripeClient, StripeSettings,
};

use crate::config::ServerConfig;
use crate::handlers::health_check;
use crate::state::AppState;

/// Build the application router
fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = Router::new().route("/health", get(health_check));

    graphql::register(router)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;

    // Orders
    let orders = match &config.orders_file {
        Some(path) => MemoryOrderRepository::from_json_file(path)?,
        None => {
            tracing::warn!("ORDERS_FILE not set - order store starts empty");
            MemoryOrderRepository::new()
        }
    };

    // Stripe settings
    let settings: Arc<dyn ConfigProvider> = match &config.settings_file {
        Some(path) => Arc::new(StaticConfigProvider::new(StripeSettings::from_json_file(path)?)),
        None => Arc::new(EnvConfigProvider),
    };

    let current = settings.stripe_settings()?;
    if current.active_secret_key().is_some() {
        tracing::info!(mode = %current.mode(), "Stripe configured");
    } else {
        tracing::warn!(mode = %current.mode(), "Stripe secret key missing - mutations will fail");
    }

    let gateway = StripeClient::from_config(config.stripe.clone())?;
    let resolver = PaymentIntentResolver::new(Arc::new(orders), settings.clone(), Arc::new(gateway));

    let state = AppState {
        schema: graphql::build_schema(resolver),
        settings,
    };

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    tracing::info!("Payment intent server running on http://{}", config.bind_addr);
    tracing::info!("  GET  /health   - Health check");
    tracing::info!("  POST /graphql  - GraphQL endpoint");
    tracing::info!("  GET  /graphql  - GraphiQL playground");

    axum::serve(listener, app(state)).await?;

    Ok(())
}
