//! HTTP Handlers

use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    Json,
    extract::State,
    response::{Html, IntoResponse},
};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub stripe_configured: bool,
    pub stripe_mode: Option<String>,
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let settings = match state.settings.stripe_settings() {
        Ok(settings) => Some(settings),
        Err(e) => {
            tracing::warn!("Could not read Stripe settings: {}", e);
            None
        }
    };

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        stripe_configured: settings
            .as_ref()
            .is_some_and(|s| s.active_secret_key().is_some()),
        stripe_mode: settings.map(|s| s.mode().to_string()),
    })
}

/// GraphQL request handler
pub async fn graphql_handler(State(state): State<AppState>, req: GraphQLRequest) -> GraphQLResponse {
    state.schema.execute(req.into_inner()).await.into()
}

/// GraphiQL playground
pub async fn graphql_playground() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}
