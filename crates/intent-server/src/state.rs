//! Application State

use std::sync::Arc;

use payment_intents::ConfigProvider;

use crate::graphql::IntentSchema;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// GraphQL schema with the payment intent resolver attached
    pub schema: IntentSchema,

    /// Stripe settings source (for health reporting)
    pub settings: Arc<dyn ConfigProvider>,
}
