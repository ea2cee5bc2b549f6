//! Payment Intent Resolver
//!
//! Loads an order, prices it in minor units, picks the merchant's secret key
//! and asks the gateway for a payment intent. The order is only written once
//! Stripe has returned an intent id.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::currency::to_minor_units;
use crate::error::{IntentError, Result};
use crate::order::{INTENT_META_KEY, Order, OrderRepository};
use crate::sanitize::sanitize_identifier;
use crate::settings::ConfigProvider;
use crate::stripe::{PaymentIntentGateway, PaymentIntentParams};

/// How the caller identified the order
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OrderReference {
    /// Order id
    Id(String),

    /// Public order key
    Key(String),
}

impl OrderReference {
    /// Build a reference from raw, unsanitized input fields.
    ///
    /// The id wins when both are present. Returns `None` when neither field
    /// survives sanitizing.
    pub fn from_input(order_id: Option<&str>, order_key: Option<&str>) -> Option<Self> {
        sanitize_identifier(order_id)
            .map(OrderReference::Id)
            .or_else(|| sanitize_identifier(order_key).map(OrderReference::Key))
    }

    pub fn as_str(&self) -> &str {
        match self {
            OrderReference::Id(id) => id,
            OrderReference::Key(key) => key,
        }
    }
}

impl std::fmt::Display for OrderReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderReference::Id(id) => write!(f, "id {id}"),
            OrderReference::Key(key) => write!(f, "key {key}"),
        }
    }
}

/// Outcome of a successful intent creation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IntentResult {
    /// Always true; failures are reported as errors
    pub status: bool,

    /// Processor response body, verbatim
    pub data: String,

    /// Id stored on the order
    #[serde(skip)]
    pub intent_id: String,
}

/// Creates Stripe payment intents for orders
#[derive(Clone)]
pub struct PaymentIntentResolver {
    orders: Arc<dyn OrderRepository>,
    settings: Arc<dyn ConfigProvider>,
    gateway: Arc<dyn PaymentIntentGateway>,
}

impl PaymentIntentResolver {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        settings: Arc<dyn ConfigProvider>,
        gateway: Arc<dyn PaymentIntentGateway>,
    ) -> Self {
        Self {
            orders,
            settings,
            gateway,
        }
    }

    pub fn orders(&self) -> &Arc<dyn OrderRepository> {
        &self.orders
    }

    fn load_order(&self, reference: Option<&OrderReference>) -> Result<Order> {
        let reference = reference.ok_or_else(|| IntentError::OrderNotFound("no order given".into()))?;

        let order = match reference {
            OrderReference::Id(id) => self.orders.find_by_id(id)?,
            OrderReference::Key(key) => self.orders.find_by_key(key)?,
        };

        order.ok_or_else(|| IntentError::OrderNotFound(reference.to_string()))
    }

    /// Create a payment intent for the referenced order
    pub async fn create_payment_intent(
        &self,
        reference: Option<OrderReference>,
    ) -> Result<IntentResult> {
        let mut order = self.load_order(reference.as_ref())?;

        let amount = to_minor_units(order.total, &order.currency)?;
        let params = PaymentIntentParams::new(amount, order.currency.clone());

        let settings = self.settings.stripe_settings()?;
        let mode = settings.mode();
        let secret_key = settings
            .active_secret_key()
            .ok_or(IntentError::MissingApiKey { mode })?;

        tracing::info!(
            order_id = %order.id,
            amount,
            currency = %params.currency,
            mode = %mode,
            "Creating payment intent"
        );

        let body = self
            .gateway
            .create_payment_intent(secret_key, &params)
            .await
            .map_err(|e| match e {
                IntentError::RequestFailed(reason) => IntentError::IntentCreationFailed(reason),
                other => other,
            })?;

        let data: serde_json::Value = serde_json::from_str(&body).map_err(|e| {
            tracing::warn!(order_id = %order.id, error = %e, "Unparseable Stripe response");
            IntentError::IntentCreationFailed("response is not JSON".into())
        })?;

        let intent_id = data
            .get("id")
            .and_then(serde_json::Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| {
                tracing::warn!(order_id = %order.id, "Stripe response has no intent id");
                IntentError::IntentCreationFailed("response has no id".into())
            })?;

        order.update_meta(INTENT_META_KEY, intent_id.clone());
        self.orders.save(&order)?;

        tracing::info!(
            order_id = %order.id,
            intent_id = %intent_id,
            "Stored payment intent on order"
        );

        Ok(IntentResult {
            status: true,
            data: body,
            intent_id,
        })
    }
}
