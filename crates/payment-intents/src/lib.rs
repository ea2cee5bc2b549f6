//! # payment-intents
//!
//! Stripe Payment Intent creation for commerce orders.
//!
//! ## Flow
//!
//! ```text
//! ┌──────────────┐   ┌─────────────────┐   ┌──────────────────────┐
//! │ OrderRepo    │──▶│ PaymentIntent   │──▶│ POST /v1/payment_    │
//! │ (find order) │   │ Resolver        │   │ intents (Stripe)     │
//! └──────────────┘   └─────────────────┘   └──────────────────────┘
//!                      │       ▲                      │
//!                      ▼       │                      ▼
//!            ConfigProvider (secret key)   `_stripe_intent_id` saved on order
//! ```
//!
//! Orders, settings and the HTTP gateway are traits so a host can plug in its
//! own commerce backend; in-memory and environment implementations ship here.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use payment_intents::{
//!     EnvConfigProvider, MemoryOrderRepository, OrderReference, PaymentIntentResolver,
//!     StripeClient,
//! };
//!
//! let resolver = PaymentIntentResolver::new(
//!     Arc::new(MemoryOrderRepository::from_json_file("orders.json")?),
//!     Arc::new(EnvConfigProvider),
//!     Arc::new(StripeClient::from_env()?),
//! );
//!
//! let result = resolver
//!     .create_payment_intent(Some(OrderReference::Id("42".into())))
//!     .await?;
//! // result.data holds Stripe's JSON, including `client_secret`
//! ```

pub mod currency;
mod error;
pub mod intent;
pub mod order;
pub mod sanitize;
pub mod settings;
pub mod stripe;

pub use error::{IntentError, Result};
pub use intent::{IntentResult, OrderReference, PaymentIntentResolver};
pub use order::{INTENT_META_KEY, MemoryOrderRepository, Order, OrderRepository};
pub use settings::{ConfigProvider, EnvConfigProvider, StaticConfigProvider, StripeMode, StripeSettings};
pub use stripe::{PaymentIntentGateway, PaymentIntentParams, StripeClient, StripeConfig};
