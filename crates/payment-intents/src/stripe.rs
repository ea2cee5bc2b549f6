//! Stripe Payment Intents Gateway
//!
//! Form-encoded POST to `/v1/payment_intents`. The response body is returned
//! untouched so callers can hand the processor's JSON back to their clients.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use std::time::Duration;

use crate::error::{IntentError, Result};

/// Default Stripe API host
pub const STRIPE_API_BASE: &str = "https://api.stripe.com";

/// Parameters of a new payment intent
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaymentIntentParams {
    /// Amount in the currency's minor unit
    pub amount: i64,

    /// Currency code, sent as-is
    pub currency: String,

    /// Let Stripe pick payment methods from the dashboard configuration
    pub automatic_payment_methods: bool,
}

impl PaymentIntentParams {
    pub fn new(amount: i64, currency: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into(),
            automatic_payment_methods: true,
        }
    }

    /// Encode as an `application/x-www-form-urlencoded` body
    pub fn to_form(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .append_pair("amount", &self.amount.to_string())
            .append_pair("currency", &self.currency)
            .append_pair(
                "automatic_payment_methods[enabled]",
                if self.automatic_payment_methods { "true" } else { "false" },
            )
            .finish()
    }
}

/// Creates payment intents on the processor
#[async_trait]
pub trait PaymentIntentGateway: Send + Sync {
    /// Create an intent and return the raw response body
    async fn create_payment_intent(
        &self,
        secret_key: &str,
        params: &PaymentIntentParams,
    ) -> Result<String>;
}

/// Stripe client configuration
#[derive(Clone, Debug)]
pub struct StripeConfig {
    /// API base URL, without trailing path
    pub api_base: String,

    /// Request timeout in seconds; `None` keeps the HTTP client's default
    pub timeout_secs: Option<u64>,
}

impl Default for StripeConfig {
    fn default() -> Self {
        Self {
            api_base: STRIPE_API_BASE.into(),
            timeout_secs: None,
        }
    }
}

impl StripeConfig {
    /// Build from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base = lookup("STRIPE_API_BASE").unwrap_or_else(|| STRIPE_API_BASE.into());
        let timeout_secs = match lookup("STRIPE_TIMEOUT_SECS") {
            Some(raw) => Some(raw.trim().parse().map_err(|_| {
                IntentError::Config(format!("STRIPE_TIMEOUT_SECS must be a number, got {raw:?}"))
            })?),
            None => None,
        };

        Ok(Self {
            api_base,
            timeout_secs,
        })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }
}

/// HTTP gateway to the Stripe API
pub struct StripeClient {
    http: reqwest::Client,
    config: StripeConfig,
}

impl StripeClient {
    /// Create a client against the public Stripe API
    pub fn new() -> Result<Self> {
        Self::from_config(StripeConfig::default())
    }

    pub fn from_config(config: StripeConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let http = builder
            .build()
            .map_err(|e| IntentError::Config(format!("HTTP client: {e}")))?;

        Ok(Self { http, config })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_config(StripeConfig::from_env()?)
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/payment_intents", self.config.api_base.trim_end_matches('/'))
    }
}

#[async_trait]
impl PaymentIntentGateway for StripeClient {
    async fn create_payment_intent(
        &self,
        secret_key: &str,
        params: &PaymentIntentParams,
    ) -> Result<String> {
        let response = self
            .http
            .post(self.endpoint())
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(AUTHORIZATION, format!("Bearer {secret_key}"))
            .body(params.to_form())
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Stripe request failed");
                IntentError::RequestFailed(e.to_string())
            })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            tracing::error!(status = status.as_u16(), "Stripe API request failed");
            return Err(IntentError::RequestFailed(format!("status {}", status.as_u16())));
        }

        response
            .text()
            .await
            .map_err(|e| IntentError::RequestFailed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> StripeClient {
        StripeClient::from_config(StripeConfig {
            api_base: server.uri(),
            timeout_secs: Some(5),
        })
        .unwrap()
    }

    #[test]
    fn test_form_encoding() {
        let params = PaymentIntentParams::new(1999, "usd");
        assert_eq!(
            params.to_form(),
            "amount=1999&currency=usd&automatic_payment_methods%5Benabled%5D=true"
        );
    }

    #[tokio::test]
    async fn test_posts_form_with_bearer_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/payment_intents"))
            .and(header("authorization", "Bearer sk_test_abc"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string(
                "amount=1999&currency=usd&automatic_payment_methods%5Benabled%5D=true",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"id":"pi_123"}"#))
            .expect(1)
            .mount(&server)
            .await;

        let body = client_for(&server)
            .create_payment_intent("sk_test_abc", &PaymentIntentParams::new(1999, "usd"))
            .await
            .unwrap();

        assert_eq!(body, r#"{"id":"pi_123"}"#);
    }

    #[tokio::test]
    async fn test_non_200_is_request_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(402).set_body_string(
                r#"{"error":{"type":"card_error","message":"declined"}}"#,
            ))
            .mount(&server)
            .await;

        let result = client_for(&server)
            .create_payment_intent("sk_test_abc", &PaymentIntentParams::new(100, "usd"))
            .await;

        assert!(matches!(result, Err(IntentError::RequestFailed(msg)) if msg.contains("402")));
    }

    #[tokio::test]
    async fn test_transport_failure_is_request_failure() {
        let client = StripeClient::from_config(StripeConfig {
            api_base: "http://127.0.0.1:1".into(),
            timeout_secs: Some(1),
        })
        .unwrap();

        let result = client
            .create_payment_intent("sk_test_abc", &PaymentIntentParams::new(100, "usd"))
            .await;

        assert!(matches!(result, Err(IntentError::RequestFailed(_))));
    }
}
