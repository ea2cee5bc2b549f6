//! Server Configuration

use std::path::PathBuf;

use payment_intents::{IntentError, StripeConfig};

/// Runtime configuration, read from the environment
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Listen address
    pub bind_addr: String,

    /// JSON file of orders to seed the in-memory store
    pub orders_file: Option<PathBuf>,

    /// JSON Stripe settings record; when unset, settings come from `STRIPE_*` variables
    pub settings_file: Option<PathBuf>,

    /// Stripe HTTP client settings
    pub stripe: StripeConfig,
}

impl ServerConfig {
    /// Build configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, IntentError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".into()),
            orders_file: lookup("ORDERS_FILE").map(PathBuf::from),
            settings_file: lookup("STRIPE_SETTINGS_FILE").map(PathBuf::from),
            stripe: StripeConfig::from_lookup(&lookup)?,
        })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self, IntentError> {
        Self::from_lookup(|name| std::env::var(name).ok().filter(|v| !v.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.stripe.api_base, "https://api.stripe.com");
        assert_eq!(config.stripe.timeout_secs, None);
        assert!(config.orders_file.is_none());
        assert!(config.settings_file.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("ORDERS_FILE", "/data/orders.json"),
            ("STRIPE_API_BASE", "http://localhost:12111"),
            ("STRIPE_TIMEOUT_SECS", "30"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.orders_file, Some(PathBuf::from("/data/orders.json")));
        assert_eq!(config.stripe.api_base, "http://localhost:12111");
        assert_eq!(config.stripe.timeout_secs, Some(30));
    }

    #[test]
    fn test_bad_timeout() {
        let result = ServerConfig::from_lookup(lookup(&[("STRIPE_TIMEOUT_SECS", "soon")]));
        assert!(matches!(result, Err(IntentError::Config(_))));
    }
}
