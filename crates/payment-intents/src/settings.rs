//! Stripe Settings
//!
//! The merchant's stored Stripe configuration and the providers that supply it.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{IntentError, Result};

/// Which Stripe environment the settings point at
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StripeMode {
    Test,
    Live,
}

impl StripeMode {
    pub fn as_str(&self) -> &str {
        match self {
            StripeMode::Test => "test",
            StripeMode::Live => "live",
        }
    }
}

impl std::fmt::Display for StripeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored Stripe settings record
///
/// Mirrors the merchant option map: a `testmode` flag plus one secret key per mode.
/// Absent fields deserialize as empty strings.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct StripeSettings {
    /// `"yes"` enables test mode, any other value means live
    #[serde(default)]
    pub testmode: String,

    #[serde(default)]
    pub test_secret_key: String,

    #[serde(default)]
    pub secret_key: String,
}

impl StripeSettings {
    pub fn test(test_secret_key: impl Into<String>) -> Self {
        Self {
            testmode: "yes".into(),
            test_secret_key: test_secret_key.into(),
            secret_key: String::new(),
        }
    }

    pub fn live(secret_key: impl Into<String>) -> Self {
        Self {
            testmode: "no".into(),
            test_secret_key: String::new(),
            secret_key: secret_key.into(),
        }
    }

    pub fn mode(&self) -> StripeMode {
        if self.testmode == "yes" {
            StripeMode::Test
        } else {
            StripeMode::Live
        }
    }

    /// Secret key for the active mode, `None` when it is blank
    pub fn active_secret_key(&self) -> Option<&str> {
        let key = match self.mode() {
            StripeMode::Test => self.test_secret_key.trim(),
            StripeMode::Live => self.secret_key.trim(),
        };

        if key.is_empty() { None } else { Some(key) }
    }

    /// Build settings from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            testmode: lookup("STRIPE_TESTMODE").unwrap_or_default(),
            test_secret_key: lookup("STRIPE_TEST_SECRET_KEY").unwrap_or_default(),
            secret_key: lookup("STRIPE_SECRET_KEY").unwrap_or_default(),
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load a settings record from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| IntentError::Config(format!("{}: {}", path.display(), e)))?;
        Ok(serde_json::from_str(&raw)?)
    }
}

impl std::fmt::Debug for StripeSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeSettings")
            .field("testmode", &self.testmode)
            .field("test_secret_key", &redact(&self.test_secret_key))
            .field("secret_key", &redact(&self.secret_key))
            .finish()
    }
}

fn redact(key: &str) -> &'static str {
    if key.is_empty() { "" } else { "[REDACTED]" }
}

/// Source of Stripe settings
pub trait ConfigProvider: Send + Sync {
    /// Current settings; a missing record is reported as empty settings
    fn stripe_settings(&self) -> Result<StripeSettings>;
}

/// Fixed settings, loaded once
#[derive(Clone, Debug, Default)]
pub struct StaticConfigProvider {
    settings: StripeSettings,
}

impl StaticConfigProvider {
    pub fn new(settings: StripeSettings) -> Self {
        Self { settings }
    }
}

impl ConfigProvider for StaticConfigProvider {
    fn stripe_settings(&self) -> Result<StripeSettings> {
        Ok(self.settings.clone())
    }
}

/// Reads the process environment on every call
#[derive(Clone, Copy, Debug, Default)]
pub struct EnvConfigProvider;

impl ConfigProvider for EnvConfigProvider {
    fn stripe_settings(&self) -> Result<StripeSettings> {
        Ok(StripeSettings::from_env())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_mode_selects_test_key() {
        let settings = StripeSettings {
            testmode: "yes".into(),
            test_secret_key: "sk_test_abc".into(),
            secret_key: "sk_live_xyz".into(),
        };
        assert_eq!(settings.mode(), StripeMode::Test);
        assert_eq!(settings.active_secret_key(), Some("sk_test_abc"));
    }

    #[test]
    fn test_anything_but_yes_is_live() {
        for flag in ["no", "YES", "true", ""] {
            let settings = StripeSettings {
                testmode: flag.into(),
                test_secret_key: "sk_test_abc".into(),
                secret_key: "sk_live_xyz".into(),
            };
            assert_eq!(settings.mode(), StripeMode::Live, "flag {flag:?}");
            assert_eq!(settings.active_secret_key(), Some("sk_live_xyz"));
        }
    }

    #[test]
    fn test_blank_key_is_missing() {
        let settings = StripeSettings {
            testmode: "yes".into(),
            test_secret_key: "   ".into(),
            secret_key: "sk_live_xyz".into(),
        };
        assert_eq!(settings.active_secret_key(), None);
        assert_eq!(StripeSettings::default().active_secret_key(), None);
    }

    #[test]
    fn test_key_sent_without_surrounding_whitespace() {
        let settings = StripeSettings::live(" sk_live_xyz\n");
        assert_eq!(settings.active_secret_key(), Some("sk_live_xyz"));
    }

    #[test]
    fn test_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("STRIPE_TESTMODE", "yes"),
            ("STRIPE_TEST_SECRET_KEY", "sk_test_env"),
        ]
        .into_iter()
        .collect();

        let settings = StripeSettings::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(settings.active_secret_key(), Some("sk_test_env"));
        assert!(settings.secret_key.is_empty());
    }

    #[test]
    fn test_partial_json_record() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"testmode":"no","secret_key":"sk_live_file","title":"Card"}}"#).unwrap();

        let settings = StripeSettings::from_json_file(file.path()).unwrap();
        assert_eq!(settings.mode(), StripeMode::Live);
        assert_eq!(settings.active_secret_key(), Some("sk_live_file"));
        assert!(settings.test_secret_key.is_empty());
    }

    #[test]
    fn test_debug_redacts_keys() {
        let rendered = format!("{:?}", StripeSettings::test("sk_test_secret"));
        assert!(!rendered.contains("sk_test_secret"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
