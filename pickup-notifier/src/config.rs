//! Configuration module for environment variable parsing.
//!
//! Everything is read once at startup into an immutable [`Config`]. Missing
//! secrets are not fatal here; handlers reject requests with a configuration
//! error instead.

use std::env;
use std::fmt;
use std::time::Duration;

use tracing::warn;

use crate::error::WebhookError;
use crate::pickup::DEFAULT_BUSINESS_DAYS;

/// Default base URL of the Jumpseller REST API.
pub const DEFAULT_API_BASE_URL: &str = "https://api.jumpseller.com/v1";

/// Default status label written back to the order.
pub const DEFAULT_PICKUP_STATUS: &str = "listo para retirar en tienda";

/// Application configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    /// Port for the web server to listen on
    pub port: u16,

    /// Jumpseller API login (basic-auth user)
    pub api_login: Option<String>,

    /// Jumpseller API token (basic-auth password)
    pub api_token: Option<String>,

    /// Shared secret used to sign inbound webhooks
    pub webhook_secret: Option<String>,

    /// Base URL of the order API, without trailing slash
    pub api_base_url: String,

    /// Timeout applied to outbound order updates, in milliseconds
    pub request_timeout_ms: u64,

    /// Business days between order creation and pickup
    pub pickup_business_days: u32,

    /// Status label sent with the pickup update
    pub pickup_status: String,
}

/// The secrets needed to authenticate a webhook and update its order.
#[derive(Clone)]
pub struct Credentials {
    pub api_login: String,
    pub api_token: String,
    pub webhook_secret: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Config {
            port: parse_or("PORT", 8080),

            api_login: non_blank("JUMPSELLER_LOGIN"),

            api_token: non_blank("JUMPSELLER_TOKEN"),

            webhook_secret: non_blank("JUMPSELLER_HOOKS_TOKEN"),

            api_base_url: env::var("JUMPSELLER_API_URL")
                .ok()
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),

            request_timeout_ms: parse_or("REQUEST_TIMEOUT_MS", 10_000),

            pickup_business_days: parse_or("PICKUP_BUSINESS_DAYS", DEFAULT_BUSINESS_DAYS),

            pickup_status: non_blank("PICKUP_STATUS")
                .unwrap_or_else(|| DEFAULT_PICKUP_STATUS.to_string()),
        }
    }

    /// Timeout for calls to the order API.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Collect the secrets a webhook needs, failing on the first missing one.
    ///
    /// The error names the missing setting, never a secret value.
    pub fn credentials(&self) -> Result<Credentials, WebhookError> {
        let webhook_secret = self
            .webhook_secret
            .clone()
            .ok_or(WebhookError::Configuration("JUMPSELLER_HOOKS_TOKEN"))?;
        let api_login = self
            .api_login
            .clone()
            .ok_or(WebhookError::Configuration("JUMPSELLER_LOGIN"))?;
        let api_token = self
            .api_token
            .clone()
            .ok_or(WebhookError::Configuration("JUMPSELLER_TOKEN"))?;

        Ok(Credentials {
            api_login,
            api_token,
            webhook_secret,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            api_login: None,
            api_token: None,
            webhook_secret: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_ms: 10_000,
            pickup_business_days: DEFAULT_BUSINESS_DAYS,
            pickup_status: DEFAULT_PICKUP_STATUS.to_string(),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("api_login", &redacted(&self.api_login))
            .field("api_token", &redacted(&self.api_token))
            .field("webhook_secret", &redacted(&self.webhook_secret))
            .field("api_base_url", &self.api_base_url)
            .field("request_timeout_ms", &self.request_timeout_ms)
            .field("pickup_business_days", &self.pickup_business_days)
            .field("pickup_status", &self.pickup_status)
            .finish()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_login", &"<redacted>")
            .field("api_token", &"<redacted>")
            .field("webhook_secret", &"<redacted>")
            .finish()
    }
}

fn redacted(secret: &Option<String>) -> &'static str {
    match secret {
        Some(_) => "<redacted>",
        None => "<unset>",
    }
}

/// Read a variable, treating empty or whitespace-only values as unset.
fn non_blank(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse a variable, falling back to `default` when unset or invalid.
fn parse_or<T>(name: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return default,
    };

    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            warn!(env_var = name, value = %raw, "Invalid value, using default");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> Config {
        Config {
            api_login: Some("store-login".to_string()),
            api_token: Some("store-token".to_string()),
            webhook_secret: Some("hooks-token".to_string()),
            ..Config::default()
        }
    }

    #[test]
    fn test_parse_or_valid() {
        env::set_var("TEST_PICKUP_PARSE_VALID", " 42 ");
        assert_eq!(parse_or("TEST_PICKUP_PARSE_VALID", 0u32), 42);
        env::remove_var("TEST_PICKUP_PARSE_VALID");
    }

    #[test]
    fn test_parse_or_invalid_falls_back() {
        env::set_var("TEST_PICKUP_PARSE_INVALID", "three");
        assert_eq!(parse_or("TEST_PICKUP_PARSE_INVALID", 3u32), 3);
        env::remove_var("TEST_PICKUP_PARSE_INVALID");
    }

    #[test]
    fn test_parse_or_default() {
        assert_eq!(parse_or("NONEXISTENT_PICKUP_VAR", 8080u16), 8080);
    }

    #[test]
    fn test_non_blank() {
        env::set_var("TEST_PICKUP_BLANK", "   ");
        assert_eq!(non_blank("TEST_PICKUP_BLANK"), None);
        env::set_var("TEST_PICKUP_BLANK", " secret ");
        assert_eq!(non_blank("TEST_PICKUP_BLANK"), Some("secret".to_string()));
        env::remove_var("TEST_PICKUP_BLANK");
    }

    #[test]
    fn test_credentials_complete() {
        let creds = configured().credentials().unwrap();
        assert_eq!(creds.api_login, "store-login");
        assert_eq!(creds.api_token, "store-token");
        assert_eq!(creds.webhook_secret, "hooks-token");
    }

    #[test]
    fn test_credentials_missing_secret() {
        let config = Config {
            webhook_secret: None,
            ..configured()
        };
        match config.credentials() {
            Err(WebhookError::Configuration(name)) => assert_eq!(name, "JUMPSELLER_HOOKS_TOKEN"),
            other => panic!("Expected configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_credentials_missing_token() {
        let config = Config {
            api_token: None,
            ..configured()
        };
        match config.credentials() {
            Err(WebhookError::Configuration(name)) => assert_eq!(name, "JUMPSELLER_TOKEN"),
            other => panic!("Expected configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = configured();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("store-token"));
        assert!(!debug.contains("hooks-token"));
        assert!(debug.contains("<redacted>"));

        let creds = format!("{:?}", config.credentials().unwrap());
        assert!(!creds.contains("store-login"));
    }

    #[test]
    fn test_request_timeout() {
        let config = Config {
            request_timeout_ms: 2500,
            ..Config::default()
        };
        assert_eq!(config.request_timeout(), Duration::from_millis(2500));
    }
}
