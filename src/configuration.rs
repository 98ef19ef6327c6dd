use std::fmt;
use std::time::Duration;

use crate::error::ConfigError;

/// bcrypt accepts costs in `4..=31`
const MIN_HASH_COST: u32 = 4;
const MAX_HASH_COST: u32 = 31;

#[derive(serde::Deserialize)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub auth: AuthSettings,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
}

impl ApplicationSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Token and hashing settings
///
/// Secrets have no default: an authenticator built without them fails
/// `validate` instead of silently signing with a well-known key.
#[derive(serde::Deserialize, Clone)]
pub struct AuthSettings {
    pub access_secret: String,
    pub refresh_secret: String,
    #[serde(with = "humantime_serde", default = "default_access_token_expiry")]
    pub access_token_expiry: Duration,
    #[serde(with = "humantime_serde", default = "default_refresh_token_expiry")]
    pub refresh_token_expiry: Duration,
    #[serde(default = "default_hash_cost")]
    pub hash_cost: u32,
    #[serde(default = "default_issuer")]
    pub issuer: String,
}

fn default_access_token_expiry() -> Duration {
    Duration::from_secs(60 * 60)
}

fn default_refresh_token_expiry() -> Duration {
    Duration::from_secs(7 * 24 * 60 * 60)
}

fn default_hash_cost() -> u32 {
    10
}

fn default_issuer() -> String {
    "tokengate".to_string()
}

impl AuthSettings {
    /// Settings with the given secrets and default expiries, cost and issuer
    pub fn new(access_secret: impl Into<String>, refresh_secret: impl Into<String>) -> Self {
        Self {
            access_secret: access_secret.into(),
            refresh_secret: refresh_secret.into(),
            access_token_expiry: default_access_token_expiry(),
            refresh_token_expiry: default_refresh_token_expiry(),
            hash_cost: default_hash_cost(),
            issuer: default_issuer(),
        }
    }

    pub fn with_access_token_expiry(mut self, expiry: Duration) -> Self {
        self.access_token_expiry = expiry;
        self
    }

    pub fn with_refresh_token_expiry(mut self, expiry: Duration) -> Self {
        self.refresh_token_expiry = expiry;
        self
    }

    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    /// Reject settings that would produce forgeable or unverifiable tokens
    ///
    /// # Errors
    /// - empty access or refresh secret, empty issuer
    /// - identical access and refresh secrets
    /// - hash cost outside bcrypt's range
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.access_secret.trim().is_empty() {
            return Err(ConfigError::MissingRequired("auth.access_secret".to_string()));
        }
        if self.refresh_secret.trim().is_empty() {
            return Err(ConfigError::MissingRequired("auth.refresh_secret".to_string()));
        }
        // Shared secrets would let a refresh token pass as an access token
        if self.access_secret == self.refresh_secret {
            return Err(ConfigError::InvalidValue(
                "auth.access_secret and auth.refresh_secret must differ".to_string(),
            ));
        }
        if !(MIN_HASH_COST..=MAX_HASH_COST).contains(&self.hash_cost) {
            return Err(ConfigError::InvalidValue(format!(
                "auth.hash_cost must be between {} and {}, got {}",
                MIN_HASH_COST, MAX_HASH_COST, self.hash_cost
            )));
        }
        if self.issuer.trim().is_empty() {
            return Err(ConfigError::MissingRequired("auth.issuer".to_string()));
        }
        Ok(())
    }
}

impl fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSettings")
            .field("access_secret", &"[redacted]")
            .field("refresh_secret", &"[redacted]")
            .field("access_token_expiry", &self.access_token_expiry)
            .field("refresh_token_expiry", &self.refresh_token_expiry)
            .field("hash_cost", &self.hash_cost)
            .field("issuer", &self.issuer)
            .finish()
    }
}

/// Load settings from an optional `configuration` file and `APP_*` environment
/// variables, e.g. `APP_AUTH__ACCESS_SECRET`.
pub fn get_configuration() -> Result<Settings, ConfigError> {
    let settings = config::Config::builder()
        .set_default("application.host", "127.0.0.1")?
        .set_default("application.port", 3000)?
        .add_source(config::File::with_name("configuration").required(false))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;
    Ok(settings.try_deserialize::<Settings>()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_yaml(yaml: &str) -> Settings {
        config::Config::builder()
            .add_source(config::File::from_str(yaml, config::FileFormat::Yaml))
            .build()
            .expect("Failed to build config")
            .try_deserialize::<Settings>()
            .expect("Failed to deserialize settings")
    }

    #[test]
    fn test_defaults_are_applied() {
        let settings = from_yaml(
            r#"
application:
  host: 127.0.0.1
  port: 3000
auth:
  access_secret: access-secret
  refresh_secret: refresh-secret
"#,
        );

        assert_eq!(settings.auth.access_token_expiry, Duration::from_secs(3600));
        assert_eq!(settings.auth.refresh_token_expiry, Duration::from_secs(604800));
        assert_eq!(settings.auth.hash_cost, 10);
        assert_eq!(settings.auth.issuer, "tokengate");
        assert!(settings.auth.validate().is_ok());
    }

    #[test]
    fn test_human_readable_expiry() {
        let settings = from_yaml(
            r#"
application:
  host: 0.0.0.0
  port: 8080
auth:
  access_secret: access-secret
  refresh_secret: refresh-secret
  access_token_expiry: 15m
  refresh_token_expiry: 30d
  hash_cost: 12
"#,
        );

        assert_eq!(settings.auth.access_token_expiry, Duration::from_secs(15 * 60));
        assert_eq!(settings.auth.refresh_token_expiry, Duration::from_secs(30 * 86400));
        assert_eq!(settings.auth.hash_cost, 12);
        assert_eq!(settings.application.address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_empty_secret_rejected() {
        let settings = AuthSettings::new("", "refresh-secret");
        assert!(matches!(settings.validate(), Err(ConfigError::MissingRequired(_))));

        let settings = AuthSettings::new("access-secret", "   ");
        assert!(matches!(settings.validate(), Err(ConfigError::MissingRequired(_))));
    }

    #[test]
    fn test_shared_secret_rejected() {
        let settings = AuthSettings::new("same-secret", "same-secret");
        assert!(matches!(settings.validate(), Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_hash_cost_range() {
        let base = AuthSettings::new("access-secret", "refresh-secret");
        assert!(base.clone().with_hash_cost(3).validate().is_err());
        assert!(base.clone().with_hash_cost(32).validate().is_err());
        assert!(base.clone().with_hash_cost(4).validate().is_ok());
        assert!(base.with_hash_cost(31).validate().is_ok());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let settings = AuthSettings::new("access-secret", "refresh-secret");
        let printed = format!("{:?}", settings);
        assert!(!printed.contains("access-secret"));
        assert!(!printed.contains("refresh-secret"));
    }
}
