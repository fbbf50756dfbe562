use serde::Deserialize;
use tracing::warn;

use crate::domain::AuthError;

/// Signing secret used when none is configured; refused in production
pub const INSECURE_DEFAULT_SECRET: &str = "dev-jwt-secret-change-in-production";

/// Minimum secret length accepted in production (bytes)
pub const MIN_PRODUCTION_SECRET_LENGTH: usize = 32;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// How stored credentials are prepared and compared
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CredentialScheme {
    #[default]
    Argon2,
    /// Stores passwords as given; only for local development
    Plaintext,
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HMAC signing secret
    pub secret: String,
    /// Optional `kid` written into token headers
    pub key_id: Option<String>,
    pub access_token_ttl_minutes: u64,
    pub max_token_ttl_minutes: u64,
    /// Clock-skew allowance on expiry, capped at 60
    pub leeway_seconds: u64,
    pub credential_scheme: CredentialScheme,
    /// Insert test@example.com / password123 at startup
    pub seed_demo_user: bool,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &"[hidden]")
            .field("key_id", &self.key_id)
            .field("access_token_ttl_minutes", &self.access_token_ttl_minutes)
            .field("max_token_ttl_minutes", &self.max_token_ttl_minutes)
            .field("leeway_seconds", &self.leeway_seconds)
            .field("credential_scheme", &self.credential_scheme)
            .field("seed_demo_user", &self.seed_demo_user)
            .finish()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: INSECURE_DEFAULT_SECRET.to_string(),
            key_id: None,
            access_token_ttl_minutes: 15,
            max_token_ttl_minutes: 15,
            leeway_seconds: 0,
            credential_scheme: CredentialScheme::default(),
            seed_demo_user: false,
        }
    }
}

impl AuthConfig {
    /// Check the signing setup for the given environment
    ///
    /// Weak or default secrets are fatal in production and only warned about
    /// elsewhere.
    pub fn validate(&self, environment: Environment) -> Result<(), AuthError> {
        let problem = if self.secret.is_empty() {
            Some("signing secret is empty")
        } else if self.secret == INSECURE_DEFAULT_SECRET {
            Some("signing secret is the insecure development default")
        } else if self.secret.len() < MIN_PRODUCTION_SECRET_LENGTH {
            Some("signing secret is shorter than 32 bytes")
        } else {
            None
        };

        match (problem, environment) {
            (Some(problem), Environment::Production) => {
                return Err(AuthError::configuration(format!(
                    "{}; set APP__AUTH__SECRET or JWT_SECRET",
                    problem
                )));
            }
            (Some(_), _) if self.secret.is_empty() => {
                return Err(AuthError::configuration("signing secret is empty"));
            }
            (Some(problem), Environment::Development) => {
                warn!("Insecure token configuration: {}", problem);
            }
            (None, _) => {}
        }

        if self.credential_scheme == CredentialScheme::Plaintext {
            if environment == Environment::Production {
                return Err(AuthError::configuration(
                    "plaintext credential storage is not allowed in production",
                ));
            }
            warn!("Passwords are stored in plaintext; never use this outside development");
        }

        Ok(())
    }
}

impl AppConfig {
    /// Load from `config/default`, `config/local`, `APP__*` variables, then
    /// `JWT_SECRET` and `PORT`
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::from_sources(
            app_environment(),
            std::env::var("JWT_SECRET").ok(),
            std::env::var("PORT").ok(),
        )
    }

    /// Environment values stay strings; numeric fields are converted on
    /// deserialization, so an all-digit secret is kept verbatim.
    fn from_sources(
        environment: config::Environment,
        jwt_secret: Option<String>,
        port: Option<String>,
    ) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(environment)
            .set_override_option("auth.secret", jwt_secret)?
            .set_override_option("server.port", port)?
            .build()?;

        config.try_deserialize()
    }
}

fn app_environment() -> config::Environment {
    config::Environment::with_prefix("APP").separator("__")
}
