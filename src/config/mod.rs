//! Application configuration loaded from files and the environment

mod app_config;

pub use app_config::{
    AppConfig, AuthConfig, CredentialScheme, Environment, LogFormat, LoggingConfig, ServerConfig,
    INSECURE_DEFAULT_SECRET, MIN_PRODUCTION_SECRET_LENGTH,
};
