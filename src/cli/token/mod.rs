//! Token commands - issue and inspect tokens with the configured secret

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Context;
use chrono::Duration;
use clap::Args;
use serde_json::{json, Value};

use crate::config::AppConfig;
use crate::domain::auth::{ClaimSet, SystemClock};
use crate::domain::user::Identity;
use crate::infrastructure::auth::TokenServices;
use crate::infrastructure::logging;

#[derive(Args, Debug)]
pub struct IssueArgs {
    /// Subject email
    #[arg(long)]
    pub email: String,

    /// Lifetime in minutes; clamped to the configured maximum
    #[arg(long)]
    pub ttl_minutes: Option<i64>,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    pub token: String,
}

/// Print a freshly signed token as JSON
pub async fn issue(args: IssueArgs) -> anyhow::Result<()> {
    let tokens = load_token_services()?;

    let identity = Identity::new(args.email)?;
    let ttl = args
        .ttl_minutes
        .map(|minutes| Duration::try_minutes(minutes).context("TTL out of range"))
        .transpose()?;

    let issued = tokens.issuer.issue(&identity, ttl, BTreeMap::new())?;

    println!(
        "{}",
        serde_json::to_string_pretty(&json!({
            "access_token": issued.token,
            "token_type": issued.token_type,
            "expires_at": issued.expires_at.to_rfc3339(),
        }))?
    );

    Ok(())
}

/// Validate a token and print its claims, or the rejection reason
pub async fn inspect(args: InspectArgs) -> anyhow::Result<()> {
    let tokens = load_token_services()?;

    match tokens.validator.validate(&args.token) {
        Ok(authenticated) => {
            println!(
                "{}",
                serde_json::to_string_pretty(&claims_json(authenticated.claims()))?
            );
            Ok(())
        }
        Err(reason) => anyhow::bail!("token rejected: {}", reason),
    }
}

fn load_token_services() -> anyhow::Result<TokenServices> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&config.logging);

    Ok(TokenServices::from_config(
        &config.auth,
        config.environment,
        Arc::new(SystemClock),
    )?)
}

fn claims_json(claims: &ClaimSet) -> Value {
    let mut value = json!({
        "sub": claims.subject().as_str(),
        "exp": claims.expires_at(),
    });

    if let Some(iat) = claims.issued_at() {
        value["iat"] = json!(iat);
    }

    for (key, extra) in claims.extra() {
        value[key.as_str()] = extra.clone();
    }

    value
}
