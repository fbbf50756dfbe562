//! CLI module for the RoleReady auth service
//!
//! - `serve`: run the HTTP API
//! - `issue-token`: print a signed token for an email
//! - `inspect-token`: validate a token and print its claims

pub mod serve;
pub mod token;

use clap::{Parser, Subcommand};

/// RoleReady auth service - bearer token issuance and validation
#[derive(Parser)]
#[command(name = "roleready-auth")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// Issue a token signed with the configured secret
    IssueToken(token::IssueArgs),

    /// Validate a token and print its claims
    InspectToken(token::InspectArgs),
}
