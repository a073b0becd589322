//! Subcommand implementations

use std::convert::Infallible;

use clap::Args;

use airgate_core::SecretKey;

pub mod sign;
pub mod validate;

/// Shared secret provisioning
#[derive(Args, Debug)]
pub struct SecretArgs {
    /// HMAC shared secret
    #[arg(long, env = "AIRGATE_SECRET", hide_env_values = true, value_parser = parse_secret)]
    pub secret: SecretKey,
}

// Wrapped at parse time so `Debug` on the arguments never prints it
fn parse_secret(raw: &str) -> Result<SecretKey, Infallible> {
    Ok(SecretKey::from(raw))
}
