//! Mints session tokens for operators and scripted clients.

use anyhow::{Context, Result};
use chordscout_server::server::{SessionKeys, UserType};
use clap::{Parser, ValueEnum};
use std::time::Duration;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TokenUserType {
    Guest,
    Regular,
}

impl From<TokenUserType> for UserType {
    fn from(value: TokenUserType) -> Self {
        match value {
            TokenUserType::Guest => UserType::Guest,
            TokenUserType::Regular => UserType::Regular,
        }
    }
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Id placed in the token subject.
    pub user_id: String,

    /// Secret the server verifies tokens with.
    #[clap(long, env = "CHORDSCOUT_SESSION_SECRET", hide_env_values = true)]
    pub session_secret: String,

    #[clap(long, value_enum, default_value = "regular")]
    pub user_type: TokenUserType,

    /// Token lifetime in hours.
    #[clap(long, default_value_t = 24)]
    pub ttl_hours: u64,
}

fn main() -> Result<()> {
    let args = CliArgs::parse();

    let keys = SessionKeys::new(&args.session_secret);
    let token = keys
        .mint(
            &args.user_id,
            args.user_type.into(),
            Duration::from_secs(args.ttl_hours * 3600),
        )
        .context("Failed to sign session token")?;

    println!("{}", token);
    Ok(())
}
