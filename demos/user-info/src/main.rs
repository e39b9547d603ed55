//! Untappd user lookup demo.
//!
//! Fetches a user profile with credentials supplied on the command line:
//!
//! ```sh
//! user-info <client-id> <client-secret> <user-name>
//! ```

// Demo-specific lint allowances
#![allow(missing_docs)]
#![allow(clippy::print_stdout)]
#![allow(clippy::print_stderr)]

use serde::Deserialize;
use untappd::{Client, Method};

// ============================================================================
// Destination types
// ============================================================================

/// Outer envelope of a `/user/info` response.
#[derive(Debug, Deserialize)]
struct UserEnvelope {
    response: UserResponse,
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    user: User,
}

/// The subset of the profile this demo prints.
#[derive(Debug, Deserialize)]
struct User {
    user_name: String,
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    #[serde(default)]
    stats: UserStats,
}

#[derive(Debug, Default, Deserialize)]
struct UserStats {
    #[serde(default)]
    total_checkins: u64,
    #[serde(default)]
    total_badges: u64,
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(client_id), Some(client_secret), Some(user_name)) =
        (args.next(), args.next(), args.next())
    else {
        eprintln!("usage: user-info <client-id> <client-secret> <user-name>");
        std::process::exit(2);
    };

    let client = Client::new(client_id, client_secret)?;

    let envelope: UserEnvelope = client
        .request(
            Method::Get,
            &format!("user/info/{user_name}"),
            &[("compact", "true")],
        )
        .await?;

    let user = envelope.response.user;
    println!("{} ({} {})", user.user_name, user.first_name, user.last_name);
    println!(
        "checkins: {}, badges: {}",
        user.stats.total_checkins, user.stats.total_badges
    );

    Ok(())
}

// ============================================================================
// Tests using wiremock
// ============================================================================
