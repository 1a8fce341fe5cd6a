//! Ping command handler

use crate::ai::RelayClient;
use crate::cli::commands::PingArgs;
use crate::core::config::Settings;
use crate::error::Result;

/// Handle `prplease ping`
pub async fn handle_ping(args: PingArgs) -> Result<()> {
    let service_url = match args.service_url {
        Some(url) => url,
        None => Settings::load()?.service_url,
    };

    println!("Checking connection to {}...", service_url);
    let pong = RelayClient::new(service_url).ping().await?;
    println!("✓ Service connected ({}: {})", pong.status, pong.message);
    Ok(())
}
