//! Connection probe for a saved session.

use std::path::Path;

use anyhow::Result;

use upstox_core::api::BrokerApi;
use upstox_core::auth::{TokenManager, DEFAULT_STATE};
use upstox_core::tools::render;

pub async fn run<A: BrokerApi>(mut manager: TokenManager<A>, token_path: &Path) -> Result<()> {
    if !manager.restore(token_path) {
        println!("🔐 Not authenticated. Run `upstox login`, or visit:");
        println!("{}", manager.authorization_url(DEFAULT_STATE));
        return Ok(());
    }

    println!("✅ Loaded saved token from {}", token_path.display());
    let status = manager.check_connection().await;
    println!("{}", render::connection(&status));
    if !status.is_connected() {
        return Ok(());
    }

    match manager.fetch_market_status().await {
        Ok(statuses) => println!("\n{}", render::market_status(&statuses)),
        Err(e) => {
            println!("⚠️  Could not fetch market status: {}", e);
            super::print_guidance(&e);
        }
    }
    Ok(())
}
