//! Interactive OAuth bootstrap.

use std::path::Path;

use anyhow::{Context, Result};
use dialoguer::{Confirm, Input};
use tracing::debug;

use upstox_core::api::BrokerApi;
use upstox_core::auth::{extract_authorization_code, TokenManager};
use upstox_core::tools::render;

use super::print_guidance;

/// Codes shorter than this are probably truncated
const MIN_CODE_LENGTH: usize = 10;

/// What a pasted authorization code looks like
#[derive(Debug, PartialEq, Eq)]
pub enum CodeCheck {
    Empty,
    TooShort,
    /// Pasted a URL or query string. Carries the code found inside, if any.
    UrlFragment(Option<String>),
    Ready,
}

/// Classify a code pasted in debug mode
pub fn inspect_code(code: &str) -> CodeCheck {
    if code.is_empty() {
        CodeCheck::Empty
    } else if code.contains('&') || code.contains('?') {
        let extracted = Some(extract_authorization_code(code))
            .filter(|_| code.contains("code="))
            .filter(|c| !c.is_empty());
        CodeCheck::UrlFragment(extracted)
    } else if code.chars().count() < MIN_CODE_LENGTH {
        CodeCheck::TooShort
    } else {
        CodeCheck::Ready
    }
}

/// `abcdefghij...uvwxyz1234`, for echoing a code back without spilling all of it
fn abbreviate(code: &str) -> String {
    let chars: Vec<char> = code.chars().collect();
    if chars.len() <= 20 {
        return code.to_string();
    }
    let head: String = chars[..10].iter().collect();
    let tail: String = chars[chars.len() - 10..].iter().collect();
    format!("{}...{}", head, tail)
}

fn prompt_code() -> Result<String> {
    let raw: String = Input::new()
        .with_prompt("Enter your authorization code")
        .allow_empty(true)
        .interact_text()
        .context("Failed to read authorization code")?;
    Ok(extract_authorization_code(&raw))
}

/// Prompt until the code looks plausible, offering to extract it from a URL
fn prompt_code_checked() -> Result<String> {
    loop {
        let code: String = Input::new()
            .with_prompt("Enter authorization code")
            .allow_empty(true)
            .interact_text()
            .context("Failed to read authorization code")?;
        let code = code.trim().to_string();

        match inspect_code(&code) {
            CodeCheck::Empty => println!("❌ No code entered. Please try again."),
            CodeCheck::TooShort => {
                println!("⚠️  Code seems too short. Make sure you copied the full code.");
                if Confirm::new()
                    .with_prompt("Continue anyway?")
                    .default(false)
                    .interact()?
                {
                    return Ok(code);
                }
            }
            CodeCheck::UrlFragment(extracted) => {
                println!("⚠️  Code contains URL characters. Copy ONLY the code part.");
                if let Some(extracted) = extracted {
                    println!("🔧 Extracted code: {}", extracted);
                    if Confirm::new()
                        .with_prompt("Use extracted code?")
                        .default(true)
                        .interact()?
                    {
                        return Ok(extracted);
                    }
                }
            }
            CodeCheck::Ready => return Ok(code),
        }
    }
}

fn print_debug_banner<A: BrokerApi>(manager: &TokenManager<A>) {
    let creds = manager.credentials();
    println!("📋 Current Configuration:");
    println!("  API Key: {}", creds.masked_api_key());
    println!("  API Secret: {}", creds.masked_api_secret());
    println!("  Redirect URI: {}", creds.redirect_uri());
    println!();
    println!("🚨 IMPORTANT NOTES:");
    println!("1. Use a FRESH authorization URL (don't reuse old ones)");
    println!("2. Complete authorization within 5 minutes");
    println!("3. Copy ONLY the code parameter (no spaces/extra chars)");
    println!("4. Each code can only be used ONCE");
    println!();
}

pub async fn run<A: BrokerApi>(
    mut manager: TokenManager<A>,
    token_path: &Path,
    state: &str,
    debug_mode: bool,
) -> Result<()> {
    println!("🔐 Upstox Authentication");
    println!("{}", "=".repeat(40));

    if manager.restore(token_path) {
        let status = manager.check_connection().await;
        println!("{}", render::connection(&status));
        if status.is_connected() {
            let again = Confirm::new()
                .with_prompt("A saved session is still valid. Re-authenticate?")
                .default(false)
                .interact()?;
            if !again {
                return Ok(());
            }
        }
    }

    if debug_mode {
        print_debug_banner(&manager);
    }

    println!("\n🔗 Step 1: Visit this URL to authorize:");
    println!("{}", manager.authorization_url(state));
    println!("\n📋 Step 2: After authorization, you'll be redirected to:");
    println!(
        "{}/?code=XXXXX&state={}",
        manager.credentials().redirect_uri().trim_end_matches('/'),
        state
    );
    println!("\n📝 Step 3: Copy the code from the callback URL (or paste the whole URL)");

    let code = if debug_mode {
        prompt_code_checked()?
    } else {
        prompt_code()?
    };
    if code.is_empty() {
        println!("❌ No code provided. Exiting.");
        return Ok(());
    }
    debug!(code = %abbreviate(&code), "Exchanging authorization code");
    println!("\n🔄 Exchanging code {} for an access token...", abbreviate(&code));

    let outcome = match manager.exchange_code(&code).await {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("\n❌ {}", e);
            print_guidance(&e);
            return Err(e.into());
        }
    };

    println!("✅ Successfully authenticated!");
    println!("👤 User: {}", outcome.user.user_name);
    println!("📧 Email: {}", outcome.user.email);
    println!(
        "🕒 Token expires at: {}",
        outcome.session.expires_at().unwrap_or("Unknown")
    );

    if manager.persist(token_path) {
        println!("💾 Token saved to {}", token_path.display());
    } else {
        println!("⚠️  Could not save token to {}", token_path.display());
    }

    println!("\n🧪 Testing connection...");
    match manager.fetch_profile().await {
        Ok(profile) => println!("{}", render::profile(&profile)),
        Err(e) => println!("⚠️  Could not fetch profile: {}", e),
    }

    println!();
    match manager.fetch_market_status().await {
        Ok(statuses) => println!("{}", render::market_status(&statuses)),
        Err(e) => println!("⚠️  Could not fetch market status: {}", e),
    }

    println!("\n🎉 Authentication completed successfully!");
    Ok(())
}
