//! Console commands.

pub mod config;
pub mod login;
pub mod status;

use upstox_core::api::ApiError;
use upstox_core::Error;

const INVALID_CODE_TIPS: &[&str] = &[
    "Get a fresh authorization code (old ones expire quickly)",
    "Make sure the redirect URI in your Upstox app settings matches exactly",
    "Copy only the code parameter, no extra characters",
    "Complete the process quickly (within 5 minutes)",
];

const CREDENTIAL_TIPS: &[&str] = &[
    "Verify API key and secret in your .env file",
    "Make sure your Upstox app is approved and active",
    "Check that the redirect URI matches your app settings",
];

const NO_TIPS: &[&str] = &[];

const CONFIGURATION_TIPS: &[&str] = &[
    "UPSTOX_API_KEY=your_api_key",
    "UPSTOX_API_SECRET=your_api_secret",
    "UPSTOX_REDIRECT_URI=http://localhost:8080  (optional)",
];

/// Heading and hints for an error the user can act on
pub fn guidance(err: &Error) -> Option<(&'static str, &'static [&'static str])> {
    match err {
        Error::Configuration(_) => Some((
            "Set these in the environment or a .env file:",
            CONFIGURATION_TIPS,
        )),
        Error::AuthExchange(ApiError::InvalidAuthCode { .. }) => {
            Some(("Troubleshooting tips:", INVALID_CODE_TIPS))
        }
        Error::AuthExchange(ApiError::Unauthorized | ApiError::AccessDenied(_))
        | Error::Remote(ApiError::Unauthorized) => {
            Some(("Check your credentials:", CREDENTIAL_TIPS))
        }
        Error::NotAuthenticated => Some(("Run `upstox login` first.", NO_TIPS)),
        _ => None,
    }
}

pub fn print_guidance(err: &Error) {
    if let Some((heading, tips)) = guidance(err) {
        eprintln!("\n💡 {}", heading);
        for (i, tip) in tips.iter().enumerate() {
            eprintln!("   {}. {}", i + 1, tip);
        }
    }
}
