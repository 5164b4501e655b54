//! `upstox config`: print the configuration, optionally updating it first.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use upstox_core::config::Config;

#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Where the access token is saved
    #[arg(long)]
    pub token_file: Option<PathBuf>,

    /// Stock directory JSON file used by the lookup tools
    #[arg(long)]
    pub stock_data: Option<PathBuf>,

    /// Exchanges reported by market status, comma separated
    #[arg(long, value_delimiter = ',')]
    pub exchanges: Option<Vec<String>>,

    /// Override the API host
    #[arg(long)]
    pub api_base_url: Option<String>,
}

impl ConfigArgs {
    fn has_updates(&self) -> bool {
        self.token_file.is_some()
            || self.stock_data.is_some()
            || self.exchanges.is_some()
            || self.api_base_url.is_some()
    }

    /// Copy the given values onto `config`
    fn apply(&self, config: &mut Config) {
        if let Some(path) = &self.token_file {
            config.token_file = Some(path.clone());
        }
        if let Some(path) = &self.stock_data {
            config.stock_data_file = Some(path.clone());
        }
        if let Some(exchanges) = &self.exchanges {
            config.market_exchanges = exchanges
                .iter()
                .map(|e| e.trim().to_uppercase())
                .filter(|e| !e.is_empty())
                .collect();
        }
        if let Some(url) = &self.api_base_url {
            config.api_base_url = Some(url.clone());
        }
    }
}

pub fn run(mut config: Config, args: &ConfigArgs) -> Result<()> {
    if args.has_updates() {
        args.apply(&mut config);
        config.save()?;
        println!("💾 Saved {}", Config::config_path()?.display());
    } else {
        println!("📋 {}", Config::config_path()?.display());
    }
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_updates() {
        let args = ConfigArgs {
            token_file: Some(PathBuf::from("state/token.json")),
            stock_data: None,
            exchanges: Some(vec!["nse".to_string(), " mcx ".to_string(), String::new()]),
            api_base_url: None,
        };
        assert!(args.has_updates());

        let mut config = Config::default();
        args.apply(&mut config);
        assert_eq!(config.token_path(), PathBuf::from("state/token.json"));
        assert_eq!(config.market_exchanges, vec!["NSE".to_string(), "MCX".to_string()]);
        assert_eq!(config.stock_data_file, None);
    }

    #[test]
    fn test_no_updates() {
        let args = ConfigArgs {
            token_file: None,
            stock_data: None,
            exchanges: None,
            api_base_url: None,
        };
        assert!(!args.has_updates());
    }
}
