//! Static stock directory used to map symbols to instrument keys.
//!
//! The data file is a JSON object of categories, each a list of
//! `{"symbol", "instrument_key", "name"}` entries. Categories keep the
//! order they have in the file.

use std::path::Path;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Stock directory file name, relative to the working directory
pub const DEFAULT_STOCK_FILE: &str = "categorized_stocks.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockEntry {
    pub symbol: String,
    pub instrument_key: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// A directory entry together with the category it was found in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockMatch {
    pub symbol: String,
    pub name: String,
    pub instrument_key: String,
    pub category: String,
}

impl StockMatch {
    fn new(category: &str, entry: &StockEntry) -> Self {
        Self {
            symbol: entry.symbol.clone(),
            name: entry.name.clone().unwrap_or_else(|| "N/A".to_string()),
            instrument_key: entry.instrument_key.clone(),
            category: category.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StockDirectory {
    categories: IndexMap<String, Vec<StockEntry>>,
}

impl StockDirectory {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse stock directory")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read stock directory {}", path.display()))?;
        Self::from_json(&contents)
    }

    pub fn len(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entries(&self) -> impl Iterator<Item = (&str, &StockEntry)> {
        self.categories
            .iter()
            .flat_map(|(category, stocks)| stocks.iter().map(move |s| (category.as_str(), s)))
    }

    /// Entries whose symbol equals `symbol`, ignoring case, in every category
    pub fn find_symbol(&self, symbol: &str) -> Vec<StockMatch> {
        let wanted = symbol.to_uppercase();
        self.entries()
            .filter(|(_, s)| s.symbol.to_uppercase() == wanted)
            .map(|(category, s)| StockMatch::new(category, s))
            .collect()
    }

    /// Entries whose symbol or name contains `term`, ignoring case, up to `limit`
    pub fn search(&self, term: &str, limit: usize) -> Vec<StockMatch> {
        let needle = term.to_lowercase();
        self.entries()
            .filter(|(_, s)| {
                s.symbol.to_lowercase().contains(&needle)
                    || s
                        .name
                        .as_deref()
                        .map(|n| n.to_lowercase().contains(&needle))
                        .unwrap_or(false)
            })
            .take(limit)
            .map(|(category, s)| StockMatch::new(category, s))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "large_cap": [
            {"symbol": "INFY", "instrument_key": "NSE_EQ|INE009A01021", "name": "Infosys Limited"},
            {"symbol": "TCS", "instrument_key": "NSE_EQ|INE467B01029", "name": "Tata Consultancy Services"},
            {"symbol": "TATAMOTORS", "instrument_key": "NSE_EQ|INE155A01022", "name": "Tata Motors"}
        ],
        "bse": [
            {"symbol": "infy", "instrument_key": "BSE_EQ|INE009A01021"}
        ]
    }"#;

    fn directory() -> StockDirectory {
        StockDirectory::from_json(SAMPLE).expect("sample directory")
    }

    #[test]
    fn test_len() {
        assert_eq!(directory().len(), 4);
        assert!(StockDirectory::default().is_empty());
    }

    #[test]
    fn test_find_symbol_is_case_insensitive_across_categories() {
        let matches = directory().find_symbol("Infy");
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].category, "large_cap");
        assert_eq!(matches[0].instrument_key, "NSE_EQ|INE009A01021");
        assert_eq!(matches[1].category, "bse");
        assert_eq!(matches[1].name, "N/A");

        assert!(directory().find_symbol("WIPRO").is_empty());
    }

    #[test]
    fn test_search_by_symbol_or_name_with_limit() {
        let dir = directory();
        let tata = dir.search("tata", 10);
        assert_eq!(
            tata.iter().map(|m| m.symbol.as_str()).collect::<Vec<_>>(),
            vec!["TCS", "TATAMOTORS"]
        );

        assert_eq!(dir.search("tata", 1).len(), 1);
        assert!(dir.search("zzz", 10).is_empty());
    }

    #[test]
    fn test_categories_keep_file_order() {
        let dir = StockDirectory::from_json(
            r#"{
                "zeta": [{"symbol": "INFY", "instrument_key": "NSE_EQ|INE009A01021"}],
                "alpha": [{"symbol": "INFY", "instrument_key": "BSE_EQ|INE009A01021"}]
            }"#,
        )
        .unwrap();

        let first = dir.search("inf", 1);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].category, "zeta");

        let categories: Vec<String> =
            dir.find_symbol("infy").into_iter().map(|m| m.category).collect();
        assert_eq!(categories, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(StockDirectory::load(&dir.path().join("none.json")).is_err());
    }
}
