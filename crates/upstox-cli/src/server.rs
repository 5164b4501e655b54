//! Stdio tool server.
//!
//! Speaks newline-delimited JSON-RPC 2.0 in the MCP style: one request per
//! stdin line, one response per stdout line.
//!
//! # Handled Methods
//!
//! - `initialize` -- server info and the `tools` capability.
//! - `notifications/*` -- accepted silently (no response).
//! - `ping` -- empty result.
//! - `tools/list` -- every tool with its JSON input schema.
//! - `tools/call` -- runs a tool and returns its text as one content item.
//! - Anything else -- `-32601 Method not found`.

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

use upstox_core::api::BrokerApi;
use upstox_core::auth::TokenManager;
use upstox_core::stocks::StockDirectory;
use upstox_core::tools::{UpstoxTools, DEFAULT_SEARCH_LIMIT};

const SERVER_NAME: &str = "upstox-bridge";

/// Protocol revision reported when the client does not ask for one
const DEFAULT_PROTOCOL_VERSION: &str = "2025-03-26";

const PARSE_ERROR: i64 = -32700;
const METHOD_NOT_FOUND: i64 = -32601;
const INVALID_PARAMS: i64 = -32602;

/// Name, description and argument schema of every tool
fn tool_definitions() -> Vec<Value> {
    let no_args = json!({"type": "object", "properties": {}});
    let instrument_key = json!({
        "type": "object",
        "properties": {
            "instrument_key": {
                "type": "string",
                "description": "The instrument key (e.g., 'NSE_EQ|INE009A01021')"
            }
        },
        "required": ["instrument_key"]
    });

    vec![
        json!({"name": "get_user_profile", "description": "Get Upstox user profile information", "inputSchema": no_args}),
        json!({"name": "get_holdings", "description": "Get Upstox portfolio holdings", "inputSchema": no_args}),
        json!({"name": "get_positions", "description": "Get Upstox trading positions", "inputSchema": no_args}),
        json!({"name": "get_market_status", "description": "Get market status for the configured exchanges", "inputSchema": no_args}),
        json!({"name": "check_connection", "description": "Check whether the saved Upstox token still works", "inputSchema": no_args}),
        json!({"name": "get_stock_price", "description": "Get the current stock price for a given instrument key", "inputSchema": instrument_key}),
        json!({"name": "get_full_market_quote", "description": "Get detailed market quote including OHLC data for a given instrument key", "inputSchema": instrument_key}),
        json!({
            "name": "get_instrument_key",
            "description": "Get the instrument key for a stock symbol",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "symbol": {"type": "string", "description": "The stock symbol (e.g., 'RELIANCE', 'TCS', 'INFY')"}
                },
                "required": ["symbol"]
            }
        }),
        json!({
            "name": "search_stocks",
            "description": "Search for stocks by symbol or name",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "search_term": {"type": "string", "description": "Search query (symbol or company name)"},
                    "limit": {"type": "integer", "description": "Maximum number of results to return", "default": DEFAULT_SEARCH_LIMIT}
                },
                "required": ["search_term"]
            }
        }),
    ]
}

fn make_result(id: &Value, result: Value) -> Value {
    json!({"jsonrpc": "2.0", "id": id, "result": result})
}

fn make_error(id: &Value, code: i64, message: &str) -> Value {
    json!({"jsonrpc": "2.0", "id": id, "error": {"code": code, "message": message}})
}

fn string_arg<'a>(args: &'a Value, name: &str) -> std::result::Result<&'a str, String> {
    args.get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| format!("Missing required argument: {}", name))
}

async fn call_tool<A: BrokerApi>(
    tools: &UpstoxTools<A>,
    name: &str,
    args: &Value,
) -> std::result::Result<String, (i64, String)> {
    let invalid = |msg: String| (INVALID_PARAMS, msg);
    let text = match name {
        "get_user_profile" => tools.get_user_profile().await,
        "get_holdings" => tools.get_holdings().await,
        "get_positions" => tools.get_positions().await,
        "get_market_status" => tools.get_market_status().await,
        "check_connection" => tools.check_connection().await,
        "get_stock_price" => {
            let key = string_arg(args, "instrument_key").map_err(invalid)?;
            tools.get_stock_price(key).await
        }
        "get_full_market_quote" => {
            let key = string_arg(args, "instrument_key").map_err(invalid)?;
            tools.get_full_market_quote(key).await
        }
        "get_instrument_key" => {
            let symbol = string_arg(args, "symbol").map_err(invalid)?;
            tools.get_instrument_key(symbol)
        }
        "search_stocks" => {
            let term = string_arg(args, "search_term").map_err(invalid)?;
            let limit = args
                .get("limit")
                .and_then(Value::as_u64)
                .map(|l| l as usize)
                .unwrap_or(DEFAULT_SEARCH_LIMIT);
            tools.search_stocks(term, limit)
        }
        other => return Err((INVALID_PARAMS, format!("Unknown tool: {}", other))),
    };
    Ok(text)
}

/// Answer one line of input. `None` means nothing should be written back.
pub async fn handle_message<A: BrokerApi>(tools: &UpstoxTools<A>, line: &str) -> Option<Value> {
    let request: Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(e) => {
            debug!(error = %e, "Malformed JSON-RPC message");
            return Some(make_error(&Value::Null, PARSE_ERROR, "Parse error"));
        }
    };

    let method = request.get("method").and_then(Value::as_str).unwrap_or("");
    if method.starts_with("notifications/") {
        return None;
    }

    let id = request.get("id").cloned().unwrap_or(Value::Null);
    let params = request.get("params").cloned().unwrap_or(Value::Null);

    let response = match method {
        "initialize" => {
            let version = params
                .get("protocolVersion")
                .and_then(Value::as_str)
                .unwrap_or(DEFAULT_PROTOCOL_VERSION);
            make_result(
                &id,
                json!({
                    "protocolVersion": version,
                    "capabilities": {"tools": {}},
                    "serverInfo": {"name": SERVER_NAME, "version": env!("CARGO_PKG_VERSION")}
                }),
            )
        }
        "ping" => make_result(&id, json!({})),
        "tools/list" => make_result(&id, json!({"tools": tool_definitions()})),
        "tools/call" => {
            let name = params.get("name").and_then(Value::as_str).unwrap_or("");
            let args = params.get("arguments").cloned().unwrap_or_else(|| json!({}));
            debug!(tool = name, "tools/call");
            match call_tool(tools, name, &args).await {
                Ok(text) => make_result(
                    &id,
                    json!({"content": [{"type": "text", "text": text}], "isError": false}),
                ),
                Err((code, message)) => make_error(&id, code, &message),
            }
        }
        other => make_error(&id, METHOD_NOT_FOUND, &format!("Method not found: {}", other)),
    };
    Some(response)
}

/// The stock directory, or `None` when it cannot be read. Lookup tools then report it missing.
fn load_stocks(path: &Path) -> Option<StockDirectory> {
    match StockDirectory::load(path) {
        Ok(stocks) => {
            info!(count = stocks.len(), path = %path.display(), "Loaded stock directory");
            Some(stocks)
        }
        Err(e) => {
            warn!(error = %e, "Stock directory unavailable");
            None
        }
    }
}

/// Restore the saved session, load the stock directory and serve until stdin closes
pub async fn serve<A: BrokerApi>(
    mut manager: TokenManager<A>,
    token_path: &Path,
    stock_path: &Path,
) -> Result<()> {
    if !manager.restore(token_path) {
        warn!(path = %token_path.display(), "No saved token; account tools will report not authenticated");
    }

    let tools = UpstoxTools::new(manager, load_stocks(stock_path));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    info!("Tool server ready on stdio");

    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let Some(response) = handle_message(&tools, trimmed).await else {
            continue;
        };
        let mut serialized = serde_json::to_string(&response)?;
        serialized.push('\n');
        stdout.write_all(serialized.as_bytes()).await?;
        stdout.flush().await?;
    }

    info!("stdin closed, shutting down");
    Ok(())
}
