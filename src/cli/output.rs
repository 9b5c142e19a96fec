//! output formatting for scriptable CLI output
//!
//! uses JSON-RPC 2.0 format for machine-readable output:
//! - success: {"jsonrpc": "2.0", "result": {...}, "id": null}
//! - error: {"jsonrpc": "2.0", "error": {"code": N, "message": "...", "data": {...}}, "id": null}

use serde::Serialize;
use std::io::IsTerminal;

use crate::geometry::{Rect, Size};

const JSONRPC_VERSION: &str = "2.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// human-readable text output
    Text,
    /// machine-readable JSON-RPC 2.0 output
    Json,
    /// no output on success (errors still go to stderr)
    Quiet,
}

impl OutputMode {
    /// priority: quiet > json > no_json > auto-detect
    pub fn from_flags(json: bool, no_json: bool, quiet: bool) -> Self {
        if quiet {
            return Self::Quiet;
        }
        if json {
            return Self::Json;
        }
        if no_json {
            return Self::Text;
        }
        // auto-detect: JSON when stdout is not a TTY (piped)
        if !std::io::stdout().is_terminal() {
            Self::Json
        } else {
            Self::Text
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json)
    }
}

#[derive(Serialize)]
pub struct JsonRpcResponse<T: Serialize> {
    pub jsonrpc: &'static str,
    pub result: T,
    /// null for CLI responses (no request id)
    pub id: Option<String>,
}

impl<T: Serialize> JsonRpcResponse<T> {
    pub fn new(result: T) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            result,
            id: None,
        }
    }
}

#[derive(Serialize)]
pub struct JsonRpcError {
    pub jsonrpc: &'static str,
    pub error: RpcError,
    pub id: Option<String>,
}

#[derive(Serialize)]
pub struct RpcError {
    /// exit code offset into the application error range
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ErrorData>,
}

#[derive(Serialize)]
pub struct ErrorData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl JsonRpcError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            error: RpcError {
                code: to_jsonrpc_code(code),
                message: message.into(),
                data: None,
            },
            id: None,
        }
    }

    pub fn with_suggestions(mut self, suggestions: Vec<String>) -> Self {
        if !suggestions.is_empty() {
            self.data_mut().suggestions = Some(suggestions);
        }
        self
    }

    pub fn with_details(mut self, details: Vec<String>) -> Self {
        if !details.is_empty() {
            self.data_mut().details = Some(details);
        }
        self
    }

    fn data_mut(&mut self) -> &mut ErrorData {
        self.error.data.get_or_insert(ErrorData {
            suggestions: None,
            details: None,
        })
    }
}

/// JSON-RPC reserves -32000 to -32099 for application errors
fn to_jsonrpc_code(exit_code: i32) -> i32 {
    -32000 - exit_code
}

// ============================================================================
// Result data structures for each command
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameData {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl From<Rect> for FrameData {
    fn from(rect: Rect) -> Self {
        Self {
            x: rect.origin.x,
            y: rect.origin.y,
            width: rect.size.width,
            height: rect.size.height,
        }
    }
}

#[derive(Serialize)]
pub struct PlacedChild {
    pub id: String,
    /// null when no rule matched
    pub frame: Option<FrameData>,
}

#[derive(Serialize)]
pub struct PlaceData {
    pub size: Size,
    pub children: Vec<PlacedChild>,
}

#[derive(Serialize)]
pub struct OrderedChild {
    pub id: String,
    pub z_index: i32,
}

#[derive(Serialize)]
pub struct OrderData {
    /// bottom-most first
    pub children: Vec<OrderedChild>,
}

#[derive(Serialize)]
pub struct RuleData {
    pub index: usize,
    pub when: String,
    pub position: String,
    pub matched: bool,
}

#[derive(Serialize)]
pub struct ExplainedChild {
    pub id: String,
    /// index of the winning rule, null when none matched
    pub winner: Option<usize>,
    pub frame: Option<FrameData>,
    pub rules: Vec<RuleData>,
}

#[derive(Serialize)]
pub struct ExplainData {
    pub size: Size,
    pub children: Vec<ExplainedChild>,
}

#[derive(Serialize)]
pub struct VerifyData {
    pub path: String,
    pub valid: bool,
    pub children: usize,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// print JSON-RPC success response to stdout
pub fn print_json<T: Serialize>(data: &T) {
    let response = JsonRpcResponse::new(data);
    if let Ok(json) = serde_json::to_string(&response) {
        println!("{}", json);
    }
}

/// print JSON-RPC error to stdout
pub fn print_json_error(error: &JsonRpcError) {
    if let Ok(json) = serde_json::to_string(error) {
        println!("{}", json);
    }
}
