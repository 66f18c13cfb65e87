//! Larder MCP Server
//!
//! Newline-delimited JSON-RPC 2.0 over stdio. Every unit function in the
//! registry is exposed as a tool, plus two discovery tools:
//! - help: Documentation for one function
//! - list_functions: All functions, optionally by category
//!
//! Logs go to stderr; stdout carries only protocol messages.

mod config;

use config::{ServerConfig, DEFAULT_LOG_FILTER, LOG_FILTER_VAR};
use larder_core::{LarderError, Value};
use larder_plugin::{EvalContext, FunctionMeta, PluginRegistry};
use larder_units::{format_quantity_with, load_units_library, lookup_unit, FormatOptions};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value as JsonValue};
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

const PROTOCOL_VERSION: &str = "2025-11-25";
const SERVER_NAME: &str = "larder";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

const PARSE_ERROR: i32 = -32700;
const METHOD_NOT_FOUND: i32 = -32601;
const INVALID_PARAMS: i32 = -32602;

// MCP Protocol types
#[derive(Debug, Deserialize)]
struct McpRequest {
    #[allow(dead_code)]
    jsonrpc: String,
    id: Option<JsonValue>,
    method: String,
    #[serde(default)]
    params: Option<JsonValue>,
}

#[derive(Debug, Serialize)]
struct McpResponse {
    jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<McpError>,
}

#[derive(Debug, Serialize)]
struct McpError {
    code: i32,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<JsonValue>,
}

impl McpError {
    fn invalid_params(message: impl Into<String>) -> Self {
        McpError { code: INVALID_PARAMS, message: message.into(), data: None }
    }
}

impl McpResponse {
    fn from_result(id: Option<JsonValue>, result: Result<JsonValue, McpError>) -> Self {
        match result {
            Ok(r) => McpResponse { jsonrpc: "2.0".to_string(), id, result: Some(r), error: None },
            Err(e) => McpResponse { jsonrpc: "2.0".to_string(), id, result: None, error: Some(e) },
        }
    }
}

/// Registry plus the settings every call is evaluated with
struct Server {
    registry: Arc<PluginRegistry>,
    config: ServerConfig,
}

impl Server {
    fn new(config: ServerConfig) -> Self {
        let registry = load_units_library(PluginRegistry::new());
        Server { registry: Arc::new(registry), config }
    }

    fn context(&self) -> EvalContext {
        EvalContext::new(self.registry.clone())
            .with_locale(self.config.locale.clone())
            .with_significant_digits(self.config.significant_digits)
    }

    /// Process one input line; `None` when nothing should be written back
    fn handle_line(&self, line: &str) -> Option<McpResponse> {
        let request: McpRequest = match serde_json::from_str(line) {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "error parsing request");
                return Some(McpResponse::from_result(
                    None,
                    Err(McpError { code: PARSE_ERROR, message: format!("Parse error: {}", e), data: None }),
                ));
            }
        };

        debug!(method = %request.method, "processing");
        let response = self.handle_request(&request);

        // Notifications (no id) should NOT receive a response
        if request.id.is_none() {
            debug!(method = %request.method, "notification processed (no response)");
            return None;
        }
        Some(response)
    }

    fn handle_request(&self, request: &McpRequest) -> McpResponse {
        let result = match request.method.as_str() {
            // Lifecycle
            "initialize" => self.handle_initialize(&request.params),
            "initialized" | "notifications/initialized" => Ok(json!({})),
            "ping" => Ok(json!({})),

            // Tools
            "tools/list" => self.handle_tools_list(),
            "tools/call" => self.handle_tool_call(&request.params),

            _ => Err(McpError {
                code: METHOD_NOT_FOUND,
                message: format!("Method not found: {}", request.method),
                data: None,
            }),
        };

        McpResponse::from_result(request.id.clone(), result)
    }

    fn handle_initialize(&self, params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
        let client_info = params.as_ref()
            .and_then(|p| p.get("clientInfo"))
            .and_then(|c| c.get("name"))
            .and_then(|n| n.as_str())
            .unwrap_or("unknown");

        // Use client's protocol version for compatibility
        let client_protocol = params.as_ref()
            .and_then(|p| p.get("protocolVersion"))
            .and_then(|v| v.as_str())
            .unwrap_or(PROTOCOL_VERSION);

        info!(client = client_info, protocol = client_protocol, "client connected");

        Ok(json!({
            "protocolVersion": client_protocol,
            "serverInfo": {
                "name": SERVER_NAME,
                "version": SERVER_VERSION,
                "description": "Cooking unit conversion and quantity formatting"
            },
            "capabilities": {
                "tools": {
                    "listChanged": false
                }
            },
            "instructions": "Larder converts ingredient amounts between kitchen units (mass, weight, volume, piece) and formats them for recipes. Grams and ounces are separate systems and never convert into each other. Use 'list_functions' to discover tools and 'help' for details."
        }))
    }

    fn handle_tools_list(&self) -> Result<JsonValue, McpError> {
        let mut tools: Vec<JsonValue> = self.registry.function_metas().iter().map(tool_schema).collect();

        tools.push(json!({
            "name": "help",
            "description": "Get documentation for a Larder function.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "name": { "type": "string", "description": "Function name" }
                },
                "required": ["name"]
            }
        }));
        tools.push(json!({
            "name": "list_functions",
            "description": "List all available functions, optionally by category.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "category": { "type": "string", "description": "Filter by category, e.g. units" }
                }
            }
        }));

        Ok(json!({ "tools": tools }))
    }

    fn handle_tool_call(&self, params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
        let params = params.as_ref().ok_or_else(|| McpError::invalid_params("Missing params"))?;

        let name = params.get("name")
            .and_then(|v| v.as_str())
            .ok_or_else(|| McpError::invalid_params("Missing tool name"))?;

        let empty = Map::new();
        let args = match params.get("arguments") {
            None | Some(JsonValue::Null) => &empty,
            Some(JsonValue::Object(obj)) => obj,
            Some(_) => return Err(McpError::invalid_params("Tool arguments must be an object")),
        };

        match name {
            "help" => self.tool_help(args),
            "list_functions" => self.tool_list_functions(args),
            _ => self.tool_function(name, args),
        }
    }

    fn tool_function(&self, name: &str, args: &Map<String, JsonValue>) -> Result<JsonValue, McpError> {
        let meta = self.registry
            .get_function(name)
            .map(|f| f.meta())
            .ok_or_else(|| McpError::invalid_params(format!("Unknown tool: {}", name)))?;

        let values = positional_args(&meta, args)?;
        let ctx = self.context();
        let result = self.registry.call_function(meta.name, &values, &ctx);

        Ok(tool_result(&result, &ctx))
    }

    fn tool_help(&self, args: &Map<String, JsonValue>) -> Result<JsonValue, McpError> {
        let name = args.get("name")
            .and_then(|v| v.as_str())
            .ok_or_else(|| McpError::invalid_params("Missing name argument"))?;
        let help = self.registry.help(name);

        Ok(json!({
            "content": [{ "type": "text", "text": format_help(&help) }],
            "data": help.to_json(),
            "isError": help.is_error()
        }))
    }

    fn tool_list_functions(&self, args: &Map<String, JsonValue>) -> Result<JsonValue, McpError> {
        let category = args.get("category").and_then(|v| v.as_str());
        let functions = self.registry.list_functions(category);
        let count = functions.as_list().map_or(0, |l| l.len());

        Ok(json!({
            "content": [{ "type": "text", "text": format!("{} functions listed", count) }],
            "data": functions.to_json(),
            "isError": false
        }))
    }
}

/// JSON schema for one registered function
fn tool_schema(meta: &FunctionMeta) -> JsonValue {
    let properties: Map<String, JsonValue> = meta.args.iter()
        .map(|arg| {
            let mut prop = json!({ "type": arg.json_type(), "description": arg.description });
            if let Some(default) = arg.default {
                prop["default"] = json!(default);
            }
            (arg.name.to_string(), prop)
        })
        .collect();
    let required: Vec<&str> = meta.args.iter().filter(|a| !a.optional).map(|a| a.name).collect();

    json!({
        "name": meta.name,
        "description": format!("{} Usage: {}", meta.description, meta.usage),
        "inputSchema": {
            "type": "object",
            "properties": properties,
            "required": required
        }
    })
}

/// Order named tool arguments by the function's declared parameters
fn positional_args(meta: &FunctionMeta, args: &Map<String, JsonValue>) -> Result<Vec<Value>, McpError> {
    let mut values = Vec::with_capacity(meta.args.len());
    for arg in meta.args {
        match args.get(arg.name) {
            Some(json) => values.push(Value::from_json(json)),
            None if arg.optional => values.push(Value::Null),
            None => {
                return Err(McpError {
                    code: INVALID_PARAMS,
                    message: format!("Missing argument '{}' for {}", arg.name, meta.name),
                    data: Some(json!({ "usage": meta.usage })),
                })
            }
        }
    }

    // Trailing omitted optionals are simply not passed
    while values.last().is_some_and(Value::is_null) {
        values.pop();
    }
    Ok(values)
}

fn tool_result(result: &Value, ctx: &EvalContext) -> JsonValue {
    json!({
        "content": [{ "type": "text", "text": result_text(result, ctx) }],
        "data": result.to_json(),
        "isError": result.is_error()
    })
}

/// Human-readable text for a function result
fn result_text(result: &Value, ctx: &EvalContext) -> String {
    match result {
        Value::Error(e) => error_text(e),
        Value::Object(obj) => {
            // Amounts read as recipe text
            if let (Some(Value::Number(v)), Some(Value::Text(u))) = (obj.get("value"), obj.get("unit")) {
                if let Ok(unit) = lookup_unit(u) {
                    let options = FormatOptions::for_locale(&ctx.locale)
                        .with_significant_digits(ctx.significant_digits);
                    return format_quantity_with(*v, Some(unit), &options);
                }
            }
            result.to_json().to_string()
        }
        Value::List(_) => result.to_json().to_string(),
        other => other.to_string(),
    }
}

fn error_text(e: &LarderError) -> String {
    let mut out = e.to_string();
    for note in &e.notes {
        out.push_str(&format!("\nnote: {}", note));
    }
    out
}

fn format_help(help: &Value) -> String {
    match help {
        Value::Object(map) => {
            let mut out = String::new();
            if let Some(Value::Text(n)) = map.get("name") { out.push_str(&format!("# {}\n\n", n)); }
            if let Some(Value::Text(d)) = map.get("description") { out.push_str(&format!("{}\n\n", d)); }
            if let Some(Value::Text(u)) = map.get("usage") { out.push_str(&format!("**Usage:** `{}`\n\n", u)); }
            if let Some(Value::List(examples)) = map.get("examples") {
                for example in examples {
                    out.push_str(&format!("- `{}`\n", example));
                }
            }
            out
        }
        Value::Error(e) => error_text(e),
        _ => help.to_string(),
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_FILTER_VAR)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();
}

fn write_response<W: Write>(out: &mut W, response: &McpResponse) -> io::Result<()> {
    let response_json = serde_json::to_string(response)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(out, "{}", response_json)?;
    out.flush()
}

fn serve<R: BufRead, W: Write>(server: &Server, mut reader: R, mut out: W) -> io::Result<()> {
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            // EOF - client disconnected
            info!("client disconnected (EOF)");
            return Ok(());
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        debug!(bytes = line.len(), "received");
        if let Some(response) = server.handle_line(line) {
            write_response(&mut out, &response)?;
        }
    }
}

fn main() {
    init_logging();

    let config = ServerConfig::from_env();
    info!(
        version = SERVER_VERSION,
        protocol = PROTOCOL_VERSION,
        locale = %config.locale,
        significant_digits = config.significant_digits,
        log_filter = %config.log_filter,
        "Larder MCP server starting"
    );

    let server = Server::new(config);
    info!(tools = server.registry.function_metas().len(), "server ready, waiting for requests");

    let stdin = io::stdin();
    let stdout = io::stdout();
    if let Err(e) = serve(&server, stdin.lock(), stdout.lock()) {
        error!(error = %e, "i/o failure, shutting down");
        std::process::exit(1);
    }

    info!("server shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server() -> Server {
        Server::new(ServerConfig::default())
    }

    fn respond(server: &Server, request: JsonValue) -> JsonValue {
        let response = server.handle_line(&request.to_string()).expect("response");
        serde_json::to_value(&response).unwrap()
    }

    fn call(server: &Server, name: &str, arguments: JsonValue) -> JsonValue {
        respond(server, json!({
            "jsonrpc": "2.0",
            "id": 7,
            "method": "tools/call",
            "params": { "name": name, "arguments": arguments }
        }))
    }

    #[test]
    fn test_initialize() {
        let response = respond(&server(), json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "initialize",
            "params": { "protocolVersion": "2025-06-18", "clientInfo": { "name": "test" } }
        }));
        assert_eq!(response["id"], 1);
        assert_eq!(response["result"]["protocolVersion"], "2025-06-18");
        assert_eq!(response["result"]["serverInfo"]["name"], "larder");
    }

    #[test]
    fn test_parse_error() {
        let response = server().handle_line("{not json").expect("response");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["error"]["code"], PARSE_ERROR);
        assert!(json.get("id").is_none());
    }

    #[test]
    fn test_unknown_method() {
        let response = respond(&server(), json!({ "jsonrpc": "2.0", "id": "a", "method": "resources/list" }));
        assert_eq!(response["error"]["code"], METHOD_NOT_FOUND);
        assert_eq!(response["id"], "a");
    }

    #[test]
    fn test_notification_gets_no_response() {
        let line = json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }).to_string();
        assert!(server().handle_line(&line).is_none());
    }

    #[test]
    fn test_tools_list_from_registry() {
        let response = respond(&server(), json!({ "jsonrpc": "2.0", "id": 2, "method": "tools/list" }));
        let tools = response["result"]["tools"].as_array().unwrap();
        let names: Vec<&str> = tools.iter().filter_map(|t| t["name"].as_str()).collect();
        for expected in ["convert", "format_quantity", "scale_servings", "target_units", "help", "list_functions"] {
            assert!(names.contains(&expected), "missing tool {}", expected);
        }

        let convert = tools.iter().find(|t| t["name"] == "convert").unwrap();
        assert_eq!(convert["inputSchema"]["properties"]["value"]["type"], "number");
        assert_eq!(convert["inputSchema"]["required"], json!(["value", "from_unit", "to_unit"]));
    }

    #[test]
    fn test_tool_call_convert() {
        let response = call(&server(), "convert", json!({ "value": 2, "from_unit": "lb", "to_unit": "oz" }));
        let result = &response["result"];
        assert_eq!(result["isError"], false);
        assert_eq!(result["data"]["unit"], "oz");
        assert_eq!(result["data"]["value"], 32.0);
        assert_eq!(result["content"][0]["text"], "32 ounces");
    }

    #[test]
    fn test_tool_call_incompatible_is_tool_error() {
        let response = call(&server(), "convert", json!({ "value": 1, "from_unit": "g", "to_unit": "oz" }));
        let result = &response["result"];
        assert_eq!(result["isError"], true);
        assert_eq!(result["data"]["_error"]["code"], "INCOMPATIBLE_UNITS");
    }

    #[test]
    fn test_tool_call_uses_configured_locale() {
        let server = Server::new(ServerConfig { locale: "de-DE".to_string(), ..ServerConfig::default() });
        let response = call(&server, "format_quantity", json!({ "value": 1234.5, "unit": "g" }));
        assert_eq!(response["result"]["content"][0]["text"], "1.235 g");

        let overridden = call(&server, "format_quantity", json!({ "value": 1234.5, "unit": "g", "locale": "en-US" }));
        assert_eq!(overridden["result"]["content"][0]["text"], "1,235 g");
    }

    #[test]
    fn test_tool_call_missing_argument() {
        let response = call(&server(), "convert", json!({ "value": 1, "from_unit": "g" }));
        assert_eq!(response["error"]["code"], INVALID_PARAMS);
    }

    #[test]
    fn test_tool_call_unknown_tool() {
        let response = call(&server(), "bake", json!({}));
        assert_eq!(response["error"]["code"], INVALID_PARAMS);
    }

    #[test]
    fn test_help_and_list_tools() {
        let help = call(&server(), "help", json!({ "name": "scale_servings" }));
        let text = help["result"]["content"][0]["text"].as_str().unwrap();
        assert!(text.starts_with("# scale_servings"));

        let list = call(&server(), "list_functions", json!({ "category": "units" }));
        assert_eq!(list["result"]["data"].as_array().map(|a| a.len()), Some(7));
    }

    #[test]
    fn test_serve_loop() {
        let input = [
            json!({ "jsonrpc": "2.0", "id": 1, "method": "ping" }).to_string(),
            String::new(),
            json!({ "jsonrpc": "2.0", "method": "initialized" }).to_string(),
            json!({ "jsonrpc": "2.0", "id": 2, "method": "ping" }).to_string(),
        ]
        .join("\n");
        let mut output = Vec::new();
        serve(&server(), input.as_bytes(), &mut output).unwrap();

        let lines: Vec<JsonValue> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["id"], 1);
        assert_eq!(lines[1]["id"], 2);
    }
}
