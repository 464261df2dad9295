#![allow(dead_code)]

use std::io::Read;
use std::sync::{Arc, Mutex};
use std::thread;

use serde_json::Value;
use tiny_http::{Response, Server, StatusCode};

use vesting_dash_adapters::AdapterConfig;

#[derive(Debug, Clone)]
pub struct Recorded {
    pub path: String,
    pub body: Value,
}

impl Recorded {
    /// JSON-RPC method name, for bridge calls.
    pub fn method(&self) -> Option<&str> {
        self.body.get("method").and_then(Value::as_str)
    }

    pub fn params(&self) -> &Value {
        &self.body["params"]
    }
}

pub type Calls = Arc<Mutex<Vec<Recorded>>>;

pub fn calls() -> Calls {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn recorded(calls: &Calls) -> Vec<Recorded> {
    calls.lock().expect("calls lock").clone()
}

/// Serves up to 32 requests on an ephemeral port, answering each with
/// `handler(path, body) -> (status, body)`.
pub fn spawn_mock_server<F>(calls: Calls, handler: F) -> (String, thread::JoinHandle<()>)
where
    F: Fn(&str, &Value) -> (u16, String) + Send + 'static,
{
    let server = Server::http("127.0.0.1:0").expect("start server");
    let addr = format!("http://{}", server.server_addr());

    let join = thread::spawn(move || {
        for _ in 0..32 {
            let mut req = match server.recv() {
                Ok(r) => r,
                Err(_) => break,
            };
            let path = req.url().to_owned();
            let mut raw = String::new();
            let _ = req.as_reader().read_to_string(&mut raw);
            let body: Value = serde_json::from_str(&raw).unwrap_or(Value::Null);
            let (code, payload) = handler(&path, &body);
            if let Ok(mut g) = calls.lock() {
                g.push(Recorded { path, body });
            }
            let response = Response::from_string(payload).with_status_code(StatusCode(code));
            let _ = req.respond(response);
        }
    });

    (addr, join)
}

/// JSON-RPC 2.0 success envelope echoing the request id.
pub fn rpc_result(request: &Value, result: Value) -> (u16, String) {
    let body = serde_json::json!({
        "jsonrpc": "2.0",
        "id": request.get("id").cloned().unwrap_or(Value::Null),
        "result": result,
    });
    (200, body.to_string())
}

pub fn rpc_error(request: &Value, code: i64, message: &str) -> (u16, String) {
    let body = serde_json::json!({
        "jsonrpc": "2.0",
        "id": request.get("id").cloned().unwrap_or(Value::Null),
        "error": { "code": code, "message": message },
    });
    (200, body.to_string())
}

pub fn config(tx_service_base_url: &str, wallet_bridge_url: &str) -> AdapterConfig {
    AdapterConfig {
        tx_service_base_url: tx_service_base_url.to_owned(),
        wallet_bridge_url: wallet_bridge_url.to_owned(),
        http_timeout_ms: 5_000,
        ..AdapterConfig::default()
    }
}

/// A CIP-30 wallet that approves everything.
pub fn happy_wallet(path: &str, body: &Value) -> (u16, String) {
    let _ = path;
    let result = match body.get("method").and_then(Value::as_str) {
        Some("enable") => Value::Bool(true),
        Some("getUtxos") => serde_json::json!(["828258200001", "828258200002"]),
        Some("getChangeAddress") => Value::String("addr_test1qchange".to_owned()),
        Some("signTx") => Value::String("a100818258".to_owned()),
        Some("submitTx") => Value::String("9a1fe0c1".to_owned()),
        _ => return rpc_error(body, -32601, "method not found"),
    };
    rpc_result(body, result)
}
