//! Wire structures of the two upstream protocols.

use serde::{Deserialize, Serialize};

/// JSON-RPC 2.0 request envelope.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRequestBody<'a> {
    pub jsonrpc: &'a str,
    pub method: &'a str,
    pub params: serde_json::Value,
    pub id: serde_json::Value,
}

/// JSON-RPC 2.0 response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonResponseBody {
    #[serde(default)]
    pub result: serde_json::Value,
    #[serde(default)]
    pub error: Option<JsonError>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JsonError {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl JsonError {
    /// Geth and most clients report reverts with code 3 and/or an
    /// "execution reverted" message.
    pub fn is_revert(&self) -> bool {
        self.code == 3 || self.message.to_ascii_lowercase().contains("revert")
    }
}

/// Argument or output value of a virtual-chain query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    #[serde(rename = "type")]
    pub kind: ArgumentKind,
    pub value: String,
}

impl Argument {
    pub fn bytes(value: &[u8]) -> Self {
        Self {
            kind: ArgumentKind::Bytes,
            value: format!("0x{}", hex::encode(value)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgumentKind {
    Uint32,
    Uint64,
    Uint256,
    Bytes,
    String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunQueryRequest<'a> {
    pub contract_name: &'a str,
    pub method_name: &'a str,
    pub arguments: Vec<Argument>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunQueryResponse {
    pub request_status: String,
    #[serde(default)]
    pub execution_result: Option<String>,
    #[serde(default)]
    pub output_arguments: Vec<Argument>,
    #[serde(default)]
    pub block_height: Option<String>,
}

pub const REQUEST_STATUS_COMPLETED: &str = "COMPLETED";
pub const EXECUTION_RESULT_SUCCESS: &str = "SUCCESS";
pub const EXECUTION_RESULT_ERROR_SMART_CONTRACT: &str = "ERROR_SMART_CONTRACT";
