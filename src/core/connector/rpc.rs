use alloy_primitives::Address;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

use super::ConnectorError;

// EIP-1193 provider error codes
pub const USER_REJECTED_REQUEST: i64 = 4001;
pub const UNAUTHORIZED: i64 = 4100;
pub const UNSUPPORTED_METHOD: i64 = 4200;
pub const DISCONNECTED: i64 = 4900;
pub const CHAIN_DISCONNECTED: i64 = 4901;

// JSON-RPC 2.0 error codes
pub const INVALID_PARAMS: i64 = -32602;
pub const INTERNAL_ERROR: i64 = -32603;

#[derive(Serialize, Debug)]
/// Request sent to the provider
pub struct JsonRpcRequest<'a> {
   pub origin: &'a str,
   pub jsonrpc: &'static str,
   pub id: u64,
   pub method: &'a str,
   pub params: Value,
}

#[derive(Deserialize, Debug)]
/// Response received from the provider
pub struct JsonRpcResponse {
   #[allow(dead_code)]
   #[serde(default)]
   pub jsonrpc: String,
   #[allow(dead_code)]
   #[serde(default)]
   pub id: Value,
   #[serde(default)]
   pub result: Option<Value>,
   #[serde(default)]
   pub error: Option<JsonRpcError>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct JsonRpcError {
   pub code: i64,
   #[serde(default)]
   pub message: String,
}

impl JsonRpcResponse {
   /// Unwrap the result or map the error object into a [ConnectorError]
   pub fn into_result(self) -> Result<Value, ConnectorError> {
      if let Some(error) = self.error {
         return Err(error.into());
      }
      Ok(self.result.unwrap_or(Value::Null))
   }
}

impl From<JsonRpcError> for ConnectorError {
   fn from(error: JsonRpcError) -> Self {
      match error.code {
         USER_REJECTED_REQUEST => ConnectorError::UserRejected,
         code => ConnectorError::Rpc {
            code,
            message: if error.message.is_empty() {
               error_label(code).to_string()
            } else {
               error.message
            },
         },
      }
   }
}

/// Name of a well known provider error code
pub fn error_label(code: i64) -> &'static str {
   match code {
      USER_REJECTED_REQUEST => "User Rejected Request",
      UNAUTHORIZED => "Unauthorized",
      UNSUPPORTED_METHOD => "Unsupported Method",
      DISCONNECTED => "Disconnected",
      CHAIN_DISCONNECTED => "Chain Disconnected",
      INVALID_PARAMS => "Invalid Params",
      INTERNAL_ERROR => "Internal Error",
      _ => "Unknown Error",
   }
}

/// Minimal EIP-1193 client over HTTP POST
pub struct RpcClient {
   http: Client,
   url: Url,
   origin: String,
   next_id: AtomicU64,
}

impl RpcClient {
   pub fn new(url: &str, origin: impl Into<String>) -> Result<Self, anyhow::Error> {
      let url = Url::parse(url)?;
      Ok(Self {
         http: Client::new(),
         url,
         origin: origin.into(),
         next_id: AtomicU64::new(1),
      })
   }

   pub fn url(&self) -> &Url {
      &self.url
   }

   pub async fn request(&self, method: &str, params: Value) -> Result<Value, ConnectorError> {
      let id = self.next_id.fetch_add(1, Ordering::Relaxed);
      let payload = JsonRpcRequest {
         origin: &self.origin,
         jsonrpc: "2.0",
         id,
         method,
         params,
      };

      trace!("-> {} id {} to {}", method, id, self.url);

      let response: JsonRpcResponse = self
         .http
         .post(self.url.clone())
         .json(&payload)
         .send()
         .await?
         .error_for_status()?
         .json()
         .await?;

      trace!("<- {} id {} {:?}", method, id, response);
      response.into_result()
   }

   pub async fn request_no_params(&self, method: &str) -> Result<Value, ConnectorError> {
      self.request(method, json!([])).await
   }
}

/// Parse a chain id given either as a hex quantity, a decimal string or a number
pub fn parse_chain_id(value: &Value) -> Result<u64, ConnectorError> {
   let invalid = || ConnectorError::InvalidResponse(format!("bad chain id {}", value));

   match value {
      Value::Number(n) => n.as_u64().ok_or_else(invalid),
      Value::String(s) => {
         let s = s.trim();
         if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            u64::from_str_radix(hex, 16).map_err(|_| invalid())
         } else {
            s.parse::<u64>().map_err(|_| invalid())
         }
      }
      _ => Err(invalid()),
   }
}

/// Parse an account list into EIP-55 checksummed addresses
pub fn parse_accounts(value: &Value) -> Result<Vec<String>, ConnectorError> {
   let list = value
      .as_array()
      .ok_or_else(|| ConnectorError::InvalidResponse(format!("expected accounts, got {}", value)))?;

   let mut accounts = Vec::with_capacity(list.len());
   for item in list {
      let raw = item
         .as_str()
         .ok_or_else(|| ConnectorError::InvalidAccount(item.to_string()))?;
      let address =
         Address::from_str(raw).map_err(|_| ConnectorError::InvalidAccount(raw.to_string()))?;
      accounts.push(address.to_checksum(None));
   }

   Ok(accounts)
}
