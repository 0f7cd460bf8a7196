use std::fmt;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde_json::Value;

use super::Result;

/// A fault reported by the remote service for a single call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RpcFault {
    pub code: i64,
    pub message: String,
}

impl fmt::Display for RpcFault {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        return write!(f, "{} ({})", self.message, self.code);
    }
}

#[derive(Clone, Debug)]
pub struct RpcRequest {
    pub method: String,
    pub params: Vec<Value>,
    pub headers: HeaderMap,
}

impl RpcRequest {
    pub fn new(method: &str, params: Vec<Value>) -> RpcRequest {
        return RpcRequest {
            method: method.to_string(),
            params,
            headers: HeaderMap::new(),
        };
    }
}

#[derive(Clone, Debug)]
pub struct RpcResponse {
    pub headers: HeaderMap,
    pub outcome: std::result::Result<Value, RpcFault>,
}

pub type RpcChannelBox = Box<dyn RpcChannel + Send + Sync>;

#[async_trait]
pub trait RpcChannel {
    /// Invokes a named remote procedure. A fault reported by the service is
    /// part of a successful exchange and lands in `RpcResponse::outcome`;
    /// only transport or decoding failures are returned as errors.
    async fn call(&self, request: RpcRequest) -> Result<RpcResponse>;

    /// Downloads a payload the service stores outside of the RPC exchange,
    /// such as job output referenced by URL.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}
