use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderValue;
use reqwest::header::SET_COOKIE;
use serde_json::Value;

use crate::domain::models::BoaError;
use crate::domain::models::Result;
use crate::domain::models::RpcChannel;
use crate::domain::models::RpcFault;
use crate::domain::models::RpcRequest;
use crate::domain::models::RpcResponse;

pub enum Reply {
    Value(Value, HeaderMap),
    Fault(RpcFault),
    Transport(String),
}

impl Reply {
    pub fn ok(value: Value) -> Reply {
        return Reply::Value(value, HeaderMap::new());
    }

    pub fn with_cookie(value: Value, cookie: &str) -> Reply {
        let mut headers = HeaderMap::new();
        headers.insert(SET_COOKIE, HeaderValue::from_str(cookie).unwrap());
        return Reply::Value(value, headers);
    }

    pub fn fault(code: i64, message: &str) -> Reply {
        return Reply::Fault(RpcFault {
            code,
            message: message.to_string(),
        });
    }
}

/// Replays canned replies in order and records every request it receives.
#[derive(Clone, Default)]
pub struct ScriptedChannel {
    replies: Arc<Mutex<VecDeque<Reply>>>,
    downloads: Arc<Mutex<VecDeque<Result<Vec<u8>>>>>,
    pub requests: Arc<Mutex<Vec<RpcRequest>>>,
    pub fetched: Arc<Mutex<Vec<String>>>,
}

impl ScriptedChannel {
    pub fn reply(&self, reply: Reply) -> &ScriptedChannel {
        self.replies.lock().push_back(reply);
        return self;
    }

    pub fn download(&self, download: Result<Vec<u8>>) -> &ScriptedChannel {
        self.downloads.lock().push_back(download);
        return self;
    }

    pub fn methods(&self) -> Vec<String> {
        return self
            .requests
            .lock()
            .iter()
            .map(|req| return req.method.to_string())
            .collect();
    }

    pub fn last_request(&self) -> RpcRequest {
        return self.requests.lock().last().unwrap().clone();
    }
}

#[async_trait]
impl RpcChannel for ScriptedChannel {
    #[allow(clippy::implicit_return)]
    async fn call(&self, request: RpcRequest) -> Result<RpcResponse> {
        self.requests.lock().push(request);

        let reply = self.replies.lock().pop_front();
        match reply {
            Some(Reply::Value(value, headers)) => {
                return Ok(RpcResponse {
                    headers,
                    outcome: Ok(value),
                });
            }
            Some(Reply::Fault(fault)) => {
                return Ok(RpcResponse {
                    headers: HeaderMap::new(),
                    outcome: Err(fault),
                });
            }
            Some(Reply::Transport(msg)) => return Err(BoaError::Transport(msg)),
            None => return Err(BoaError::Transport("No scripted reply left".to_string())),
        }
    }

    #[allow(clippy::implicit_return)]
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.fetched.lock().push(url.to_string());

        let download = self.downloads.lock().pop_front();
        match download {
            Some(res) => return res,
            None => return Err(BoaError::Transport("No scripted download left".to_string())),
        }
    }
}
