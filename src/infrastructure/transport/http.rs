#[cfg(test)]
#[path = "http_test.rs"]
mod tests;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::header::USER_AGENT;

use super::xmlrpc;
use crate::domain::models::BoaError;
use crate::domain::models::Result;
use crate::domain::models::RpcChannel;
use crate::domain::models::RpcRequest;
use crate::domain::models::RpcResponse;

/// XML-RPC over HTTP POST to a single endpoint URL.
pub struct HttpChannel {
    url: String,
    user_agent: String,
    client: reqwest::Client,
}

impl HttpChannel {
    /// A `timeout` of `None` leaves requests unbounded.
    pub fn new(url: &str, timeout: Option<Duration>, user_agent: &str) -> Result<HttpChannel> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|err| return BoaError::Config(format!("Failed to build HTTP client: {err}")))?;

        return Ok(HttpChannel {
            url: url.to_string(),
            user_agent: user_agent.to_string(),
            client,
        });
    }
}

#[async_trait]
impl RpcChannel for HttpChannel {
    #[allow(clippy::implicit_return)]
    async fn call(&self, request: RpcRequest) -> Result<RpcResponse> {
        let body = xmlrpc::encode_call(&request.method, &request.params);

        let res = self
            .client
            .post(&self.url)
            .headers(request.headers)
            .header(CONTENT_TYPE, "text/xml")
            .header(USER_AGENT, &self.user_agent)
            .body(body)
            .send()
            .await;

        let res = match res {
            Ok(res) => res,
            Err(err) => {
                tracing::error!(error = ?err, method = %request.method, "Boa API is not reachable");
                return Err(BoaError::from(err));
            }
        };

        if !res.status().is_success() {
            tracing::error!(
                status = res.status().as_u16(),
                method = %request.method,
                "Boa API call failed"
            );
            return Err(BoaError::Transport(format!(
                "{} returned HTTP {}",
                self.url,
                res.status().as_u16()
            )));
        }

        let headers = res.headers().clone();
        let text = res.text().await?;

        let outcome = xmlrpc::decode_response(&text).map_err(|err| {
            tracing::error!(error = ?err, method = %request.method, "Undecodable Boa API response");
            match err {
                BoaError::Protocol(msg) => {
                    return BoaError::Protocol(format!(
                        "{msg}. Most likely '{}' is not a Boa API endpoint",
                        self.url
                    ));
                }
                other => return other,
            }
        })?;

        tracing::debug!(method = %request.method, fault = outcome.is_err(), "Boa API call");

        return Ok(RpcResponse { headers, outcome });
    }

    #[allow(clippy::implicit_return)]
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        // reqwest follows redirects, which output links rely on.
        let res = self
            .client
            .get(url)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await?;

        if !res.status().is_success() {
            tracing::error!(status = res.status().as_u16(), "Output download failed");
            return Err(BoaError::Transport(format!(
                "{url} returned HTTP {}",
                res.status().as_u16()
            )));
        }

        let bytes = res.bytes().await?;
        return Ok(bytes.to_vec());
    }
}
