#[cfg(test)]
#[path = "cookies_test.rs"]
mod tests;

use parking_lot::RwLock;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderName;
use reqwest::header::HeaderValue;
use reqwest::header::COOKIE;
use reqwest::header::SET_COOKIE;
use serde_json::Value;

use crate::domain::models::Result;
use crate::domain::models::RpcChannelBox;
use crate::domain::models::RpcFault;
use crate::domain::models::RpcRequest;

pub const CSRF_HEADER: &str = "x-csrf-token";

/// Session credentials captured from the service. `authenticated` is only
/// set by a completed login and is cleared together with the rest.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Credentials {
    pub cookie: Option<String>,
    pub csrf: Option<String>,
    pub authenticated: bool,
}

impl Credentials {
    pub fn is_empty(&self) -> bool {
        return self.cookie.is_none() && self.csrf.is_none() && !self.authenticated;
    }
}

/// Wraps an RPC channel so the session cookie and CSRF token issued by the
/// service are replayed on every call.
pub struct CookieTransport {
    channel: RpcChannelBox,
    credentials: RwLock<Credentials>,
}

impl CookieTransport {
    pub fn new(channel: RpcChannelBox) -> CookieTransport {
        return CookieTransport {
            channel,
            credentials: RwLock::new(Credentials::default()),
        };
    }

    pub fn credentials(&self) -> Credentials {
        return self.credentials.read().clone();
    }

    pub fn is_authenticated(&self) -> bool {
        return self.credentials.read().authenticated;
    }

    /// Stores the CSRF token. Setting the same token twice is a no-op.
    pub fn add_csrf(&self, token: &str) {
        self.credentials.write().csrf = Some(token.to_string());
    }

    /// Marks the session as logged in, storing the CSRF token and falling
    /// back to `cookie` when none was captured from response headers.
    pub fn authenticate(&self, token: &str, cookie: &str) {
        let mut credentials = self.credentials.write();
        credentials.csrf = Some(token.to_string());
        if credentials.cookie.is_none() {
            credentials.cookie = Some(cookie.to_string());
        }
        credentials.authenticated = true;
    }

    pub fn clear(&self) {
        *self.credentials.write() = Credentials::default();
    }

    /// Adds the captured cookie and CSRF token to outgoing headers. Headers
    /// of any other kind are left untouched.
    pub fn send_headers(&self, headers: &mut HeaderMap) {
        let credentials = self.credentials.read();

        if let Some(cookie) = &credentials.cookie {
            match HeaderValue::from_str(cookie) {
                Ok(val) => {
                    headers.insert(COOKIE, val);
                }
                Err(err) => {
                    tracing::warn!(error = ?err, "Dropping session cookie that is not a valid header value");
                }
            }
        }

        if let Some(csrf) = &credentials.csrf {
            match HeaderValue::from_str(csrf) {
                Ok(val) => {
                    headers.insert(HeaderName::from_static(CSRF_HEADER), val);
                }
                Err(err) => {
                    tracing::warn!(error = ?err, "Dropping CSRF token that is not a valid header value");
                }
            }
        }
    }

    /// Captures credentials from response headers. All `Set-Cookie` headers of
    /// one response together replace the stored cookie.
    pub fn parse_response(&self, headers: &HeaderMap) {
        let cookies = headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|header| return header.to_str().ok())
            .filter_map(|header| {
                let pair = header.split(';').next().unwrap_or("").trim();
                if pair.is_empty() {
                    return None;
                }
                return Some(pair.to_string());
            })
            .collect::<Vec<String>>();

        let csrf = headers
            .get(CSRF_HEADER)
            .and_then(|header| return header.to_str().ok())
            .map(|header| return header.trim().to_string())
            .filter(|header| return !header.is_empty());

        if cookies.is_empty() && csrf.is_none() {
            return;
        }

        let mut credentials = self.credentials.write();
        if !cookies.is_empty() {
            tracing::debug!(count = cookies.len(), "Captured session cookie");
            credentials.cookie = Some(cookies.join("; "));
        }
        if csrf.is_some() {
            tracing::debug!("Captured CSRF token from response");
            credentials.csrf = csrf;
        }
    }

    /// Sends one call through the channel, attaching credentials before and
    /// capturing new ones after. Faults still carry headers worth capturing.
    pub async fn call(
        &self,
        method: &str,
        params: Vec<Value>,
    ) -> Result<std::result::Result<Value, RpcFault>> {
        let mut request = RpcRequest::new(method, params);
        self.send_headers(&mut request.headers);

        let response = self.channel.call(request).await?;
        self.parse_response(&response.headers);

        return Ok(response.outcome);
    }

    /// Output downloads go out without session credentials, the URL may point
    /// at a different host.
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        return self.channel.fetch(url).await;
    }
}
