#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

use serde_json::json;
use serde_json::Value;

use crate::domain::models::wire;
use crate::domain::models::BoaError;
use crate::domain::models::JobId;
use crate::domain::models::Result;
use crate::domain::models::RpcChannelBox;
use crate::domain::models::SessionInfo;
use crate::infrastructure::transport::CookieTransport;
use crate::infrastructure::transport::Credentials;

/// Remote procedure names exposed by the Boa API.
pub mod procedures {
    pub const LOGIN: &str = "user.login";
    pub const LOGOUT: &str = "user.logout";
    pub const SUBMIT: &str = "boa.submit";
    pub const JOB: &str = "boa.job";
    pub const JOB_COUNT: &str = "boa.count";
    pub const JOB_RANGE: &str = "boa.range";
    pub const OUTPUT: &str = "job.output";
    pub const OUTPUT_SIZE: &str = "job.outputsize";
    pub const OUTPUT_HASH: &str = "job.outputhash";
    pub const COMPILER_ERRORS: &str = "job.compilerErrors";
    pub const SOURCE: &str = "job.source";
    pub const URL: &str = "job.url";
    pub const PUBLIC_URL: &str = "job.publicurl";
    pub const PUBLIC: &str = "job.public";
    pub const SET_PUBLIC: &str = "job.setpublic";
}

/// Fault code the service uses for rejected credentials.
const FAULT_UNAUTHORIZED: i64 = 401;

fn unexpected(method: &str, value: &Value) -> BoaError {
    return BoaError::Protocol(format!("Unexpected result from {method}: {value}"));
}

/// One authenticated connection to the Boa API. Not meant to be shared
/// between concurrent flows; a `Job` borrows the session that created it.
pub struct Session {
    transport: CookieTransport,
}

impl Session {
    pub fn new(channel: RpcChannelBox) -> Session {
        return Session {
            transport: CookieTransport::new(channel),
        };
    }

    pub fn is_authenticated(&self) -> bool {
        return self.transport.is_authenticated();
    }

    pub fn credentials(&self) -> Credentials {
        return self.transport.credentials();
    }

    fn ensure_authenticated(&self) -> Result<()> {
        if !self.is_authenticated() {
            return Err(BoaError::NotAuthenticated);
        }

        return Ok(());
    }

    async fn dispatch(&self, method: &str, params: Vec<Value>) -> Result<Value> {
        let outcome = self.transport.call(method, params).await?;

        match outcome {
            Ok(value) => return Ok(value),
            Err(fault) => {
                tracing::debug!(method, code = fault.code, message = %fault.message, "Remote fault");
                return Err(BoaError::RemoteFault {
                    code: fault.code,
                    message: fault.message,
                });
            }
        }
    }

    /// Calls any remote procedure on the authenticated session.
    pub async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value> {
        self.ensure_authenticated()?;
        return self.dispatch(method, params).await;
    }

    /// Starts a fresh session. Any earlier credentials are dropped first, and
    /// nothing is retained when the login fails.
    pub async fn login(&self, username: &str, password: &str) -> Result<SessionInfo> {
        self.transport.clear();

        let res = self
            .dispatch(procedures::LOGIN, vec![json!(username), json!(password)])
            .await
            .and_then(|value| {
                return serde_json::from_value::<SessionInfo>(value).map_err(|err| {
                    return BoaError::Protocol(format!("Unexpected login result: {err}"));
                });
            });

        let info = match res {
            Ok(info) => info,
            Err(err) => {
                self.transport.clear();
                tracing::error!(error = ?err, username, "Login failed");

                if let BoaError::RemoteFault { code, message } = err {
                    if code == FAULT_UNAUTHORIZED {
                        return Err(BoaError::Authentication(message));
                    }
                    return Err(BoaError::RemoteFault { code, message });
                }
                return Err(err);
            }
        };

        self.transport.authenticate(&info.token, &info.cookie());

        tracing::debug!(username, session_name = %info.session_name, "Logged in");

        return Ok(info);
    }

    /// Ends the session. Local credentials are cleared even when the remote
    /// call fails.
    pub async fn logout(&self) -> Result<()> {
        self.ensure_authenticated()?;

        let res = self.dispatch(procedures::LOGOUT, vec![]).await;
        self.transport.clear();

        if let Err(err) = &res {
            tracing::warn!(error = ?err, "Remote logout failed, local credentials cleared");
        } else {
            tracing::debug!("Logged out");
        }

        return res.map(|_| return ());
    }

    pub async fn submit_query(&self, program: &str, dataset_id: i64) -> Result<Value> {
        return self
            .call(procedures::SUBMIT, vec![json!(program), json!(dataset_id)])
            .await;
    }

    pub async fn job(&self, id: JobId) -> Result<Value> {
        return self.call(procedures::JOB, vec![json!(id.0)]).await;
    }

    pub async fn job_count(&self, public_only: bool) -> Result<u64> {
        let value = self
            .call(procedures::JOB_COUNT, vec![json!(public_only)])
            .await?;

        return wire::to_integer(&value)
            .and_then(|count| return u64::try_from(count).ok())
            .ok_or_else(|| return unexpected(procedures::JOB_COUNT, &value));
    }

    /// Raw job records, newest first.
    pub async fn job_range(&self, public_only: bool, offset: u64, length: u64) -> Result<Vec<Value>> {
        let value = self
            .call(
                procedures::JOB_RANGE,
                vec![json!(public_only), json!(offset), json!(length)],
            )
            .await?;

        match value {
            Value::Array(jobs) => return Ok(jobs),
            other => return Err(unexpected(procedures::JOB_RANGE, &other)),
        }
    }

    /// Downloads the stored output of a job. Faults, a missing URL and failed
    /// downloads mean the output cannot be had. Transport failures on the
    /// `job.output` call itself pass through.
    pub async fn job_output(&self, id: JobId) -> Result<Vec<u8>> {
        let value = self
            .call(procedures::OUTPUT, vec![json!(id.0)])
            .await
            .map_err(|err| {
                return match err {
                    BoaError::NotAuthenticated | BoaError::Transport(_) => err,
                    other => BoaError::OutputUnavailable(other.to_string()),
                };
            })?;

        let url = match value.as_str() {
            Some(url) if !url.trim().is_empty() => url.trim().to_string(),
            _ => {
                return Err(BoaError::OutputUnavailable(format!(
                    "No output stored for job {id}"
                )));
            }
        };

        return self
            .transport
            .fetch(&url)
            .await
            .map_err(|err| return BoaError::OutputUnavailable(err.to_string()));
    }

    pub async fn job_output_size(&self, id: JobId) -> Result<u64> {
        let value = self.call(procedures::OUTPUT_SIZE, vec![json!(id.0)]).await?;

        return wire::to_integer(&value)
            .and_then(|size| return u64::try_from(size).ok())
            .ok_or_else(|| return unexpected(procedures::OUTPUT_SIZE, &value));
    }

    /// Byte count and hash of the stored output.
    pub async fn job_output_hash(&self, id: JobId) -> Result<(u64, String)> {
        let value = self.call(procedures::OUTPUT_HASH, vec![json!(id.0)]).await?;

        let pair = value.as_array().filter(|pair| return pair.len() == 2);
        let size = pair
            .and_then(|pair| return wire::to_integer(&pair[0]))
            .and_then(|size| return u64::try_from(size).ok());
        let hash = pair.and_then(|pair| {
            return match &pair[1] {
                Value::String(hash) => Some(hash.to_string()),
                Value::Number(hash) => Some(hash.to_string()),
                _ => None,
            };
        });

        match (size, hash) {
            (Some(size), Some(hash)) => return Ok((size, hash)),
            _ => return Err(unexpected(procedures::OUTPUT_HASH, &value)),
        }
    }

    pub async fn job_compiler_errors(&self, id: JobId) -> Result<Vec<String>> {
        let value = self
            .call(procedures::COMPILER_ERRORS, vec![json!(id.0)])
            .await?;

        match value {
            Value::Null => return Ok(vec![]),
            Value::String(text) if text.is_empty() => return Ok(vec![]),
            Value::String(text) => return Ok(vec![text]),
            Value::Array(errors) => {
                return Ok(errors
                    .iter()
                    .map(|err| {
                        return match err.as_str() {
                            Some(text) => text.to_string(),
                            None => err.to_string(),
                        };
                    })
                    .collect());
            }
            other => return Err(unexpected(procedures::COMPILER_ERRORS, &other)),
        }
    }

    async fn job_string(&self, method: &str, id: JobId) -> Result<String> {
        let value = self.call(method, vec![json!(id.0)]).await?;

        match value {
            Value::String(text) => return Ok(text),
            other => return Err(unexpected(method, &other)),
        }
    }

    pub async fn job_source(&self, id: JobId) -> Result<String> {
        return self.job_string(procedures::SOURCE, id).await;
    }

    pub async fn job_url(&self, id: JobId) -> Result<String> {
        return self.job_string(procedures::URL, id).await;
    }

    pub async fn job_public_url(&self, id: JobId) -> Result<String> {
        return self.job_string(procedures::PUBLIC_URL, id).await;
    }

    pub async fn job_is_public(&self, id: JobId) -> Result<bool> {
        let value = self.call(procedures::PUBLIC, vec![json!(id.0)]).await?;

        return wire::to_bool(&value).ok_or_else(|| return unexpected(procedures::PUBLIC, &value));
    }

    pub async fn set_job_public(&self, id: JobId, public: bool) -> Result<()> {
        let flag = if public { 1 } else { 0 };
        self.call(procedures::SET_PUBLIC, vec![json!(id.0), json!(flag)])
            .await?;

        return Ok(());
    }
}
