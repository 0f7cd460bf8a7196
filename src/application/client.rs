#[cfg(test)]
#[path = "client_test.rs"]
mod tests;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Dataset;
use crate::domain::models::Endpoint;
use crate::domain::models::JobId;
use crate::domain::models::Result;
use crate::domain::models::RpcChannelBox;
use crate::domain::models::SessionInfo;
use crate::domain::services::Job;
use crate::domain::services::Session;
use crate::infrastructure::transport::HttpChannel;

/// Entry point for talking to Boa. Jobs handed out borrow the client's
/// session and stay valid for its lifetime.
///
/// ```no_run
/// # async fn run() -> boa_api_client::Result<()> {
/// use boa_api_client::Client;
/// use boa_api_client::Dataset;
/// use boa_api_client::Endpoint;
///
/// let client = Client::new(&Endpoint::Boa)?;
/// client.login("user", "password").await?;
///
/// let mut job = client
///     .query("o: output sum of int; o << 1;", &Dataset::new(1, "2022 Jan/Java"))
///     .await?;
/// while job.is_running() {
///     tokio::time::sleep(std::time::Duration::from_secs(10)).await;
///     job.refresh().await?;
/// }
/// println!("{}", job.output().await?);
///
/// client.close().await?;
/// # Ok(())
/// # }
/// ```
pub struct Client {
    session: Session,
}

impl Client {
    /// Connects to `endpoint` using the timeout and user agent from `Config`.
    pub fn new(endpoint: &Endpoint) -> Result<Client> {
        let channel = HttpChannel::new(
            endpoint.url(),
            Config::request_timeout()?,
            &Config::get(ConfigKey::UserAgent),
        )?;

        return Ok(Client::with_channel(Box::new(channel)));
    }

    /// Connects to the endpoint named in `Config`.
    pub fn from_config() -> Result<Client> {
        return Client::new(&Config::endpoint()?);
    }

    pub fn with_channel(channel: RpcChannelBox) -> Client {
        return Client {
            session: Session::new(channel),
        };
    }

    pub fn session(&self) -> &Session {
        return &self.session;
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<SessionInfo> {
        return self.session.login(username, password).await;
    }

    /// Logs out. Local credentials are dropped even if the service errors.
    pub async fn close(&self) -> Result<()> {
        return self.session.logout().await;
    }

    /// Submits `program` to run against `dataset`.
    pub async fn query(&self, program: &str, dataset: &Dataset) -> Result<Job<'_>> {
        let raw = self.session.submit_query(program, dataset.id).await?;
        let job = Job::from_raw(&self.session, &raw)?;

        tracing::debug!(job = job.id().0, dataset = %dataset.name, "Submitted query");

        return Ok(job);
    }

    pub async fn get_job(&self, id: JobId) -> Result<Job<'_>> {
        let raw = self.session.job(id).await?;
        return Job::from_raw(&self.session, &raw);
    }

    pub async fn job_count(&self, public_only: bool) -> Result<u64> {
        return self.session.job_count(public_only).await;
    }

    /// Up to `length` jobs starting at `offset`, newest first.
    pub async fn job_list(
        &self,
        public_only: bool,
        offset: u64,
        length: u64,
    ) -> Result<Vec<Job<'_>>> {
        let raw_jobs = self.session.job_range(public_only, offset, length).await?;

        return raw_jobs
            .iter()
            .map(|raw| return Job::from_raw(&self.session, raw))
            .collect();
    }

    pub async fn last_job(&self) -> Result<Option<Job<'_>>> {
        let mut jobs = self.job_list(false, 0, 1).await?;
        if jobs.is_empty() {
            return Ok(None);
        }

        return Ok(Some(jobs.remove(0)));
    }
}
