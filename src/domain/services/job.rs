#[cfg(test)]
#[path = "job_test.rs"]
mod tests;

use std::fmt;

use serde_json::Value;

use super::Session;
use crate::domain::models::BoaError;
use crate::domain::models::CompilerStatus;
use crate::domain::models::Dataset;
use crate::domain::models::ExecutionStatus;
use crate::domain::models::JobId;
use crate::domain::models::JobRecord;
use crate::domain::models::JobState;
use crate::domain::models::Result;

/// Handle on one submitted query. Cached statuses only change through
/// `refresh`; polling is left to the caller.
pub struct Job<'a> {
    session: &'a Session,
    id: JobId,
    submitted: String,
    dataset: Dataset,
    state: JobState,
}

impl<'a> Job<'a> {
    pub fn new(session: &'a Session, record: JobRecord) -> Job<'a> {
        return Job {
            session,
            id: record.id,
            submitted: record.submitted,
            dataset: record.dataset,
            state: record.state,
        };
    }

    /// Builds a job from a raw record returned by submission or lookup.
    pub fn from_raw(session: &'a Session, raw: &Value) -> Result<Job<'a>> {
        return Ok(Job::new(session, JobRecord::parse(raw)?));
    }

    pub fn id(&self) -> JobId {
        return self.id;
    }

    pub fn submitted(&self) -> &str {
        return &self.submitted;
    }

    pub fn dataset(&self) -> &Dataset {
        return &self.dataset;
    }

    pub fn state(&self) -> JobState {
        return self.state;
    }

    pub fn compiler_status(&self) -> CompilerStatus {
        return self.state.compiler;
    }

    pub fn execution_status(&self) -> ExecutionStatus {
        return self.state.execution;
    }

    pub fn is_running(&self) -> bool {
        return self.state.is_running();
    }

    /// Re-reads the job's statuses. A status moving backwards, or a terminal
    /// status changing, is rejected and leaves the cached state untouched.
    pub async fn refresh(&mut self) -> Result<()> {
        let raw = self.session.job(self.id).await?;
        let record = JobRecord::parse(&raw)?;

        if record.id != self.id {
            return Err(BoaError::Protocol(format!(
                "Asked for job {} but received job {}",
                self.id, record.id
            )));
        }

        self.state.check_transition(&record.state)?;

        if record.state != self.state {
            tracing::debug!(
                job = self.id.0,
                compiler = %record.state.compiler,
                execution = %record.state.execution,
                "Job status changed"
            );
        }

        self.state = record.state;
        self.submitted = record.submitted;

        return Ok(());
    }

    fn ensure_output_ready(&self) -> Result<()> {
        if self.state.execution != ExecutionStatus::Finished {
            return Err(BoaError::OutputNotReady(self.state.execution));
        }

        return Ok(());
    }

    /// Output of a successfully executed job, decoded as UTF-8.
    pub async fn output(&self) -> Result<String> {
        self.ensure_output_ready()?;

        let bytes = self.session.job_output(self.id).await?;
        return String::from_utf8(bytes).map_err(|_| {
            return BoaError::Protocol(format!("Output of job {} is not valid UTF-8", self.id));
        });
    }

    pub async fn output_size(&self) -> Result<u64> {
        self.ensure_output_ready()?;
        return self.session.job_output_size(self.id).await;
    }

    pub async fn output_hash(&self) -> Result<(u64, String)> {
        self.ensure_output_ready()?;
        return self.session.job_output_hash(self.id).await;
    }

    pub async fn compiler_errors(&self) -> Result<Vec<String>> {
        return self.session.job_compiler_errors(self.id).await;
    }

    pub async fn source(&self) -> Result<String> {
        return self.session.job_source(self.id).await;
    }

    pub async fn url(&self) -> Result<String> {
        return self.session.job_url(self.id).await;
    }

    pub async fn public_url(&self) -> Result<String> {
        return self.session.job_public_url(self.id).await;
    }

    pub async fn is_public(&self) -> Result<bool> {
        return self.session.job_is_public(self.id).await;
    }

    pub async fn set_public(&self, public: bool) -> Result<()> {
        return self.session.set_job_public(self.id, public).await;
    }
}

impl fmt::Debug for Job<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        return f
            .debug_struct("Job")
            .field("id", &self.id)
            .field("submitted", &self.submitted)
            .field("dataset", &self.dataset)
            .field("state", &self.state)
            .finish();
    }
}

impl fmt::Display for Job<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        return write!(
            f,
            "id: {}, submitted: {}, dataset: {}, compiler status: {}, execution status: {}",
            self.id, self.submitted, self.dataset.name, self.state.compiler, self.state.execution
        );
    }
}
