use std::fmt;

use serde::Deserialize;
use serde_json::Value;

use super::wire;
use super::BoaError;
use super::Dataset;
use super::JobState;
use super::Result;

/// Identity the service assigns to a submitted job.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobId(pub i64);

impl From<i64> for JobId {
    fn from(id: i64) -> JobId {
        return JobId(id);
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        return write!(f, "{}", self.0);
    }
}

#[derive(Deserialize)]
struct RawJob {
    #[serde(deserialize_with = "wire::integer")]
    id: i64,
    #[serde(default)]
    submitted: String,
    input: Dataset,
    compiler_status: String,
    hadoop_status: String,
}

/// A job record as the service reports it, with statuses already decoded.
#[derive(Clone, Debug, PartialEq)]
pub struct JobRecord {
    pub id: JobId,
    pub submitted: String,
    pub dataset: Dataset,
    pub state: JobState,
}

impl JobRecord {
    pub fn parse(value: &Value) -> Result<JobRecord> {
        let raw = RawJob::deserialize(value)
            .map_err(|err| return BoaError::Protocol(format!("Unexpected job record: {err}")))?;

        return Ok(JobRecord {
            id: JobId(raw.id),
            submitted: raw.submitted,
            dataset: raw.input,
            state: JobState::parse(&raw.compiler_status, &raw.hadoop_status)?,
        });
    }
}
