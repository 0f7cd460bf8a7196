#![deny(clippy::implicit_return)]
#![allow(clippy::needless_return)]

//! Client for the Boa API: log in, submit queries against a dataset, poll
//! the resulting jobs and fetch their output.

pub mod application;
pub mod configuration;
pub mod domain;
pub mod infrastructure;

pub use application::Client;
pub use configuration::Config;
pub use configuration::ConfigKey;
pub use domain::models::parse_compiler_status;
pub use domain::models::parse_execution_status;
pub use domain::models::BoaError;
pub use domain::models::CompilerStatus;
pub use domain::models::Dataset;
pub use domain::models::Endpoint;
pub use domain::models::ExecutionStatus;
pub use domain::models::JobId;
pub use domain::models::JobState;
pub use domain::models::Result;
pub use domain::models::RpcChannel;
pub use domain::models::SessionInfo;
pub use domain::services::Job;
pub use domain::services::Session;
pub use infrastructure::transport::CookieTransport;
pub use infrastructure::transport::Credentials;
pub use infrastructure::transport::HttpChannel;
