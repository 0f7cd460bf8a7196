mod dataset;
mod endpoint;
mod error;
mod job;
mod rpc;
mod session;
mod status;
pub mod wire;

pub use dataset::*;
pub use endpoint::*;
pub use error::*;
pub use job::*;
pub use rpc::*;
pub use session::*;
pub use status::*;
