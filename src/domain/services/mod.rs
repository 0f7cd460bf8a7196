mod job;
mod session;

pub use job::*;
pub use session::*;
