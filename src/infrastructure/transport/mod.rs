mod cookies;
mod http;
#[cfg(test)]
pub mod scripted;
pub mod xmlrpc;

pub use cookies::*;
pub use http::*;
