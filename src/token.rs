//! Token requests and responses exchanged with OAuth 2.0 providers.

mod request;
mod response;

pub use request::*;
pub use response::*;
