//! Gateway module
//!
//! The boundary that issues REST calls for task persistence.

mod http;
mod repository;

pub use http::HttpTaskGateway;
pub use repository::TaskGateway;
