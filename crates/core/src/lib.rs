//! Core library for the taskman client
//!
//! This crate contains the client-side logic, including:
//! - Task model and the shared validation rules
//! - The REST gateway for task persistence
//! - The task store that reconciles local state with the server
//! - Headless create and edit forms

pub mod config;
pub mod error;
pub mod form;
pub mod gateway;
pub mod store;
pub mod task;

#[cfg(test)]
mod testing;

pub use config::GatewayConfig;
pub use error::{normalize_error, Error};
pub type Result<T> = std::result::Result<T, Error>;
