//! Core library for the GPTs runs service
//!
//! This crate contains the core business logic, including:
//! - Assistant storage with public-identity fallback
//! - Run configuration resolution and input validation
//! - Clients for the external agent runtime and telemetry service
//! - Agent tools

pub mod agent;
pub mod assistant;
pub mod error;
pub mod run;
pub mod telemetry;
pub mod tools;

pub use error::{Error, FieldError};
pub type Result<T> = std::result::Result<T, Error>;
