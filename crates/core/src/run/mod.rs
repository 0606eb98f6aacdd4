//! Run module
//!
//! Turns a raw run-creation request into the input and configuration that
//! are handed to the agent runtime.

mod config;
mod resolve;
mod validate;

pub use config::merge_run_config;
pub use resolve::{resolve_run, CreateRunPayload, ResolvedRun};
pub use validate::validate_input;
