//! Assistant module
//!
//! An Assistant is a stored configuration bundle owned by a user identity.
//! Assistants marked public are also reachable under [`PUBLIC_USER_ID`].

mod file_store;
mod model;
mod repository;

pub use file_store::FileAssistantStore;
pub use model::*;
pub use repository::AssistantRepository;
