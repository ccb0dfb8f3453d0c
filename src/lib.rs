pub mod agents;
pub mod config;
pub mod core;
pub mod decomposer;
pub mod error;
pub mod log;
pub mod orchestration;
pub mod server;

pub use error::{Error, Result};
pub use orchestration::{Orchestrator, TaskResponse};
