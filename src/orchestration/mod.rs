//! Orchestration layer for switchboard.
//!
//! The registry dispatches single actions and absorbs every fault, the
//! executor orders tasks by their agent dependencies, and the orchestrator
//! wraps both into runs that end in a structured response and summary.

mod executor;
mod orchestrator;
mod registry;
mod summary;

pub use executor::{ExecutionOutcome, Executor, RunEvent};
pub use orchestrator::{Orchestrator, Run, RunStatus, TaskResponse};
pub use registry::{AgentRegistry, AgentRegistryBuilder, DispatchError};
pub use summary::{render_summary, SUCCESS_BANNER};
