//! Core domain models for switchboard runs.
//!
//! Tasks and their ordered graph, the normalized agent result, and the
//! per-run shared memory that agents use to pass data forward.

pub mod graph;
pub mod memory;
pub mod result;
pub mod task;

pub use graph::TaskGraph;
pub use memory::SharedMemory;
pub use result::{AgentResult, ResultStatus, ResultsMap};
pub use task::{ExecutedTask, Parameters, Task, TaskId, TaskStatus};
