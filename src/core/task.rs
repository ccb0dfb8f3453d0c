//! Task data model for the execution graph.
//!
//! A task names the agent that should run it, the action to invoke on
//! that agent, the action's parameters, and the agents whose work must
//! already be in the execution log before it runs.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::result::AgentResult;

/// Action parameters, passed to the agent as-is.
pub type Parameters = Map<String, Value>;

/// Unique identifier for a task within a run.
///
/// Uses UUID v4 for generation and provides a short form display
/// for human-readable output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub Uuid);

impl TaskId {
    /// Create a new unique task identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Return first 8 characters of the UUID for display.
    pub fn short(&self) -> String {
        self.0.to_string()[..8].to_string()
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TaskId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Per-task lifecycle within a run.
///
/// `Done` is terminal whether the agent succeeded or not; nothing is retried.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    Running,
    Done,
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "pending"),
            TaskStatus::Running => write!(f, "running"),
            TaskStatus::Done => write!(f, "done"),
        }
    }
}

/// A single unit of work produced by the decomposer.
///
/// Dependencies are agent names, not task ids. They are kept in
/// declaration order with duplicates removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub agent: String,
    pub action: String,
    #[serde(default)]
    pub parameters: Parameters,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl Task {
    /// Create a task with a fresh id, no parameters and no dependencies.
    pub fn new(agent: &str, action: &str) -> Self {
        Self {
            id: TaskId::new(),
            agent: agent.to_string(),
            action: action.to_string(),
            parameters: Parameters::new(),
            dependencies: Vec::new(),
        }
    }

    /// Add a parameter.
    pub fn with_param(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.parameters.insert(key.to_string(), value.into());
        self
    }

    /// Add a dependency on an agent. Repeated names are ignored.
    pub fn depends_on(mut self, agent: &str) -> Self {
        if !self.dependencies.iter().any(|d| d == agent) {
            self.dependencies.push(agent.to_string());
        }
        self
    }

    /// Check whether this task waits on the given agent.
    pub fn has_dependency(&self, agent: &str) -> bool {
        self.dependencies.iter().any(|d| d == agent)
    }

    /// The `(agent, action, sorted dependencies)` triple used to compare
    /// decompositions independently of generated ids.
    pub fn signature(&self) -> (String, String, Vec<String>) {
        let mut deps = self.dependencies.clone();
        deps.sort();
        (self.agent.clone(), self.action.clone(), deps)
    }
}

/// A task together with the result it produced and its position in the
/// execution log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutedTask {
    #[serde(flatten)]
    pub task: Task,
    pub result: AgentResult,
    pub position: usize,
    pub status: TaskStatus,
}

impl ExecutedTask {
    pub fn new(task: Task, result: AgentResult, position: usize) -> Self {
        Self {
            task,
            result,
            position,
            status: TaskStatus::Done,
        }
    }

    pub fn id(&self) -> TaskId {
        self.task.id
    }

    pub fn agent(&self) -> &str {
        &self.task.agent
    }
}
