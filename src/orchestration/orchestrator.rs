//! Run orchestration: decompose, execute, aggregate, summarize.
//!
//! An [`Orchestrator`] is built once at startup and shared. It holds the
//! decomposer and the agent registry; every call to
//! [`Orchestrator::execute_instruction`] is an independent run with its own
//! shared memory, execution log and results.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::agents::default_registry;
use crate::config::Config;
use crate::core::{ExecutedTask, ResultsMap, TaskGraph};
use crate::decomposer::{Decomposer, Decomposition, KeywordDecomposer};
use crate::error::Result;
use crate::{sblog, sblog_error, sblog_run};

use super::executor::{Executor, RunEvent};
use super::registry::AgentRegistry;
use super::summary::render_summary;

/// Lifecycle of a run as a whole.
///
/// Subtask errors never fail a run; a run that starts always completes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    #[default]
    Pending,
    Running,
    Completed,
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunStatus::Pending => write!(f, "pending"),
            RunStatus::Running => write!(f, "running"),
            RunStatus::Completed => write!(f, "completed"),
        }
    }
}

/// Bookkeeping for one run.
#[derive(Debug, Clone)]
pub struct Run {
    pub id: String,
    pub status: RunStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Run {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            status: RunStatus::Pending,
            started_at: None,
            completed_at: None,
        }
    }

    pub fn start(&mut self) {
        self.status = RunStatus::Running;
        self.started_at = Some(Utc::now());
    }

    pub fn complete(&mut self) {
        self.status = RunStatus::Completed;
        self.completed_at = Some(Utc::now());
    }
}

impl Default for Run {
    fn default() -> Self {
        Self::new()
    }
}

/// Response for a submitted instruction.
#[derive(Debug, Clone, Serialize)]
pub struct TaskResponse {
    pub task_id: String,
    pub status: RunStatus,
    pub subtasks: Vec<ExecutedTask>,
    pub results: ResultsMap,
    pub chat_response: String,
}

/// Entry point for runs: a decomposer plus the validated agent registry.
///
/// Holds no per-run state, so one instance can serve concurrent requests
/// behind an `Arc`.
pub struct Orchestrator {
    decomposer: Box<dyn Decomposer>,
    registry: AgentRegistry,
}

impl Orchestrator {
    pub fn new(decomposer: impl Decomposer + 'static, registry: AgentRegistry) -> Self {
        Self {
            decomposer: Box::new(decomposer),
            registry,
        }
    }

    /// Keyword decomposer plus the reference agents, configured from `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            KeywordDecomposer::default(),
            default_registry(&config.agents)?,
        ))
    }

    pub fn registry(&self) -> &AgentRegistry {
        &self.registry
    }

    /// Decompose without executing.
    pub fn plan(&self, instruction: &str) -> Result<Decomposition> {
        self.decomposer.decompose(instruction)
    }

    /// Decompose and execute one instruction.
    ///
    /// # Errors
    /// Only a decomposition failure is returned; subtask failures are
    /// reported inside the response.
    pub async fn execute_instruction(&self, instruction: &str) -> Result<TaskResponse> {
        self.execute_with_events(instruction, None).await
    }

    /// Like [`execute_instruction`](Self::execute_instruction), reporting
    /// progress on `events`.
    pub async fn execute_with_events(
        &self,
        instruction: &str,
        events: Option<mpsc::UnboundedSender<RunEvent>>,
    ) -> Result<TaskResponse> {
        let decomposition = self.decomposer.decompose(instruction).map_err(|e| {
            sblog_error!("decomposition failed for {:?}: {}", instruction, e);
            e
        })?;
        sblog!(
            "instruction {:?}: {} subtasks, plan={}",
            decomposition.original_instruction,
            decomposition.subtasks.len(),
            decomposition.execution_plan
        );
        Ok(self.execute_graph(&decomposition.subtasks, events).await)
    }

    /// Execute an already-built graph as a new run.
    pub async fn execute_graph(
        &self,
        graph: &TaskGraph,
        events: Option<mpsc::UnboundedSender<RunEvent>>,
    ) -> TaskResponse {
        let mut run = Run::new();
        run.start();
        sblog_run!(run.id, "started with {} tasks", graph.len());

        let mut executor = Executor::new(&self.registry, graph).with_run_id(&run.id);
        if let Some(tx) = events {
            executor = executor.with_events(tx);
        }
        let outcome = executor.run().await;
        let chat_response = render_summary(&outcome.results);

        run.complete();
        let failed = outcome
            .log
            .iter()
            .filter(|entry| !entry.result.is_success())
            .count();
        sblog_run!(
            run.id,
            "{}: {} executed, {} with errors",
            run.status,
            outcome.log.len(),
            failed
        );

        TaskResponse {
            task_id: run.id,
            status: run.status,
            subtasks: outcome.log,
            results: outcome.results,
            chat_response,
        }
    }
}
