//! Dependency-ordered, strictly sequential task execution.
//!
//! The executor walks a [`TaskGraph`] in declaration order. Before running a
//! task it runs, for every dependency agent not yet present in the execution
//! log, the first still-pending task targeting that agent. Each task runs at
//! most once. A dependency that ends in an error result does not stop its
//! dependents from running.
//!
//! Resolution is one level deep: a task pulled forward as a dependency is
//! dispatched directly, without first running its own dependencies. Given
//! `[c(deps b), b(deps a), a]` the log is `b, c, a`.
//!
//! Dependencies are resolved by agent name, so with several tasks per agent
//! the first pending one satisfies the dependency, and the aggregated
//! results keep only the last result per agent.

use std::collections::HashSet;

use tokio::sync::mpsc;

use crate::core::{
    AgentResult, ExecutedTask, ResultsMap, SharedMemory, Task, TaskGraph, TaskId, TaskStatus,
};
use crate::{sblog_run_debug, sblog_trace};

use super::registry::AgentRegistry;

/// Events emitted while a run progresses.
///
/// Sending is best effort; a dropped receiver never affects execution.
#[derive(Debug, Clone, PartialEq)]
pub enum RunEvent {
    /// A task changed lifecycle state.
    TaskStatusChanged {
        task_id: TaskId,
        agent: String,
        action: String,
        status: TaskStatus,
    },
    /// A task produced its result.
    TaskFinished {
        task_id: TaskId,
        agent: String,
        result: AgentResult,
    },
}

/// Everything a finished execution leaves behind.
#[derive(Debug)]
pub struct ExecutionOutcome {
    /// Tasks in the order they ran.
    pub log: Vec<ExecutedTask>,
    /// Last result per agent.
    pub results: ResultsMap,
    /// Shared memory as it stood when the last task finished.
    pub memory: SharedMemory,
}

/// Runs one [`TaskGraph`] against a registry with its own shared memory.
///
/// Consumed by [`Executor::run`]; build a new one per run.
pub struct Executor<'a> {
    registry: &'a AgentRegistry,
    graph: &'a TaskGraph,
    run_id: String,
    memory: SharedMemory,
    log: Vec<ExecutedTask>,
    executed: HashSet<TaskId>,
    results: ResultsMap,
    event_tx: Option<mpsc::UnboundedSender<RunEvent>>,
}

impl<'a> Executor<'a> {
    /// Create an executor with a fresh shared memory.
    pub fn new(registry: &'a AgentRegistry, graph: &'a TaskGraph) -> Self {
        Self {
            registry,
            graph,
            run_id: "local".to_string(),
            memory: SharedMemory::new(),
            log: Vec::new(),
            executed: HashSet::new(),
            results: ResultsMap::new(),
            event_tx: None,
        }
    }

    /// Tag log lines with `run_id`.
    pub fn with_run_id(mut self, run_id: &str) -> Self {
        self.run_id = run_id.to_string();
        self
    }

    /// Emit [`RunEvent`]s on `tx` during execution.
    pub fn with_events(mut self, tx: mpsc::UnboundedSender<RunEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    /// Run every task in the graph and return the log and results.
    pub async fn run(mut self) -> ExecutionOutcome {
        let graph = self.graph;

        for (id, dep) in graph.dangling_dependencies() {
            sblog_run_debug!(
                self.run_id,
                "task {} depends on {} which has no task; ignored",
                id.short(),
                dep
            );
        }

        for task in graph.iter() {
            if self.executed.contains(&task.id) {
                continue;
            }

            for dep in &task.dependencies {
                if self.agent_in_log(dep) {
                    continue;
                }
                if let Some(dep_task) = graph.first_pending_for_agent(dep, &self.executed) {
                    sblog_run_debug!(
                        self.run_id,
                        "running {} ({}) ahead of {} ({})",
                        dep_task.id.short(),
                        dep_task.agent,
                        task.id.short(),
                        task.agent
                    );
                    self.dispatch(dep_task).await;
                }
            }

            // May already have run as its own dependency's target.
            if !self.executed.contains(&task.id) {
                self.dispatch(task).await;
            }
        }

        ExecutionOutcome {
            log: self.log,
            results: self.results,
            memory: self.memory,
        }
    }

    fn agent_in_log(&self, agent: &str) -> bool {
        self.log.iter().any(|entry| entry.agent() == agent)
    }

    async fn dispatch(&mut self, task: &Task) {
        self.emit(RunEvent::TaskStatusChanged {
            task_id: task.id,
            agent: task.agent.clone(),
            action: task.action.clone(),
            status: TaskStatus::Running,
        });

        let result = self
            .registry
            .execute(&task.agent, &task.action, &task.parameters, &mut self.memory)
            .await;
        sblog_trace!("memory after {}: {} keys", task.id.short(), self.memory.len());

        let position = self.log.len();
        self.executed.insert(task.id);
        self.results.upsert(&task.agent, result.clone());
        self.log
            .push(ExecutedTask::new(task.clone(), result.clone(), position));

        self.emit(RunEvent::TaskFinished {
            task_id: task.id,
            agent: task.agent.clone(),
            result,
        });
        self.emit(RunEvent::TaskStatusChanged {
            task_id: task.id,
            agent: task.agent.clone(),
            action: task.action.clone(),
            status: TaskStatus::Done,
        });
    }

    fn emit(&self, event: RunEvent) {
        if let Some(tx) = &self.event_tx {
            let _ = tx.send(event);
        }
    }
}
