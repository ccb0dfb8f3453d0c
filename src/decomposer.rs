//! Instruction decomposition.
//!
//! A [`Decomposer`] turns a free-form instruction into a [`TaskGraph`].
//! Only the output contract matters to the rest of the crate, so the
//! keyword-rule implementation here can be swapped for a model-backed one.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::{Task, TaskGraph};
use crate::error::Result;
use crate::sblog_debug;

/// How the decomposed tasks are expected to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionPlan {
    /// Zero or one task.
    Single,
    /// More than one task, run one after another.
    Sequential,
}

impl ExecutionPlan {
    pub fn for_task_count(count: usize) -> Self {
        if count > 1 {
            ExecutionPlan::Sequential
        } else {
            ExecutionPlan::Single
        }
    }
}

impl std::fmt::Display for ExecutionPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionPlan::Single => write!(f, "single"),
            ExecutionPlan::Sequential => write!(f, "sequential"),
        }
    }
}

/// Output of a decomposer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decomposition {
    pub original_instruction: String,
    pub subtasks: TaskGraph,
    pub execution_plan: ExecutionPlan,
}

impl Decomposition {
    pub fn new(instruction: &str, subtasks: TaskGraph) -> Self {
        let execution_plan = ExecutionPlan::for_task_count(subtasks.len());
        Self {
            original_instruction: instruction.to_string(),
            subtasks,
            execution_plan,
        }
    }
}

/// Maps an instruction to a task graph.
///
/// Implementations must be deterministic: the same instruction yields the
/// same `(agent, action, dependencies)` triples, although task ids may differ.
pub trait Decomposer: Send + Sync {
    fn decompose(&self, instruction: &str) -> Result<Decomposition>;
}

/// One keyword rule: if any keyword occurs in the instruction, emit a task.
#[derive(Debug, Clone)]
pub struct KeywordRule {
    pub keywords: Vec<String>,
    pub agent: String,
    pub action: String,
    pub parameters: Vec<(String, Value)>,
    /// Agents this task depends on, when an earlier rule emitted them.
    pub after: Vec<String>,
}

impl KeywordRule {
    pub fn new(keywords: &[&str], agent: &str, action: &str) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            agent: agent.to_string(),
            action: action.to_string(),
            parameters: Vec::new(),
            after: Vec::new(),
        }
    }

    pub fn param(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.parameters.push((key.to_string(), value.into()));
        self
    }

    pub fn after(mut self, agents: &[&str]) -> Self {
        self.after = agents.iter().map(|a| a.to_string()).collect();
        self
    }

    fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k.as_str()))
    }
}

/// Case-insensitive substring matching against an ordered rule list.
///
/// Rules are evaluated in order; a rule's `after` agents only become
/// dependencies if an earlier rule already emitted a task for them.
#[derive(Debug, Clone)]
pub struct KeywordDecomposer {
    rules: Vec<KeywordRule>,
}

impl KeywordDecomposer {
    pub fn new(rules: Vec<KeywordRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[KeywordRule] {
        &self.rules
    }
}

impl Default for KeywordDecomposer {
    /// The reference CRM / notes / mail rule set.
    fn default() -> Self {
        Self::new(vec![
            KeywordRule::new(&["hubspot", "lead", "contact"], "hubspot", "get_leads")
                .param("timeframe", "yesterday"),
            KeywordRule::new(&["notion", "notes", "meeting"], "notion", "get_meeting_notes")
                .param("date", "yesterday"),
            KeywordRule::new(&["email", "gmail", "send"], "gmail", "send_email")
                .param("type", "follow_up")
                .after(&["hubspot", "notion"]),
        ])
    }
}

impl Decomposer for KeywordDecomposer {
    fn decompose(&self, instruction: &str) -> Result<Decomposition> {
        let lowered = instruction.to_lowercase();
        let mut graph = TaskGraph::new();

        for rule in self.rules.iter().filter(|r| r.matches(&lowered)) {
            let mut task = Task::new(&rule.agent, &rule.action);
            for (key, value) in &rule.parameters {
                task = task.with_param(key, value.clone());
            }
            for dep in &rule.after {
                if graph.has_agent(dep) {
                    task = task.depends_on(dep);
                }
            }
            graph.push(task);
        }

        sblog_debug!(
            "decomposed {:?} into {} tasks",
            instruction,
            graph.len()
        );
        Ok(Decomposition::new(instruction, graph))
    }
}
