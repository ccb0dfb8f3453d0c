//! Ordered task graph with agent-name dependencies.
//!
//! Unlike a DAG keyed by task id, edges here point at agents: a task that
//! depends on `hubspot` is satisfied by whichever `hubspot` task ran first.
//! Declaration order is preserved and is the default execution order.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::task::{Task, TaskId};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskGraph {
    tasks: Vec<Task>,
}

impl TaskGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a task. A task whose id is already present is ignored and
    /// `false` is returned.
    pub fn push(&mut self, task: Task) -> bool {
        if self.contains_task(&task.id) {
            return false;
        }
        self.tasks.push(task);
        true
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get_task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    pub fn contains_task(&self, id: &TaskId) -> bool {
        self.tasks.iter().any(|t| &t.id == id)
    }

    /// Check whether any task targets `agent`.
    pub fn has_agent(&self, agent: &str) -> bool {
        self.tasks.iter().any(|t| t.agent == agent)
    }

    /// First task for `agent` that is not in `executed`.
    ///
    /// This is how an agent-name dependency is resolved to a concrete task.
    pub fn first_pending_for_agent(&self, agent: &str, executed: &HashSet<TaskId>) -> Option<&Task> {
        self.tasks
            .iter()
            .find(|t| t.agent == agent && !executed.contains(&t.id))
    }

    /// Dependencies that name an agent with no task in this graph.
    ///
    /// These are silently skipped during execution; callers may want to log them.
    pub fn dangling_dependencies(&self) -> Vec<(TaskId, String)> {
        self.tasks
            .iter()
            .flat_map(|t| {
                t.dependencies
                    .iter()
                    .filter(|d| !self.has_agent(d))
                    .map(move |d| (t.id, d.clone()))
            })
            .collect()
    }

    /// Sorted `(agent, action, dependencies)` triples, independent of ids.
    pub fn signatures(&self) -> Vec<(String, String, Vec<String>)> {
        let mut sigs: Vec<_> = self.tasks.iter().map(Task::signature).collect();
        sigs.sort();
        sigs
    }
}

impl FromIterator<Task> for TaskGraph {
    fn from_iter<I: IntoIterator<Item = Task>>(iter: I) -> Self {
        let mut graph = TaskGraph::new();
        for task in iter {
            graph.push(task);
        }
        graph
    }
}

impl<'a> IntoIterator for &'a TaskGraph {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}
