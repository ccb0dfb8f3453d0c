//! Agent registry and dispatch boundary.
//!
//! The registry owns every agent instance and is the only place faults are
//! caught. Whatever happens during a dispatch (unknown agent, unsupported
//! action, an agent error or an agent panic) the caller receives an
//! [`AgentResult`].

use std::collections::{HashMap, HashSet};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use thiserror::Error;

use crate::agents::Agent;
use crate::core::{AgentResult, Parameters, SharedMemory};
use crate::error::{Error, Result};
use crate::{sblog_debug, sblog_warn};

/// Dispatch failures produced inside the registry.
///
/// Display text becomes the message of the error result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Agent {0} not found")]
    UnknownAgent(String),

    #[error("Action {action} not supported by {agent}")]
    UnsupportedAction { agent: String, action: String },

    #[error("Error executing {action}: {reason}")]
    InvocationFault { action: String, reason: String },
}

impl From<DispatchError> for AgentResult {
    fn from(err: DispatchError) -> Self {
        AgentResult::error(err.to_string())
    }
}

struct Entry {
    agent: Arc<dyn Agent>,
    actions: HashSet<&'static str>,
}

/// Fixed mapping from agent name to agent, validated at construction.
pub struct AgentRegistry {
    entries: HashMap<String, Entry>,
    order: Vec<String>,
}

impl AgentRegistry {
    pub fn builder() -> AgentRegistryBuilder {
        AgentRegistryBuilder::default()
    }

    /// Registered agent names in registration order.
    pub fn agent_names(&self) -> Vec<&str> {
        self.order.iter().map(String::as_str).collect()
    }

    pub fn contains(&self, agent: &str) -> bool {
        self.entries.contains_key(agent)
    }

    /// Check whether `agent` is registered and declares `action`.
    pub fn supports(&self, agent: &str, action: &str) -> bool {
        self.entries
            .get(agent)
            .map(|entry| entry.actions.contains(action))
            .unwrap_or(false)
    }

    /// Dispatch `action` on `agent`. Never fails; every outcome is a result.
    pub async fn execute(
        &self,
        agent: &str,
        action: &str,
        parameters: &Parameters,
        memory: &mut SharedMemory,
    ) -> AgentResult {
        sblog_debug!("dispatch {}.{}", agent, action);
        match self.try_execute(agent, action, parameters, memory).await {
            Ok(result) => {
                sblog_debug!(
                    "dispatch {}.{} -> {}: {}",
                    agent,
                    action,
                    result.status,
                    result.message
                );
                result
            }
            Err(err) => {
                sblog_warn!("dispatch {}.{} failed: {}", agent, action, err);
                err.into()
            }
        }
    }

    async fn try_execute(
        &self,
        agent: &str,
        action: &str,
        parameters: &Parameters,
        memory: &mut SharedMemory,
    ) -> std::result::Result<AgentResult, DispatchError> {
        let entry = self
            .entries
            .get(agent)
            .ok_or_else(|| DispatchError::UnknownAgent(agent.to_string()))?;

        if !entry.actions.contains(action) {
            return Err(DispatchError::UnsupportedAction {
                agent: agent.to_string(),
                action: action.to_string(),
            });
        }

        let invocation = entry.agent.invoke(action, parameters, memory);
        match AssertUnwindSafe(invocation).catch_unwind().await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(fault)) => Err(DispatchError::InvocationFault {
                action: action.to_string(),
                reason: fault.to_string(),
            }),
            Err(panic) => Err(DispatchError::InvocationFault {
                action: action.to_string(),
                reason: panic_message(&*panic),
            }),
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "agent panicked".to_string()
    }
}

/// Collects agents and validates them into an [`AgentRegistry`].
#[derive(Default)]
pub struct AgentRegistryBuilder {
    agents: Vec<Arc<dyn Agent>>,
}

impl AgentRegistryBuilder {
    pub fn register<A: Agent + 'static>(self, agent: A) -> Self {
        self.register_arc(Arc::new(agent))
    }

    pub fn register_arc(mut self, agent: Arc<dyn Agent>) -> Self {
        self.agents.push(agent);
        self
    }

    /// Validate and freeze the registry.
    ///
    /// # Errors
    /// - an agent has an empty name
    /// - two agents share a name
    /// - an agent declares no actions, or the same action twice
    pub fn build(self) -> Result<AgentRegistry> {
        let mut entries = HashMap::new();
        let mut order = Vec::new();

        for agent in self.agents {
            let name = agent.name().to_string();
            if name.trim().is_empty() {
                return Err(Error::Validation("agent name cannot be empty".to_string()));
            }
            if entries.contains_key(&name) {
                return Err(Error::AgentExists { name });
            }

            let declared = agent.capabilities();
            if declared.is_empty() {
                return Err(Error::NoCapabilities { agent: name });
            }
            let mut actions = HashSet::new();
            for action in declared {
                if !actions.insert(action) {
                    return Err(Error::DuplicateCapability {
                        agent: name,
                        action: action.to_string(),
                    });
                }
            }

            sblog_debug!("registered agent {} actions={:?}", name, actions);
            order.push(name.clone());
            entries.insert(name, Entry { agent, actions });
        }

        Ok(AgentRegistry { entries, order })
    }
}
