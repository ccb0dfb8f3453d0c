//! Normalized agent outcomes.
//!
//! Every dispatch produces an [`AgentResult`], whether the agent succeeded,
//! declined to proceed, or never ran at all.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultStatus {
    Success,
    Error,
}

impl std::fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResultStatus::Success => write!(f, "success"),
            ResultStatus::Error => write!(f, "error"),
        }
    }
}

/// Outcome of one agent invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResult {
    pub status: ResultStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    pub message: String,
}

impl AgentResult {
    pub fn success(data: impl Into<Value>, message: impl Into<String>) -> Self {
        Self {
            status: ResultStatus::Success,
            data: Some(data.into()),
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ResultStatus::Error,
            data: None,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ResultStatus::Success
    }

    /// Number of items in `data` when it is a list, zero otherwise.
    pub fn data_len(&self) -> usize {
        match &self.data {
            Some(Value::Array(items)) => items.len(),
            _ => 0,
        }
    }
}

/// Results keyed by agent name.
///
/// Keys keep the position of their first insertion; a later result for the
/// same agent replaces the earlier one in place. Serializes as a JSON object
/// in that order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultsMap {
    entries: Vec<(String, AgentResult)>,
}

impl ResultsMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the result for `agent`, returning the one it replaced.
    pub fn upsert(&mut self, agent: &str, result: AgentResult) -> Option<AgentResult> {
        match self.entries.iter_mut().find(|(name, _)| name == agent) {
            Some((_, slot)) => Some(std::mem::replace(slot, result)),
            None => {
                self.entries.push((agent.to_string(), result));
                None
            }
        }
    }

    pub fn get(&self, agent: &str) -> Option<&AgentResult> {
        self.entries
            .iter()
            .find(|(name, _)| name == agent)
            .map(|(_, result)| result)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AgentResult)> {
        self.entries.iter().map(|(name, result)| (name.as_str(), result))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for ResultsMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (agent, result) in &self.entries {
            map.serialize_entry(agent, result)?;
        }
        map.end()
    }
}
