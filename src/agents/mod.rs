//! Agent capability interface and the built-in reference agents.
//!
//! An agent is a named service adapter that supports a closed set of
//! actions. Each agent type declares its actions as an enum (see
//! [`action_enum!`]) and advertises their names through
//! [`Agent::capabilities`]; the registry validates that list when the agent
//! is registered and checks it again before every dispatch.

mod gmail;
mod hubspot;
mod notion;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::AgentsConfig;
use crate::core::{AgentResult, Parameters, SharedMemory};
use crate::orchestration::AgentRegistry;
use crate::Result;

pub use gmail::{GmailAction, GmailAgent, SentEmail};
pub use hubspot::{fixture_leads, HubspotAction, HubspotAgent, Lead};
pub use notion::{fixture_meeting_notes, MeetingNotes, NotionAction, NotionAgent};

/// A fault raised while an agent was running.
///
/// Faults never leave the registry; they are folded into an error
/// [`AgentResult`] at the dispatch boundary.
#[derive(Error, Debug)]
pub enum AgentFault {
    #[error("malformed data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("unknown action {0}")]
    UnknownAction(String),

    #[error("{0}")]
    Other(String),
}

/// Capability interface every agent implements.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Name the agent is registered and addressed under.
    fn name(&self) -> &str;

    /// Names of the actions this agent supports.
    fn capabilities(&self) -> Vec<&'static str>;

    /// Run `action`. Side effects on `memory` are applied directly.
    ///
    /// Application-level refusals are returned as `Ok` with an error result;
    /// `Err` is reserved for faults.
    async fn invoke(
        &self,
        action: &str,
        parameters: &Parameters,
        memory: &mut SharedMemory,
    ) -> std::result::Result<AgentResult, AgentFault>;
}

/// Declare a closed action enum with its wire names.
///
/// Generates `ALL`, `as_str`, `Display` and `FromStr` for the enum.
#[macro_export]
macro_rules! action_enum {
    ($(#[$meta:meta])* $vis:vis enum $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }

            pub fn names() -> Vec<&'static str> {
                Self::ALL.iter().map(|a| a.as_str()).collect()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::agents::AgentFault;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($name::$variant),)+
                    other => Err($crate::agents::AgentFault::UnknownAction(other.to_string())),
                }
            }
        }
    };
}

/// Sleep for the configured latency, if any.
pub(crate) async fn simulate_latency(latency: Option<std::time::Duration>) {
    if let Some(delay) = latency {
        tokio::time::sleep(delay).await;
    }
}

/// Build the registry holding the three reference agents.
pub fn default_registry(config: &AgentsConfig) -> Result<AgentRegistry> {
    AgentRegistry::builder()
        .register(HubspotAgent::new(config.latency(config.hubspot_latency_ms)))
        .register(NotionAgent::new(config.latency(config.notion_latency_ms)))
        .register(GmailAgent::new(config.latency(config.gmail_latency_ms)))
        .build()
}
