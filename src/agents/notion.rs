//! Notes agent that returns the reference meeting fixture.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{simulate_latency, Agent, AgentFault};
use crate::action_enum;
use crate::core::memory::keys;
use crate::core::{AgentResult, Parameters, SharedMemory};

pub const NAME: &str = "notion";

action_enum! {
    pub enum NotionAction {
        GetMeetingNotes => "get_meeting_notes",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeetingNotes {
    pub meeting_id: String,
    pub title: String,
    pub attendees: Vec<String>,
    pub key_points: Vec<String>,
    pub action_items: Vec<String>,
}

pub fn fixture_meeting_notes() -> MeetingNotes {
    MeetingNotes {
        meeting_id: "zoom_meeting_001".to_string(),
        title: "Sales Discovery Call - July 25, 2025".to_string(),
        attendees: vec!["John Smith".to_string(), "Sarah Johnson".to_string()],
        key_points: vec![
            "Both companies interested in our enterprise solution".to_string(),
            "Budget approved for Q3 implementation".to_string(),
            "Need technical demo scheduled for next week".to_string(),
        ],
        action_items: vec![
            "Send follow-up email with pricing".to_string(),
            "Schedule technical demo".to_string(),
            "Share case studies".to_string(),
        ],
    }
}

/// Writes `meeting_notes` to shared memory.
pub struct NotionAgent {
    latency: Option<Duration>,
}

impl NotionAgent {
    pub fn new(latency: Option<Duration>) -> Self {
        Self { latency }
    }

    async fn get_meeting_notes(
        &self,
        _parameters: &Parameters,
        memory: &mut SharedMemory,
    ) -> Result<AgentResult, AgentFault> {
        simulate_latency(self.latency).await;

        let data = serde_json::to_value(fixture_meeting_notes())?;
        memory.store(keys::MEETING_NOTES, data.clone());

        Ok(AgentResult::success(data, "Retrieved meeting notes from Notion"))
    }
}

#[async_trait]
impl Agent for NotionAgent {
    fn name(&self) -> &str {
        NAME
    }

    fn capabilities(&self) -> Vec<&'static str> {
        NotionAction::names()
    }

    async fn invoke(
        &self,
        action: &str,
        parameters: &Parameters,
        memory: &mut SharedMemory,
    ) -> Result<AgentResult, AgentFault> {
        match action.parse::<NotionAction>()? {
            NotionAction::GetMeetingNotes => self.get_meeting_notes(parameters, memory).await,
        }
    }
}
