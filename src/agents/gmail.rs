//! Mail agent that sends a follow-up to every lead in shared memory.
//!
//! Reads `leads` (required) and `meeting_notes` (optional), writes
//! `emails_sent`. Without leads it declines with an error result rather
//! than a fault.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{simulate_latency, Agent, AgentFault, Lead, MeetingNotes};
use crate::action_enum;
use crate::core::memory::keys;
use crate::core::{AgentResult, Parameters, SharedMemory};

pub const NAME: &str = "gmail";

const FOLLOW_UP: &str = "follow_up";
const FOLLOW_UP_SUBJECT: &str = "Follow-up from our Zoom call";

const DEFAULT_KEY_POINTS: &[&str] = &[
    "Enterprise solution implementation for Q3",
    "Technical demo scheduling",
    "Pricing and case studies",
];

action_enum! {
    pub enum GmailAction {
        SendEmail => "send_email",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentEmail {
    pub to: String,
    pub subject: String,
    pub status: String,
    pub sent_at: String,
    pub body: String,
}

pub struct GmailAgent {
    latency: Option<Duration>,
}

impl GmailAgent {
    pub fn new(latency: Option<Duration>) -> Self {
        Self { latency }
    }

    async fn send_email(
        &self,
        parameters: &Parameters,
        memory: &mut SharedMemory,
    ) -> Result<AgentResult, AgentFault> {
        simulate_latency(self.latency).await;

        match parameters.get("type") {
            None => {}
            Some(Value::String(kind)) if kind == FOLLOW_UP => {}
            Some(other) => {
                return Err(AgentFault::InvalidParameter {
                    name: "type".to_string(),
                    reason: format!("unsupported email type {}", other),
                })
            }
        }

        let leads = read_leads(memory)?;
        if leads.is_empty() {
            return Ok(AgentResult::error("No leads found to email"));
        }
        let notes = read_notes(memory)?;

        let sent: Vec<SentEmail> = leads
            .iter()
            .map(|lead| SentEmail {
                to: lead.email.clone(),
                subject: FOLLOW_UP_SUBJECT.to_string(),
                status: "sent".to_string(),
                sent_at: chrono::Local::now().to_rfc3339(),
                body: compose_follow_up(lead, notes.as_ref()),
            })
            .collect();

        let data = serde_json::to_value(&sent)?;
        memory.store(keys::EMAILS_SENT, data.clone());

        Ok(AgentResult::success(
            data,
            format!("Sent {} follow-up emails via Gmail", sent.len()),
        ))
    }
}

/// Absent or null leads read as an empty list; anything else must parse.
fn read_leads(memory: &SharedMemory) -> Result<Vec<Lead>, AgentFault> {
    match memory.retrieve(keys::LEADS) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(value) => Ok(serde_json::from_value(value.clone())?),
    }
}

fn read_notes(memory: &SharedMemory) -> Result<Option<MeetingNotes>, AgentFault> {
    match memory.retrieve(keys::MEETING_NOTES) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
    }
}

fn compose_follow_up(lead: &Lead, notes: Option<&MeetingNotes>) -> String {
    let points: Vec<&str> = match notes {
        Some(n) if !n.key_points.is_empty() => n.key_points.iter().map(String::as_str).collect(),
        _ => DEFAULT_KEY_POINTS.to_vec(),
    };

    let mut body = format!(
        "Hi {},\n\n\
         Thank you for joining our discovery call yesterday. Based on our discussion about \
         {}'s needs, I wanted to follow up with the next steps we discussed.\n\n\
         Key points from our meeting:\n",
        lead.name, lead.company
    );
    for point in points {
        body.push_str("- ");
        body.push_str(point);
        body.push('\n');
    }
    body.push_str(
        "\nI'll be in touch soon to schedule the technical demo we discussed.\n\n\
         Best regards,\nSales Team",
    );
    body
}

#[async_trait]
impl Agent for GmailAgent {
    fn name(&self) -> &str {
        NAME
    }

    fn capabilities(&self) -> Vec<&'static str> {
        GmailAction::names()
    }

    async fn invoke(
        &self,
        action: &str,
        parameters: &Parameters,
        memory: &mut SharedMemory,
    ) -> Result<AgentResult, AgentFault> {
        match action.parse::<GmailAction>()? {
            GmailAction::SendEmail => self.send_email(parameters, memory).await,
        }
    }
}
