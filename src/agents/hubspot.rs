//! CRM agent that returns the reference lead fixture.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{simulate_latency, Agent, AgentFault};
use crate::action_enum;
use crate::core::memory::keys;
use crate::core::{AgentResult, Parameters, SharedMemory};

pub const NAME: &str = "hubspot";

action_enum! {
    pub enum HubspotAction {
        GetLeads => "get_leads",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub id: String,
    pub name: String,
    pub email: String,
    pub company: String,
    pub phone: String,
}

pub fn fixture_leads() -> Vec<Lead> {
    vec![
        Lead {
            id: "lead_001".to_string(),
            name: "John Smith".to_string(),
            email: "john.smith@techcorp.com".to_string(),
            company: "TechCorp Inc".to_string(),
            phone: "+1-555-0123".to_string(),
        },
        Lead {
            id: "lead_002".to_string(),
            name: "Sarah Johnson".to_string(),
            email: "sarah.j@innovate.io".to_string(),
            company: "Innovate Solutions".to_string(),
            phone: "+1-555-0456".to_string(),
        },
    ]
}

/// Writes `leads` to shared memory.
pub struct HubspotAgent {
    latency: Option<Duration>,
}

impl HubspotAgent {
    pub fn new(latency: Option<Duration>) -> Self {
        Self { latency }
    }

    async fn get_leads(
        &self,
        _parameters: &Parameters,
        memory: &mut SharedMemory,
    ) -> Result<AgentResult, AgentFault> {
        simulate_latency(self.latency).await;

        let leads = fixture_leads();
        let data = serde_json::to_value(&leads)?;
        memory.store(keys::LEADS, data.clone());

        Ok(AgentResult::success(
            data,
            format!("Retrieved {} leads from HubSpot", leads.len()),
        ))
    }
}

#[async_trait]
impl Agent for HubspotAgent {
    fn name(&self) -> &str {
        NAME
    }

    fn capabilities(&self) -> Vec<&'static str> {
        HubspotAction::names()
    }

    async fn invoke(
        &self,
        action: &str,
        parameters: &Parameters,
        memory: &mut SharedMemory,
    ) -> Result<AgentResult, AgentFault> {
        match action.parse::<HubspotAction>()? {
            HubspotAction::GetLeads => self.get_leads(parameters, memory).await,
        }
    }
}
