//! Run-scoped scratch space shared by the agents of a single run.
//!
//! A fresh [`SharedMemory`] is created for every run and dropped when the
//! run ends. Execution is sequential, so no synchronization is needed.
//!
//! Recognized keys and who touches them:
//!
//! | key             | written by            | read by              |
//! |-----------------|-----------------------|----------------------|
//! | `leads`         | `hubspot.get_leads`   | `gmail.send_email`   |
//! | `meeting_notes` | `notion.get_meeting_notes` | `gmail.send_email` |
//! | `emails_sent`   | `gmail.send_email`    | nobody               |

use std::collections::HashMap;

use serde_json::Value;

use crate::sblog_trace;

/// Well-known memory keys.
pub mod keys {
    pub const LEADS: &str = "leads";
    pub const MEETING_NOTES: &str = "meeting_notes";
    pub const EMAILS_SENT: &str = "emails_sent";
}

#[derive(Debug, Clone, Default)]
pub struct SharedMemory {
    data: HashMap<String, Value>,
}

impl SharedMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value, overwriting any previous value for the key.
    pub fn store(&mut self, key: &str, value: impl Into<Value>) {
        sblog_trace!("memory store key={}", key);
        self.data.insert(key.to_string(), value.into());
    }

    pub fn retrieve(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Full copy of the current contents.
    pub fn snapshot(&self) -> HashMap<String, Value> {
        self.data.clone()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
