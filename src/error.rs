use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("No home directory")]
    NoHomeDir,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Decomposition failed: {0}")]
    Decomposition(String),

    #[error("Agent already registered: {name}")]
    AgentExists { name: String },

    #[error("Agent {agent} declares action {action} more than once")]
    DuplicateCapability { agent: String, action: String },

    #[error("Agent {agent} declares no capabilities")]
    NoCapabilities { agent: String },

    #[error("Server error: {0}")]
    Server(String),
}

pub type Result<T> = std::result::Result<T, Error>;
