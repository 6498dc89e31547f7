use serde::{Deserialize, Serialize};

use crate::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

/// The single saved row for one identity.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub status: ProgressStatus,
    #[serde(default)]
    pub jobs: Vec<String>,
    #[serde(default)]
    pub ranking: Vec<String>,
    #[serde(default)]
    pub analysis: Option<String>,
    #[serde(default)]
    pub traits: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    Completed {
        narrative: String,
        traits: Option<String>,
    },
    /// The service answered `ok: false`.
    Rejected { error: String },
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("invalid service url: {0}")]
    InvalidUrl(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out")]
    Timeout,
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("{0}")]
    Rejected(String),
    #[error(transparent)]
    Storage(#[from] StoreError),
}

/// Completions reported back by [`crate::EngineHandle`], one per command.
#[derive(Debug)]
pub enum EngineEvent {
    ProgressFetched(Result<ProgressRecord, ServiceError>),
    DraftSaved(Result<(), ServiceError>),
    ResetSaved(Result<(), ServiceError>),
    GenerationFinished(Result<GenerationOutcome, ServiceError>),
    ChatReplied(Result<String, ServiceError>),
}
