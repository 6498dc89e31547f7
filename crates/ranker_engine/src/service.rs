use std::time::Duration;

use async_trait::async_trait;

use crate::{GenerationOutcome, ProgressRecord, ServiceError};

#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub connect_timeout: Duration,
    /// Applies to every call except narrative generation, which waits as long
    /// as the service takes.
    pub request_timeout: Duration,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// The persistence & narrative collaborator. Every write is an upsert of the
/// one record held per identity.
#[async_trait]
pub trait ProgressService: Send + Sync {
    /// Current record, or a `NotStarted` one if the identity never saved.
    async fn fetch_progress(&self, identity: &str) -> Result<ProgressRecord, ServiceError>;

    /// Stores the draft (and ranking, if given) and marks the record in progress.
    async fn save_draft(
        &self,
        identity: &str,
        jobs: &[String],
        ranking: Option<&[String]>,
    ) -> Result<(), ServiceError>;

    /// Marks the record not started; the draft is kept.
    async fn reset_to_input(&self, identity: &str) -> Result<(), ServiceError>;

    /// Generates the narrative for `ranking` and marks the record completed.
    /// A generator failure is a `Rejected` outcome, not an error.
    async fn generate_and_complete(
        &self,
        identity: &str,
        jobs: &[String],
        ranking: &[String],
    ) -> Result<GenerationOutcome, ServiceError>;

    /// Answers a follow-up question from the careers chat.
    async fn career_chat(&self, identity: &str, message: &str) -> Result<String, ServiceError>;
}
