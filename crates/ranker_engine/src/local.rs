use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use ranker_logging::{ranker_info, ranker_warn};

use crate::{
    build_chat_prompt, build_prompt, GenerationOutcome, NarrativeGenerator, ProgressRecord,
    ProgressService, ProgressStatus, RecordStore, ServiceError,
};

/// Self-hosted service: records live in a local directory, narratives come
/// from the given generator.
pub struct LocalProgressService {
    store: RecordStore,
    generator: Arc<dyn NarrativeGenerator>,
}

impl LocalProgressService {
    pub fn new(dir: impl Into<PathBuf>, generator: Arc<dyn NarrativeGenerator>) -> Self {
        Self {
            store: RecordStore::new(dir),
            generator,
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    fn load_or_default(&self, identity: &str) -> Result<ProgressRecord, ServiceError> {
        Ok(self.store.load(identity)?.unwrap_or_default())
    }
}

#[async_trait]
impl ProgressService for LocalProgressService {
    async fn fetch_progress(&self, identity: &str) -> Result<ProgressRecord, ServiceError> {
        self.load_or_default(identity)
    }

    async fn save_draft(
        &self,
        identity: &str,
        jobs: &[String],
        ranking: Option<&[String]>,
    ) -> Result<(), ServiceError> {
        let mut record = self.load_or_default(identity)?;
        record.status = ProgressStatus::InProgress;
        record.jobs = jobs.to_vec();
        record.ranking = ranking.map(<[String]>::to_vec).unwrap_or_default();
        self.store.save(identity, &record)?;
        Ok(())
    }

    async fn reset_to_input(&self, identity: &str) -> Result<(), ServiceError> {
        let mut record = self.load_or_default(identity)?;
        record.status = ProgressStatus::NotStarted;
        self.store.save(identity, &record)?;
        Ok(())
    }

    async fn generate_and_complete(
        &self,
        identity: &str,
        jobs: &[String],
        ranking: &[String],
    ) -> Result<GenerationOutcome, ServiceError> {
        let mut record = self.load_or_default(identity)?;
        // Only the top five are discussed.
        let source = if ranking.is_empty() { jobs } else { ranking };
        let ranked: Vec<String> = source.iter().take(5).cloned().collect();
        let prompt = build_prompt(&ranked, record.traits.as_deref());

        let narrative = match self.generator.generate(&prompt).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                ranker_warn!("Generator returned no text");
                return Ok(GenerationOutcome::Rejected {
                    error: "the generator returned no text".to_string(),
                });
            }
            Err(err) => {
                // The saved record stays in progress so the learner can retry.
                ranker_warn!("Generation failed: {}", err);
                return Ok(GenerationOutcome::Rejected {
                    error: err.to_string(),
                });
            }
        };

        record.status = ProgressStatus::Completed;
        record.jobs = jobs.to_vec();
        record.ranking = ranked;
        record.analysis = Some(narrative.clone());
        self.store.save(identity, &record)?;
        ranker_info!("Completed analysis of {} bytes", narrative.len());

        Ok(GenerationOutcome::Completed {
            narrative,
            traits: record.traits,
        })
    }

    async fn career_chat(&self, identity: &str, message: &str) -> Result<String, ServiceError> {
        if message.trim().is_empty() {
            return Err(ServiceError::Rejected("empty message".to_string()));
        }
        let record = self.load_or_default(identity)?;
        let prompt = build_chat_prompt(&record.ranking, message);
        let reply = self.generator.generate(&prompt).await?;
        if reply.trim().is_empty() {
            return Err(ServiceError::InvalidResponse(
                "empty chat response".to_string(),
            ));
        }
        Ok(reply)
    }
}
