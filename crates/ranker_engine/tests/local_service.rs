use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use ranker_engine::{
    GenerationOutcome, LocalProgressService, NarrativeGenerator, ProgressRecord, ProgressService,
    ProgressStatus, ServiceError, UnavailableGenerator,
};

/// Replies with a fixed text and remembers every prompt.
struct ScriptedGenerator {
    reply: String,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl NarrativeGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, ServiceError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.reply.clone())
    }
}

fn list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn jobs() -> Vec<String> {
    list(&["Vet", "Pilot", "Chef", "Teacher", "Artist"])
}

fn ranking() -> Vec<String> {
    list(&["Chef", "Vet", "Pilot", "Teacher", "Artist"])
}

fn record_files(dir: &std::path::Path) -> usize {
    std::fs::read_dir(dir)
        .unwrap()
        .filter_map(Result::ok)
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "ron"))
        .count()
}

#[tokio::test]
async fn unknown_identity_reads_as_not_started() {
    let dir = tempfile::tempdir().unwrap();
    let service = LocalProgressService::new(dir.path(), Arc::new(UnavailableGenerator));

    let record = service.fetch_progress("nobody").await.unwrap();
    assert_eq!(record, ProgressRecord::default());
}

#[tokio::test]
async fn repeated_saves_keep_one_record() {
    let dir = tempfile::tempdir().unwrap();
    let service = LocalProgressService::new(dir.path(), Arc::new(UnavailableGenerator));

    service.save_draft("amy", &jobs(), Some(&jobs())).await.unwrap();
    service.save_draft("amy", &jobs(), Some(&jobs())).await.unwrap();
    service
        .save_draft("amy", &jobs(), Some(&ranking()))
        .await
        .unwrap();

    assert_eq!(record_files(dir.path()), 1);
    let record = service.fetch_progress("amy").await.unwrap();
    assert_eq!(record.status, ProgressStatus::InProgress);
    assert_eq!(record.jobs, jobs());
    assert_eq!(record.ranking, ranking());
}

#[tokio::test]
async fn identities_are_kept_apart() {
    let dir = tempfile::tempdir().unwrap();
    let service = LocalProgressService::new(dir.path(), Arc::new(UnavailableGenerator));

    service.save_draft("amy", &jobs(), None).await.unwrap();

    assert_eq!(record_files(dir.path()), 1);
    let other = service.fetch_progress("ben").await.unwrap();
    assert_eq!(other.status, ProgressStatus::NotStarted);
    assert!(other.jobs.is_empty());
}

#[tokio::test]
async fn reset_keeps_the_draft() {
    let dir = tempfile::tempdir().unwrap();
    let service = LocalProgressService::new(dir.path(), Arc::new(UnavailableGenerator));

    service
        .save_draft("amy", &jobs(), Some(&ranking()))
        .await
        .unwrap();
    service.reset_to_input("amy").await.unwrap();

    let record = service.fetch_progress("amy").await.unwrap();
    assert_eq!(record.status, ProgressStatus::NotStarted);
    assert_eq!(record.jobs, jobs());
}

#[tokio::test]
async fn generation_completes_the_record() {
    let dir = tempfile::tempdir().unwrap();
    let generator = ScriptedGenerator::new("1) Chef\nHot kitchens.");
    let service = LocalProgressService::new(dir.path(), generator.clone());

    service
        .save_draft("amy", &jobs(), Some(&ranking()))
        .await
        .unwrap();
    let outcome = service
        .generate_and_complete("amy", &jobs(), &ranking())
        .await
        .unwrap();

    assert_eq!(
        outcome,
        GenerationOutcome::Completed {
            narrative: "1) Chef\nHot kitchens.".to_string(),
            traits: None,
        }
    );
    let prompts = generator.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("1) Chef\n2) Vet\n"));

    let record = service.fetch_progress("amy").await.unwrap();
    assert_eq!(record.status, ProgressStatus::Completed);
    assert_eq!(record.ranking, ranking());
    assert_eq!(record.analysis.as_deref(), Some("1) Chef\nHot kitchens."));
}

#[tokio::test]
async fn generation_uses_stored_traits() {
    let dir = tempfile::tempdir().unwrap();
    let generator = ScriptedGenerator::new("1) Chef\nFine.");
    let service = LocalProgressService::new(dir.path(), generator.clone());

    let seeded = ProgressRecord {
        status: ProgressStatus::InProgress,
        jobs: jobs(),
        ranking: ranking(),
        analysis: None,
        traits: Some("ISFP".to_string()),
    };
    service.store().save("amy", &seeded).unwrap();

    let outcome = service
        .generate_and_complete("amy", &jobs(), &ranking())
        .await
        .unwrap();

    assert!(matches!(
        outcome,
        GenerationOutcome::Completed { traits: Some(ref t), .. } if t == "ISFP"
    ));
    assert!(generator.prompts()[0].contains("personality type is ISFP"));
}

#[tokio::test]
async fn unavailable_generator_leaves_record_in_progress() {
    let dir = tempfile::tempdir().unwrap();
    let service = LocalProgressService::new(dir.path(), Arc::new(UnavailableGenerator));

    service
        .save_draft("amy", &jobs(), Some(&ranking()))
        .await
        .unwrap();
    let outcome = service
        .generate_and_complete("amy", &jobs(), &ranking())
        .await
        .unwrap();

    assert!(matches!(outcome, GenerationOutcome::Rejected { .. }));
    let record = service.fetch_progress("amy").await.unwrap();
    assert_eq!(record.status, ProgressStatus::InProgress);
    assert_eq!(record.analysis, None);
}

#[tokio::test]
async fn blank_generator_text_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let service = LocalProgressService::new(dir.path(), ScriptedGenerator::new("  \n"));

    let outcome = service
        .generate_and_complete("amy", &jobs(), &ranking())
        .await
        .unwrap();

    assert!(matches!(outcome, GenerationOutcome::Rejected { .. }));
    assert_eq!(record_files(dir.path()), 0);
}

#[tokio::test]
async fn chat_answers_through_the_generator() {
    let dir = tempfile::tempdir().unwrap();
    let generator = ScriptedGenerator::new("Start by cooking at home.");
    let service = LocalProgressService::new(dir.path(), generator.clone());

    service
        .save_draft("amy", &jobs(), Some(&ranking()))
        .await
        .unwrap();
    let reply = service
        .career_chat("amy", "How do I become a chef?")
        .await
        .unwrap();

    assert_eq!(reply, "Start by cooking at home.");
    assert!(generator.prompts()[0].contains("Chef, Vet, Pilot, Teacher, Artist."));
}

#[tokio::test]
async fn chat_rejects_blank_messages() {
    let dir = tempfile::tempdir().unwrap();
    let service = LocalProgressService::new(dir.path(), ScriptedGenerator::new("hi"));

    let err = service.career_chat("amy", "   ").await.unwrap_err();
    assert!(matches!(err, ServiceError::Rejected(_)));
}
