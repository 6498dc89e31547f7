use std::sync::Arc;
use std::time::Duration;

use ranker_engine::{
    EngineCommand, EngineEvent, EngineHandle, GenerationOutcome, LocalProgressService,
    ProgressStatus, UnavailableGenerator,
};

const WAIT: Duration = Duration::from_secs(5);

fn jobs() -> Vec<String> {
    ["Vet", "Pilot", "Chef", "Teacher", "Artist"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

#[test]
fn each_command_yields_one_event() {
    let dir = tempfile::tempdir().unwrap();
    let service = Arc::new(LocalProgressService::new(
        dir.path(),
        Arc::new(UnavailableGenerator),
    ));
    let engine = EngineHandle::new(service, "amy").unwrap();

    engine.submit(EngineCommand::FetchProgress);
    match engine.recv_timeout(WAIT) {
        Some(EngineEvent::ProgressFetched(Ok(record))) => {
            assert_eq!(record.status, ProgressStatus::NotStarted);
        }
        other => panic!("unexpected event: {other:?}"),
    }

    engine.submit(EngineCommand::SaveDraft {
        jobs: jobs(),
        ranking: Some(jobs()),
    });
    assert!(matches!(
        engine.recv_timeout(WAIT),
        Some(EngineEvent::DraftSaved(Ok(())))
    ));

    engine.submit(EngineCommand::FetchProgress);
    match engine.recv_timeout(WAIT) {
        Some(EngineEvent::ProgressFetched(Ok(record))) => {
            assert_eq!(record.status, ProgressStatus::InProgress);
            assert_eq!(record.jobs, jobs());
        }
        other => panic!("unexpected event: {other:?}"),
    }

    engine.submit(EngineCommand::GenerateAndComplete {
        jobs: jobs(),
        ranking: jobs(),
    });
    assert!(matches!(
        engine.recv_timeout(WAIT),
        Some(EngineEvent::GenerationFinished(Ok(
            GenerationOutcome::Rejected { .. }
        )))
    ));

    engine.submit(EngineCommand::SendChat {
        message: "Hello".to_string(),
    });
    assert!(matches!(
        engine.recv_timeout(WAIT),
        Some(EngineEvent::ChatReplied(Err(_)))
    ));

    assert!(engine.try_recv().is_none());
}

#[test]
fn reset_reports_back() {
    let dir = tempfile::tempdir().unwrap();
    let service = Arc::new(LocalProgressService::new(
        dir.path(),
        Arc::new(UnavailableGenerator),
    ));
    let engine = EngineHandle::new(service, "amy").unwrap();

    engine.submit(EngineCommand::ResetToInput);
    assert!(matches!(
        engine.recv_timeout(WAIT),
        Some(EngineEvent::ResetSaved(Ok(())))
    ));
}
