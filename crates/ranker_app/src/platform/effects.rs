use std::sync::Arc;
use std::time::Duration;

use ranker_core::{Effect, GenerationReply, Msg, ProgressSnapshot, ProgressStage};
use ranker_engine::{
    EngineCommand, EngineEvent, EngineHandle, GenerationOutcome, ProgressRecord, ProgressService,
    ProgressStatus,
};
use ranker_logging::{ranker_info, ranker_warn};

/// Hands wizard effects to the engine and turns its completions back into
/// messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(service: Arc<dyn ProgressService>, identity: &str) -> std::io::Result<Self> {
        Ok(Self {
            engine: EngineHandle::new(service, identity)?,
        })
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            ranker_info!("Effect {}", effect_name(&effect));
            self.engine.submit(command_for(effect));
        }
    }

    pub fn try_recv(&self) -> Option<Msg> {
        self.engine.try_recv().map(msg_for)
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<Msg> {
        self.engine.recv_timeout(timeout).map(msg_for)
    }
}

fn effect_name(effect: &Effect) -> &'static str {
    match effect {
        Effect::FetchProgress => "FetchProgress",
        Effect::SaveDraft { .. } => "SaveDraft",
        Effect::ResetToInput => "ResetToInput",
        Effect::GenerateAndComplete { .. } => "GenerateAndComplete",
        Effect::SendChat { .. } => "SendChat",
    }
}

pub fn command_for(effect: Effect) -> EngineCommand {
    match effect {
        Effect::FetchProgress => EngineCommand::FetchProgress,
        Effect::SaveDraft {
            draft_list,
            rank_order,
        } => EngineCommand::SaveDraft {
            jobs: draft_list,
            ranking: rank_order,
        },
        Effect::ResetToInput => EngineCommand::ResetToInput,
        Effect::GenerateAndComplete {
            draft_list,
            rank_order,
        } => EngineCommand::GenerateAndComplete {
            jobs: draft_list,
            ranking: rank_order,
        },
        Effect::SendChat { message } => EngineCommand::SendChat { message },
    }
}

/// Service errors reach the wizard as display text only.
pub fn msg_for(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::ProgressFetched(result) => {
            Msg::ProgressLoaded(result.map(snapshot_from).map_err(|err| {
                ranker_warn!("Progress fetch failed: {}", err);
                err.to_string()
            }))
        }
        EngineEvent::DraftSaved(result) => Msg::DraftSaved(result.map_err(|err| err.to_string())),
        EngineEvent::ResetSaved(result) => Msg::ResetSaved(result.map_err(|err| err.to_string())),
        EngineEvent::GenerationFinished(result) => {
            Msg::GenerationFinished(result.map(reply_from).map_err(|err| err.to_string()))
        }
        EngineEvent::ChatReplied(result) => Msg::ChatReplied(result.map_err(|err| err.to_string())),
    }
}

pub fn snapshot_from(record: ProgressRecord) -> ProgressSnapshot {
    ProgressSnapshot {
        stage: match record.status {
            ProgressStatus::NotStarted => ProgressStage::NotStarted,
            ProgressStatus::InProgress => ProgressStage::InProgress,
            ProgressStatus::Completed => ProgressStage::Completed,
        },
        draft_list: record.jobs,
        rank_order: record.ranking,
        narrative: record.analysis,
        traits: record.traits,
    }
}

fn reply_from(outcome: GenerationOutcome) -> GenerationReply {
    match outcome {
        GenerationOutcome::Completed { narrative, traits } => {
            GenerationReply::Completed { narrative, traits }
        }
        GenerationOutcome::Rejected { error } => GenerationReply::Failed { error },
    }
}
