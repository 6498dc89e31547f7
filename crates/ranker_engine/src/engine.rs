use std::io;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use ranker_logging::{ranker_debug, ranker_warn};

use crate::{EngineEvent, ProgressService};

/// One request to the progress service. Each produces exactly one
/// [`EngineEvent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCommand {
    FetchProgress,
    SaveDraft {
        jobs: Vec<String>,
        ranking: Option<Vec<String>>,
    },
    ResetToInput,
    GenerateAndComplete {
        jobs: Vec<String>,
        ranking: Vec<String>,
    },
    SendChat {
        message: String,
    },
}

/// Runs service requests on a background tokio runtime, so the caller's
/// event loop never blocks on the network.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(service: Arc<dyn ProgressService>, identity: impl Into<String>) -> io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<EngineCommand>();
        let (event_tx, event_rx) = mpsc::channel();
        let identity: Arc<str> = Arc::from(identity.into());
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let service = service.clone();
                let identity = identity.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    let event = handle_command(service.as_ref(), &identity, command).await;
                    if event_tx.send(event).is_err() {
                        ranker_warn!("Engine event dropped: receiver is gone");
                    }
                });
            }
            ranker_debug!("Engine command channel closed");
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn submit(&self, command: EngineCommand) {
        ranker_debug!("Engine command {:?}", command);
        if self.cmd_tx.send(command).is_err() {
            ranker_warn!("Engine worker is gone; command dropped");
        }
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn handle_command(
    service: &dyn ProgressService,
    identity: &str,
    command: EngineCommand,
) -> EngineEvent {
    match command {
        EngineCommand::FetchProgress => {
            EngineEvent::ProgressFetched(service.fetch_progress(identity).await)
        }
        EngineCommand::SaveDraft { jobs, ranking } => EngineEvent::DraftSaved(
            service
                .save_draft(identity, &jobs, ranking.as_deref())
                .await,
        ),
        EngineCommand::ResetToInput => {
            EngineEvent::ResetSaved(service.reset_to_input(identity).await)
        }
        EngineCommand::GenerateAndComplete { jobs, ranking } => EngineEvent::GenerationFinished(
            service
                .generate_and_complete(identity, &jobs, &ranking)
                .await,
        ),
        EngineCommand::SendChat { message } => {
            EngineEvent::ChatReplied(service.career_chat(identity, &message).await)
        }
    }
}
