/// Requests from the state machine to the outside world. Every effect is
/// answered by exactly one message (see [`crate::Msg`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Read the saved snapshot. Answered by `Msg::ProgressLoaded`.
    FetchProgress,
    /// Upsert the draft (stage becomes in-progress). Answered by `Msg::DraftSaved`.
    SaveDraft {
        draft_list: Vec<String>,
        rank_order: Option<Vec<String>>,
    },
    /// Mark the snapshot not-started, keeping the draft. Answered by `Msg::ResetSaved`.
    ResetToInput,
    /// Generate the narrative and mark the snapshot completed.
    /// Answered by `Msg::GenerationFinished`.
    GenerateAndComplete {
        draft_list: Vec<String>,
        rank_order: Vec<String>,
    },
    /// Ask the careers guide a follow-up question. Answered by `Msg::ChatReplied`.
    SendChat { message: String },
}
