use crate::{GenerationReply, PointerEvent, ProgressSnapshot, RowLayout};

/// Inputs to [`crate::update`]: user actions and completions of effects.
/// Service failures arrive as `Err(message)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// The saved snapshot was fetched (or the fetch failed).
    ProgressLoaded(Result<ProgressSnapshot, String>),
    /// User edited one of the input fields.
    DraftFieldChanged { index: usize, text: String },
    /// User clicked "Next: Rank my jobs".
    ConfirmDraftClicked,
    /// A save-draft request finished.
    DraftSaved(Result<(), String>),
    /// Pointer input over the rank list.
    Pointer(PointerEvent),
    /// Host measured where the rank rows are drawn.
    RowLayoutChanged(RowLayout),
    /// User clicked "Back" on the rank stage.
    BackClicked,
    /// A reset-to-input request finished.
    ResetSaved(Result<(), String>),
    /// User clicked "Next: See AI feedback".
    ConfirmRankClicked,
    /// A generate-and-complete request finished.
    GenerationFinished(Result<GenerationReply, String>),
    /// User asked to start over from the results stage.
    RestartClicked,
    /// User edited the chat question.
    ChatInputChanged(String),
    /// User sent the chat question.
    ChatSubmitted,
    /// The careers guide answered (or the request failed).
    ChatReplied(Result<String, String>),
    /// User closed the notice line.
    NoticeDismissed,
}
