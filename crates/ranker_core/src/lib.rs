//! Ranker core: pure wizard state machine, drag-to-reorder model, narrative
//! segmentation and view-model helpers. Nothing in this crate performs I/O.
mod effect;
mod error;
mod msg;
mod progress;
mod reorder;
mod segment;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use error::{FlowAction, FlowError};
pub use msg::Msg;
pub use progress::{GenerationReply, ProgressSnapshot, ProgressStage};
pub use reorder::{Bounds, PointerEvent, ReorderEntry, ReorderList, RowLayout, DEFAULT_ROW_HEIGHT};
pub use segment::{segment_analysis, AnalysisSection, AnalysisSections};
pub use state::{AppState, ChatLine, Stage, DRAFT_SIZE};
pub use update::{start, update};
pub use view_model::{
    AppViewModel, InputView, RankRowView, RankView, ResultsView, ScreenView, CHAT_FAILURE_TEXT,
    CHAT_GREETING, CONFIRM_DRAFT_LABEL, CONFIRM_RANK_LABEL, GENERATING_OVERLAY_TEXT,
    NO_FEEDBACK_PLACEHOLDER, SAVING_LABEL, THINKING_LABEL,
};
