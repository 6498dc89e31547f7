use crate::{AnalysisSection, ChatLine};

pub const CONFIRM_DRAFT_LABEL: &str = "Next: Rank my jobs";
pub const CONFIRM_RANK_LABEL: &str = "Next: See AI feedback";
pub const SAVING_LABEL: &str = "Saving...";
pub const THINKING_LABEL: &str = "Thinking...";
pub const GENERATING_OVERLAY_TEXT: &str = "Generating your career analysis...";
pub const NO_FEEDBACK_PLACEHOLDER: &str = "We couldn't fetch AI feedback right now, but you can \
    still use the chat below to ask questions about your jobs.";
pub const CHAT_GREETING: &str =
    "Hi! I'm here to help you explore your dream jobs. What would you like to know?";
pub const CHAT_FAILURE_TEXT: &str = "Sorry, I couldn't process your message. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub screen: ScreenView,
    /// Last user-visible failure, if not yet dismissed.
    pub notice: Option<String>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenView {
    Loading,
    Input(InputView),
    Rank(RankView),
    Results(ResultsView),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputView {
    pub fields: Vec<String>,
    pub filled: usize,
    pub can_confirm: bool,
    pub confirm_label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankView {
    pub rows: Vec<RankRowView>,
    pub confirm_enabled: bool,
    pub back_enabled: bool,
    pub confirm_label: &'static str,
    pub overlay: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankRowView {
    pub label: String,
    /// e.g. `"2 of 5"`
    pub position_label: String,
    pub dragging: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsView {
    pub ranking: Vec<String>,
    pub traits_note: Option<String>,
    pub sections: Vec<AnalysisSection>,
    pub synthesis: Option<String>,
    /// Shown instead of sections when no narrative is available.
    pub placeholder: Option<&'static str>,
    pub chat: Vec<ChatLine>,
    pub chat_input: String,
    pub chat_enabled: bool,
    pub send_label: &'static str,
}

impl AppViewModel {
    pub fn input(&self) -> Option<&InputView> {
        match &self.screen {
            ScreenView::Input(view) => Some(view),
            _ => None,
        }
    }

    pub fn rank(&self) -> Option<&RankView> {
        match &self.screen {
            ScreenView::Rank(view) => Some(view),
            _ => None,
        }
    }

    pub fn results(&self) -> Option<&ResultsView> {
        match &self.screen {
            ScreenView::Results(view) => Some(view),
            _ => None,
        }
    }
}

impl RankView {
    pub fn labels(&self) -> Vec<String> {
        self.rows.iter().map(|row| row.label.clone()).collect()
    }
}
