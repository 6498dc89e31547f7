use crate::reorder::ReorderList;
use crate::view_model::{
    AppViewModel, InputView, RankRowView, RankView, ResultsView, ScreenView, CHAT_GREETING,
    CONFIRM_DRAFT_LABEL, CONFIRM_RANK_LABEL, GENERATING_OVERLAY_TEXT, NO_FEEDBACK_PLACEHOLDER,
    SAVING_LABEL, THINKING_LABEL,
};
use crate::segment_analysis;

/// Number of entries the input stage asks for.
pub const DRAFT_SIZE: usize = 5;

/// Where the wizard currently is. `Results` is the stable end of one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stage {
    #[default]
    Loading,
    Input,
    Rank,
    Results,
}

/// The request the wizard is waiting on, if any. Its presence is what
/// disables the triggering control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Pending {
    SavingDraft,
    ResettingToInput,
    SavingRanking,
    Generating,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatLine {
    Guide(String),
    Learner(String),
    Failure(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ChatState {
    pub(crate) lines: Vec<ChatLine>,
    pub(crate) input: String,
    pub(crate) awaiting_reply: bool,
}

impl Default for ChatState {
    fn default() -> Self {
        Self {
            lines: vec![ChatLine::Guide(CHAT_GREETING.to_string())],
            input: String::new(),
            awaiting_reply: false,
        }
    }
}

/// Everything the wizard knows, owned by one instance and threaded through
/// [`crate::update`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    stage: Stage,
    fields: [String; DRAFT_SIZE],
    draft_list: Vec<String>,
    ranking: Option<ReorderList>,
    narrative: Option<String>,
    traits: Option<String>,
    pending: Option<Pending>,
    notice: Option<String>,
    chat: ChatState,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn draft_list(&self) -> &[String] {
        &self.draft_list
    }

    /// Committed rank order; empty outside the rank and results stages.
    pub fn rank_order(&self) -> Vec<String> {
        self.ranking
            .as_ref()
            .map(ReorderList::current_order)
            .unwrap_or_default()
    }

    pub fn ranking(&self) -> Option<&ReorderList> {
        self.ranking.as_ref()
    }

    pub fn narrative(&self) -> Option<&str> {
        self.narrative.as_deref()
    }

    pub fn traits(&self) -> Option<&str> {
        self.traits.as_deref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn awaiting_chat_reply(&self) -> bool {
        self.chat.awaiting_reply
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn view(&self) -> AppViewModel {
        let screen = match self.stage {
            Stage::Loading => ScreenView::Loading,
            Stage::Input => ScreenView::Input(self.input_view()),
            Stage::Rank => ScreenView::Rank(self.rank_view()),
            Stage::Results => ScreenView::Results(self.results_view()),
        };
        AppViewModel {
            screen,
            notice: self.notice.clone(),
            dirty: self.dirty,
        }
    }

    fn input_view(&self) -> InputView {
        let filled = self.filled_count();
        let saving = self.pending == Some(Pending::SavingDraft);
        InputView {
            fields: self.fields.to_vec(),
            filled,
            can_confirm: filled == DRAFT_SIZE && !saving,
            confirm_label: if saving {
                SAVING_LABEL
            } else {
                CONFIRM_DRAFT_LABEL
            },
        }
    }

    fn rank_view(&self) -> RankView {
        // Mid-drag, rows show where everything would land on release.
        let rows = match &self.ranking {
            Some(list) => {
                let order = list.provisional_order();
                let total = order.len();
                let dragged = list.provisional_index();
                order
                    .into_iter()
                    .enumerate()
                    .map(|(index, label)| RankRowView {
                        label,
                        position_label: format!("{} of {}", index + 1, total),
                        dragging: dragged == Some(index),
                    })
                    .collect()
            }
            None => Vec::new(),
        };
        let generating = matches!(
            self.pending,
            Some(Pending::SavingRanking | Pending::Generating)
        );
        RankView {
            rows,
            confirm_enabled: self.pending.is_none(),
            back_enabled: self.pending.is_none(),
            confirm_label: if generating {
                THINKING_LABEL
            } else {
                CONFIRM_RANK_LABEL
            },
            overlay: generating.then_some(GENERATING_OVERLAY_TEXT),
        }
    }

    fn results_view(&self) -> ResultsView {
        let labels = self.rank_order();
        let (sections, synthesis, placeholder) = match self.narrative.as_deref() {
            Some(narrative) => {
                let analysis = segment_analysis(narrative, &labels);
                (analysis.sections, analysis.synthesis, None)
            }
            None => (Vec::new(), None, Some(NO_FEEDBACK_PLACEHOLDER)),
        };
        ResultsView {
            ranking: labels,
            traits_note: self.traits.as_deref().map(|traits| {
                format!(
                    "Based on your personality type ({traits}), \
                     here's your personalised guidance:"
                )
            }),
            sections,
            synthesis,
            placeholder,
            chat: self.chat.lines.clone(),
            chat_input: self.chat.input.clone(),
            chat_enabled: !self.chat.awaiting_reply,
            send_label: if self.chat.awaiting_reply {
                THINKING_LABEL
            } else {
                "Send"
            },
        }
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn pending(&self) -> Option<Pending> {
        self.pending
    }

    pub(crate) fn set_pending(&mut self, pending: Option<Pending>) {
        self.pending = pending;
        self.mark_dirty();
    }

    pub(crate) fn set_notice(&mut self, notice: Option<String>) {
        self.notice = notice;
        self.mark_dirty();
    }

    pub(crate) fn set_field(&mut self, index: usize, text: String) -> bool {
        match self.fields.get_mut(index) {
            Some(field) if *field != text => {
                *field = text;
                self.mark_dirty();
                true
            }
            _ => false,
        }
    }

    pub(crate) fn filled_count(&self) -> usize {
        self.fields
            .iter()
            .filter(|field| !field.trim().is_empty())
            .count()
    }

    /// Trimmed non-empty fields, in entry order.
    pub(crate) fn collect_fields(&self) -> Vec<String> {
        self.fields
            .iter()
            .map(|field| field.trim())
            .filter(|field| !field.is_empty())
            .map(ToOwned::to_owned)
            .take(DRAFT_SIZE)
            .collect()
    }

    pub(crate) fn ranking_mut(&mut self) -> Option<&mut ReorderList> {
        self.ranking.as_mut()
    }

    pub(crate) fn enter_input(&mut self, draft: Vec<String>) {
        self.fill_fields(&draft);
        self.draft_list = draft;
        self.stage = Stage::Input;
        self.pending = None;
        self.mark_dirty();
    }

    pub(crate) fn enter_rank(&mut self, draft: Vec<String>, rank_order: Vec<String>) {
        let rank_order = rank_or_draft(rank_order, &draft);
        let layout = self
            .ranking
            .as_ref()
            .map(|list| list.layout().clone())
            .unwrap_or_default();
        self.ranking = Some(ReorderList::new(rank_order).with_layout(layout));
        self.fill_fields(&draft);
        self.draft_list = draft;
        self.stage = Stage::Rank;
        self.pending = None;
        self.mark_dirty();
    }

    fn fill_fields(&mut self, draft: &[String]) {
        self.fields = Default::default();
        for (field, value) in self.fields.iter_mut().zip(draft) {
            field.clone_from(value);
        }
    }

    pub(crate) fn enter_results(
        &mut self,
        draft: Vec<String>,
        rank_order: Vec<String>,
        narrative: Option<String>,
    ) {
        let rank_order = rank_or_draft(rank_order, &draft);
        self.ranking = Some(ReorderList::new(rank_order));
        self.fill_fields(&draft);
        self.draft_list = draft;
        self.narrative = narrative;
        self.stage = Stage::Results;
        self.pending = None;
        self.chat = ChatState::default();
        self.mark_dirty();
    }

    pub(crate) fn set_traits(&mut self, traits: Option<String>) {
        self.traits = traits;
        self.mark_dirty();
    }

    /// Back to a clean input stage. The server snapshot is left alone.
    pub(crate) fn restart(&mut self) {
        *self = Self {
            dirty: true,
            ..Self::default()
        };
        self.stage = Stage::Input;
    }

    pub(crate) fn chat_mut(&mut self) -> &mut ChatState {
        self.mark_dirty();
        &mut self.chat
    }

    pub(crate) fn chat(&self) -> &ChatState {
        &self.chat
    }
}

/// A snapshot without a saved ranking ranks in entry order.
fn rank_or_draft(rank_order: Vec<String>, draft: &[String]) -> Vec<String> {
    if rank_order.is_empty() {
        draft.to_vec()
    } else {
        rank_order
    }
}
