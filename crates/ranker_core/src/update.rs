use ranker_logging::{ranker_debug, ranker_info, ranker_warn};

use crate::state::Pending;
use crate::view_model::CHAT_FAILURE_TEXT;
use crate::{
    AppState, ChatLine, Effect, FlowAction, FlowError, GenerationReply, Msg, ProgressSnapshot,
    ProgressStage, Stage, DRAFT_SIZE,
};

/// Fresh state plus the effect that resolves the `Loading` stage.
pub fn start() -> (AppState, Vec<Effect>) {
    (AppState::new(), vec![Effect::FetchProgress])
}

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::ProgressLoaded(result) => {
            on_progress_loaded(&mut state, result);
            Vec::new()
        }
        Msg::DraftFieldChanged { index, text } => {
            if state.stage() == Stage::Input && state.pending().is_none() {
                state.set_field(index, text);
            }
            Vec::new()
        }
        Msg::ConfirmDraftClicked => confirm_draft(&mut state),
        Msg::DraftSaved(result) => on_draft_saved(&mut state, result),
        Msg::Pointer(event) => {
            if state.stage() == Stage::Rank && state.pending().is_none() {
                let changed = state.ranking_mut().is_some_and(|list| list.handle(event));
                if changed {
                    state.mark_dirty();
                }
            }
            Vec::new()
        }
        Msg::RowLayoutChanged(layout) => {
            if let Some(list) = state.ranking_mut() {
                list.set_layout(layout);
            }
            Vec::new()
        }
        Msg::BackClicked => {
            if state.stage() == Stage::Rank && state.pending().is_none() {
                state.set_notice(None);
                state.set_pending(Some(Pending::ResettingToInput));
                vec![Effect::ResetToInput]
            } else {
                Vec::new()
            }
        }
        Msg::ResetSaved(result) => {
            on_reset_saved(&mut state, result);
            Vec::new()
        }
        Msg::ConfirmRankClicked => confirm_ranking(&mut state),
        Msg::GenerationFinished(result) => {
            on_generation_finished(&mut state, result);
            Vec::new()
        }
        Msg::RestartClicked => {
            if state.stage() == Stage::Results {
                ranker_info!("Restarting from results; saved progress is kept");
                state.restart();
            }
            Vec::new()
        }
        Msg::ChatInputChanged(text) => {
            if state.stage() == Stage::Results && state.chat().input != text {
                state.chat_mut().input = text;
            }
            Vec::new()
        }
        Msg::ChatSubmitted => submit_chat(&mut state),
        Msg::ChatReplied(result) => {
            on_chat_replied(&mut state, result);
            Vec::new()
        }
        Msg::NoticeDismissed => {
            if state.notice().is_some() {
                state.set_notice(None);
            }
            Vec::new()
        }
    };

    (state, effects)
}

fn on_progress_loaded(state: &mut AppState, result: Result<ProgressSnapshot, String>) {
    if state.stage() != Stage::Loading {
        ranker_debug!("Ignoring progress snapshot outside the loading stage");
        return;
    }
    let snapshot = match result {
        Ok(snapshot) => snapshot,
        Err(message) => {
            // Indistinguishable from "no prior session" for the user.
            ranker_info!("Progress fetch failed, starting fresh: {}", message);
            state.enter_input(Vec::new());
            return;
        }
    };

    let ProgressSnapshot {
        stage,
        draft_list,
        rank_order,
        narrative,
        traits,
    } = snapshot;
    let narrative = narrative.filter(|text| !text.trim().is_empty());
    match (stage, narrative) {
        (ProgressStage::Completed, Some(narrative)) => {
            ranker_debug!("Resuming at results with {} ranked items", rank_order.len());
            state.set_traits(traits);
            state.enter_results(draft_list, rank_order, Some(narrative));
        }
        (ProgressStage::InProgress, _) if !draft_list.is_empty() => {
            ranker_debug!("Resuming at rank with {} items", draft_list.len());
            state.set_traits(traits);
            state.enter_rank(draft_list, rank_order);
        }
        (stage, _) => {
            ranker_debug!("Snapshot stage {:?} starts at input", stage);
            state.set_traits(traits);
            state.enter_input(Vec::new());
        }
    }
}

fn confirm_draft(state: &mut AppState) -> Vec<Effect> {
    if state.stage() != Stage::Input || state.pending().is_some() {
        return Vec::new();
    }
    let filled = state.filled_count();
    if filled < DRAFT_SIZE {
        let error = FlowError::Validation {
            filled,
            required: DRAFT_SIZE,
        };
        ranker_debug!("Draft confirm blocked: {}", error);
        state.set_notice(Some(error.to_string()));
        return Vec::new();
    }

    let draft = state.collect_fields();
    state.set_notice(None);
    state.set_pending(Some(Pending::SavingDraft));
    vec![Effect::SaveDraft {
        rank_order: Some(draft.clone()),
        draft_list: draft,
    }]
}

fn on_draft_saved(state: &mut AppState, result: Result<(), String>) -> Vec<Effect> {
    match (state.pending(), result) {
        (Some(Pending::SavingDraft), Ok(())) => {
            let draft = state.collect_fields();
            state.enter_rank(draft.clone(), draft);
            Vec::new()
        }
        (Some(Pending::SavingDraft), Err(message)) => {
            fail_transition(state, FlowAction::SaveDraft, message);
            Vec::new()
        }
        (Some(Pending::SavingRanking), Ok(())) => {
            state.set_pending(Some(Pending::Generating));
            vec![Effect::GenerateAndComplete {
                draft_list: state.draft_list().to_vec(),
                rank_order: state.rank_order(),
            }]
        }
        (Some(Pending::SavingRanking), Err(message)) => {
            fail_transition(state, FlowAction::SaveRanking, message);
            Vec::new()
        }
        (pending, _) => {
            ranker_debug!("Ignoring stale save completion (pending {:?})", pending);
            Vec::new()
        }
    }
}

fn on_reset_saved(state: &mut AppState, result: Result<(), String>) {
    if state.pending() != Some(Pending::ResettingToInput) {
        ranker_debug!("Ignoring stale reset completion");
        return;
    }
    match result {
        Ok(()) => {
            let draft = state.draft_list().to_vec();
            state.enter_input(draft);
        }
        Err(message) => fail_transition(state, FlowAction::ResetToInput, message),
    }
}

fn confirm_ranking(state: &mut AppState) -> Vec<Effect> {
    if state.stage() != Stage::Rank || state.pending().is_some() {
        return Vec::new();
    }
    let Some(list) = state.ranking() else {
        return Vec::new();
    };
    let rank_order = list.current_order();
    ranker_info!("Ranking confirmed: {:?}", rank_order);
    state.set_notice(None);
    state.set_pending(Some(Pending::SavingRanking));
    vec![Effect::SaveDraft {
        draft_list: state.draft_list().to_vec(),
        rank_order: Some(rank_order),
    }]
}

fn on_generation_finished(state: &mut AppState, result: Result<GenerationReply, String>) {
    if state.pending() != Some(Pending::Generating) {
        ranker_debug!("Ignoring stale generation result");
        return;
    }
    let draft = state.draft_list().to_vec();
    let rank_order = state.rank_order();
    match result {
        Ok(GenerationReply::Completed { narrative, traits }) if !narrative.trim().is_empty() => {
            if traits.is_some() {
                state.set_traits(traits);
            }
            state.enter_results(draft, rank_order, Some(narrative));
        }
        Ok(GenerationReply::Completed { .. }) => {
            ranker_warn!("Generation returned an empty narrative");
            enter_degraded_results(state, draft, rank_order);
        }
        Ok(GenerationReply::Failed { error }) => {
            ranker_warn!("Generation reported failure: {}", error);
            enter_degraded_results(state, draft, rank_order);
        }
        Err(message) => fail_transition(state, FlowAction::Generate, message),
    }
}

fn enter_degraded_results(state: &mut AppState, draft: Vec<String>, rank_order: Vec<String>) {
    state.enter_results(draft, rank_order, None);
    state.set_notice(Some(FlowError::DegradedGeneration.to_string()));
}

/// Re-enables the interrupted control and tells the user; the stage stays put.
fn fail_transition(state: &mut AppState, action: FlowAction, message: String) {
    let error = FlowError::TransientIo { action, message };
    ranker_warn!("{}", error);
    state.set_pending(None);
    state.set_notice(Some(error.to_string()));
}

fn submit_chat(state: &mut AppState) -> Vec<Effect> {
    if state.stage() != Stage::Results || state.chat().awaiting_reply {
        return Vec::new();
    }
    let message = state.chat().input.trim().to_string();
    if message.is_empty() {
        return Vec::new();
    }
    let chat = state.chat_mut();
    chat.lines.push(ChatLine::Learner(message.clone()));
    chat.input.clear();
    chat.awaiting_reply = true;
    vec![Effect::SendChat { message }]
}

fn on_chat_replied(state: &mut AppState, result: Result<String, String>) {
    if !state.chat().awaiting_reply {
        ranker_debug!("Ignoring chat reply nobody is waiting for");
        return;
    }
    let line = match result {
        Ok(reply) if !reply.trim().is_empty() => ChatLine::Guide(reply),
        Ok(_) => ChatLine::Failure(CHAT_FAILURE_TEXT.to_string()),
        Err(message) => {
            ranker_warn!("Chat request failed: {}", message);
            ChatLine::Failure(CHAT_FAILURE_TEXT.to_string())
        }
    };
    let chat = state.chat_mut();
    chat.lines.push(line);
    chat.awaiting_reply = false;
}
