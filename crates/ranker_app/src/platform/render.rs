//! Plain-text rendering of the view model for the terminal driver.

use ranker_core::{
    AppViewModel, ChatLine, InputView, RankView, ResultsView, ScreenView, DRAFT_SIZE,
};

pub fn render(view: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();
    match &view.screen {
        ScreenView::Loading => lines.push("Loading your progress...".to_string()),
        ScreenView::Input(input) => render_input(input, &mut lines),
        ScreenView::Rank(rank) => render_rank(rank, &mut lines),
        ScreenView::Results(results) => render_results(results, &mut lines),
    }
    if let Some(notice) = &view.notice {
        lines.push(String::new());
        lines.push(format!("! {notice} (type `dismiss` to hide)"));
    }
    lines
}

/// `[label]` when the control accepts input, `(label)` when it does not.
fn button(label: &str, enabled: bool) -> String {
    if enabled {
        format!("[{label}]")
    } else {
        format!("({label})")
    }
}

fn render_input(input: &InputView, lines: &mut Vec<String>) {
    lines.push("== Your dream jobs ==".to_string());
    for (index, field) in input.fields.iter().enumerate() {
        let shown = if field.trim().is_empty() { "..." } else { field };
        lines.push(format!("  {}. {}", index + 1, shown));
    }
    lines.push(format!("{} of {} filled", input.filled, DRAFT_SIZE));
    lines.push(button(input.confirm_label, input.can_confirm));
}

fn render_rank(rank: &RankView, lines: &mut Vec<String>) {
    lines.push("== Rank your jobs, most wanted first ==".to_string());
    for row in &rank.rows {
        let marker = if row.dragging { '*' } else { ' ' };
        lines.push(format!("{marker} [{}] {}", row.position_label, row.label));
    }
    lines.push(format!(
        "{} {}",
        button("Back", rank.back_enabled),
        button(rank.confirm_label, rank.confirm_enabled)
    ));
    if let Some(overlay) = rank.overlay {
        lines.push(format!(">> {overlay}"));
    }
}

fn render_results(results: &ResultsView, lines: &mut Vec<String>) {
    lines.push("== Your ranking ==".to_string());
    for (index, label) in results.ranking.iter().enumerate() {
        lines.push(format!("  {}. {}", index + 1, label));
    }
    if let Some(note) = &results.traits_note {
        lines.push(String::new());
        lines.push(note.clone());
    }

    if let Some(placeholder) = results.placeholder {
        lines.push(String::new());
        lines.push(placeholder.to_string());
    }
    for section in &results.sections {
        lines.push(String::new());
        lines.push(format!("== {} ==", section.label));
        lines.extend(section.text.lines().map(str::to_string));
    }
    if let Some(synthesis) = &results.synthesis {
        lines.push(String::new());
        lines.push("== Comparing your jobs ==".to_string());
        lines.extend(synthesis.lines().map(str::to_string));
    }

    lines.push(String::new());
    lines.push("== Careers chat ==".to_string());
    for line in &results.chat {
        lines.push(match line {
            ChatLine::Guide(text) => format!("Guide: {text}"),
            ChatLine::Learner(text) => format!("You: {text}"),
            ChatLine::Failure(text) => format!("Guide (error): {text}"),
        });
    }
    lines.push(button(results.send_label, results.chat_enabled));
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use ranker_core::{
        AnalysisSection, RankRowView, CONFIRM_DRAFT_LABEL, NO_FEEDBACK_PLACEHOLDER, THINKING_LABEL,
    };

    fn view(screen: ScreenView) -> AppViewModel {
        AppViewModel {
            screen,
            notice: None,
            dirty: false,
        }
    }

    #[test]
    fn input_shows_blank_fields_and_disabled_confirm() {
        let lines = render(&view(ScreenView::Input(InputView {
            fields: vec![
                "Vet".to_string(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
            ],
            filled: 1,
            can_confirm: false,
            confirm_label: CONFIRM_DRAFT_LABEL,
        })));
        assert_eq!(lines[1], "  1. Vet");
        assert_eq!(lines[2], "  2. ...");
        assert_eq!(lines[6], "1 of 5 filled");
        assert_eq!(lines[7], format!("({CONFIRM_DRAFT_LABEL})"));
    }

    #[test]
    fn rank_marks_dragged_row_and_overlay() {
        let lines = render(&view(ScreenView::Rank(RankView {
            rows: vec![
                RankRowView {
                    label: "Chef".to_string(),
                    position_label: "1 of 2".to_string(),
                    dragging: true,
                },
                RankRowView {
                    label: "Vet".to_string(),
                    position_label: "2 of 2".to_string(),
                    dragging: false,
                },
            ],
            confirm_enabled: false,
            back_enabled: false,
            confirm_label: THINKING_LABEL,
            overlay: Some("Working"),
        })));
        assert_eq!(
            lines,
            vec![
                "== Rank your jobs, most wanted first ==".to_string(),
                "* [1 of 2] Chef".to_string(),
                "  [2 of 2] Vet".to_string(),
                format!("(Back) ({THINKING_LABEL})"),
                ">> Working".to_string(),
            ]
        );
    }

    #[test]
    fn results_with_sections_and_notice() {
        let mut model = view(ScreenView::Results(ResultsView {
            ranking: vec!["Chef".to_string()],
            traits_note: None,
            sections: vec![AnalysisSection {
                label: "Chef".to_string(),
                text: "1) Chef\nHot kitchens.".to_string(),
            }],
            synthesis: Some("Keep going!".to_string()),
            placeholder: None,
            chat: vec![
                ChatLine::Guide("Hi".to_string()),
                ChatLine::Learner("Pay?".to_string()),
                ChatLine::Failure("Sorry".to_string()),
            ],
            chat_input: String::new(),
            chat_enabled: true,
            send_label: "Send",
        }));
        model.notice = Some("Saving your jobs failed: timeout".to_string());

        let lines = render(&model);
        let text = lines.join("\n");
        assert!(text.contains("== Chef ==\n1) Chef\nHot kitchens."));
        assert!(text.contains("== Comparing your jobs ==\nKeep going!"));
        assert!(text.contains("Guide: Hi\nYou: Pay?\nGuide (error): Sorry\n[Send]"));
        assert_eq!(
            lines.last().map(String::as_str),
            Some("! Saving your jobs failed: timeout (type `dismiss` to hide)")
        );
    }

    #[test]
    fn results_placeholder_without_narrative() {
        let lines = render(&view(ScreenView::Results(ResultsView {
            ranking: vec!["Chef".to_string()],
            traits_note: Some("Based on your personality type (INTJ), ...".to_string()),
            sections: Vec::new(),
            synthesis: None,
            placeholder: Some(NO_FEEDBACK_PLACEHOLDER),
            chat: Vec::new(),
            chat_input: String::new(),
            chat_enabled: false,
            send_label: THINKING_LABEL,
        })));
        assert!(lines.iter().any(|line| line == NO_FEEDBACK_PLACEHOLDER));
        assert!(lines.iter().any(|line| line.starts_with("Based on your personality")));
        assert_eq!(lines.last(), Some(&format!("({THINKING_LABEL})")));
    }
}
