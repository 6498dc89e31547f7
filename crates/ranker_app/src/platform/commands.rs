//! Line commands typed at the terminal, turned into wizard messages.

use ranker_core::{Msg, PointerEvent, RowLayout, Stage, DRAFT_SIZE};
use thiserror::Error;

pub const HELP_TEXT: &str = "\
Commands:
  set N TEXT     fill job N (1-5)
  next           confirm this step
  drag FROM TO   move the job at position FROM to position TO
  down N | move Y | up | cancel
                 raw pointer input over the rank list
  back           return to the job list
  ask TEXT       ask the careers guide a question
  restart        start a new ranking
  dismiss        hide the current notice
  help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Set { index: usize, text: String },
    Next,
    Drag { from: usize, to: usize },
    Pointer(PointerEvent),
    Back,
    Ask(String),
    Restart,
    Dismiss,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command `{0}` (type `help`)")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("position {0} is out of range")]
    OutOfRange(usize),
}

pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "set" => {
            let (n, text) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            let n = position(n, "set N TEXT")?;
            if n > DRAFT_SIZE {
                return Err(CommandError::OutOfRange(n));
            }
            Command::Set {
                index: n - 1,
                text: text.trim().to_string(),
            }
        }
        "next" => Command::Next,
        "drag" => {
            let mut parts = rest.split_whitespace();
            let from = position(parts.next().unwrap_or(""), "drag FROM TO")?;
            let to = position(parts.next().unwrap_or(""), "drag FROM TO")?;
            Command::Drag { from, to }
        }
        "down" => Command::Pointer(PointerEvent::Down {
            entry: position(rest, "down N")? - 1,
        }),
        "move" => Command::Pointer(PointerEvent::Move {
            y: rest.parse().map_err(|_| CommandError::Usage("move Y"))?,
        }),
        "up" => Command::Pointer(PointerEvent::Up),
        "cancel" => Command::Pointer(PointerEvent::Cancel),
        "back" => Command::Back,
        "ask" if rest.is_empty() => return Err(CommandError::Usage("ask TEXT")),
        "ask" => Command::Ask(rest.to_string()),
        "restart" => Command::Restart,
        "dismiss" => Command::Dismiss,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

/// 1-based position argument.
fn position(arg: &str, usage: &'static str) -> Result<usize, CommandError> {
    match arg.trim().parse::<usize>() {
        Ok(0) => Err(CommandError::OutOfRange(0)),
        Ok(n) => Ok(n),
        Err(_) => Err(CommandError::Usage(usage)),
    }
}

/// Messages for a command. `Help` and `Quit` are handled by the caller and
/// map to nothing.
pub fn to_msgs(command: Command, stage: Stage, layout: &RowLayout) -> Vec<Msg> {
    match command {
        Command::Set { index, text } => vec![Msg::DraftFieldChanged { index, text }],
        Command::Next => match stage {
            Stage::Input => vec![Msg::ConfirmDraftClicked],
            Stage::Rank => vec![Msg::ConfirmRankClicked],
            _ => Vec::new(),
        },
        Command::Drag { from, to } => drag_gesture(from - 1, to - 1, layout)
            .into_iter()
            .map(Msg::Pointer)
            .collect(),
        Command::Pointer(event) => vec![Msg::Pointer(event)],
        Command::Back => vec![Msg::BackClicked],
        Command::Ask(text) => vec![Msg::ChatInputChanged(text), Msg::ChatSubmitted],
        Command::Restart => vec![Msg::RestartClicked],
        Command::Dismiss => vec![Msg::NoticeDismissed],
        Command::Help | Command::Quit => Vec::new(),
    }
}

/// Pointer events that carry the entry at `from` to index `to`.
///
/// The pointer is released at the top edge of the slot the entry should land
/// in front of, which is `to + 1` when moving down because the entry's own
/// slot is vacated.
pub fn drag_gesture(from: usize, to: usize, layout: &RowLayout) -> Vec<PointerEvent> {
    if from == to {
        return vec![PointerEvent::Down { entry: from }, PointerEvent::Up];
    }
    let target = if to < from { to } else { to + 1 };
    vec![
        PointerEvent::Down { entry: from },
        PointerEvent::Move {
            y: layout.bounds(target).top,
        },
        PointerEvent::Up,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use ranker_core::ReorderList;

    fn apply(list: &mut ReorderList, events: Vec<PointerEvent>) {
        for event in events {
            list.handle(event);
        }
    }

    #[test]
    fn parses_set_with_spaces_in_text() {
        assert_eq!(
            parse("set 2  Airline pilot ").unwrap(),
            Some(Command::Set {
                index: 1,
                text: "Airline pilot".to_string()
            })
        );
    }

    #[test]
    fn rejects_bad_positions() {
        assert_eq!(parse("set 6 Vet"), Err(CommandError::OutOfRange(6)));
        assert_eq!(parse("set 0 Vet"), Err(CommandError::OutOfRange(0)));
        assert_eq!(parse("drag 1"), Err(CommandError::Usage("drag FROM TO")));
        assert_eq!(parse("move up"), Err(CommandError::Usage("move Y")));
        assert_eq!(parse("ask"), Err(CommandError::Usage("ask TEXT")));
    }

    #[test]
    fn unknown_and_blank_lines() {
        assert_eq!(parse("   "), Ok(None));
        assert_eq!(
            parse("jump"),
            Err(CommandError::Unknown("jump".to_string()))
        );
    }

    #[test]
    fn next_depends_on_stage() {
        let layout = RowLayout::default();
        assert_eq!(
            to_msgs(Command::Next, Stage::Input, &layout),
            vec![Msg::ConfirmDraftClicked]
        );
        assert_eq!(
            to_msgs(Command::Next, Stage::Rank, &layout),
            vec![Msg::ConfirmRankClicked]
        );
        assert!(to_msgs(Command::Next, Stage::Results, &layout).is_empty());
    }

    #[test]
    fn ask_fills_then_submits() {
        assert_eq!(
            to_msgs(
                parse("ask What do vets earn?").unwrap().unwrap(),
                Stage::Results,
                &RowLayout::default()
            ),
            vec![
                Msg::ChatInputChanged("What do vets earn?".to_string()),
                Msg::ChatSubmitted
            ]
        );
    }

    #[test]
    fn drag_gesture_lands_on_every_target() {
        let layout = RowLayout::default();
        let labels = ["A", "B", "C", "D", "E"];
        for from in 0..labels.len() {
            for to in 0..labels.len() {
                let mut list = ReorderList::new(labels);
                apply(&mut list, drag_gesture(from, to, &layout));

                let mut expected: Vec<String> = labels.iter().map(|s| s.to_string()).collect();
                let moved = expected.remove(from);
                expected.insert(to, moved);
                assert_eq!(list.current_order(), expected, "drag {from} -> {to}");
            }
        }
    }

    #[test]
    fn far_drag_targets_append_without_overflow() {
        let layout = RowLayout::default();
        let mut list = ReorderList::new(["Vet", "Pilot", "Chef"]);
        let Some(Command::Drag { from, to }) = parse("drag 1 100000000").unwrap() else {
            panic!("expected a drag command");
        };
        apply(&mut list, drag_gesture(from - 1, to - 1, &layout));
        assert_eq!(list.current_order(), vec!["Pilot", "Chef", "Vet"]);

        let msgs = to_msgs(
            parse("move 2000000000").unwrap().unwrap(),
            Stage::Rank,
            &layout,
        );
        assert_eq!(
            msgs,
            vec![Msg::Pointer(PointerEvent::Move { y: 2_000_000_000 })]
        );
    }

    #[test]
    fn drag_gesture_follows_measured_rows() {
        let layout = RowLayout::Uniform {
            top: 100,
            row_height: 30,
        };
        let mut list = ReorderList::new(["Vet", "Pilot", "Chef"]).with_layout(layout.clone());
        apply(&mut list, drag_gesture(2, 0, &layout));
        assert_eq!(list.current_order(), vec!["Chef", "Vet", "Pilot"]);
    }
}
