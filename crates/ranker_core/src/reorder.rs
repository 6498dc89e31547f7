//! Pointer-driven drag-to-reorder model.
//!
//! A [`ReorderList`] owns one ordered set of labels and the state of at most
//! one drag interaction over it. The host feeds it pointer events in list
//! coordinates; the list decides where the dragged entry would land and
//! commits that relocation on pointer-up. Each list carries its own drag
//! session, so any number of lists can coexist without interfering.

/// Row height used by [`RowLayout::default`].
pub const DEFAULT_ROW_HEIGHT: i32 = 48;

/// Vertical extent of one rendered entry, in list coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub top: i32,
    pub height: i32,
}

impl Bounds {
    /// True when this entry's vertical midpoint lies below `y`.
    fn midpoint_below(&self, y: i32) -> bool {
        // Doubled to keep odd heights exact; widened so host values cannot overflow.
        2 * i64::from(y) < 2 * i64::from(self.top) + i64::from(self.height)
    }
}

/// Where the host draws each slot of the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowLayout {
    /// Equal-height rows stacked from `top`.
    Uniform { top: i32, row_height: i32 },
    /// Bounds measured by the host, one per slot in document order. Slots past
    /// the end are stacked below the last measured one with its height.
    Measured(Vec<Bounds>),
}

impl Default for RowLayout {
    fn default() -> Self {
        RowLayout::Uniform {
            top: 0,
            row_height: DEFAULT_ROW_HEIGHT,
        }
    }
}

impl RowLayout {
    pub fn bounds(&self, slot: usize) -> Bounds {
        match self {
            RowLayout::Uniform { top, row_height } => Bounds {
                top: top.saturating_add(row_height.saturating_mul(saturating_i32(slot))),
                height: *row_height,
            },
            RowLayout::Measured(measured) => match measured.get(slot) {
                Some(bounds) => *bounds,
                None => match measured.last() {
                    Some(last) => {
                        let extra = saturating_i32(slot - measured.len()).saturating_add(1);
                        Bounds {
                            top: last.top.saturating_add(last.height.saturating_mul(extra)),
                            height: last.height,
                        }
                    }
                    None => RowLayout::default().bounds(slot),
                },
            },
        }
    }
}

fn saturating_i32(value: usize) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// Pointer input, already translated into list coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    /// Pointer pressed on the entry currently shown at `entry`.
    Down { entry: usize },
    Move { y: i32 },
    Up,
    /// The platform took the pointer away; treated like a release.
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderEntry {
    pub label: String,
    /// 1-based position, recomputed after every commit.
    pub position: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DragSession {
    dragged: usize,
    /// Committed index of the entry the dragged one will precede; `None` appends.
    before: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReorderList {
    entries: Vec<ReorderEntry>,
    layout: RowLayout,
    drag: DragState,
}

impl ReorderList {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list = Self {
            entries: labels
                .into_iter()
                .map(|label| ReorderEntry {
                    label: label.into(),
                    position: 0,
                })
                .collect(),
            layout: RowLayout::default(),
            drag: DragState::Idle,
        };
        list.renumber();
        list
    }

    pub fn with_layout(mut self, layout: RowLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn set_layout(&mut self, layout: RowLayout) {
        self.layout = layout;
    }

    pub fn layout(&self) -> &RowLayout {
        &self.layout
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[ReorderEntry] {
        &self.entries
    }

    /// Committed order. A drag in progress is not reflected until pointer-up.
    pub fn current_order(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.label.clone()).collect()
    }

    /// Order as it would be if the pointer were released now.
    pub fn provisional_order(&self) -> Vec<String> {
        match self.drag {
            DragState::Idle => self.current_order(),
            DragState::Dragging(session) => relocate(self.current_order(), session),
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging(_))
    }

    /// Committed index of the entry being dragged, if any.
    pub fn dragged_index(&self) -> Option<usize> {
        match self.drag {
            DragState::Idle => None,
            DragState::Dragging(session) => Some(session.dragged),
        }
    }

    /// Index the dragged entry would take if the pointer were released now.
    pub fn provisional_index(&self) -> Option<usize> {
        let DragState::Dragging(session) = self.drag else {
            return None;
        };
        let last = self.entries.len().saturating_sub(1);
        Some(match session.before {
            Some(before) if before > session.dragged => before - 1,
            Some(before) => before.min(last),
            None => last,
        })
    }

    /// Pill text for the entry at `index`, e.g. `"2 of 5"`.
    pub fn position_label(&self, index: usize) -> Option<String> {
        let total = self.entries.len().max(1);
        self.entries
            .get(index)
            .map(|entry| format!("{} of {}", entry.position, total))
    }

    /// Applies one pointer event. Returns true if anything observable changed.
    pub fn handle(&mut self, event: PointerEvent) -> bool {
        match event {
            PointerEvent::Down { entry } => self.pointer_down(entry),
            PointerEvent::Move { y } => self.pointer_move(y),
            PointerEvent::Up | PointerEvent::Cancel => self.pointer_up(),
        }
    }

    pub fn pointer_down(&mut self, entry: usize) -> bool {
        if self.is_dragging() || entry >= self.entries.len() || self.entries.len() < 2 {
            return false;
        }
        // Placeholder starts right after the dragged entry: releasing without
        // moving puts it back where it was.
        let before = (entry + 1 < self.entries.len()).then_some(entry + 1);
        self.drag = DragState::Dragging(DragSession {
            dragged: entry,
            before,
        });
        true
    }

    pub fn pointer_move(&mut self, y: i32) -> bool {
        let DragState::Dragging(session) = self.drag else {
            return false;
        };
        let before = (0..self.entries.len())
            .filter(|&index| index != session.dragged)
            .find(|&index| self.layout.bounds(index).midpoint_below(y));
        if before == session.before {
            return false;
        }
        self.drag = DragState::Dragging(DragSession {
            dragged: session.dragged,
            before,
        });
        true
    }

    pub fn pointer_up(&mut self) -> bool {
        let DragState::Dragging(session) = std::mem::take(&mut self.drag) else {
            return false;
        };
        let labels = relocate(self.current_order(), session);
        for (entry, label) in self.entries.iter_mut().zip(labels) {
            entry.label = label;
        }
        self.renumber();
        true
    }

    fn renumber(&mut self) {
        for (index, entry) in self.entries.iter_mut().enumerate() {
            entry.position = index + 1;
        }
        debug_assert!(self
            .entries
            .iter()
            .enumerate()
            .all(|(index, entry)| entry.position == index + 1));
    }
}

fn relocate(mut labels: Vec<String>, session: DragSession) -> Vec<String> {
    if session.dragged >= labels.len() {
        return labels;
    }
    let moved = labels.remove(session.dragged);
    match session.before {
        Some(before) => {
            let target = if before > session.dragged {
                before - 1
            } else {
                before
            };
            labels.insert(target.min(labels.len()), moved);
        }
        None => labels.push(moved),
    }
    labels
}
