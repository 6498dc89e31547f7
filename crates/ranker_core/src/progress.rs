/// Authoritative resume point of a user's session, as stored by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgressStage {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

/// The one saved record per identity, already narrowed from the wire.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProgressSnapshot {
    pub stage: ProgressStage,
    pub draft_list: Vec<String>,
    pub rank_order: Vec<String>,
    pub narrative: Option<String>,
    pub traits: Option<String>,
}

impl ProgressSnapshot {
    /// Snapshot for an identity that has never saved anything.
    pub fn not_started() -> Self {
        Self::default()
    }
}

/// Answer of a generate-and-complete request that reached the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationReply {
    Completed {
        narrative: String,
        traits: Option<String>,
    },
    /// The service reported `ok: false`; the flow still moves on to results.
    Failed { error: String },
}
