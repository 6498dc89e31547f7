//! Ranker engine: progress service clients and effect execution.
mod engine;
mod generator;
mod http;
mod local;
mod prompt;
mod service;
mod store;
mod types;

pub use engine::{EngineCommand, EngineHandle};
pub use generator::{HttpNarrativeGenerator, NarrativeGenerator, UnavailableGenerator};
pub use http::{HttpProgressService, IDENTITY_HEADER};
pub use local::LocalProgressService;
pub use prompt::{build_chat_prompt, build_prompt};
pub use service::{ProgressService, ServiceSettings};
pub use store::{ensure_store_dir, record_filename, RecordStore, StoreError};
pub use types::{EngineEvent, GenerationOutcome, ProgressRecord, ProgressStatus, ServiceError};
