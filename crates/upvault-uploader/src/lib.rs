//! Upvault Uploader
//!
//! Client-side orchestration of direct-to-store uploads: intake filtering,
//! one [`UploadEntry`] per accepted file, credential → transfer pipelines
//! driven concurrently, and deletion of stored objects.
//!
//! All entry state is mutated by a single reducer inside
//! [`UploadOrchestrator`]; pipelines only emit [`UploadEvent`]s keyed by entry id.

pub mod backend;
pub mod entry;
pub mod error;
pub mod events;
pub mod intake;
pub mod notice;
pub mod orchestrator;
pub mod preview;

pub use backend::{CredentialSource, ObjectRemover, ObjectTransfer};
pub use entry::{CandidateFile, EntrySnapshot, UploadEntry, UploadStatus};
pub use error::UploadError;
pub use events::{EventKind, UploadEvent};
pub use intake::{IntakePolicy, IntakeRejection};
pub use notice::Notice;
pub use orchestrator::{EntryUpdate, SubmitOutcome, UploadOrchestrator};
pub use preview::{PreviewHandle, PreviewRegistry};
