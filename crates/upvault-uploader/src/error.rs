use crate::entry::UploadStatus;
use uuid::Uuid;

/// Misuse of the orchestrator's entry operations. Entries are never mutated
/// when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    #[error("Upload entry {0} not found")]
    EntryNotFound(Uuid),

    #[error("Upload entry {id} is {status}, expected {expected}")]
    InvalidState {
        id: Uuid,
        status: UploadStatus,
        expected: UploadStatus,
    },
}
