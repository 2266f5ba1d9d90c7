use uuid::Uuid;

/// Something that happened to one entry's pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadEvent {
    pub entry_id: Uuid,
    pub kind: EventKind,
}

impl UploadEvent {
    pub fn new(entry_id: Uuid, kind: EventKind) -> Self {
        Self { entry_id, kind }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    Started,
    CredentialIssued { object_key: String },
    CredentialFailed { reason: String },
    Progress(u8),
    TransferSucceeded,
    TransferFailed { reason: String },
    DeleteRequested,
    DeleteSucceeded,
    DeleteFailed { reason: String },
}
