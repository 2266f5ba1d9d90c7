use crate::preview::PreviewHandle;
use bytes::Bytes;
use std::fmt;
use upvault_core::UploadRequestDescriptor;
use uuid::Uuid;

/// Lifecycle of one upload entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UploadStatus {
    Pending,
    Uploading,
    Succeeded,
    Failed,
    Deleting,
}

impl UploadStatus {
    pub fn can_transition_to(self, next: UploadStatus) -> bool {
        use UploadStatus::*;
        matches!(
            (self, next),
            (Pending, Uploading)
                | (Uploading, Succeeded)
                | (Uploading, Failed)
                | (Succeeded, Deleting)
                | (Deleting, Succeeded)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, UploadStatus::Succeeded | UploadStatus::Failed)
    }
}

impl fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            UploadStatus::Pending => "pending",
            UploadStatus::Uploading => "uploading",
            UploadStatus::Succeeded => "succeeded",
            UploadStatus::Failed => "failed",
            UploadStatus::Deleting => "deleting",
        };
        f.write_str(label)
    }
}

/// A file offered to the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    pub name: String,
    pub content_type: String,
    pub data: Bytes,
}

impl CandidateFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, data: Bytes) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            data,
        }
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn descriptor(&self) -> UploadRequestDescriptor {
        UploadRequestDescriptor::new(self.name.clone(), self.content_type.clone(), self.size())
    }
}

/// Client-side state of one accepted file.
///
/// Only the orchestrator's reducer mutates an entry. The object key is set at
/// most once; progress never decreases.
#[derive(Debug)]
pub struct UploadEntry {
    pub(crate) id: Uuid,
    pub(crate) file: CandidateFile,
    pub(crate) object_key: Option<String>,
    pub(crate) progress: u8,
    pub(crate) status: UploadStatus,
    pub(crate) failure: Option<String>,
    pub(crate) preview: PreviewHandle,
}

impl UploadEntry {
    pub(crate) fn new(id: Uuid, file: CandidateFile, preview: PreviewHandle) -> Self {
        Self {
            id,
            file,
            object_key: None,
            progress: 0,
            status: UploadStatus::Pending,
            failure: None,
            preview,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn file(&self) -> &CandidateFile {
        &self.file
    }

    pub fn object_key(&self) -> Option<&str> {
        self.object_key.as_deref()
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn status(&self) -> UploadStatus {
        self.status
    }

    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    pub fn preview(&self) -> &PreviewHandle {
        &self.preview
    }

    pub fn snapshot(&self) -> EntrySnapshot {
        EntrySnapshot {
            id: self.id,
            file_name: self.file.name.clone(),
            content_type: self.file.content_type.clone(),
            size: self.file.size(),
            object_key: self.object_key.clone(),
            progress: self.progress,
            status: self.status,
            failure: self.failure.clone(),
            preview_url: self.preview.url(),
        }
    }
}

/// Owned, payload-free view of an entry for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrySnapshot {
    pub id: Uuid,
    pub file_name: String,
    pub content_type: String,
    pub size: u64,
    pub object_key: Option<String>,
    pub progress: u8,
    pub status: UploadStatus,
    pub failure: Option<String>,
    pub preview_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use UploadStatus::*;

    #[test]
    fn allowed_transitions() {
        assert!(Pending.can_transition_to(Uploading));
        assert!(Uploading.can_transition_to(Succeeded));
        assert!(Uploading.can_transition_to(Failed));
        assert!(Succeeded.can_transition_to(Deleting));
        assert!(Deleting.can_transition_to(Succeeded));
    }

    #[test]
    fn rejected_transitions() {
        assert!(!Pending.can_transition_to(Succeeded));
        assert!(!Failed.can_transition_to(Uploading));
        assert!(!Failed.can_transition_to(Deleting));
        assert!(!Uploading.can_transition_to(Deleting));
        assert!(!Succeeded.can_transition_to(Failed));
        assert!(!Succeeded.can_transition_to(Succeeded));
    }

    #[test]
    fn descriptor_carries_payload_size() {
        let file = CandidateFile::new("cat.png", "image/png", Bytes::from_static(b"12345"));
        assert_eq!(
            file.descriptor(),
            UploadRequestDescriptor::new("cat.png", "image/png", 5)
        );
    }
}
