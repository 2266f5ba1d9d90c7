//! Upload orchestration.
//!
//! Each accepted file gets an [`UploadEntry`] and a pipeline future
//! (credential, then transfer) pushed onto a `FuturesUnordered`. Pipelines
//! never touch entries; they report [`UploadEvent`]s on an mpsc channel and
//! [`UploadOrchestrator::step`] feeds those to a single reducer. Nothing is
//! spawned: pipelines only make progress while the caller drives `step` or
//! `settle`.

use crate::backend::{CredentialSource, ObjectRemover, ObjectTransfer};
use crate::entry::{CandidateFile, EntrySnapshot, UploadEntry, UploadStatus};
use crate::error::UploadError;
use crate::events::{EventKind, UploadEvent};
use crate::intake::{IntakePolicy, IntakeRejection};
use crate::notice::Notice;
use crate::preview::{PreviewHandle, PreviewRegistry};
use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use upvault_api_client::{ApiClient, ProgressFn, TransferClient};
use uuid::Uuid;

/// Result of offering a batch of files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    /// Ids of the entries created, in submission order.
    pub accepted: Vec<Uuid>,
    pub rejections: Vec<IntakeRejection>,
}

/// Change notification for UI consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryUpdate {
    Changed(EntrySnapshot),
    Removed(Uuid),
}

pub struct UploadOrchestrator {
    policy: IntakePolicy,
    credentials: Arc<dyn CredentialSource>,
    transfer: Arc<dyn ObjectTransfer>,
    remover: Arc<dyn ObjectRemover>,
    previews: PreviewRegistry,
    entries: HashMap<Uuid, UploadEntry>,
    order: Vec<Uuid>,
    events_tx: mpsc::UnboundedSender<UploadEvent>,
    events_rx: mpsc::UnboundedReceiver<UploadEvent>,
    in_flight: FuturesUnordered<BoxFuture<'static, ()>>,
    notices: Vec<Notice>,
    subscribers: Vec<mpsc::UnboundedSender<EntryUpdate>>,
}

impl UploadOrchestrator {
    pub fn new(
        policy: IntakePolicy,
        credentials: Arc<dyn CredentialSource>,
        transfer: Arc<dyn ObjectTransfer>,
        remover: Arc<dyn ObjectRemover>,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            policy,
            credentials,
            transfer,
            remover,
            previews: PreviewRegistry::new(),
            entries: HashMap::new(),
            order: Vec::new(),
            events_tx,
            events_rx,
            in_flight: FuturesUnordered::new(),
            notices: Vec::new(),
            subscribers: Vec::new(),
        }
    }

    /// Orchestrator backed by the HTTP API and direct transfers.
    pub fn from_clients(policy: IntakePolicy, api: ApiClient, transfer: TransferClient) -> Self {
        let api = Arc::new(api);
        Self::new(policy, api.clone(), Arc::new(transfer), api)
    }

    pub fn policy(&self) -> &IntakePolicy {
        &self.policy
    }

    /// Filter a batch and start an upload pipeline for every accepted file.
    ///
    /// Rejected files produce one notice per reason and never reach the
    /// network.
    pub fn submit(&mut self, files: Vec<CandidateFile>) -> SubmitOutcome {
        let offered = files.len();
        let (accepted, rejections) = self.policy.partition(files);

        for rejection in &rejections {
            tracing::info!(files = ?rejection.file_names(), "Files rejected: {}", rejection);
            self.notices.push(Notice::Rejected(rejection.clone()));
        }

        let accepted: Vec<Uuid> = accepted
            .into_iter()
            .map(|file| {
                let preview = self.previews.acquire(file.data.clone());
                self.admit(file, preview, None)
            })
            .collect();

        tracing::info!(
            offered = offered,
            accepted = accepted.len(),
            in_flight = self.in_flight.len(),
            "Batch submitted"
        );

        SubmitOutcome {
            accepted,
            rejections,
        }
    }

    /// Delete the stored object of a succeeded entry. The entry leaves the
    /// collection once the store confirms.
    pub fn remove(&mut self, id: Uuid) -> Result<(), UploadError> {
        let entry = self.entries.get(&id).ok_or(UploadError::EntryNotFound(id))?;
        let key = match (entry.status, entry.object_key.clone()) {
            (UploadStatus::Succeeded, Some(key)) => key,
            (status, _) => {
                return Err(UploadError::InvalidState {
                    id,
                    status,
                    expected: UploadStatus::Succeeded,
                })
            }
        };

        self.apply(UploadEvent::new(id, EventKind::DeleteRequested));
        self.in_flight.push(delete_pipeline(
            id,
            key,
            self.remover.clone(),
            self.events_tx.clone(),
        ));
        Ok(())
    }

    /// Drop a failed entry locally. Its object key, if any, is left in the
    /// store.
    pub fn dismiss(&mut self, id: Uuid) -> Result<(), UploadError> {
        self.expect_status(id, UploadStatus::Failed)?;
        self.detach(id);
        self.publish(EntryUpdate::Removed(id));
        Ok(())
    }

    /// Replace a failed entry with a fresh one for the same file. Returns the
    /// new entry's id.
    pub fn retry(&mut self, id: Uuid) -> Result<Uuid, UploadError> {
        self.expect_status(id, UploadStatus::Failed)?;
        let position = self.order.iter().position(|existing| *existing == id);
        let Some(UploadEntry { file, preview, .. }) = self.detach(id) else {
            return Err(UploadError::EntryNotFound(id));
        };
        self.publish(EntryUpdate::Removed(id));

        let new_id = self.admit(file, preview, position);
        tracing::info!(old_id = %id, new_id = %new_id, "Retrying upload");
        Ok(new_id)
    }

    /// Apply one pending event, waiting for pipelines if none is queued.
    /// Returns `false` once nothing is queued or in flight.
    pub async fn step(&mut self) -> bool {
        if let Ok(event) = self.events_rx.try_recv() {
            self.apply(event);
            return true;
        }

        if self.in_flight.is_empty() {
            return false;
        }

        let event = tokio::select! {
            Some(event) = self.events_rx.recv() => Some(event),
            Some(()) = self.in_flight.next() => None,
            else => None,
        };

        if let Some(event) = event {
            self.apply(event);
        }
        true
    }

    /// Drive every pipeline to completion.
    pub async fn settle(&mut self) {
        while self.step().await {}
    }

    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<EntryUpdate> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Entries in display order.
    pub fn entries(&self) -> impl Iterator<Item = &UploadEntry> {
        self.order.iter().filter_map(|id| self.entries.get(id))
    }

    pub fn snapshots(&self) -> Vec<EntrySnapshot> {
        self.entries().map(UploadEntry::snapshot).collect()
    }

    pub fn entry(&self, id: Uuid) -> Option<&UploadEntry> {
        self.entries.get(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when no pipeline is running and every entry is settled.
    pub fn is_idle(&self) -> bool {
        self.in_flight.is_empty() && self.entries.values().all(|e| e.status.is_terminal())
    }

    pub fn previews(&self) -> &PreviewRegistry {
        &self.previews
    }

    fn admit(&mut self, file: CandidateFile, preview: PreviewHandle, position: Option<usize>) -> Uuid {
        let id = Uuid::new_v4();
        let pipeline = upload_pipeline(
            id,
            file.clone(),
            self.credentials.clone(),
            self.transfer.clone(),
            self.events_tx.clone(),
        );

        let entry = UploadEntry::new(id, file, preview);
        let snapshot = entry.snapshot();
        self.entries.insert(id, entry);
        match position {
            Some(index) if index <= self.order.len() => self.order.insert(index, id),
            _ => self.order.push(id),
        }
        self.publish(EntryUpdate::Changed(snapshot));

        self.apply(UploadEvent::new(id, EventKind::Started));
        self.in_flight.push(pipeline);
        id
    }

    fn expect_status(&self, id: Uuid, expected: UploadStatus) -> Result<(), UploadError> {
        let entry = self.entries.get(&id).ok_or(UploadError::EntryNotFound(id))?;
        if entry.status != expected {
            return Err(UploadError::InvalidState {
                id,
                status: entry.status,
                expected,
            });
        }
        Ok(())
    }

    fn detach(&mut self, id: Uuid) -> Option<UploadEntry> {
        self.order.retain(|existing| *existing != id);
        self.entries.remove(&id)
    }

    fn publish(&mut self, update: EntryUpdate) {
        self.subscribers
            .retain(|subscriber| subscriber.send(update.clone()).is_ok());
    }

    /// The only place entries change.
    fn apply(&mut self, event: UploadEvent) {
        let UploadEvent { entry_id, kind } = event;
        let Some(entry) = self.entries.get_mut(&entry_id) else {
            tracing::debug!(entry_id = %entry_id, event = ?kind, "Event for unknown entry ignored");
            return;
        };

        let mut notice = None;
        match kind {
            EventKind::Started => {
                if !transition(entry, UploadStatus::Uploading) {
                    return;
                }
            }
            EventKind::CredentialIssued { object_key } => {
                if entry.status != UploadStatus::Uploading || entry.object_key.is_some() {
                    tracing::warn!(entry_id = %entry_id, status = %entry.status, "Unexpected credential ignored");
                    return;
                }
                tracing::debug!(entry_id = %entry_id, key = %object_key, "Credential issued");
                entry.object_key = Some(object_key);
            }
            EventKind::CredentialFailed { reason } => {
                if !transition(entry, UploadStatus::Failed) {
                    return;
                }
                tracing::warn!(entry_id = %entry_id, file = %entry.file.name, reason = %reason, "Credential request failed");
                notice = Some(Notice::CredentialFailed {
                    file_name: entry.file.name.clone(),
                    reason: reason.clone(),
                });
                entry.failure = Some(reason);
            }
            EventKind::Progress(percent) => {
                let percent = percent.min(100);
                if entry.status != UploadStatus::Uploading || percent <= entry.progress {
                    return;
                }
                entry.progress = percent;
            }
            EventKind::TransferSucceeded => {
                if !transition(entry, UploadStatus::Succeeded) {
                    return;
                }
                entry.progress = 100;
                entry.failure = None;
                tracing::info!(
                    entry_id = %entry_id,
                    key = ?entry.object_key,
                    size_bytes = entry.file.size(),
                    "Upload succeeded"
                );
            }
            EventKind::TransferFailed { reason } => {
                if !transition(entry, UploadStatus::Failed) {
                    return;
                }
                tracing::warn!(entry_id = %entry_id, file = %entry.file.name, reason = %reason, "Upload failed");
                notice = Some(Notice::TransferFailed {
                    file_name: entry.file.name.clone(),
                    reason: reason.clone(),
                });
                entry.failure = Some(reason);
            }
            EventKind::DeleteRequested => {
                if !transition(entry, UploadStatus::Deleting) {
                    return;
                }
            }
            EventKind::DeleteSucceeded => {
                if entry.status != UploadStatus::Deleting {
                    tracing::warn!(entry_id = %entry_id, status = %entry.status, "Unexpected delete confirmation ignored");
                    return;
                }
                tracing::info!(entry_id = %entry_id, key = ?entry.object_key, "Stored object deleted");
                self.detach(entry_id);
                self.publish(EntryUpdate::Removed(entry_id));
                return;
            }
            EventKind::DeleteFailed { reason } => {
                if !transition(entry, UploadStatus::Succeeded) {
                    return;
                }
                tracing::warn!(entry_id = %entry_id, key = ?entry.object_key, reason = %reason, "Delete failed");
                // Upload still stands; the reason goes to the notice only.
                notice = Some(Notice::DeleteFailed {
                    file_name: entry.file.name.clone(),
                    reason,
                });
            }
        }

        let snapshot = entry.snapshot();
        if let Some(notice) = notice {
            self.notices.push(notice);
        }
        self.publish(EntryUpdate::Changed(snapshot));
    }
}

fn transition(entry: &mut UploadEntry, next: UploadStatus) -> bool {
    if !entry.status.can_transition_to(next) {
        tracing::warn!(
            entry_id = %entry.id,
            from = %entry.status,
            to = %next,
            "Invalid status transition ignored"
        );
        return false;
    }
    entry.status = next;
    true
}

fn upload_pipeline(
    id: Uuid,
    file: CandidateFile,
    credentials: Arc<dyn CredentialSource>,
    transfer: Arc<dyn ObjectTransfer>,
    events: mpsc::UnboundedSender<UploadEvent>,
) -> BoxFuture<'static, ()> {
    async move {
        // Send errors only mean the orchestrator is gone.
        let emit = |kind: EventKind| {
            let _ = events.send(UploadEvent::new(id, kind));
        };

        let credential = match credentials.request_credential(&file.descriptor()).await {
            Ok(credential) => credential,
            Err(e) => {
                emit(EventKind::CredentialFailed {
                    reason: format!("{:#}", e),
                });
                return;
            }
        };
        emit(EventKind::CredentialIssued {
            object_key: credential.object_key.clone(),
        });

        let progress_events = events.clone();
        let on_progress: ProgressFn = Arc::new(move |percent: u8| {
            let _ = progress_events.send(UploadEvent::new(id, EventKind::Progress(percent)));
        });

        match transfer
            .transfer(file.data, &file.content_type, &credential, on_progress)
            .await
        {
            Ok(()) => emit(EventKind::TransferSucceeded),
            Err(e) => emit(EventKind::TransferFailed {
                reason: e.to_string(),
            }),
        }
    }
    .boxed()
}

fn delete_pipeline(
    id: Uuid,
    key: String,
    remover: Arc<dyn ObjectRemover>,
    events: mpsc::UnboundedSender<UploadEvent>,
) -> BoxFuture<'static, ()> {
    async move {
        let kind = match remover.delete_object(&key).await {
            Ok(()) => EventKind::DeleteSucceeded,
            Err(e) => EventKind::DeleteFailed {
                reason: format!("{:#}", e),
            },
        };
        let _ = events.send(UploadEvent::new(id, kind));
    }
    .boxed()
}
