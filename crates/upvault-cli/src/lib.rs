use anyhow::Context;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use upvault_uploader::{CandidateFile, EntrySnapshot, IntakePolicy, IntakeRejection, UploadStatus};

/// Truncate a string to max_len characters, appending "..." if truncated.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Read a file from disk as an upload candidate. The content type is guessed
/// from the extension, falling back to `application/octet-stream`.
pub async fn read_candidate(path: &Path) -> anyhow::Result<CandidateFile> {
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let content_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();

    Ok(CandidateFile::new(file_name(path)?, content_type, Bytes::from(data)))
}

/// Files gathered from disk for one upload batch.
#[derive(Debug, Default)]
pub struct LoadedBatch {
    pub candidates: Vec<CandidateFile>,
    /// Files left unread because their size on disk is over the limit.
    pub oversized: Option<IntakeRejection>,
}

/// Read every path the policy's size limit allows. The limit is checked
/// against file metadata so oversized files are never loaded into memory.
pub async fn load_batch(paths: &[PathBuf], policy: &IntakePolicy) -> anyhow::Result<LoadedBatch> {
    let mut batch = LoadedBatch::default();
    let mut oversized = Vec::new();

    for path in paths {
        let metadata = tokio::fs::metadata(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if metadata.len() >= policy.max_file_size() {
            tracing::debug!(path = %path.display(), size_bytes = metadata.len(), "Skipping oversized file");
            oversized.push(file_name(path)?);
            continue;
        }
        batch.candidates.push(read_candidate(path).await?);
    }

    if !oversized.is_empty() {
        batch.oversized = Some(IntakeRejection::FileTooLarge {
            max_file_size: policy.max_file_size(),
            file_names: oversized,
        });
    }
    Ok(batch)
}

fn file_name(path: &Path) -> anyhow::Result<String> {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .with_context(|| format!("{} has no file name", path.display()))
}

/// One line of the upload table.
pub fn format_entry_row(entry: &EntrySnapshot) -> String {
    let detail = match (entry.status, &entry.failure, &entry.object_key) {
        (UploadStatus::Failed, Some(failure), _) => truncate_string(failure, 60),
        (_, _, Some(key)) => key.clone(),
        _ => "-".to_string(),
    };
    format!(
        "{:<32} {:>10} {:>4}% {:<10} {}",
        truncate_string(&entry.file_name, 32),
        entry.size,
        entry.progress,
        entry.status,
        detail
    )
}

/// Initialize tracing for the CLI.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
