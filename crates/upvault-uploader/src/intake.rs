//! Intake policy: which candidate files become upload entries.
//!
//! Filtering order per file: content type, then size, then the per-batch
//! count limit over what survived. Rejections are aggregated so a batch yields
//! at most one [`IntakeRejection`] per reason.

use crate::entry::CandidateFile;
use upvault_core::constants::{
    DEFAULT_ACCEPTED_TYPES, DEFAULT_MAX_FILES_PER_BATCH, DEFAULT_MAX_FILE_SIZE_BYTES,
};

/// Why files of a batch were turned away.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntakeRejection {
    #[error("Too many files: at most {max_files} per batch, skipped {}", .file_names.join(", "))]
    TooManyFiles {
        max_files: usize,
        file_names: Vec<String>,
    },

    #[error("File too large (limit {max_file_size} bytes): {}", .file_names.join(", "))]
    FileTooLarge {
        max_file_size: u64,
        file_names: Vec<String>,
    },

    #[error("Unsupported file type: {}", .file_names.join(", "))]
    UnsupportedType { file_names: Vec<String> },
}

impl IntakeRejection {
    pub fn file_names(&self) -> &[String] {
        match self {
            IntakeRejection::TooManyFiles { file_names, .. }
            | IntakeRejection::FileTooLarge { file_names, .. }
            | IntakeRejection::UnsupportedType { file_names } => file_names,
        }
    }
}

/// Per-batch acceptance rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakePolicy {
    max_files: usize,
    max_file_size: u64,
    accepted_types: Vec<String>,
}

impl Default for IntakePolicy {
    fn default() -> Self {
        Self {
            max_files: DEFAULT_MAX_FILES_PER_BATCH,
            max_file_size: DEFAULT_MAX_FILE_SIZE_BYTES,
            accepted_types: DEFAULT_ACCEPTED_TYPES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl IntakePolicy {
    pub fn with_max_files(mut self, max_files: usize) -> Self {
        self.max_files = max_files;
        self
    }

    /// Files of this size or larger are rejected.
    pub fn with_max_file_size(mut self, max_file_size: u64) -> Self {
        self.max_file_size = max_file_size;
        self
    }

    /// Accepted content types: exact (`image/png`), wildcard subtype
    /// (`image/*`) or anything (`*/*`).
    pub fn with_accepted_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.accepted_types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn max_files(&self) -> usize {
        self.max_files
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    pub fn accepted_types(&self) -> &[String] {
        &self.accepted_types
    }

    pub fn accepts_type(&self, content_type: &str) -> bool {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase();
        if essence.is_empty() {
            return false;
        }

        self.accepted_types.iter().any(|pattern| {
            let pattern = pattern.trim().to_ascii_lowercase();
            match pattern.as_str() {
                "*" | "*/*" => true,
                p => match p.strip_suffix("/*") {
                    Some(top_level) => essence
                        .split_once('/')
                        .is_some_and(|(top, _)| top == top_level),
                    None => p == essence,
                },
            }
        })
    }

    /// Split a batch into accepted files and aggregated rejections.
    pub fn partition(
        &self,
        files: Vec<CandidateFile>,
    ) -> (Vec<CandidateFile>, Vec<IntakeRejection>) {
        let mut accepted = Vec::new();
        let mut unsupported = Vec::new();
        let mut too_large = Vec::new();
        let mut over_limit = Vec::new();

        for file in files {
            if !self.accepts_type(&file.content_type) {
                unsupported.push(file.name);
            } else if file.size() >= self.max_file_size {
                too_large.push(file.name);
            } else if accepted.len() >= self.max_files {
                over_limit.push(file.name);
            } else {
                accepted.push(file);
            }
        }

        let mut rejections = Vec::new();
        if !over_limit.is_empty() {
            rejections.push(IntakeRejection::TooManyFiles {
                max_files: self.max_files,
                file_names: over_limit,
            });
        }
        if !too_large.is_empty() {
            rejections.push(IntakeRejection::FileTooLarge {
                max_file_size: self.max_file_size,
                file_names: too_large,
            });
        }
        if !unsupported.is_empty() {
            rejections.push(IntakeRejection::UnsupportedType {
                file_names: unsupported,
            });
        }

        (accepted, rejections)
    }
}
