use crate::intake::IntakeRejection;
use std::fmt;

/// User-facing message about a rejected file or a failed operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Rejected(IntakeRejection),
    CredentialFailed { file_name: String, reason: String },
    TransferFailed { file_name: String, reason: String },
    DeleteFailed { file_name: String, reason: String },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Rejected(rejection) => write!(f, "{}", rejection),
            Notice::CredentialFailed { file_name, reason } => {
                write!(f, "Could not start upload of {}: {}", file_name, reason)
            }
            Notice::TransferFailed { file_name, reason } => {
                write!(f, "Upload of {} failed: {}", file_name, reason)
            }
            Notice::DeleteFailed { file_name, reason } => {
                write!(f, "Could not delete {}: {}", file_name, reason)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notices_name_the_file_and_cause() {
        let notice = Notice::TransferFailed {
            file_name: "cat.png".to_string(),
            reason: "Network error: connection refused".to_string(),
        };
        assert_eq!(
            notice.to_string(),
            "Upload of cat.png failed: Network error: connection refused"
        );

        let rejected = Notice::Rejected(IntakeRejection::FileTooLarge {
            max_file_size: 10,
            file_names: vec!["big.png".to_string()],
        });
        assert_eq!(rejected.to_string(), "File too large (limit 10 bytes): big.png");
    }
}
