use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Request to issue a presigned write credential for one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequestDescriptor {
    /// Original filename
    #[serde(default)]
    #[validate(length(
        min = 1,
        max = 1024,
        message = "fileName must be between 1 and 1024 characters"
    ))]
    pub file_name: String,
    /// Content type (MIME type) the client will send with the transfer
    #[serde(default)]
    #[validate(length(
        min = 1,
        max = 255,
        message = "contentType must be between 1 and 255 characters"
    ))]
    pub content_type: String,
    /// File size in bytes
    #[serde(rename = "size")]
    pub size_bytes: u64,
}

impl UploadRequestDescriptor {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            size_bytes,
        }
    }
}

/// Time-boxed write credential for a direct upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WriteCredential {
    /// Presigned URL accepting a single PUT of the file
    #[serde(rename = "presignedUrl")]
    pub url: String,
    /// Storage key the object will live under once uploaded
    #[serde(rename = "key")]
    pub object_key: String,
    /// URL expiration time
    pub expires_at: DateTime<Utc>,
}

impl WriteCredential {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Request to delete a previously uploaded object
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteObjectRequest {
    /// Storage key returned by the credential endpoint
    #[serde(default)]
    pub key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteObjectResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn descriptor_uses_wire_field_names() {
        let descriptor: UploadRequestDescriptor = serde_json::from_value(serde_json::json!({
            "fileName": "cat.png",
            "contentType": "image/png",
            "size": 42
        }))
        .unwrap();
        assert_eq!(descriptor, UploadRequestDescriptor::new("cat.png", "image/png", 42));
        assert!(descriptor.validate().is_ok());
    }

    #[test]
    fn descriptor_missing_names_fails_validation() {
        let descriptor: UploadRequestDescriptor =
            serde_json::from_value(serde_json::json!({ "size": 1 })).unwrap();
        let errors = descriptor.validate().unwrap_err();
        assert_eq!(errors.field_errors().len(), 2);
    }

    #[test]
    fn descriptor_rejects_negative_size() {
        let result = serde_json::from_value::<UploadRequestDescriptor>(serde_json::json!({
            "fileName": "a.png",
            "contentType": "image/png",
            "size": -1
        }));
        assert!(result.is_err());
    }

    #[test]
    fn credential_serializes_presigned_url_and_key() {
        let credential = WriteCredential {
            url: "https://bucket.example/k?sig".to_string(),
            object_key: "k".to_string(),
            expires_at: Utc::now(),
        };
        let json = serde_json::to_value(&credential).unwrap();
        assert_eq!(json["presignedUrl"], "https://bucket.example/k?sig");
        assert_eq!(json["key"], "k");
        assert!(json.get("expiresAt").is_some());
    }

    #[test]
    fn credential_expiry_is_inclusive() {
        let now = Utc::now();
        let credential = WriteCredential {
            url: String::new(),
            object_key: String::new(),
            expires_at: now,
        };
        assert!(credential.is_expired_at(now));
        assert!(!credential.is_expired_at(now - Duration::seconds(1)));
    }
}
