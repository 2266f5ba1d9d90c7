pub mod upload;

pub use upload::{DeleteObjectRequest, DeleteObjectResponse, UploadRequestDescriptor, WriteCredential};
