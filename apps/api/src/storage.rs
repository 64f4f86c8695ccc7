use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use bytes::Bytes;
use tracing::info;

use crate::errors::AppError;

/// An uploaded file read back from storage.
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub bytes: Bytes,
    pub content_type: Option<String>,
}

/// Blob storage for profile photos and resumes, keyed by `photos/...` paths.
#[async_trait]
pub trait FileStore: Send + Sync {
    async fn put(&self, key: &str, bytes: Bytes, content_type: Option<&str>)
        -> Result<(), AppError>;
    async fn get(&self, key: &str) -> Result<Option<StoredFile>, AppError>;
}

/// S3 / MinIO backed store.
pub struct S3FileStore {
    client: S3Client,
    bucket: String,
}

impl S3FileStore {
    pub fn new(client: S3Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }
}

#[async_trait]
impl FileStore for S3FileStore {
    async fn put(
        &self,
        key: &str,
        bytes: Bytes,
        content_type: Option<&str>,
    ) -> Result<(), AppError> {
        let size = bytes.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .set_content_type(content_type.map(str::to_string))
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("S3 upload failed: {e}")))?;

        info!("Uploaded {size} bytes to s3://{}/{}", self.bucket, key);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<StoredFile>, AppError> {
        let output = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(output) => output,
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_no_such_key() {
                    return Ok(None);
                }
                return Err(AppError::Storage(format!("S3 download failed: {service_err}")));
            }
        };

        let content_type = output.content_type().map(str::to_string);
        let bytes = output
            .body
            .collect()
            .await
            .map_err(|e| AppError::Storage(format!("S3 body read failed: {e}")))?
            .into_bytes();

        Ok(Some(StoredFile {
            bytes,
            content_type,
        }))
    }
}

/// Reduces a client-supplied file name to its last path component.
/// Returns `None` when nothing usable remains.
pub fn sanitize_file_name(name: &str) -> Option<String> {
    let last = name.rsplit(['/', '\\']).next().unwrap_or(name).trim();
    if last.is_empty() || last == "." || last == ".." {
        return None;
    }
    Some(last.to_string())
}

/// Storage key of an upload owned by `user_id`.
pub fn upload_key(dir: &str, user_id: i32, file_name: &str) -> String {
    format!("photos/{dir}/{user_id}/{file_name}")
}

#[cfg(test)]
pub mod memory {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub struct MemoryFileStore {
        files: Mutex<HashMap<String, StoredFile>>,
        failing: AtomicBool,
    }

    impl MemoryFileStore {
        pub fn keys(&self) -> Vec<String> {
            let files = self.files.lock().unwrap_or_else(|p| p.into_inner());
            let mut keys: Vec<String> = files.keys().cloned().collect();
            keys.sort();
            keys
        }

        /// Makes every later `put` fail with a storage error.
        pub fn fail_puts(&self) {
            self.failing.store(true, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl FileStore for MemoryFileStore {
        async fn put(
            &self,
            key: &str,
            bytes: Bytes,
            content_type: Option<&str>,
        ) -> Result<(), AppError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(AppError::Storage(format!("put {key} refused")));
            }
            let mut files = self.files.lock().unwrap_or_else(|p| p.into_inner());
            files.insert(
                key.to_string(),
                StoredFile {
                    bytes,
                    content_type: content_type.map(str::to_string),
                },
            );
            Ok(())
        }

        async fn get(&self, key: &str) -> Result<Option<StoredFile>, AppError> {
            let files = self.files.lock().unwrap_or_else(|p| p.into_inner());
            Ok(files.get(key).cloned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_directories() {
        assert_eq!(
            sanitize_file_name("../../etc/passwd").as_deref(),
            Some("passwd")
        );
        assert_eq!(
            sanitize_file_name("C:\\Users\\me\\cv.pdf").as_deref(),
            Some("cv.pdf")
        );
        assert_eq!(sanitize_file_name("photo.png").as_deref(), Some("photo.png"));
    }

    #[test]
    fn test_sanitize_rejects_empty_names() {
        assert_eq!(sanitize_file_name(""), None);
        assert_eq!(sanitize_file_name("uploads/"), None);
        assert_eq!(sanitize_file_name(".."), None);
    }

    #[test]
    fn test_upload_key_layout() {
        assert_eq!(
            upload_key("candidate", 12, "cv.pdf"),
            "photos/candidate/12/cv.pdf"
        );
    }
}
