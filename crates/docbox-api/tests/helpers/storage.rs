//! In-memory storage backend for integration tests.

use async_trait::async_trait;
use bytes::Bytes;
use docbox_storage::{ObjectStorage, StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Object store double: keeps uploads in a map and fabricates presigned URLs
/// in the same shape the real backend returns. Failure flags let tests drive
/// the 500 paths.
pub struct MockStorage {
    bucket: String,
    objects: Mutex<HashMap<String, Bytes>>,
    put_calls: AtomicUsize,
    fail_puts: AtomicBool,
    fail_presigns: AtomicBool,
}

impl MockStorage {
    pub fn new() -> Self {
        Self {
            bucket: "documents".to_string(),
            objects: Mutex::new(HashMap::new()),
            put_calls: AtomicUsize::new(0),
            fail_puts: AtomicBool::new(false),
            fail_presigns: AtomicBool::new(false),
        }
    }

    pub fn put_calls(&self) -> usize {
        self.put_calls.load(Ordering::SeqCst)
    }

    pub fn fail_puts(&self) {
        self.fail_puts.store(true, Ordering::SeqCst);
    }

    pub fn fail_presigns(&self) {
        self.fail_presigns.store(true, Ordering::SeqCst);
    }

    pub fn insert_object(&self, key: &str, data: Bytes) {
        self.objects
            .lock()
            .expect("objects lock poisoned")
            .insert(key.to_string(), data);
    }

    pub fn object(&self, key: &str) -> Option<Bytes> {
        self.objects
            .lock()
            .expect("objects lock poisoned")
            .get(key)
            .cloned()
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects
            .lock()
            .expect("objects lock poisoned")
            .keys()
            .cloned()
            .collect()
    }
}

impl Default for MockStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectStorage for MockStorage {
    async fn put_object(
        &self,
        key: &str,
        data: Bytes,
        _content_type: &str,
    ) -> StorageResult<()> {
        self.put_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(StorageError::UploadFailed(
                "injected upload failure".to_string(),
            ));
        }
        self.insert_object(key, data);
        Ok(())
    }

    async fn presign_download(&self, key: &str, expires_in: Duration) -> StorageResult<String> {
        if self.fail_presigns.load(Ordering::SeqCst) {
            return Err(StorageError::PresignFailed(
                "injected presign failure".to_string(),
            ));
        }
        if self.object(key).is_none() {
            return Err(StorageError::NotFound(key.to_string()));
        }
        Ok(format!(
            "http://localhost:9000/{}/{}?X-Amz-Algorithm=AWS4-HMAC-SHA256&X-Amz-Expires={}&X-Amz-Signature=test",
            self.bucket,
            key,
            expires_in.as_secs()
        ))
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        Ok(self.object(key).is_some())
    }
}
