use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;

use crate::error::AppError;

/// Short-lived key/value store for one-time codes. Expiry is the store's
/// business; callers only see a value or nothing.
#[async_trait]
pub trait CodeCache: Send + Sync {
    /// Overwrites any value already held for `key`.
    async fn set(&self, key: &str, value: &str) -> Result<(), AppError>;
    async fn get(&self, key: &str) -> Result<Option<String>, AppError>;
}

/// In-process code cache with a fixed time-to-live per entry.
pub struct MemoryCodeCache {
    /// key -> (value, stored_at)
    entries: DashMap<String, (String, Instant)>,
    ttl: Duration,
}

impl MemoryCodeCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Drop every entry whose TTL has run out.
    pub fn cleanup(&self) {
        let ttl = self.ttl;
        self.entries
            .retain(|_, (_, stored_at)| stored_at.elapsed() < ttl);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl CodeCache for MemoryCodeCache {
    async fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.entries
            .insert(key.to_string(), (value.to_string(), Instant::now()));
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let ttl = self.ttl;
        if let Some(entry) = self.entries.get(key) {
            let (value, stored_at) = entry.value();
            if stored_at.elapsed() < ttl {
                return Ok(Some(value.clone()));
            }
        }

        self.entries
            .remove_if(key, |_, (_, stored_at)| stored_at.elapsed() >= ttl);
        Ok(None)
    }
}
