//! Session persistence.
//!
//! The storage service owns an opaque session store and hands it to whatever
//! middleware needs one; nothing here interprets the session payload. One
//! implementation: a JSON file-backed map with a TTL.

use std::{collections::HashMap, path::PathBuf, sync::Arc};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::{fs, sync::RwLock};

use crate::errors::ServiceError;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SessionRecord {
    pub data: serde_json::Value,
    pub expires_at: DateTime<Utc>,
}

/// Generic session-persistence capability, so middleware can hold the store
/// without knowing it is file-backed.
#[async_trait::async_trait]
pub trait SessionPersistence: Send + Sync {
    async fn load(&self, sid: &str) -> Option<serde_json::Value>;
    async fn save(&self, sid: &str, data: serde_json::Value) -> Result<(), ServiceError>;
    async fn destroy(&self, sid: &str) -> Result<bool, ServiceError>;
}

pub struct FileSessionStore {
    inner: RwLock<HashMap<String, SessionRecord>>,
    file_path: PathBuf,
    ttl: Duration,
}

impl FileSessionStore {
    /// Open the store, creating the backing file with an empty map if missing.
    pub async fn new<P: Into<PathBuf>>(path: P, ttl_secs: u64) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await.ok();
        }
        let map: HashMap<String, SessionRecord> = match fs::read(&file_path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_default(),
            Err(_) => {
                let empty: HashMap<String, SessionRecord> = HashMap::new();
                fs::write(
                    &file_path,
                    serde_json::to_vec(&empty).map_err(|e| ServiceError::Storage(e.to_string()))?,
                )
                .await
                .map_err(|e| ServiceError::Storage(e.to_string()))?;
                empty
            }
        };
        Ok(Arc::new(Self {
            inner: RwLock::new(map),
            file_path,
            ttl: Duration::seconds(ttl_secs as i64),
        }))
    }

    /// Mint a new session with a generated id.
    pub async fn create(&self, data: serde_json::Value) -> Result<String, ServiceError> {
        let sid = uuid::Uuid::new_v4().to_string();
        self.save(&sid, data).await?;
        Ok(sid)
    }

    /// Drop every expired record; returns how many were removed.
    pub async fn prune_expired(&self) -> Result<usize, ServiceError> {
        let now = Utc::now();
        let mut map = self.inner.write().await;
        let before = map.len();
        map.retain(|_, rec| rec.expires_at > now);
        let removed = before - map.len();
        drop(map);
        if removed > 0 {
            self.persist().await?;
        }
        Ok(removed)
    }

    async fn persist(&self) -> Result<(), ServiceError> {
        let map = self.inner.read().await;
        let data = serde_json::to_vec(&*map).map_err(|e| ServiceError::Storage(e.to_string()))?;
        fs::write(&self.file_path, data)
            .await
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl SessionPersistence for FileSessionStore {
    async fn load(&self, sid: &str) -> Option<serde_json::Value> {
        let map = self.inner.read().await;
        let rec = map.get(sid)?;
        if rec.expires_at <= Utc::now() {
            return None;
        }
        Some(rec.data.clone())
    }

    async fn save(&self, sid: &str, data: serde_json::Value) -> Result<(), ServiceError> {
        let rec = SessionRecord { data, expires_at: Utc::now() + self.ttl };
        let mut map = self.inner.write().await;
        map.insert(sid.to_string(), rec);
        drop(map);
        self.persist().await
    }

    async fn destroy(&self, sid: &str) -> Result<bool, ServiceError> {
        let mut map = self.inner.write().await;
        let existed = map.remove(sid).is_some();
        drop(map);
        self.persist().await?;
        Ok(existed)
    }
}
