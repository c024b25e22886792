// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::{GeoRecord, HistoryEntry, HistoryId};
use crate::domain::repositories::history_backend::{BackendError, HistoryBackend, HistoryMode};
use crate::domain::repositories::storage_repository::StorageRepository;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// 本地历史在存储中的键
pub const HISTORY_KEY: &str = "geo_history";

/// 默认容量
pub const DEFAULT_CAPACITY: usize = 20;

/// 本地搜索历史后端
///
/// 整个历史序列化为一个JSON数组保存在 [`HISTORY_KEY`] 下，
/// 每次修改都整体读出、整体写回。同一IP只保留最新的一条，
/// 总数不超过 `capacity`。
pub struct LocalHistoryBackend {
    storage: Arc<dyn StorageRepository>,
    capacity: usize,
    write_lock: Mutex<()>,
}

impl LocalHistoryBackend {
    pub fn new(storage: Arc<dyn StorageRepository>, capacity: usize) -> Self {
        Self {
            storage,
            capacity: capacity.max(1),
            write_lock: Mutex::new(()),
        }
    }

    async fn read_all(&self) -> Result<Vec<HistoryEntry>, BackendError> {
        match self.storage.get(HISTORY_KEY).await? {
            Some(bytes) if !bytes.is_empty() => Ok(serde_json::from_slice(&bytes)?),
            _ => Ok(Vec::new()),
        }
    }

    async fn write_all(&self, entries: &[HistoryEntry]) -> Result<(), BackendError> {
        let bytes = serde_json::to_vec(entries)?;
        self.storage.save(HISTORY_KEY, &bytes).await?;
        Ok(())
    }
}

#[async_trait]
impl HistoryBackend for LocalHistoryBackend {
    fn mode(&self) -> HistoryMode {
        HistoryMode::Local
    }

    async fn load(&self) -> Result<Vec<HistoryEntry>, BackendError> {
        self.read_all().await
    }

    async fn create(&self, ip: &str, geo: &GeoRecord) -> Result<HistoryEntry, BackendError> {
        let _guard = self.write_lock.lock().await;

        let mut entries = self.read_all().await?;
        let entry = HistoryEntry::new_local(ip, geo.clone(), Utc::now());

        entries.retain(|e| e.ip != ip);
        entries.insert(0, entry.clone());
        entries.truncate(self.capacity);

        self.write_all(&entries).await?;
        debug!("Recorded {} locally ({} entries)", ip, entries.len());
        Ok(entry)
    }

    async fn delete(&self, id: &HistoryId) -> Result<(), BackendError> {
        let _guard = self.write_lock.lock().await;

        let mut entries = self.read_all().await?;
        let before = entries.len();
        entries.retain(|e| &e.id != id);
        if entries.len() != before {
            self.write_all(&entries).await?;
        }
        Ok(())
    }

    async fn delete_many(&self, ids: &[HistoryId]) -> Result<(), BackendError> {
        let _guard = self.write_lock.lock().await;

        let ids: HashSet<&HistoryId> = ids.iter().collect();
        let mut entries = self.read_all().await?;
        let before = entries.len();
        entries.retain(|e| !ids.contains(&e.id));
        if entries.len() != before {
            self.write_all(&entries).await?;
        }
        Ok(())
    }

    async fn clear(&self) -> Result<(), BackendError> {
        let _guard = self.write_lock.lock().await;
        self.storage.delete(HISTORY_KEY).await?;
        Ok(())
    }
}
