// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::{GeoRecord, HistoryEntry, HistoryId};
use crate::domain::repositories::history_backend::{BackendError, HistoryBackend, HistoryMode};
use crate::utils::errors::{Classify, ErrorKind};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{watch, Mutex as AsyncMutex};
use tracing::{debug, error, info, warn};

/// 历史存储错误类型
///
/// 每个变体对应一种操作，携带后端返回的原始错误
#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("Failed to load search history: {0}")]
    Load(BackendError),
    #[error("Failed to save search history: {0}")]
    Record(BackendError),
    #[error("Failed to delete history item: {0}")]
    Delete(BackendError),
    #[error("Failed to delete selected items: {0}")]
    DeleteMany(BackendError),
    #[error("Failed to clear history: {0}")]
    Clear(BackendError),
}

impl HistoryError {
    /// 后端原始错误
    pub fn backend(&self) -> &BackendError {
        match self {
            HistoryError::Load(e)
            | HistoryError::Record(e)
            | HistoryError::Delete(e)
            | HistoryError::DeleteMany(e)
            | HistoryError::Clear(e) => e,
        }
    }

    /// 展示给用户的提示
    pub fn user_message(&self) -> &'static str {
        match self {
            HistoryError::Load(_) => "Failed to load search history.",
            HistoryError::Record(_) => "Failed to save search history.",
            HistoryError::Delete(_) => "Failed to delete history item.",
            HistoryError::DeleteMany(_) => "Failed to delete selected items.",
            HistoryError::Clear(_) => "Failed to clear history.",
        }
    }
}

impl Classify for HistoryError {
    fn kind(&self) -> ErrorKind {
        self.backend().kind()
    }
}

/// 搜索历史存储
///
/// 内存中按时间倒序保存历史条目，是集合的唯一写入者。所有写操作先交给
/// [`HistoryBackend`]，成功后再更新内存；失败时内存保持上一次确认的状态。
/// 选择状态只存在于内存中。
///
/// 内存锁只在同步代码中短暂持有，不会跨越 `.await`。后端操作连同随后的
/// 重新读取由 `writes` 串行化，重新读取的结果按发起顺序生效。
pub struct HistoryStore {
    backend: Arc<dyn HistoryBackend>,
    entries: Mutex<Vec<HistoryEntry>>,
    writes: AsyncMutex<()>,
    updates: watch::Sender<Vec<HistoryEntry>>,
}

impl HistoryStore {
    pub fn new(backend: Arc<dyn HistoryBackend>) -> Self {
        let (updates, _) = watch::channel(Vec::new());
        Self {
            backend,
            entries: Mutex::new(Vec::new()),
            writes: AsyncMutex::new(()),
            updates,
        }
    }

    /// 后端模式
    pub fn mode(&self) -> HistoryMode {
        self.backend.mode()
    }

    /// 订阅历史集合的变化
    pub fn subscribe(&self) -> watch::Receiver<Vec<HistoryEntry>> {
        self.updates.subscribe()
    }

    /// 从后端加载历史
    pub async fn load(&self) -> Result<(), HistoryError> {
        let _guard = self.writes.lock().await;
        let entries = self.backend.load().await.map_err(|e| {
            error!("Failed to load history: {}", e);
            HistoryError::Load(e)
        })?;
        debug!("Loaded {} history entries", entries.len());
        self.replace(entries);
        Ok(())
    }

    /// 记录一次成功的查询
    ///
    /// 后端创建成功后重新读取后端的完整列表；本地模式下去重与容量限制由
    /// 后端完成，远程模式下以服务端结果为准。
    pub async fn record(&self, ip: &str, geo: &GeoRecord) -> Result<HistoryEntry, HistoryError> {
        let _guard = self.writes.lock().await;
        let created = self.backend.create(ip, geo).await.map_err(|e| {
            error!("Failed to save {} to history: {}", ip, e);
            HistoryError::Record(e)
        })?;

        match self.backend.load().await {
            Ok(entries) => self.replace(entries),
            Err(e) => {
                // The write itself succeeded; show it even though the refresh failed.
                warn!("History saved but reload failed: {}", e);
                let dedupe = self.mode() == HistoryMode::Local;
                self.mutate(|entries| {
                    if dedupe {
                        entries.retain(|existing| existing.ip != created.ip);
                    }
                    entries.insert(0, created.clone());
                });
            }
        }

        Ok(created)
    }

    /// 当前历史，按时间倒序
    pub fn list(&self) -> Vec<HistoryEntry> {
        self.entries.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// 按ID查找
    pub fn get(&self, id: &HistoryId) -> Option<HistoryEntry> {
        self.entries.lock().iter().find(|e| &e.id == id).cloned()
    }

    /// 删除一条记录
    ///
    /// 内存中不存在该ID时不做任何事并返回 `Ok(false)`
    pub async fn delete_one(&self, id: &HistoryId) -> Result<bool, HistoryError> {
        let _guard = self.writes.lock().await;
        if self.get(id).is_none() {
            debug!("History entry {} not present, nothing to delete", id);
            return Ok(false);
        }

        self.backend.delete(id).await.map_err(|e| {
            error!("Failed to delete history item {}: {}", id, e);
            HistoryError::Delete(e)
        })?;

        self.mutate(|entries| entries.retain(|e| &e.id != id));
        Ok(true)
    }

    /// 批量删除
    ///
    /// 无论成功与否都重新读取后端结果来确定内存状态，而不是假定请求中的
    /// ID 全部被删除。返回实际被移除的条目数。
    pub async fn delete_many(&self, ids: &[HistoryId]) -> Result<usize, HistoryError> {
        let _guard = self.writes.lock().await;
        let requested: HashSet<&HistoryId> = ids.iter().collect();
        let present: Vec<HistoryId> = self
            .entries
            .lock()
            .iter()
            .filter(|e| requested.contains(&e.id))
            .map(|e| e.id.clone())
            .collect();
        if present.is_empty() {
            return Ok(0);
        }

        let before = self.len();
        let outcome = self.backend.delete_many(&present).await;

        match self.backend.load().await {
            Ok(entries) => self.replace(entries),
            Err(reload_err) => {
                warn!("Failed to reload history after bulk delete: {}", reload_err);
                if outcome.is_ok() {
                    let removed: HashSet<&HistoryId> = present.iter().collect();
                    self.mutate(|entries| entries.retain(|e| !removed.contains(&e.id)));
                }
            }
        }

        match outcome {
            Ok(()) => {
                let removed = before.saturating_sub(self.len());
                info!("Deleted {} history entries", removed);
                Ok(removed)
            }
            Err(e) => {
                error!("Failed to delete selected items: {}", e);
                Err(HistoryError::DeleteMany(e))
            }
        }
    }

    /// 删除所有已选中的条目，没有选中项时不做任何事
    pub async fn delete_selected(&self) -> Result<usize, HistoryError> {
        let ids = self.selected_ids();
        if ids.is_empty() {
            return Ok(0);
        }
        self.delete_many(&ids).await
    }

    /// 清空历史（是否需要确认由调用方决定）
    pub async fn clear_all(&self) -> Result<(), HistoryError> {
        let _guard = self.writes.lock().await;
        self.backend.clear().await.map_err(|e| {
            error!("Failed to clear history: {}", e);
            HistoryError::Clear(e)
        })?;
        self.mutate(Vec::clear);
        info!("History cleared");
        Ok(())
    }

    /// 切换选择状态，返回新的状态；ID 不存在时返回 `None`
    pub fn toggle_selected(&self, id: &HistoryId) -> Option<bool> {
        let mut state = None;
        self.mutate(|entries| {
            if let Some(entry) = entries.iter_mut().find(|e| &e.id == id) {
                entry.selected = !entry.selected;
                state = Some(entry.selected);
            }
        });
        state
    }

    pub fn select_all(&self) {
        self.mutate(|entries| entries.iter_mut().for_each(|e| e.selected = true));
    }

    pub fn deselect_all(&self) {
        self.mutate(|entries| entries.iter_mut().for_each(|e| e.selected = false));
    }

    pub fn selected_ids(&self) -> Vec<HistoryId> {
        self.entries
            .lock()
            .iter()
            .filter(|e| e.selected)
            .map(|e| e.id.clone())
            .collect()
    }

    pub fn selected_count(&self) -> usize {
        self.entries.lock().iter().filter(|e| e.selected).count()
    }

    /// 按 ip / 城市 / 国家过滤（不区分大小写），空查询返回全部
    pub fn filter(&self, query: &str) -> Vec<HistoryEntry> {
        let needle = query.trim().to_lowercase();
        let entries = self.entries.lock();
        if needle.is_empty() {
            return entries.clone();
        }
        entries.iter().filter(|e| e.matches(&needle)).cloned().collect()
    }

    /// 用后端结果替换内存集合，保留仍存在条目的选择状态
    fn replace(&self, mut fresh: Vec<HistoryEntry>) {
        self.mutate(|entries| {
            let selected: HashSet<&HistoryId> =
                entries.iter().filter(|e| e.selected).map(|e| &e.id).collect();
            for entry in fresh.iter_mut() {
                entry.selected = selected.contains(&entry.id);
            }
            *entries = std::mem::take(&mut fresh);
        });
    }

    fn mutate<F>(&self, f: F)
    where
        F: FnOnce(&mut Vec<HistoryEntry>),
    {
        let snapshot = {
            let mut entries = self.entries.lock();
            f(&mut entries);
            entries.clone()
        };
        self.updates.send_replace(snapshot);
    }
}
