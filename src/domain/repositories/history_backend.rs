// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::storage_repository::StorageError;
use crate::domain::models::{GeoRecord, HistoryEntry, HistoryId};
use crate::utils::errors::{Classify, ErrorKind};
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// 历史后端错误类型
#[derive(Error, Debug)]
pub enum BackendError {
    /// 网络或服务端错误
    #[error("History service unavailable: {0}")]
    Network(String),
    /// 记录不存在
    #[error("History entry not found: {0}")]
    NotFound(String),
    /// 认证过期
    #[error("Authentication expired")]
    AuthExpired,
    /// 本地存储错误
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// 持久化数据无法解析
    #[error("Corrupt history data: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Classify for BackendError {
    fn kind(&self) -> ErrorKind {
        match self {
            BackendError::Network(_) => ErrorKind::Network,
            BackendError::NotFound(_) => ErrorKind::NotFound,
            BackendError::AuthExpired => ErrorKind::AuthExpired,
            BackendError::Storage(_) | BackendError::Serialization(_) => ErrorKind::Storage,
        }
    }
}

/// 历史持久化模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryMode {
    /// 由远程服务保存，服务端是唯一可信来源
    Remote,
    /// 序列化到本地存储，按IP去重并限制容量
    Local,
}

impl fmt::Display for HistoryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryMode::Remote => f.write_str("remote"),
            HistoryMode::Local => f.write_str("local"),
        }
    }
}

/// 历史后端特质
///
/// 搜索历史的持久化抽象。后端本身就是可信来源：
/// 历史存储在每次写操作之后重新读取后端的结果，而不是自行推断。
#[async_trait]
pub trait HistoryBackend: Send + Sync {
    /// 后端模式
    fn mode(&self) -> HistoryMode;

    /// 读取全部历史，按时间倒序
    async fn load(&self) -> Result<Vec<HistoryEntry>, BackendError>;

    /// 创建一条历史记录
    async fn create(&self, ip: &str, geo: &GeoRecord) -> Result<HistoryEntry, BackendError>;

    /// 删除一条历史记录
    async fn delete(&self, id: &HistoryId) -> Result<(), BackendError>;

    /// 批量删除历史记录
    async fn delete_many(&self, ids: &[HistoryId]) -> Result<(), BackendError>;

    /// 清空全部历史
    async fn clear(&self) -> Result<(), BackendError>;
}
