// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::repositories::storage_repository::{StorageError, StorageRepository};
use std::sync::Arc;
use tracing::debug;

/// 令牌在存储中的键
pub const TOKEN_KEY: &str = "auth_token";

/// 认证存储
///
/// 持有保存在持久化存储中的 Bearer 令牌。需要认证的组件显式持有
/// 这个句柄，而不是访问全局状态。克隆开销很小，所有克隆共享同一存储。
#[derive(Clone)]
pub struct AuthStore {
    storage: Arc<dyn StorageRepository>,
}

impl AuthStore {
    pub fn new(storage: Arc<dyn StorageRepository>) -> Self {
        Self { storage }
    }

    /// 读取当前令牌，空令牌视为不存在
    pub async fn get_token(&self) -> Result<Option<String>, StorageError> {
        let Some(bytes) = self.storage.get(TOKEN_KEY).await? else {
            return Ok(None);
        };
        let token = String::from_utf8(bytes)
            .map_err(|e| StorageError::Other(format!("token is not UTF-8: {}", e)))?;
        let token = token.trim().to_string();
        Ok((!token.is_empty()).then_some(token))
    }

    pub async fn set_token(&self, token: &str) -> Result<(), StorageError> {
        debug!("Storing auth token");
        self.storage.save(TOKEN_KEY, token.as_bytes()).await
    }

    pub async fn clear(&self) -> Result<(), StorageError> {
        debug!("Clearing auth token");
        self.storage.delete(TOKEN_KEY).await
    }

    pub async fn is_authenticated(&self) -> Result<bool, StorageError> {
        Ok(self.get_token().await?.is_some())
    }
}
