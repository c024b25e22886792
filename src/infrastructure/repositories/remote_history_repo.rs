// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::dto::history_request::{
    parse_history_list, parse_history_row, BulkDeleteDto, CreateHistoryDto,
};
use crate::domain::models::{GeoRecord, HistoryEntry, HistoryId};
use crate::domain::repositories::history_backend::{BackendError, HistoryBackend, HistoryMode};
use crate::infrastructure::api_client::{ApiClient, ApiError};
use async_trait::async_trait;
use tracing::{debug, error};

const HISTORY_PATH: &str = "/search-history";

impl From<ApiError> for BackendError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized => BackendError::AuthExpired,
            ApiError::NotFound(url) => BackendError::NotFound(url),
            ApiError::Token(e) => BackendError::Storage(e),
            other => BackendError::Network(other.to_string()),
        }
    }
}

/// 远程搜索历史后端
///
/// 服务端是唯一可信来源：不做客户端去重和容量限制。
#[derive(Clone)]
pub struct RemoteHistoryBackend {
    client: ApiClient,
}

impl RemoteHistoryBackend {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    fn server_id(id: &HistoryId) -> Result<i64, BackendError> {
        match id {
            HistoryId::Server(id) => Ok(*id),
            HistoryId::Client(id) => Err(BackendError::NotFound(id.clone())),
        }
    }
}

fn invalid_response(e: serde_json::Error) -> BackendError {
    error!("Invalid search history response: {}", e);
    BackendError::Network(format!("Invalid search history response: {}", e))
}

#[async_trait]
impl HistoryBackend for RemoteHistoryBackend {
    fn mode(&self) -> HistoryMode {
        HistoryMode::Remote
    }

    async fn load(&self) -> Result<Vec<HistoryEntry>, BackendError> {
        let body = self.client.get_json(HISTORY_PATH).await?;
        let rows = parse_history_list(body).map_err(invalid_response)?;
        debug!("Loaded {} history rows from service", rows.len());
        Ok(rows.into_iter().map(HistoryEntry::from).collect())
    }

    async fn create(&self, ip: &str, geo: &GeoRecord) -> Result<HistoryEntry, BackendError> {
        let body = CreateHistoryDto::new(ip, geo);
        let response = self.client.post_json(HISTORY_PATH, &body).await?;
        let row = parse_history_row(response).map_err(invalid_response)?;
        Ok(row.into())
    }

    async fn delete(&self, id: &HistoryId) -> Result<(), BackendError> {
        let id = Self::server_id(id)?;
        self.client
            .delete(&format!("{}/{}", HISTORY_PATH, id))
            .await?;
        Ok(())
    }

    async fn delete_many(&self, ids: &[HistoryId]) -> Result<(), BackendError> {
        let ids = ids
            .iter()
            .map(Self::server_id)
            .collect::<Result<Vec<_>, _>>()?;
        self.client
            .post_json(
                &format!("{}/bulk-delete", HISTORY_PATH),
                &BulkDeleteDto { ids: &ids },
            )
            .await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), BackendError> {
        self.client
            .delete(&format!("{}/clear-all", HISTORY_PATH))
            .await?;
        Ok(())
    }
}
