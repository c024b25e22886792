// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::{
    config::settings::{HistoryBackendKind, Settings},
    domain::{
        geo::GeoProvider,
        repositories::{
            history_backend::{HistoryBackend, HistoryMode},
            storage_repository::{StorageError, StorageRepository},
        },
        services::{
            auth_store::AuthStore, history_service::HistoryStore,
            search_controller::SearchController,
        },
    },
    infrastructure::{
        api_client::{ApiClient, ApiError},
        auth_api::AuthApi,
        geolocation::GeoLocationService,
        repositories::{LocalHistoryBackend, RemoteHistoryBackend},
        storage::create_storage_repository,
    },
};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ContextError {
    #[error("Invalid API configuration: {0}")]
    Api(#[from] ApiError),
    #[error("Failed to build geolocation client: {0}")]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("Not signed in")]
    NotSignedIn,
}

/// 应用上下文
///
/// 根据配置组装所有组件：令牌存储、API客户端、历史后端、
/// 历史存储以及查询控制器。同一进程内只构建一次。
pub struct AppContext {
    pub settings: Settings,
    pub auth: AuthStore,
    pub auth_api: AuthApi,
    pub history: Arc<HistoryStore>,
    pub search: Arc<SearchController>,
}

impl AppContext {
    /// 使用配置中的本地存储目录构建上下文
    pub fn build(settings: Settings) -> Result<Self, ContextError> {
        let storage = create_storage_repository(&settings.storage);
        let provider = Arc::new(GeoLocationService::new(&settings.geo)?);
        Self::assemble(settings, storage, provider)
    }

    /// 使用指定的存储和查询服务构建上下文
    pub fn assemble(
        settings: Settings,
        storage: Arc<dyn StorageRepository>,
        provider: Arc<dyn GeoProvider>,
    ) -> Result<Self, ContextError> {
        let auth = AuthStore::new(storage.clone());
        let api = ApiClient::new(&settings.api, auth.clone())?;

        let backend: Arc<dyn HistoryBackend> = match settings.history.backend {
            HistoryBackendKind::Remote => Arc::new(RemoteHistoryBackend::new(api.clone())),
            HistoryBackendKind::Local => Arc::new(LocalHistoryBackend::new(
                storage,
                settings.history.capacity,
            )),
        };
        info!(
            "History backend: {}, geolocation provider: {}",
            backend.mode(),
            provider.name()
        );

        let history = Arc::new(HistoryStore::new(backend));
        let search = Arc::new(SearchController::new(provider, history.clone()));

        Ok(Self {
            settings,
            auth,
            auth_api: AuthApi::new(api),
            history,
            search,
        })
    }

    pub fn history_mode(&self) -> HistoryMode {
        self.history.mode()
    }

    /// 远程模式下要求已登录；本地模式不需要令牌
    pub async fn require_session(&self) -> Result<(), ContextError> {
        if self.history_mode() == HistoryMode::Local {
            return Ok(());
        }
        if self.auth.is_authenticated().await? {
            Ok(())
        } else {
            Err(ContextError::NotSignedIn)
        }
    }
}
