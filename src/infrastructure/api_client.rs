// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::ApiSettings;
use crate::domain::repositories::storage_repository::StorageError;
use crate::domain::services::auth_store::AuthStore;
use crate::utils::errors::{Classify, ErrorKind};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use url::Url;

/// API客户端错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    /// 基础URL无效
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),
    /// 网络错误（无响应、超时）
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// 401，令牌已被清除
    #[error("Authentication expired")]
    Unauthorized,
    /// 403
    #[error("Access forbidden")]
    Forbidden,
    /// 404
    #[error("Not found: {0}")]
    NotFound(String),
    /// 其它非成功状态码
    #[error("API returned {status}: {message}")]
    Status { status: u16, message: String },
    /// 响应体无法解析
    #[error("Invalid API response: {0}")]
    Decode(String),
    /// 读取令牌失败
    #[error("Failed to read auth token: {0}")]
    Token(#[from] StorageError),
}

impl Classify for ApiError {
    fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Unauthorized => ErrorKind::AuthExpired,
            ApiError::NotFound(_) => ErrorKind::NotFound,
            ApiError::Token(_) => ErrorKind::Storage,
            ApiError::InvalidBaseUrl(_) => ErrorKind::Validation,
            ApiError::Network(_)
            | ApiError::Forbidden
            | ApiError::Status { .. }
            | ApiError::Decode(_) => ErrorKind::Network,
        }
    }
}

/// 认证API客户端
///
/// 所有请求都带上JSON头和（如果存在）`Authorization: Bearer` 令牌。
/// 任何请求收到 401 时清除本地令牌，相当于全局登出。
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
    auth: AuthStore,
}

impl ApiClient {
    /// 创建API客户端
    ///
    /// # 参数
    ///
    /// * `settings` - API配置（基础URL与超时）
    /// * `auth` - 令牌存储句柄
    pub fn new(settings: &ApiSettings, auth: AuthStore) -> Result<Self, ApiError> {
        Url::parse(&settings.base_url)
            .map_err(|e| ApiError::InvalidBaseUrl(format!("{}: {}", settings.base_url, e)))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(settings.timeout())
            .default_headers(headers)
            .user_agent(concat!("geotrace/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            client,
            auth,
        })
    }

    /// 令牌存储句柄
    pub fn auth(&self) -> &AuthStore {
        &self.auth
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// GET 请求，返回原始JSON
    pub async fn get_json(&self, path: &str) -> Result<serde_json::Value, ApiError> {
        let response = self.send(self.client.get(self.url(path))).await?;
        Self::read_json(response).await
    }

    /// POST 请求，返回原始JSON（空响应体视为 `null`）
    pub async fn post_json<B>(&self, path: &str, body: &B) -> Result<serde_json::Value, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let response = self
            .send(self.client.post(self.url(path)).json(body))
            .await?;
        Self::read_json(response).await
    }

    /// POST 请求，不需要请求体
    pub async fn post_empty(&self, path: &str) -> Result<(), ApiError> {
        self.send(self.client.post(self.url(path))).await?;
        Ok(())
    }

    /// DELETE 请求
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(self.client.delete(self.url(path))).await?;
        Ok(())
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let request = match self.auth.get_token().await? {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await.map_err(|e| {
            error!("Network error - no response received: {}", e);
            ApiError::Network(e)
        })?;

        let status = response.status();
        let url = response.url().to_string();
        debug!("{} <- {}", status, url);

        if status.is_success() {
            return Ok(response);
        }

        match status {
            StatusCode::UNAUTHORIZED => {
                info!("Received 401 from {}, signing out", url);
                if let Err(e) = self.auth.clear().await {
                    error!("Failed to clear auth token after 401: {}", e);
                }
                Err(ApiError::Unauthorized)
            }
            StatusCode::FORBIDDEN => {
                warn!("Access forbidden: {}", url);
                Err(ApiError::Forbidden)
            }
            StatusCode::NOT_FOUND => Err(ApiError::NotFound(url)),
            s => {
                if s.is_server_error() {
                    error!("Server error {} from {}", s, url);
                }
                let message = Self::error_message(response).await;
                Err(ApiError::Status {
                    status: s.as_u16(),
                    message,
                })
            }
        }
    }

    async fn read_json(response: Response) -> Result<serde_json::Value, ApiError> {
        let bytes = response.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(serde_json::Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// 从错误响应中提取 `message` / `error` 字段
    async fn error_message(response: Response) -> String {
        let text = response.text().await.unwrap_or_default();
        serde_json::from_str::<serde_json::Value>(&text)
            .ok()
            .and_then(|v| {
                v.get("message")
                    .or_else(|| v.get("error"))
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            })
            .unwrap_or(text)
    }
}
