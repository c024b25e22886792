// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::dto::login_request::{LoginRequestDto, LoginResponseDto, UserDto};
use crate::domain::repositories::storage_repository::StorageError;
use crate::infrastructure::api_client::{ApiClient, ApiError};
use crate::utils::errors::{Classify, ErrorKind};
use serde_json::Value;
use thiserror::Error;
use tracing::{error, info, warn};
use validator::{Validate, ValidationErrors};

/// 认证错误类型
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Login failed: {0}")]
    Api(ApiError),
    #[error("Failed to store auth token: {0}")]
    Storage(#[from] StorageError),
}

impl Classify for AuthError {
    fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Validation(_) | AuthError::InvalidCredentials => ErrorKind::Validation,
            AuthError::Api(e) => e.kind(),
            AuthError::Storage(_) => ErrorKind::Storage,
        }
    }
}

/// 取第一个字段校验错误的提示信息
fn first_message(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Please fill in all fields".to_string())
}

/// 登录/登出接口
#[derive(Clone)]
pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// 登录并保存令牌
    ///
    /// 字段校验在发起网络请求之前完成
    pub async fn login(&self, credentials: &LoginRequestDto) -> Result<Option<UserDto>, AuthError> {
        credentials
            .validate()
            .map_err(|e| AuthError::Validation(first_message(&e)))?;

        let body = match self.client.post_json("/login", credentials).await {
            Ok(body) => body,
            Err(ApiError::Unauthorized) | Err(ApiError::Status { status: 422, .. }) => {
                return Err(AuthError::InvalidCredentials)
            }
            Err(e) => {
                error!("Login error: {}", e);
                return Err(AuthError::Api(e));
            }
        };

        let response = Self::parse_login(body).ok_or_else(|| {
            AuthError::Api(ApiError::Decode("login response has no token".to_string()))
        })?;

        self.client.auth().set_token(&response.token).await?;
        info!("Signed in as {}", credentials.email);
        Ok(response.user)
    }

    /// 登出：通知服务端（失败只记录日志），然后清除本地令牌
    pub async fn logout(&self) -> Result<(), AuthError> {
        if let Err(e) = self.client.post_empty("/logout").await {
            warn!("Logout error: {}", e);
        }
        self.client.auth().clear().await?;
        info!("Signed out");
        Ok(())
    }

    fn parse_login(body: Value) -> Option<LoginResponseDto> {
        let candidate = match body.get("data") {
            Some(data) if data.get("token").is_some() => data.clone(),
            _ => body,
        };
        serde_json::from_value(candidate).ok()
    }
}
