// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::dto::geo_response::GeoInfoDto;
use crate::config::settings::GeoSettings;
use crate::domain::geo::{GeoProvider, LookupError};
use crate::domain::models::GeoRecord;
use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{debug, error};

/// IP地理定位服务
///
/// 对接 ipinfo 风格的接口：`GET {base}/geo` 查询调用方自身，
/// `GET {base}/{ip}/geo` 查询指定IP。该服务不需要认证。
pub struct GeoLocationService {
    /// API端点
    api_endpoint: String,
    /// HTTP客户端
    client: reqwest::Client,
}

impl GeoLocationService {
    /// 根据配置创建服务实例
    pub fn new(settings: &GeoSettings) -> Result<Self, reqwest::Error> {
        Self::with_endpoint(settings.base_url.clone(), settings.timeout())
    }

    /// 使用自定义API端点创建服务实例
    pub fn with_endpoint(
        api_endpoint: String,
        timeout: std::time::Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("geotrace/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            api_endpoint: api_endpoint.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// 请求地理位置并解析响应
    ///
    /// # 参数
    ///
    /// * `url` - 完整请求URL
    /// * `subject` - 查询对象，用于日志和回填缺失的IP
    async fn fetch(&self, url: &str, subject: &str) -> Result<GeoRecord, LookupError> {
        debug!("Getting geolocation for {}", subject);

        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                error!("Failed to fetch geolocation for {}: {}", subject, e);
                if e.is_timeout() {
                    LookupError::Timeout
                } else {
                    LookupError::Network(e.to_string())
                }
            })?;

        // 检查响应状态
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(LookupError::NotFound(subject.to_string()));
        }
        if !status.is_success() {
            error!(
                "Geolocation API returned error status: {} for {}",
                status, subject
            );
            return Err(LookupError::Network(format!(
                "Geolocation API error: {}",
                status
            )));
        }

        // 解析响应
        let body: serde_json::Value = response.json().await.map_err(|e| {
            error!("Failed to parse geolocation response for {}: {}", subject, e);
            LookupError::Network(format!("Failed to parse geolocation response: {}", e))
        })?;

        if body.get("error").is_some_and(|e| !e.is_null()) {
            return Err(LookupError::NotFound(subject.to_string()));
        }

        let dto: GeoInfoDto = serde_json::from_value(body)
            .map_err(|e| LookupError::Network(format!("Unexpected geolocation payload: {}", e)))?;
        let record = dto.into_record(subject);

        debug!(
            "Successfully retrieved geolocation for {}: {:?}",
            subject, record
        );
        Ok(record)
    }
}

#[async_trait]
impl GeoProvider for GeoLocationService {
    async fn fetch_self(&self) -> Result<GeoRecord, LookupError> {
        let url = format!("{}/geo", self.api_endpoint);
        self.fetch(&url, "self").await
    }

    async fn fetch_by_ip(&self, ip: &str) -> Result<GeoRecord, LookupError> {
        let url = format!("{}/{}/geo", self.api_endpoint, ip);
        self.fetch(&url, ip).await
    }

    fn name(&self) -> &'static str {
        "ipinfo"
    }
}
