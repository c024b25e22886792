// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use geotrace::application::context::AppContext;
use geotrace::config::settings::{HistoryBackendKind, Settings};
use geotrace::infrastructure::geolocation::GeoLocationService;
use geotrace::infrastructure::storage::InMemoryStorage;
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// 历史服务挂载在 `/api/v1` 下
pub const API_PREFIX: &str = "/api/v1";
/// 地理定位服务挂载在 `/ipinfo` 下
pub const GEO_PREFIX: &str = "/ipinfo";

#[allow(dead_code)]
pub struct TestApp {
    pub server: MockServer,
    pub storage: InMemoryStorage,
    pub ctx: AppContext,
}

impl TestApp {
    /// 以指定后端启动，地理定位服务与历史服务共用一个 mock server
    pub async fn spawn(backend: HistoryBackendKind) -> Self {
        let server = MockServer::start().await;
        let storage = InMemoryStorage::new();

        let mut settings = Settings::defaults().expect("default settings");
        settings.api.base_url = format!("{}{}", server.uri(), API_PREFIX);
        settings.api.timeout_secs = 2;
        settings.geo.base_url = format!("{}{}", server.uri(), GEO_PREFIX);
        settings.geo.timeout_secs = 2;
        settings.history.backend = backend;

        let provider = Arc::new(GeoLocationService::new(&settings.geo).expect("geo client"));
        let ctx = AppContext::assemble(settings, Arc::new(storage.clone()), provider)
            .expect("context");

        Self {
            server,
            storage,
            ctx,
        }
    }

    /// 启动并写入登录令牌
    pub async fn signed_in(backend: HistoryBackendKind) -> Self {
        let app = Self::spawn(backend).await;
        app.ctx.auth.set_token("test-token").await.expect("token");
        app
    }

    pub fn api_path(&self, suffix: &str) -> String {
        format!("{}{}", API_PREFIX, suffix)
    }

    /// 注册一个IP查询响应
    pub async fn mock_lookup(&self, ip: &str, city: &str, country: &str) {
        Mock::given(method("GET"))
            .and(path(format!("{}/{}/geo", GEO_PREFIX, ip)))
            .respond_with(ResponseTemplate::new(200).set_body_json(geo_body(ip, city, country)))
            .mount(&self.server)
            .await;
    }

    /// 注册调用方自身位置的响应
    pub async fn mock_self(&self, ip: &str, city: &str, country: &str) {
        Mock::given(method("GET"))
            .and(path(format!("{}/geo", GEO_PREFIX)))
            .respond_with(ResponseTemplate::new(200).set_body_json(geo_body(ip, city, country)))
            .mount(&self.server)
            .await;
    }
}

pub fn geo_body(ip: &str, city: &str, country: &str) -> Value {
    json!({
        "ip": ip,
        "city": city,
        "region": "Region",
        "country": country,
        "loc": "37.4056,-122.0775",
        "org": "AS15169 Example",
        "postal": "94043",
        "timezone": "UTC"
    })
}

/// 搜索历史服务返回的一行
pub fn history_row(id: i64, ip: &str, city: &str, country: &str) -> Value {
    json!({
        "id": id,
        "user_id": 1,
        "ip_address": ip,
        "city": city,
        "region": null,
        "country": country,
        "loc": "1.5,2.5",
        "postal": null,
        "timezone": "UTC",
        "org": null,
        "raw_data": {"ip": ip},
        "created_at": format!("2025-01-0{} 10:00:00", id.clamp(1, 9)),
        "updated_at": "2025-01-01 10:00:00"
    })
}
