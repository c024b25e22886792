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

use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// 应用程序配置设置
///
/// 包含认证API、地理定位服务、搜索历史和本地存储等所有配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 认证API配置（登录、搜索历史服务）
    pub api: ApiSettings,
    /// 地理定位服务配置
    pub geo: GeoSettings,
    /// 搜索历史配置
    pub history: HistorySettings,
    /// 本地存储配置
    pub storage: StorageSettings,
}

/// 认证API配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSettings {
    /// API基础URL
    pub base_url: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// 地理定位服务配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct GeoSettings {
    /// 服务基础URL
    pub base_url: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl GeoSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// 历史后端类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryBackendKind {
    /// 远程搜索历史服务
    Remote,
    /// 本地存储
    Local,
}

/// 搜索历史配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct HistorySettings {
    /// 历史后端 (remote, local)
    pub backend: HistoryBackendKind,
    /// 本地模式下保留的最大条目数
    pub capacity: usize,
}

/// 存储配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// 本地存储目录
    pub local_path: String,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次加载默认值、`config/default`、`config/{APP_ENVIRONMENT}`
    /// 以及 `GEOTRACE__` 前缀的环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        Self::with_defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("GEOTRACE").separator("__"))
            .build()?
            .try_deserialize()
    }

    /// 只包含默认值的配置，不读取文件和环境变量
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::with_defaults()?.build()?.try_deserialize()
    }

    fn with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            // Default API settings
            .set_default("api.base_url", "http://localhost:8000/api/v1")?
            .set_default("api.timeout_secs", 10)?
            // Default geolocation provider
            .set_default("geo.base_url", "https://ipinfo.io")?
            .set_default("geo.timeout_secs", 10)?
            // Default history settings
            .set_default("history.backend", "remote")?
            .set_default("history.capacity", 20)?
            // Default Storage settings
            .set_default("storage.local_path", "./.geotrace")
    }
}
