// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置设置测试模块
///
/// 测试配置文件与环境变量的分层加载

#[cfg(test)]
mod tests {
    use geotrace::config::settings::{HistoryBackendKind, Settings};

    #[test]
    fn test_environment_overrides_config_file() {
        std::env::set_var("GEOTRACE__HISTORY__BACKEND", "local");
        std::env::set_var("GEOTRACE__HISTORY__CAPACITY", "5");
        std::env::set_var("GEOTRACE__GEO__BASE_URL", "http://127.0.0.1:1/geo");

        let settings = Settings::new();

        std::env::remove_var("GEOTRACE__HISTORY__BACKEND");
        std::env::remove_var("GEOTRACE__HISTORY__CAPACITY");
        std::env::remove_var("GEOTRACE__GEO__BASE_URL");

        let settings = settings.unwrap();
        assert_eq!(settings.history.backend, HistoryBackendKind::Local);
        assert_eq!(settings.history.capacity, 5);
        assert_eq!(settings.geo.base_url, "http://127.0.0.1:1/geo");
        // Values from config/default.toml
        assert_eq!(settings.api.base_url, "http://localhost:8000/api/v1");
        assert_eq!(settings.api.timeout_secs, 10);
    }
}
