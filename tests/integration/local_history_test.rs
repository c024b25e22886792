// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 本地历史集成测试
///
/// 使用文件系统存储，验证历史在进程之间保留

#[cfg(test)]
mod tests {
    use geotrace::application::context::AppContext;
    use geotrace::config::settings::{HistoryBackendKind, Settings};
    use geotrace::domain::geo::GeoProvider;
    use geotrace::domain::models::GeoRecord;
    use geotrace::infrastructure::geolocation::GeoLocationService;
    use geotrace::infrastructure::storage::LocalStorage;
    use std::path::Path;
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;

    fn context(dir: &Path, capacity: usize) -> AppContext {
        let mut settings = Settings::defaults().unwrap();
        settings.history.backend = HistoryBackendKind::Local;
        settings.history.capacity = capacity;
        settings.storage.local_path = dir.to_string_lossy().into_owned();

        let provider: Arc<dyn GeoProvider> = Arc::new(
            GeoLocationService::with_endpoint("http://127.0.0.1:9".to_string(), Duration::from_secs(1))
                .unwrap(),
        );
        AppContext::assemble(settings, Arc::new(LocalStorage::new(dir)), provider).unwrap()
    }

    #[tokio::test]
    async fn test_history_survives_restart() {
        let dir = TempDir::new().unwrap();

        let first = context(dir.path(), 20);
        first.require_session().await.unwrap();
        first
            .history
            .record("1.1.1.1", &GeoRecord::new("1.1.1.1"))
            .await
            .unwrap();
        first
            .history
            .record("8.8.8.8", &GeoRecord::new("8.8.8.8"))
            .await
            .unwrap();
        first.history.select_all();

        let second = context(dir.path(), 20);
        second.history.load().await.unwrap();
        let ips: Vec<String> = second.history.list().into_iter().map(|e| e.ip).collect();
        assert_eq!(ips, vec!["8.8.8.8", "1.1.1.1"]);
        // Selection is never persisted.
        assert_eq!(second.history.selected_count(), 0);
    }

    #[tokio::test]
    async fn test_configured_capacity_is_enforced() {
        let dir = TempDir::new().unwrap();
        let ctx = context(dir.path(), 3);

        for i in 1..=5 {
            let ip = format!("192.0.2.{}", i);
            ctx.history.record(&ip, &GeoRecord::new(&ip)).await.unwrap();
        }

        let ips: Vec<String> = ctx.history.list().into_iter().map(|e| e.ip).collect();
        assert_eq!(ips, vec!["192.0.2.5", "192.0.2.4", "192.0.2.3"]);
    }

    #[tokio::test]
    async fn test_clear_removes_persisted_history() {
        let dir = TempDir::new().unwrap();
        let ctx = context(dir.path(), 20);
        ctx.history
            .record("9.9.9.9", &GeoRecord::new("9.9.9.9"))
            .await
            .unwrap();

        ctx.history.clear_all().await.unwrap();

        let reopened = context(dir.path(), 20);
        reopened.history.load().await.unwrap();
        assert!(reopened.history.is_empty());
    }
}
