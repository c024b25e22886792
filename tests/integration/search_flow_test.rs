// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 查询流程集成测试
///
/// 查询控制器 + 地理定位服务 + 历史存储的端到端行为

#[cfg(test)]
mod tests {
    use crate::integration::helpers::{geo_body, history_row, TestApp, GEO_PREFIX};
    use geotrace::config::settings::HistoryBackendKind;
    use geotrace::domain::repositories::storage_repository::StorageRepository;
    use geotrace::domain::services::search_controller::{SearchOutcome, SearchPhase};
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, ResponseTemplate};

    #[tokio::test]
    async fn test_lookup_records_local_history() {
        let app = TestApp::spawn(HistoryBackendKind::Local).await;
        app.mock_lookup("8.8.8.8", "Mountain View", "US").await;

        let outcome = app.ctx.search.submit(" 8.8.8.8 ").await;

        match outcome {
            SearchOutcome::Success {
                record,
                history_error,
            } => {
                assert_eq!(record.city.as_deref(), Some("Mountain View"));
                assert!(history_error.is_none());
            }
            other => panic!("unexpected outcome: {:?}", other),
        }

        let view = app.ctx.search.view();
        assert_eq!(view.input, "8.8.8.8");
        assert_eq!(view.error, None);

        let history = app.ctx.history.list();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].ip, "8.8.8.8");

        let raw = app.storage.get("geo_history").await.unwrap().unwrap();
        let stored: serde_json::Value = serde_json::from_slice(&raw).unwrap();
        assert_eq!(stored[0]["ip"], "8.8.8.8");
    }

    #[tokio::test]
    async fn test_slow_earlier_lookup_is_discarded() {
        let app = TestApp::spawn(HistoryBackendKind::Local).await;
        Mock::given(method("GET"))
            .and(path(format!("{}/1.1.1.1/geo", GEO_PREFIX)))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(geo_body("1.1.1.1", "Brisbane", "AU"))
                    .set_delay(Duration::from_millis(400)),
            )
            .mount(&app.server)
            .await;
        app.mock_lookup("8.8.8.8", "Mountain View", "US").await;

        let search = &app.ctx.search;
        let (first, second) = tokio::join!(search.submit("1.1.1.1"), async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            search.submit("8.8.8.8").await
        });

        assert!(matches!(first, SearchOutcome::Superseded));
        assert!(matches!(second, SearchOutcome::Success { .. }));
        assert_eq!(
            search.view().current.map(|r| r.ip).as_deref(),
            Some("8.8.8.8")
        );
        let history: Vec<String> = app.ctx.history.list().into_iter().map(|e| e.ip).collect();
        assert_eq!(history, vec!["8.8.8.8"]);
    }

    #[tokio::test]
    async fn test_unknown_ip_keeps_previous_result() {
        let app = TestApp::spawn(HistoryBackendKind::Local).await;
        app.mock_lookup("8.8.8.8", "Mountain View", "US").await;
        Mock::given(method("GET"))
            .and(path(format!("{}/10.255.255.1/geo", GEO_PREFIX)))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "not found"})))
            .mount(&app.server)
            .await;

        app.ctx.search.submit("8.8.8.8").await;
        let outcome = app.ctx.search.submit("10.255.255.1").await;

        assert!(matches!(outcome, SearchOutcome::Failed(_)));
        let view = app.ctx.search.view();
        assert_eq!(view.phase, SearchPhase::Idle);
        assert_eq!(
            view.error.as_deref(),
            Some("Failed to fetch geolocation data for this IP")
        );
        assert_eq!(view.current.map(|r| r.ip).as_deref(), Some("8.8.8.8"));
        assert_eq!(app.ctx.history.len(), 1);
    }

    #[tokio::test]
    async fn test_history_failure_is_surfaced_after_successful_lookup() {
        let app = TestApp::signed_in(HistoryBackendKind::Remote).await;
        app.mock_lookup("8.8.8.8", "Mountain View", "US").await;
        Mock::given(method("POST"))
            .and(path(app.api_path("/search-history")))
            .respond_with(ResponseTemplate::new(500))
            .mount(&app.server)
            .await;

        let outcome = app.ctx.search.submit("8.8.8.8").await;

        match outcome {
            SearchOutcome::Success { history_error, .. } => {
                let err = history_error.expect("history failure should be reported");
                assert_eq!(err.user_message(), "Failed to save search history.");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        let view = app.ctx.search.view();
        assert_eq!(view.current.map(|r| r.ip).as_deref(), Some("8.8.8.8"));
        assert_eq!(view.error.as_deref(), Some("Failed to save search history."));
        assert!(app.ctx.history.is_empty());
    }

    #[tokio::test]
    async fn test_clear_returns_to_own_location() {
        let app = TestApp::signed_in(HistoryBackendKind::Remote).await;
        app.mock_self("203.0.113.7", "Home", "NZ").await;
        app.mock_lookup("8.8.8.8", "Mountain View", "US").await;
        Mock::given(method("POST"))
            .and(path(app.api_path("/search-history")))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(history_row(1, "8.8.8.8", "Mountain View", "US")),
            )
            .mount(&app.server)
            .await;
        Mock::given(method("GET"))
            .and(path(app.api_path("/search-history")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([history_row(1, "8.8.8.8", "Mountain View", "US")])),
            )
            .mount(&app.server)
            .await;

        let own = app.ctx.search.init_session().await.unwrap();
        assert_eq!(own.ip, "203.0.113.7");

        app.ctx.search.submit("8.8.8.8").await;
        assert_eq!(app.ctx.history.len(), 1);

        app.ctx.search.clear();
        let view = app.ctx.search.view();
        assert_eq!(view.current, Some(own));
        assert!(view.input.is_empty());
        assert_eq!(view.phase, SearchPhase::Idle);
    }

    #[tokio::test]
    async fn test_subscribers_observe_loading_state() {
        let app = TestApp::spawn(HistoryBackendKind::Local).await;
        Mock::given(method("GET"))
            .and(path(format!("{}/9.9.9.9/geo", GEO_PREFIX)))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(geo_body("9.9.9.9", "Zurich", "CH"))
                    .set_delay(Duration::from_millis(100)),
            )
            .mount(&app.server)
            .await;

        let mut updates = app.ctx.search.subscribe();
        let search = &app.ctx.search;
        let (_, saw_loading) = tokio::join!(search.submit("9.9.9.9"), async {
            loop {
                if updates.changed().await.is_err() {
                    return false;
                }
                if updates.borrow_and_update().loading {
                    return true;
                }
            }
        });

        assert!(saw_loading);
        assert!(!search.view().loading);
    }
}
