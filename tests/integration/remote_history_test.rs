// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 远程历史集成测试
///
/// 通过 mock 的搜索历史服务验证历史存储的增删和对账行为

#[cfg(test)]
mod tests {
    use crate::integration::helpers::{history_row, TestApp};
    use geotrace::config::settings::HistoryBackendKind;
    use geotrace::domain::models::{GeoRecord, HistoryId};
    use geotrace::domain::repositories::history_backend::HistoryMode;
    use geotrace::utils::errors::{Classify, ErrorKind};
    use serde_json::json;
    use wiremock::matchers::{body_json, body_partial_json, header, method, path};
    use wiremock::{Mock, ResponseTemplate};

    fn ips(app: &TestApp) -> Vec<String> {
        app.ctx.history.list().into_iter().map(|e| e.ip).collect()
    }

    #[tokio::test]
    async fn test_load_accepts_wrapped_list() {
        let app = TestApp::signed_in(HistoryBackendKind::Remote).await;
        Mock::given(method("GET"))
            .and(path(app.api_path("/search-history")))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": [
                    history_row(2, "8.8.8.8", "Mountain View", "US"),
                    history_row(1, "1.1.1.1", "Brisbane", "AU")
                ]
            })))
            .expect(1)
            .mount(&app.server)
            .await;

        app.ctx.history.load().await.unwrap();

        assert_eq!(app.ctx.history_mode(), HistoryMode::Remote);
        assert_eq!(ips(&app), vec!["8.8.8.8", "1.1.1.1"]);
        let first = &app.ctx.history.list()[0];
        assert_eq!(first.id, HistoryId::Server(2));
        assert_eq!(first.geo.city.as_deref(), Some("Mountain View"));
        assert!(first.geo.coordinates.is_some());
    }

    #[tokio::test]
    async fn test_record_posts_and_reloads() {
        let app = TestApp::signed_in(HistoryBackendKind::Remote).await;
        Mock::given(method("POST"))
            .and(path(app.api_path("/search-history")))
            .and(body_partial_json(json!({
                "ip_address": "8.8.8.8",
                "city": "Mountain View",
                "raw_data": {"ip": "8.8.8.8", "city": "Mountain View"}
            })))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(json!({"data": history_row(5, "8.8.8.8", "Mountain View", "US")})),
            )
            .expect(1)
            .mount(&app.server)
            .await;
        Mock::given(method("GET"))
            .and(path(app.api_path("/search-history")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                history_row(5, "8.8.8.8", "Mountain View", "US"),
                history_row(4, "8.8.8.8", "Mountain View", "US")
            ])))
            .mount(&app.server)
            .await;

        let mut geo = GeoRecord::new("8.8.8.8");
        geo.city = Some("Mountain View".to_string());
        let created = app.ctx.history.record("8.8.8.8", &geo).await.unwrap();

        assert_eq!(created.id, HistoryId::Server(5));
        // The server owns dedupe; whatever it returns is the history.
        assert_eq!(ips(&app), vec!["8.8.8.8", "8.8.8.8"]);
    }

    #[tokio::test]
    async fn test_delete_one_and_clear() {
        let app = TestApp::signed_in(HistoryBackendKind::Remote).await;
        Mock::given(method("GET"))
            .and(path(app.api_path("/search-history")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                history_row(2, "8.8.8.8", "Mountain View", "US"),
                history_row(1, "1.1.1.1", "Brisbane", "AU")
            ])))
            .mount(&app.server)
            .await;
        Mock::given(method("DELETE"))
            .and(path(app.api_path("/search-history/2")))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&app.server)
            .await;
        Mock::given(method("DELETE"))
            .and(path(app.api_path("/search-history/clear-all")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .expect(1)
            .mount(&app.server)
            .await;

        app.ctx.history.load().await.unwrap();
        assert!(app.ctx.history.delete_one(&HistoryId::Server(2)).await.unwrap());
        assert_eq!(ips(&app), vec!["1.1.1.1"]);

        app.ctx.history.clear_all().await.unwrap();
        assert!(app.ctx.history.is_empty());
    }

    #[tokio::test]
    async fn test_bulk_delete_reconciles_with_server() {
        let app = TestApp::signed_in(HistoryBackendKind::Remote).await;
        Mock::given(method("GET"))
            .and(path(app.api_path("/search-history")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                history_row(3, "3.3.3.3", "Paris", "FR"),
                history_row(2, "2.2.2.2", "Berlin", "DE"),
                history_row(1, "1.1.1.1", "Brisbane", "AU")
            ])))
            .up_to_n_times(1)
            .mount(&app.server)
            .await;
        Mock::given(method("POST"))
            .and(path(app.api_path("/search-history/bulk-delete")))
            .and(body_json(json!({"ids": [3, 1]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"deleted": 2})))
            .expect(1)
            .mount(&app.server)
            .await;
        Mock::given(method("GET"))
            .and(path(app.api_path("/search-history")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([history_row(2, "2.2.2.2", "Berlin", "DE")])),
            )
            .mount(&app.server)
            .await;

        app.ctx.history.load().await.unwrap();
        app.ctx.history.toggle_selected(&HistoryId::Server(1));
        app.ctx.history.toggle_selected(&HistoryId::Server(3));
        assert_eq!(app.ctx.history.selected_count(), 2);

        let removed = app.ctx.history.delete_selected().await.unwrap();
        assert_eq!(removed, 2);
        assert_eq!(ips(&app), vec!["2.2.2.2"]);
        assert_eq!(app.ctx.history.selected_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_history() {
        let app = TestApp::signed_in(HistoryBackendKind::Remote).await;
        Mock::given(method("GET"))
            .and(path(app.api_path("/search-history")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([history_row(1, "1.1.1.1", "Brisbane", "AU")])),
            )
            .mount(&app.server)
            .await;
        Mock::given(method("DELETE"))
            .and(path(app.api_path("/search-history/1")))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "db down"})))
            .mount(&app.server)
            .await;

        app.ctx.history.load().await.unwrap();
        let err = app
            .ctx
            .history
            .delete_one(&HistoryId::Server(1))
            .await
            .unwrap_err();

        assert_eq!(err.user_message(), "Failed to delete history item.");
        assert_eq!(err.kind(), ErrorKind::Network);
        assert_eq!(ips(&app), vec!["1.1.1.1"]);
    }

    #[tokio::test]
    async fn test_expired_token_signs_out() {
        let app = TestApp::signed_in(HistoryBackendKind::Remote).await;
        Mock::given(method("GET"))
            .and(path(app.api_path("/search-history")))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "expired"})))
            .mount(&app.server)
            .await;

        let err = app.ctx.history.load().await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::AuthExpired);
        assert!(err.kind().requires_sign_out());
        assert!(!app.ctx.auth.is_authenticated().await.unwrap());
        assert!(app.ctx.require_session().await.is_err());
    }
}
