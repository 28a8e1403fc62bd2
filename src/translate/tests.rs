//! Tests for translate module

#[cfg(test)]
mod tests {
    use crate::common::test_support::{authed_user, insert_sign, insert_user, test_state};
    use crate::common::ApiError;
    use crate::translate::handlers;
    use crate::translate::models::{TextToSignRequest, WsClientEvent, WsServerEvent};
    use crate::translate::translation::{text_to_sign, tokenize_words};
    use crate::translate::validators::validate_audio_upload;
    use axum::extract::{Extension, Json, Query};

    #[test]
    fn tokenizer_strips_punctuation_and_lowercases() {
        assert_eq!(tokenize_words("Hello, World!"), vec!["hello", "world"]);
        assert_eq!(tokenize_words("  THANK   you.  "), vec!["thank", "you"]);
        assert_eq!(tokenize_words("it's"), vec!["its"]);
        assert_eq!(tokenize_words("!!! ???"), Vec::<String>::new());
        assert_eq!(tokenize_words(""), Vec::<String>::new());
    }

    #[test]
    fn ws_events_use_tagged_wire_names() {
        let start: WsClientEvent =
            serde_json::from_str(r#"{"type":"transcribe:start"}"#).unwrap();
        assert!(matches!(start, WsClientEvent::Start));

        let stop: WsClientEvent = serde_json::from_str(r#"{"type":"transcribe:stop"}"#).unwrap();
        assert!(matches!(stop, WsClientEvent::Stop));

        let result = serde_json::to_value(WsServerEvent::Result {
            text: "hello".to_string(),
        })
        .unwrap();
        assert_eq!(result["type"], "transcribe:result");
        assert_eq!(result["text"], "hello");

        let ready = serde_json::to_value(WsServerEvent::Ready).unwrap();
        assert_eq!(ready["type"], "transcribe:ready");
    }

    #[test]
    fn audio_validation_rejects_bad_mime_and_oversize() {
        assert!(validate_audio_upload("audio/webm", 1024).is_ok());
        assert!(validate_audio_upload("audio/x-m4a", 1024).is_ok());

        let err = validate_audio_upload("video/mp4", 1024).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(msg) if msg.starts_with("Invalid file type")));

        let err = validate_audio_upload("audio/webm", 26 * 1024 * 1024).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(msg) if msg.contains("25MB")));
    }

    #[tokio::test]
    async fn text_to_sign_matches_known_words_only() {
        let state_lock = test_state().await;
        let pool = {
            let state = state_lock.read().await;
            state.db.clone()
        };

        insert_sign(&pool, "sign_hello", "hello", "ASL", "2024-01-01T00:00:00Z").await;

        let result = text_to_sign(&pool, "Hello, World!", "ASL").await.unwrap();
        assert_eq!(result["text"], "Hello, World!");

        let signs = result["signs"].as_array().unwrap();
        assert_eq!(signs.len(), 1);
        assert_eq!(signs[0]["word"], "hello");
    }

    #[tokio::test]
    async fn text_to_sign_preserves_order_and_duplicates() {
        let state_lock = test_state().await;
        let pool = {
            let state = state_lock.read().await;
            state.db.clone()
        };

        insert_sign(&pool, "sign_hello", "hello", "ASL", "2024-01-01T00:00:00Z").await;
        insert_sign(&pool, "sign_you", "you", "ASL", "2024-01-01T00:00:01Z").await;

        let result = text_to_sign(&pool, "hello you hello", "ASL").await.unwrap();
        let words: Vec<&str> = result["signs"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["word"].as_str().unwrap())
            .collect();
        assert_eq!(words, vec!["hello", "you", "hello"]);
    }

    #[tokio::test]
    async fn text_to_sign_filters_by_language() {
        let state_lock = test_state().await;
        let pool = {
            let state = state_lock.read().await;
            state.db.clone()
        };

        insert_sign(&pool, "sign_bsl", "hello", "BSL", "2024-01-01T00:00:00Z").await;

        let result = text_to_sign(&pool, "hello", "ASL").await.unwrap();
        assert!(result["signs"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn text_to_sign_endpoint_records_history() {
        let state_lock = test_state().await;
        let pool = {
            let state = state_lock.read().await;
            state.db.clone()
        };

        insert_user(&pool, "usr_t1", "t1@example.com").await;
        insert_sign(&pool, "sign_hello", "hello", "ASL", "2024-01-01T00:00:00Z").await;

        let response = handlers::text_to_sign(
            Extension(state_lock.clone()),
            authed_user("usr_t1"),
            Json(TextToSignRequest {
                text: "hello".to_string(),
                language: None,
            }),
        )
        .await
        .unwrap();

        assert_eq!(response.0["signs"].as_array().unwrap().len(), 1);

        let (input_type, language): (String, String) = sqlx::query_as(
            "SELECT input_type, language FROM translations WHERE user_id = 'usr_t1'",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(input_type, "text");
        assert_eq!(language, "ASL");
    }

    #[tokio::test]
    async fn text_to_sign_endpoint_rejects_empty_and_unknown_language() {
        let state_lock = test_state().await;
        let pool = {
            let state = state_lock.read().await;
            state.db.clone()
        };
        insert_user(&pool, "usr_t2", "t2@example.com").await;

        let err = handlers::text_to_sign(
            Extension(state_lock.clone()),
            authed_user("usr_t2"),
            Json(TextToSignRequest {
                text: "   ".to_string(),
                language: None,
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));

        let err = handlers::text_to_sign(
            Extension(state_lock.clone()),
            authed_user("usr_t2"),
            Json(TextToSignRequest {
                text: "hello".to_string(),
                language: Some("KSL".to_string()),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::ValidationError(_)));
    }

    #[tokio::test]
    async fn history_is_paginated_newest_first() {
        let state_lock = test_state().await;
        let pool = {
            let state = state_lock.read().await;
            state.db.clone()
        };
        insert_user(&pool, "usr_h1", "h1@example.com").await;

        for i in 0..25 {
            sqlx::query(
                "INSERT INTO translations (id, user_id, input_text, input_type, language, created_at) \
                 VALUES (?, 'usr_h1', ?, 'text', 'ASL', ?)",
            )
            .bind(format!("trans_{:03}", i))
            .bind(format!("entry {}", i))
            .bind(format!("2024-01-01T00:00:{:02}Z", i))
            .execute(&pool)
            .await
            .unwrap();
        }

        let response = handlers::get_history(
            Extension(state_lock.clone()),
            authed_user("usr_h1"),
            Query(crate::translate::models::HistoryParams {
                page: Some(1),
                limit: Some(20),
            }),
        )
        .await
        .unwrap();

        let body = response.0;
        assert_eq!(body["pagination"]["total"], 25);
        assert_eq!(body["pagination"]["totalPages"], 2);

        let entries = body["translations"].as_array().unwrap();
        assert_eq!(entries.len(), 20);
        assert_eq!(entries[0]["inputText"], "entry 24");

        let response = handlers::get_history(
            Extension(state_lock),
            authed_user("usr_h1"),
            Query(crate::translate::models::HistoryParams {
                page: Some(2),
                limit: Some(20),
            }),
        )
        .await
        .unwrap();
        assert_eq!(response.0["translations"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn history_huge_page_returns_empty() {
        let state_lock = test_state().await;
        let pool = {
            let state = state_lock.read().await;
            state.db.clone()
        };
        insert_user(&pool, "usr_h2", "h2@example.com").await;

        sqlx::query(
            "INSERT INTO translations (id, user_id, input_text, input_type, language) \
             VALUES ('trans_only', 'usr_h2', 'hello', 'text', 'ASL')",
        )
        .execute(&pool)
        .await
        .unwrap();

        let response = handlers::get_history(
            Extension(state_lock),
            authed_user("usr_h2"),
            Query(crate::translate::models::HistoryParams {
                page: Some(100_000_000),
                limit: Some(100),
            }),
        )
        .await
        .unwrap();

        let body = response.0;
        assert_eq!(body["pagination"]["total"], 1);
        assert!(body["translations"].as_array().unwrap().is_empty());
    }
}
