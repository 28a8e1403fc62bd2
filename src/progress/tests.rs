//! Tests for the progress module

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::common::test_support::{authed_user, insert_user, test_state};
    use axum::extract::{Extension, Json};
    use chrono::{Duration, Utc};
    use handlers::{parse_timestamp, streak_transition};

    const DAY: i64 = 86_400;

    #[test]
    fn test_streak_transition_policy() {
        // Same day: unchanged
        assert_eq!(streak_transition(4, 0), 4);
        assert_eq!(streak_transition(4, DAY - 1), 4);
        // Exactly the next day: +1
        assert_eq!(streak_transition(4, DAY), 5);
        assert_eq!(streak_transition(4, 2 * DAY - 1), 5);
        // Two or more days: reset
        assert_eq!(streak_transition(4, 2 * DAY), 1);
        assert_eq!(streak_transition(4, 30 * DAY), 1);
        // Clock skew (future last_active): reset, not silently kept
        assert_eq!(streak_transition(4, -1), 1);
        assert_eq!(streak_transition(4, -DAY), 1);
    }

    #[test]
    fn test_parse_timestamp_accepts_both_formats() {
        assert!(parse_timestamp("2024-06-01T12:00:00+00:00").is_some());
        assert!(parse_timestamp("2024-06-01 12:00:00").is_some());
        assert!(parse_timestamp("garbage").is_none());
    }

    #[tokio::test]
    async fn test_get_progress_creates_zeroed_row() {
        let shared = test_state().await;
        let db = shared.read().await.db.clone();
        insert_user(&db, "U_TESTUSER1", "learner@example.com").await;

        let response = handlers::get_progress(Extension(shared.clone()), authed_user("U_TESTUSER1"))
            .await
            .expect("get should lazily create");

        assert_eq!(response.0["signsLearned"], 0);
        assert_eq!(response.0["practiceTime"], 0);
        assert_eq!(response.0["streak"], 0);

        // Second read returns the same row, not another one
        handlers::get_progress(Extension(shared.clone()), authed_user("U_TESTUSER1"))
            .await
            .expect("second get should succeed");
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM progress WHERE user_id = 'U_TESTUSER1'")
                .fetch_one(&db)
                .await
                .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_update_progress_only_touches_supplied_fields() {
        let shared = test_state().await;
        let db = shared.read().await.db.clone();
        insert_user(&db, "U_TESTUSER1", "learner@example.com").await;

        handlers::update_progress(
            Extension(shared.clone()),
            authed_user("U_TESTUSER1"),
            Json(models::UpdateProgressRequest {
                signs_learned: Some(10),
                practice_time: Some(300),
                streak: Some(2),
            }),
        )
        .await
        .expect("initial upsert should succeed");

        let response = handlers::update_progress(
            Extension(shared.clone()),
            authed_user("U_TESTUSER1"),
            Json(models::UpdateProgressRequest {
                practice_time: Some(450),
                ..Default::default()
            }),
        )
        .await
        .expect("partial update should succeed");

        assert_eq!(response.0["signsLearned"], 10);
        assert_eq!(response.0["practiceTime"], 450);
        assert_eq!(response.0["streak"], 2);
    }

    #[tokio::test]
    async fn test_update_progress_rejects_negative_counters() {
        let shared = test_state().await;
        let db = shared.read().await.db.clone();
        insert_user(&db, "U_TESTUSER1", "learner@example.com").await;

        let result = handlers::update_progress(
            Extension(shared),
            authed_user("U_TESTUSER1"),
            Json(models::UpdateProgressRequest {
                signs_learned: Some(-1),
                ..Default::default()
            }),
        )
        .await;

        assert!(matches!(
            result,
            Err(crate::common::ApiError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_bump_streak_requires_existing_row() {
        let shared = test_state().await;
        let db = shared.read().await.db.clone();
        insert_user(&db, "U_TESTUSER1", "learner@example.com").await;

        let result =
            handlers::bump_streak(Extension(shared), authed_user("U_TESTUSER1")).await;
        assert!(matches!(result, Err(crate::common::ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_bump_streak_increments_after_one_day() {
        let shared = test_state().await;
        let db = shared.read().await.db.clone();
        insert_user(&db, "U_TESTUSER1", "learner@example.com").await;

        let yesterday = (Utc::now() - Duration::days(1) - Duration::hours(1)).to_rfc3339();
        sqlx::query(
            "INSERT INTO progress (id, user_id, streak, last_active) VALUES ('P_1', 'U_TESTUSER1', 3, ?)",
        )
        .bind(&yesterday)
        .execute(&db)
        .await
        .unwrap();

        let response =
            handlers::bump_streak(Extension(shared.clone()), authed_user("U_TESTUSER1"))
                .await
                .expect("bump should succeed");
        assert_eq!(response.0["streak"], 4);

        // Bumping again on the same day changes nothing
        let response = handlers::bump_streak(Extension(shared), authed_user("U_TESTUSER1"))
            .await
            .expect("second bump should succeed");
        assert_eq!(response.0["streak"], 4);
    }

    #[tokio::test]
    async fn test_bump_streak_resets_after_a_gap() {
        let shared = test_state().await;
        let db = shared.read().await.db.clone();
        insert_user(&db, "U_TESTUSER1", "learner@example.com").await;

        let last_week = (Utc::now() - Duration::days(7)).to_rfc3339();
        sqlx::query(
            "INSERT INTO progress (id, user_id, streak, last_active) VALUES ('P_1', 'U_TESTUSER1', 9, ?)",
        )
        .bind(&last_week)
        .execute(&db)
        .await
        .unwrap();

        let response = handlers::bump_streak(Extension(shared), authed_user("U_TESTUSER1"))
            .await
            .expect("bump should succeed");
        assert_eq!(response.0["streak"], 1);
    }

    #[tokio::test]
    async fn test_achievements_do_not_create_a_row() {
        let shared = test_state().await;
        let db = shared.read().await.db.clone();
        insert_user(&db, "U_TESTUSER1", "learner@example.com").await;

        let response =
            handlers::get_achievements(Extension(shared.clone()), authed_user("U_TESTUSER1"))
                .await
                .expect("achievements should succeed without a row");
        assert_eq!(response.0["achievements"], serde_json::json!([]));

        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM progress WHERE user_id = 'U_TESTUSER1'")
                .fetch_one(&db)
                .await
                .unwrap();
        assert_eq!(count, 0);

        sqlx::query(
            "INSERT INTO progress (id, user_id, achievements) VALUES ('P_1', 'U_TESTUSER1', '[\"first_sign\"]')",
        )
        .execute(&db)
        .await
        .unwrap();

        let response = handlers::get_achievements(Extension(shared), authed_user("U_TESTUSER1"))
            .await
            .expect("achievements should succeed");
        assert_eq!(
            response.0["achievements"],
            serde_json::json!(["first_sign"])
        );
    }
}
