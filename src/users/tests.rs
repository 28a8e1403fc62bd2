//! Tests for users module

#[cfg(test)]
mod tests {
    use crate::common::test_support::{authed_user, insert_user, test_state};
    use crate::common::ApiError;
    use crate::users::handlers;
    use crate::users::models::{PreferencesRequest, UpdateProfileRequest};
    use crate::users::validators::{validate_preferences, validate_profile_update};
    use axum::extract::{Extension, Json};

    #[test]
    fn profile_update_validation() {
        let empty = UpdateProfileRequest::default();
        assert!(!validate_profile_update(&empty).is_valid);

        let short_name = UpdateProfileRequest {
            name: Some("A".to_string()),
            avatar: None,
        };
        assert!(!validate_profile_update(&short_name).is_valid);

        let bad_avatar = UpdateProfileRequest {
            name: None,
            avatar: Some("not-a-url".to_string()),
        };
        assert!(!validate_profile_update(&bad_avatar).is_valid);

        let ok = UpdateProfileRequest {
            name: Some("Alex".to_string()),
            avatar: Some("https://cdn.test/a.png".to_string()),
        };
        assert!(validate_profile_update(&ok).is_valid);
    }

    #[test]
    fn preferences_validation() {
        let ok = PreferencesRequest {
            language: Some("ASL".to_string()),
            avatar_speed: Some(1.5),
            theme: Some("dark".to_string()),
        };
        assert!(validate_preferences(&ok).is_valid);

        let bad_language = PreferencesRequest {
            language: Some("KSL".to_string()),
            ..Default::default()
        };
        assert!(!validate_preferences(&bad_language).is_valid);

        let too_fast = PreferencesRequest {
            avatar_speed: Some(2.5),
            ..Default::default()
        };
        assert!(!validate_preferences(&too_fast).is_valid);

        let bad_theme = PreferencesRequest {
            theme: Some("sepia".to_string()),
            ..Default::default()
        };
        assert!(!validate_preferences(&bad_theme).is_valid);

        // Empty replacement clears everything back to defaults
        assert!(validate_preferences(&PreferencesRequest::default()).is_valid);
    }

    #[tokio::test]
    async fn get_me_returns_profile_without_password() {
        let state_lock = test_state().await;
        let pool = {
            let state = state_lock.read().await;
            state.db.clone()
        };
        insert_user(&pool, "usr_me", "me@example.com").await;

        let response = handlers::get_me(Extension(state_lock), authed_user("usr_me"))
            .await
            .unwrap();

        let body = response.0;
        assert_eq!(body["id"], "usr_me");
        assert_eq!(body["email"], "me@example.com");
        assert_eq!(body["preferences"], serde_json::json!({}));
        assert!(body.get("passwordHash").is_none());
        assert!(body.get("password_hash").is_none());
    }

    #[tokio::test]
    async fn update_me_changes_only_supplied_fields() {
        let state_lock = test_state().await;
        let pool = {
            let state = state_lock.read().await;
            state.db.clone()
        };
        insert_user(&pool, "usr_up", "up@example.com").await;

        let response = handlers::update_me(
            Extension(state_lock.clone()),
            authed_user("usr_up"),
            Json(UpdateProfileRequest {
                name: Some("  New Name  ".to_string()),
                avatar: None,
            }),
        )
        .await
        .unwrap();

        let body = response.0;
        assert_eq!(body["name"], "New Name");
        // Avatar untouched
        assert!(body["avatar"].is_null());

        let response = handlers::update_me(
            Extension(state_lock),
            authed_user("usr_up"),
            Json(UpdateProfileRequest {
                name: None,
                avatar: Some("https://cdn.test/new.png".to_string()),
            }),
        )
        .await
        .unwrap();

        let body = response.0;
        assert_eq!(body["name"], "New Name");
        assert_eq!(body["avatar"], "https://cdn.test/new.png");
    }

    #[tokio::test]
    async fn update_me_rejects_invalid_payloads() {
        let state_lock = test_state().await;
        let pool = {
            let state = state_lock.read().await;
            state.db.clone()
        };
        insert_user(&pool, "usr_bad", "bad@example.com").await;

        let err = handlers::update_me(
            Extension(state_lock),
            authed_user("usr_bad"),
            Json(UpdateProfileRequest::default()),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ApiError::ValidationError(_)));
    }

    #[tokio::test]
    async fn preferences_are_replaced_wholesale() {
        let state_lock = test_state().await;
        let pool = {
            let state = state_lock.read().await;
            state.db.clone()
        };
        insert_user(&pool, "usr_pref", "pref@example.com").await;

        let response = handlers::update_preferences(
            Extension(state_lock.clone()),
            authed_user("usr_pref"),
            Json(PreferencesRequest {
                language: Some("BSL".to_string()),
                avatar_speed: Some(0.75),
                theme: Some("light".to_string()),
            }),
        )
        .await
        .unwrap();

        let body = response.0;
        assert_eq!(body["preferences"]["language"], "BSL");
        assert_eq!(body["preferences"]["avatarSpeed"], 0.75);
        assert_eq!(body["preferences"]["theme"], "light");

        // A second call replaces the blob, it does not merge
        let response = handlers::update_preferences(
            Extension(state_lock),
            authed_user("usr_pref"),
            Json(PreferencesRequest {
                theme: Some("dark".to_string()),
                ..Default::default()
            }),
        )
        .await
        .unwrap();

        let body = response.0;
        assert_eq!(body["preferences"]["theme"], "dark");
        assert!(body["preferences"]["language"].is_null());
    }
}
