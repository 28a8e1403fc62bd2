//! User profile data models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Profile view of a user row; the password hash never leaves the
/// auth module.
#[derive(FromRow, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub name: String,
    pub avatar: Option<String>,
    /// JSON blob, parsed before serialization
    #[serde(skip_serializing)]
    pub preferences: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl UserProfile {
    /// Serializes the profile with the preferences blob expanded into
    /// a JSON object ({} when unset or unparseable).
    pub fn to_payload(&self) -> serde_json::Value {
        let preferences = self
            .preferences
            .as_deref()
            .and_then(|raw| serde_json::from_str::<serde_json::Value>(raw).ok())
            .unwrap_or_else(|| serde_json::json!({}));

        let mut payload = serde_json::to_value(self).unwrap_or_default();
        if let Some(obj) = payload.as_object_mut() {
            obj.insert("preferences".to_string(), preferences);
        }
        payload
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub avatar: Option<String>,
}

/// Full preferences replacement; absent fields clear back to defaults
#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PreferencesRequest {
    pub language: Option<String>,
    pub avatar_speed: Option<f64>,
    pub theme: Option<String>,
}
