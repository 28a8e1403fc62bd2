//! Progress tracking data models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One row per user. `achievements` is stored as a JSON array string.
#[derive(FromRow, Serialize, Deserialize, Debug, Clone)]
pub struct Progress {
    pub id: String,
    pub user_id: String,
    pub signs_learned: i64,
    pub practice_time: i64,
    pub streak: i64,
    pub last_active: String,
    pub achievements: String,
}

impl Progress {
    /// API payload with camelCase keys and the achievements JSON parsed.
    /// A corrupt achievements column degrades to an empty list.
    pub fn to_payload(&self) -> serde_json::Value {
        let achievements: serde_json::Value =
            serde_json::from_str(&self.achievements).unwrap_or_else(|_| serde_json::json!([]));

        serde_json::json!({
            "id": self.id,
            "userId": self.user_id,
            "signsLearned": self.signs_learned,
            "practiceTime": self.practice_time,
            "streak": self.streak,
            "lastActive": self.last_active,
            "achievements": achievements,
        })
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateProgressRequest {
    pub signs_learned: Option<i64>,
    pub practice_time: Option<i64>,
    pub streak: Option<i64>,
}
