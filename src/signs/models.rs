//! Sign dictionary data models

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sqlx::FromRow;

/// Supported sign languages
pub const SIGN_LANGUAGES: [&str; 5] = ["ASL", "BSL", "ISL", "LSF", "GSL"];

/// Difficulty levels for dictionary entries
pub const DIFFICULTIES: [&str; 3] = ["beginner", "intermediate", "advanced"];

/// Dictionary entry mapping a word to a demonstration video.
/// Reference data: the API never mutates signs outside of seeding.
#[derive(FromRow, Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Sign {
    pub id: String,
    pub word: String,
    pub language: String,
    pub category: String,
    pub difficulty: String,
    pub video_url: String,
    pub thumbnail: String,
    pub description: Option<String>,
    /// Ids of related dictionary entries, stored as a JSON array and
    /// exposed as one
    #[serde(
        serialize_with = "serialize_id_list",
        deserialize_with = "deserialize_id_list",
        default
    )]
    pub related_signs: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

fn serialize_id_list<S>(raw: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match raw
        .as_deref()
        .and_then(|r| serde_json::from_str::<Vec<String>>(r).ok())
    {
        Some(ids) => ids.serialize(serializer),
        None => serializer.serialize_none(),
    }
}

fn deserialize_id_list<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let ids: Option<Vec<String>> = Option::deserialize(deserializer)?;
    Ok(ids.and_then(|list| serde_json::to_string(&list).ok()))
}

/// User-curated bookmark of a sign, unique per (user, sign)
#[derive(FromRow, Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub id: String,
    pub user_id: String,
    pub sign_id: String,
    pub created_at: Option<String>,
}

/// Query parameters for GET /api/signs
#[derive(Deserialize, Debug, Default)]
pub struct SignListParams {
    pub language: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Query parameters for GET /api/signs/search
#[derive(Deserialize, Debug)]
pub struct SignSearchParams {
    pub q: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AddFavoriteRequest {
    pub sign_id: Option<String>,
}
