//! Text-to-sign matching
//!
//! Tokenizes free text and maps each token to a dictionary sign of the
//! requested language. Unmatched tokens are dropped; matched tokens keep
//! their order and duplicates.

use sqlx::SqlitePool;
use std::collections::HashMap;

use super::models::SignClip;
use crate::common::ApiError;

/// Lowercase, split on whitespace, strip non-word characters per token,
/// drop tokens that end up empty.
pub fn tokenize_words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect()
}

/// Match the token sequence of `text` against the sign dictionary.
/// Returns the original text unchanged plus the matched clips; the clip
/// list may be shorter than the token list.
pub async fn text_to_sign(
    pool: &SqlitePool,
    text: &str,
    language: &str,
) -> Result<serde_json::Value, ApiError> {
    let words = tokenize_words(text);

    if words.is_empty() {
        return Ok(serde_json::json!({
            "text": text,
            "signs": [],
        }));
    }

    let placeholders = vec!["?"; words.len()].join(", ");
    let sql = format!(
        "SELECT id, word, video_url, thumbnail FROM signs \
         WHERE language = ? AND LOWER(word) IN ({})",
        placeholders
    );

    let mut query = sqlx::query_as::<_, SignClip>(&sql).bind(language);
    for word in &words {
        query = query.bind(word);
    }

    let signs = query
        .fetch_all(pool)
        .await
        .map_err(ApiError::DatabaseError)?;

    let sign_map: HashMap<String, &SignClip> = signs
        .iter()
        .map(|sign| (sign.word.to_lowercase(), sign))
        .collect();

    let matched: Vec<&SignClip> = words
        .iter()
        .filter_map(|word| sign_map.get(word).copied())
        .collect();

    Ok(serde_json::json!({
        "text": text,
        "signs": matched,
    }))
}
