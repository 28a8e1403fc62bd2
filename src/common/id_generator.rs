// src/common/id_generator.rs
//! Crockford Base32 ID Generator
//!
//! Generates human-readable, prefixed IDs using Crockford Base32 encoding.
//! Format: PREFIX_XXXXXXXX (e.g., S_K7NP3X2D for signs)
//!
//! The alphabet excludes I, L, O and U so IDs stay unambiguous when read
//! aloud or typed from a support ticket.

use rand::Rng;

/// Crockford Base32 alphabet (excludes I, L, O, U to avoid confusion)
const CROCKFORD_ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Default length of the random portion of an ID
const ID_LENGTH: usize = 8;

/// Entity type prefixes for ID generation
#[derive(Debug, Clone, Copy)]
pub enum EntityPrefix {
    /// User account (U_)
    User,
    /// Auth session (K_) - K for Key
    Session,
    /// Dictionary sign (S_)
    Sign,
    /// Favorite bookmark (F_)
    Favorite,
    /// Translation history record (T_)
    Translation,
    /// Progress row (P_)
    Progress,
    /// Realtime connection (N_) - N for Network connection
    Connection,
}

impl EntityPrefix {
    /// Get the string prefix for this entity type
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityPrefix::User => "U",
            EntityPrefix::Session => "K",
            EntityPrefix::Sign => "S",
            EntityPrefix::Favorite => "F",
            EntityPrefix::Translation => "T",
            EntityPrefix::Progress => "P",
            EntityPrefix::Connection => "N",
        }
    }
}

/// Generate a random Crockford Base32 string of the given length
pub fn generate_raw_id(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..CROCKFORD_ALPHABET.len());
            CROCKFORD_ALPHABET[idx] as char
        })
        .collect()
}

/// Generate a prefixed ID for the given entity type
pub fn generate_id(prefix: EntityPrefix) -> String {
    format!("{}_{}", prefix.as_str(), generate_raw_id(ID_LENGTH))
}

pub fn generate_user_id() -> String {
    generate_id(EntityPrefix::User)
}

pub fn generate_session_id() -> String {
    generate_id(EntityPrefix::Session)
}

pub fn generate_sign_id() -> String {
    generate_id(EntityPrefix::Sign)
}

pub fn generate_favorite_id() -> String {
    generate_id(EntityPrefix::Favorite)
}

pub fn generate_translation_id() -> String {
    generate_id(EntityPrefix::Translation)
}

pub fn generate_progress_id() -> String {
    generate_id(EntityPrefix::Progress)
}

pub fn generate_connection_id() -> String {
    generate_id(EntityPrefix::Connection)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_format() {
        let id = generate_sign_id();
        assert!(id.starts_with("S_"));
        assert_eq!(id.len(), 2 + ID_LENGTH);
    }

    #[test]
    fn test_ids_use_crockford_alphabet() {
        let id = generate_raw_id(64);
        for c in id.bytes() {
            assert!(CROCKFORD_ALPHABET.contains(&c), "unexpected char {}", c as char);
        }
    }

    #[test]
    fn test_ids_are_unique() {
        let a = generate_user_id();
        let b = generate_user_id();
        assert_ne!(a, b);
    }
}
