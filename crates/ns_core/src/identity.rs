//! Content-addressed identifiers for extracted items.
//!
//! IDs are truncated SHA-256 digests over the source's base identity and a
//! natural key, so the same article or category always maps to the same ID
//! without any shared allocator.

use sha2::{Digest, Sha256};

/// Marker some extractors emit when a card has a title but no anchor.
pub const NO_LINK_FOUND: &str = "NO-Link-Found";

/// Hex characters kept from an article digest (64 bits).
pub const ARTICLE_ID_LEN: usize = 16;

/// Hex characters kept from a category digest (48 bits).
pub const CATEGORY_ID_LEN: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityGenerator {
    source_name: String,
    base_identity: String,
}

impl IdentityGenerator {
    pub fn new(source_name: impl Into<String>, base_identity: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            base_identity: base_identity.into(),
        }
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn base_identity(&self) -> &str {
        &self.base_identity
    }

    /// ID for an article.
    ///
    /// Hashes `base_identity:link` when the link is usable. Falls back to
    /// `{source_name}_{index}` when a position is given, and to `None`
    /// otherwise.
    pub fn article_id(&self, link: Option<&str>, fallback_index: Option<usize>) -> Option<String> {
        match usable_link(link) {
            Some(link) => Some(self.link_digest(link)),
            None => fallback_index.map(|index| self.positional_id(index)),
        }
    }

    /// ID for a card at a known 1-based position; never absent.
    pub fn card_id(&self, link: Option<&str>, index: usize) -> String {
        match usable_link(link) {
            Some(link) => self.link_digest(link),
            None => self.positional_id(index),
        }
    }

    pub fn category_id(&self, page: &str, name: &str) -> String {
        let content = format!("{}:{}:{}", self.base_identity, page, name);
        truncated_digest(&content, CATEGORY_ID_LEN)
    }

    pub fn positional_id(&self, index: usize) -> String {
        format!("{}_{}", self.source_name, index)
    }

    fn link_digest(&self, link: &str) -> String {
        let content = format!("{}:{}", self.base_identity, link);
        truncated_digest(&content, ARTICLE_ID_LEN)
    }
}

fn usable_link(link: Option<&str>) -> Option<&str> {
    link.filter(|l| !l.is_empty() && *l != NO_LINK_FOUND)
}

fn truncated_digest(content: &str, len: usize) -> String {
    let mut hex = format!("{:x}", Sha256::digest(content.as_bytes()));
    hex.truncate(len);
    hex
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo() -> IdentityGenerator {
        IdentityGenerator::new("demo", "https://demo.example")
    }

    #[test]
    fn test_article_id_is_deterministic() {
        let ids = demo();
        let link = "https://demo.example/world/story-1";
        let first = ids.article_id(Some(link), None);
        let second = ids.article_id(Some(link), Some(3));
        assert_eq!(first, second);
        let id = first.unwrap();
        assert_eq!(id.len(), ARTICLE_ID_LEN);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_article_id_matches_sha256_prefix() {
        let expected = format!("{:x}", Sha256::digest(b"https://demo.example:/a"));
        assert_eq!(demo().article_id(Some("/a"), None).unwrap(), expected[..16]);
    }

    #[test]
    fn test_distinct_links_give_distinct_ids() {
        let ids = demo();
        let a = ids.card_id(Some("https://demo.example/a"), 1);
        let b = ids.card_id(Some("https://demo.example/b"), 1);
        assert_ne!(a, b);
    }

    #[test]
    fn test_base_identity_is_mixed_in() {
        let link = Some("/world/story");
        let a = IdentityGenerator::new("a", "https://a.example").card_id(link, 1);
        let b = IdentityGenerator::new("b", "https://b.example").card_id(link, 1);
        assert_ne!(a, b);
    }

    #[test]
    fn test_sentinel_falls_back_to_position() {
        assert_eq!(
            demo().article_id(Some(NO_LINK_FOUND), Some(7)),
            Some("demo_7".to_string())
        );
        assert_eq!(demo().article_id(Some(""), Some(2)), Some("demo_2".to_string()));
        assert_eq!(demo().article_id(None, Some(1)), Some("demo_1".to_string()));
    }

    #[test]
    fn test_no_link_and_no_index_is_absent() {
        assert_eq!(demo().article_id(None, None), None);
        assert_eq!(demo().article_id(Some(NO_LINK_FOUND), None), None);
    }

    #[test]
    fn test_card_id_never_absent() {
        assert_eq!(demo().card_id(None, 4), "demo_4");
    }

    #[test]
    fn test_category_id() {
        let ids = demo();
        let asia = ids.category_id("world", "asia");
        assert_eq!(asia.len(), CATEGORY_ID_LEN);
        assert_eq!(asia, ids.category_id("world", "asia"));
        assert_ne!(asia, ids.category_id("world", "africa"));
        assert_ne!(asia, ids.category_id("business", "asia"));
    }
}
