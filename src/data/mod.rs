//! Core data models for carrier-sync
//!
//! This module contains the contact and blog post types resolved from the
//! WordPress carrier API, plus the adapters that turn raw API responses into
//! them.

pub mod blogs;
pub mod settings;

pub use blogs::parse_posts;
pub use settings::{parse_settings, ShapeError};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Business contact numbers shown on the page
///
/// Snapshots are replaced wholesale; the serialized field names match the
/// canonical settings payload so cached entries read the same as the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    /// Phone number used for `tel:` links
    #[serde(rename = "carrier_phone")]
    pub phone: String,
    /// WhatsApp number used for `wa.me` links
    #[serde(rename = "carrier_whatsapp")]
    pub whatsapp: String,
}

impl ContactInfo {
    /// Creates a new ContactInfo from the two numbers
    pub fn new(phone: impl Into<String>, whatsapp: impl Into<String>) -> Self {
        Self {
            phone: phone.into(),
            whatsapp: whatsapp.into(),
        }
    }
}

impl Default for ContactInfo {
    fn default() -> Self {
        Self::new("18005550100", "18005550100")
    }
}

/// Identifier of a blog post
///
/// WordPress returns numeric ids, but custom endpoints may hand back strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PostId {
    Number(u64),
    Text(String),
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostId::Number(n) => write!(f, "{}", n),
            PostId::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for PostId {
    fn from(value: u64) -> Self {
        PostId::Number(value)
    }
}

impl From<&str> for PostId {
    fn from(value: &str) -> Self {
        PostId::Text(value.to_string())
    }
}

/// A blog post preview rendered as one tab
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Unique post identifier, used to key nav items and panes
    pub id: PostId,
    /// Plain-text title
    pub title: String,
    /// Optional plain-text excerpt
    #[serde(default)]
    pub excerpt: Option<String>,
    /// Post body as HTML from the source site
    pub content: String,
    /// Optional thumbnail URL
    #[serde(default)]
    pub thumbnail: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_info_serializes_with_carrier_field_names() {
        let info = ContactInfo::new("123", "456");
        let json = serde_json::to_string(&info).unwrap();
        assert!(json.contains("\"carrier_phone\":\"123\""));
        assert!(json.contains("\"carrier_whatsapp\":\"456\""));
    }

    #[test]
    fn test_post_id_display() {
        assert_eq!(PostId::from(42).to_string(), "42");
        assert_eq!(PostId::from("intro-post").to_string(), "intro-post");
    }

    #[test]
    fn test_post_id_deserializes_number_or_string() {
        let n: PostId = serde_json::from_str("7").unwrap();
        let s: PostId = serde_json::from_str("\"seven\"").unwrap();
        assert_eq!(n, PostId::Number(7));
        assert_eq!(s, PostId::Text("seven".to_string()));
    }

    #[test]
    fn test_post_cache_roundtrip_keeps_optional_fields() {
        let post = Post {
            id: PostId::from(1),
            title: "Hello".to_string(),
            excerpt: None,
            content: "<p>Body</p>".to_string(),
            thumbnail: Some("https://example.com/a.png".to_string()),
        };
        let json = serde_json::to_string(&post).unwrap();
        let back: Post = serde_json::from_str(&json).unwrap();
        assert_eq!(back, post);
    }
}
