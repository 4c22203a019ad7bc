//! Blogs response adapter
//!
//! The blogs endpoint returns a flat JSON array. Custom carrier endpoints send
//! plain strings for `title`, `excerpt` and `content`; WordPress core routes
//! wrap them as `{ "rendered": "..." }`. Both are accepted.

use scraper::Html;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use tracing::warn;

use super::{Post, PostId, ShapeError};

/// A post as it appears on the wire
#[derive(Debug, Deserialize)]
struct RawPost {
    id: PostId,
    title: Rendered,
    #[serde(default)]
    excerpt: Option<Rendered>,
    #[serde(default)]
    content: Option<Rendered>,
    /// String URL, or `false`/`null` when the post has no featured image
    #[serde(default)]
    thumbnail: Option<Value>,
}

/// Text field that is either plain or wrapped in a `rendered` object
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Rendered {
    Plain(String),
    Wrapped { rendered: String },
}

impl Rendered {
    /// Markup for the trusted content sink, unchanged
    fn into_html(self) -> String {
        match self {
            Rendered::Plain(s) => s,
            Rendered::Wrapped { rendered } => rendered,
        }
    }

    /// Title text; `rendered` titles carry HTML entities such as `&#8217;`
    fn into_title(self) -> String {
        match self {
            Rendered::Plain(s) => s,
            Rendered::Wrapped { rendered } => {
                html_escape::decode_html_entities(&rendered).into_owned()
            }
        }
    }

    /// Excerpt text; `rendered` excerpts are markup like `<p>…</p>`
    fn into_summary(self) -> String {
        match self {
            Rendered::Plain(s) => s,
            Rendered::Wrapped { rendered } => {
                let fragment = Html::parse_fragment(&rendered);
                let text: String = fragment.root_element().text().collect();
                text.split_whitespace().collect::<Vec<_>>().join(" ")
            }
        }
    }
}

impl From<RawPost> for Post {
    fn from(raw: RawPost) -> Self {
        let excerpt = raw
            .excerpt
            .map(Rendered::into_summary)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let thumbnail = match raw.thumbnail {
            Some(Value::String(url)) if !url.trim().is_empty() => Some(url.trim().to_string()),
            _ => None,
        };

        Post {
            id: raw.id,
            title: raw.title.into_title().trim().to_string(),
            excerpt,
            content: raw.content.map(Rendered::into_html).unwrap_or_default(),
            thumbnail,
        }
    }
}

/// Parses a blogs endpoint body into at most `limit` posts
///
/// Malformed entries are skipped, and only the first post with a given id is
/// kept. A body that yields no posts is an error so callers fall back.
pub fn parse_posts(body: &str, limit: usize) -> Result<Vec<Post>, ShapeError> {
    let value: Value = serde_json::from_str(body)?;
    let entries = match value {
        Value::Array(entries) => entries,
        _ => return Err(ShapeError::UnrecognizedShape),
    };

    let mut seen = HashSet::new();
    let mut posts = Vec::with_capacity(limit.min(entries.len()));

    for entry in entries {
        if posts.len() >= limit {
            break;
        }

        let post: Post = match serde_json::from_value::<RawPost>(entry) {
            Ok(raw) => raw.into(),
            Err(e) => {
                warn!("Skipping malformed post entry: {}", e);
                continue;
            }
        };

        if !seen.insert(post.id.clone()) {
            warn!("Skipping duplicate post id {}", post.id);
            continue;
        }
        posts.push(post);
    }

    if posts.is_empty() {
        return Err(ShapeError::Empty);
    }

    Ok(posts)
}
