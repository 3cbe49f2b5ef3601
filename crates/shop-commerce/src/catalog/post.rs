//! Blog posts from the content service.

use serde::{Deserialize, Serialize};

use crate::catalog::product::ImageRef;
use crate::ids::PostId;

/// Taxonomy term attached to a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermRef {
    pub name: String,
    pub slug: String,
}

/// A post as listed in the feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostSummary {
    pub id: PostId,
    pub title: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    /// Publication date as delivered (ISO 8601).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<ImageRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default)]
    pub categories: Vec<TermRef>,
}

impl PostSummary {
    pub fn new(id: impl Into<PostId>, title: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            slug: slug.into(),
            excerpt: None,
            date: None,
            featured_image: None,
            author: None,
            categories: Vec::new(),
        }
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Excerpt with markup removed, for terminal and preview rendering.
    pub fn plain_excerpt(&self) -> String {
        self.excerpt.as_deref().map(strip_tags).unwrap_or_default()
    }
}

/// A single post with its body, as shown on the post page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: PostSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default)]
    pub tags: Vec<TermRef>,
}

impl PostDetail {
    pub fn new(post: PostSummary) -> Self {
        Self {
            post,
            content: None,
            tags: Vec::new(),
        }
    }

    /// Body with markup removed.
    pub fn plain_content(&self) -> String {
        self.content.as_deref().map(strip_tags).unwrap_or_default()
    }
}

fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}
