use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Blog {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub slug: String,
    pub owner_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Incoming create payload. Fields are optional so that a missing field
/// surfaces as a per-field validation error instead of a JSON decode failure.
#[derive(Debug, Default, Deserialize)]
pub struct CreateBlogRequest {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// A create payload that passed validation.
#[derive(Debug, Clone)]
pub struct NewBlog {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct BlogResponse {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub slug: String,
    pub owner: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Blog> for BlogResponse {
    fn from(blog: Blog) -> Self {
        Self {
            id: blog.id,
            title: blog.title,
            description: blog.description,
            slug: blog.slug,
            owner: blog.owner_id,
            created_at: blog.created_at,
        }
    }
}

/// One page of blogs plus the data needed for `next`/`previous` links.
#[derive(Debug)]
pub struct BlogPage {
    pub results: Vec<BlogResponse>,
    pub count: i64,
    pub page: i64,
    pub has_next: bool,
    pub has_previous: bool,
}
