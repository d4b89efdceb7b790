use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    pub tag: String,
    pub content: String,
    #[serde(with = "crate::timestamp")]
    pub created_at: DateTime<Utc>,
    pub published_by: String,
}

/// A user record together with the posts it owns.
///
/// `id` and `created_at` are assigned once by the directory and never change.
/// Passwords are kept exactly as entered; treat them as demo data only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(with = "crate::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub posts: Vec<Post>,
}

impl User {
    pub fn post_count(&self) -> usize {
        self.posts.len()
    }

    /// Case-insensitive substring match against username or email.
    /// `needle` must already be lowercased.
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        self.username.to_lowercase().contains(needle) || self.email.to_lowercase().contains(needle)
    }
}
