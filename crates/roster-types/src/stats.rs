use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub total_users: usize,
    pub total_posts: usize,
    pub users_with_posts: usize,
    /// Users created during the last seven days.
    pub recent_users: usize,
}

impl Stats {
    pub fn average_posts_per_user(&self) -> f64 {
        if self.total_users == 0 {
            return 0.0;
        }
        self.total_posts as f64 / self.total_users as f64
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    pub path: String,
    pub exists: bool,
    pub user_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPostCount {
    pub user_id: String,
    pub username: String,
    pub post_count: usize,
}
