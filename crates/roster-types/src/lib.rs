mod input;
mod record;
mod stats;
pub mod timestamp;

pub use input::*;
pub use record::*;
pub use stats::*;

/// `publishedBy` value of the welcome posts attached to a freshly created account.
pub const NEW_USER_SENTINEL: &str = "new-user";

pub const DEFAULT_POST_TAGS: &[&str] = &["general", "personal", "update"];

pub const SEED_POST_TAGS: &[&str] = &[
    "technology",
    "lifestyle",
    "travel",
    "food",
    "health",
    "education",
];
