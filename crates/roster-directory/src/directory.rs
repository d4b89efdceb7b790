use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use roster_store::{RecordStore, StoreError};
use roster_types::{
    timestamp, FileInfo, Post, Stats, User, UserInput, UserPostCount, UserUpdate,
    DEFAULT_POST_TAGS, NEW_USER_SENTINEL,
};
use tracing::info;
use uuid::Uuid;

use crate::lorem;

pub const MAX_WELCOME_POSTS: usize = 3;

const RECENT_WINDOW_DAYS: i64 = 7;

/// Queries and mutations over the users held by a [`RecordStore`].
///
/// Nothing is cached between calls. Every operation loads the file, works on
/// the fresh collection and, if it changed anything, writes it back, so edits
/// made to the file by someone else are always picked up. Persist failures
/// are logged by the store and do not change the value returned here.
pub struct UserDirectory<R = StdRng> {
    store: RecordStore,
    rng: R,
}

impl UserDirectory<StdRng> {
    pub fn new(store: RecordStore) -> Self {
        Self::with_rng(store, StdRng::from_entropy())
    }
}

impl<R: Rng> UserDirectory<R> {
    /// Uses `rng` for the number, tags and text of generated welcome posts.
    pub fn with_rng(store: RecordStore, rng: R) -> Self {
        Self { store, rng }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn list_all(&self) -> Vec<User> {
        self.store.load()
    }

    pub fn find_by_id(&self, id: &str) -> Option<User> {
        self.store.load().into_iter().find(|user| user.id == id)
    }

    pub fn create(&mut self, input: UserInput) -> User {
        let mut users = self.store.load();
        let now = timestamp::now();

        let user = User {
            id: Uuid::new_v4().to_string(),
            username: input.username,
            email: input.email,
            password: input.password,
            created_at: now,
            posts: self.welcome_posts(now),
        };

        users.push(user.clone());
        self.store.save(&users);
        info!(
            "Created user {} ({}) with {} welcome posts",
            user.username,
            user.id,
            user.posts.len()
        );
        user
    }

    /// Applies the provided fields to the user with `id`. The id, creation
    /// time and posts always come from the stored record.
    pub fn update(&self, id: &str, update: &UserUpdate) -> Option<User> {
        let mut users = self.store.load();
        let user = users.iter_mut().find(|user| user.id == id)?;
        update.apply_to(user);
        let updated = user.clone();

        self.store.save(&users);
        info!("Updated user {}", id);
        Some(updated)
    }

    /// Removes the user and, with it, all of its posts.
    pub fn delete(&self, id: &str) -> bool {
        let mut users = self.store.load();
        let initial_len = users.len();
        users.retain(|user| user.id != id);

        if users.len() < initial_len {
            self.store.save(&users);
            info!("Deleted user {}", id);
            true
        } else {
            false
        }
    }

    pub fn search(&self, query: &str) -> Vec<User> {
        let needle = query.to_lowercase();
        self.store
            .load()
            .into_iter()
            .filter(|user| user.matches_lowercase(&needle))
            .collect()
    }

    pub fn aggregate(&self) -> Stats {
        compute_stats(&self.store.load(), Utc::now())
    }

    pub fn post_counts(&self) -> Vec<UserPostCount> {
        self.store
            .load()
            .into_iter()
            .map(|user| UserPostCount {
                post_count: user.post_count(),
                user_id: user.id,
                username: user.username,
            })
            .collect()
    }

    pub fn file_info(&self) -> FileInfo {
        let exists = self.store.exists();
        let user_count = if exists { self.store.load().len() } else { 0 };
        FileInfo {
            path: self.store.path().display().to_string(),
            exists,
            user_count,
        }
    }

    /// Directory next to the data file that receives backups.
    pub fn backup_dir(&self) -> PathBuf {
        self.store
            .path()
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_default()
            .join("backups")
    }

    /// Copies the data file to `backups/backup-<unix millis>.json`.
    pub fn backup(&self) -> Result<Option<PathBuf>, StoreError> {
        let name = format!("backup-{}.json", Utc::now().timestamp_millis());
        self.store.backup_to(&self.backup_dir(), &name)
    }

    fn welcome_posts(&mut self, now: DateTime<Utc>) -> Vec<Post> {
        let count = self.rng.gen_range(1..=MAX_WELCOME_POSTS);
        let mut posts = Vec::with_capacity(count);
        for index in 1..=count {
            let tag = DEFAULT_POST_TAGS
                .choose(&mut self.rng)
                .copied()
                .unwrap_or("general");
            posts.push(Post {
                id: Uuid::new_v4().to_string(),
                title: format!("Welcome post {}", index),
                tag: tag.to_string(),
                content: lorem::paragraphs(&mut self.rng, 2),
                created_at: now,
                published_by: NEW_USER_SENTINEL.to_string(),
            });
        }
        posts
    }
}

pub fn compute_stats(users: &[User], now: DateTime<Utc>) -> Stats {
    let recent_cutoff = now - Duration::days(RECENT_WINDOW_DAYS);
    Stats {
        total_users: users.len(),
        total_posts: users.iter().map(User::post_count).sum(),
        users_with_posts: users.iter().filter(|u| !u.posts.is_empty()).count(),
        recent_users: users
            .iter()
            .filter(|u| u.created_at > recent_cutoff)
            .count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use tempfile::TempDir;

    fn directory(seed: u64) -> (TempDir, UserDirectory<StdRng>) {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path(), "users.json");
        (dir, UserDirectory::with_rng(store, StdRng::seed_from_u64(seed)))
    }

    fn input(username: &str, email: &str) -> UserInput {
        UserInput::new(username, email, "p1").unwrap()
    }

    #[test]
    fn test_bob_lifecycle() {
        let (_dir, mut directory) = directory(1);
        assert!(directory.list_all().is_empty());

        let before = Utc::now() - Duration::seconds(1);
        let bob = directory.create(input("bob", "bob@x.com"));
        assert!(!bob.id.is_empty());
        assert!(bob.created_at >= before && bob.created_at <= Utc::now());
        assert!((1..=MAX_WELCOME_POSTS).contains(&bob.posts.len()));

        assert_eq!(directory.find_by_id(&bob.id), Some(bob.clone()));

        let update = UserUpdate {
            email: Some("bob2@x.com".to_string()),
            ..Default::default()
        };
        let updated = directory.update(&bob.id, &update).unwrap();
        assert_eq!(
            updated,
            User {
                email: "bob2@x.com".to_string(),
                ..bob.clone()
            }
        );
        assert_eq!(directory.find_by_id(&bob.id), Some(updated));

        assert!(directory.delete(&bob.id));
        assert!(!directory.delete(&bob.id));
        assert_eq!(directory.find_by_id(&bob.id), None);
    }

    #[test]
    fn test_welcome_posts_shape() {
        let (_dir, mut directory) = directory(2);
        for i in 0..20 {
            let user = directory.create(input(&format!("user{}", i), "u@x.com"));
            assert!((1..=MAX_WELCOME_POSTS).contains(&user.posts.len()));
            for (n, post) in user.posts.iter().enumerate() {
                assert_eq!(post.title, format!("Welcome post {}", n + 1));
                assert!(DEFAULT_POST_TAGS.contains(&post.tag.as_str()));
                assert_eq!(post.published_by, NEW_USER_SENTINEL);
                assert_eq!(post.created_at, user.created_at);
                assert_eq!(post.content.lines().count(), 2);
            }
        }
    }

    #[test]
    fn test_seeded_rng_pins_generated_posts() {
        let (_a, mut first) = directory(42);
        let (_b, mut second) = directory(42);

        let shape = |user: &User| {
            user.posts
                .iter()
                .map(|p| (p.title.clone(), p.tag.clone(), p.content.clone()))
                .collect::<Vec<_>>()
        };

        for _ in 0..5 {
            let x = first.create(input("carol", "carol@x.com"));
            let y = second.create(input("carol", "carol@x.com"));
            assert_eq!(shape(&x), shape(&y));
        }
    }

    #[test]
    fn test_created_ids_are_unique() {
        let (_dir, mut directory) = directory(3);
        let mut ids = HashSet::new();
        for i in 0..50 {
            let user = directory.create(input(&format!("u{}", i), "u@x.com"));
            assert!(ids.insert(user.id.clone()));
            for post in &user.posts {
                assert!(ids.insert(post.id.clone()));
            }
        }
        assert_eq!(directory.list_all().len(), 50);
    }

    #[test]
    fn test_update_keeps_identity_and_posts() {
        let (_dir, mut directory) = directory(4);
        let original = directory.create(input("dave", "dave@x.com"));

        let update = UserUpdate {
            username: Some("david".to_string()),
            email: Some("david@x.com".to_string()),
            password: Some("new".to_string()),
        };
        let updated = directory.update(&original.id, &update).unwrap();

        assert_eq!(updated.id, original.id);
        assert_eq!(updated.created_at, original.created_at);
        assert_eq!(updated.posts, original.posts);
        assert_eq!(updated.username, "david");
        assert_eq!(updated.password, "new");
    }

    #[test]
    fn test_update_missing_returns_none() {
        let (_dir, directory) = directory(5);
        let update = UserUpdate {
            username: Some("ghost".to_string()),
            ..Default::default()
        };
        assert_eq!(directory.update("nope", &update), None);
    }

    #[test]
    fn test_empty_update_persists_unchanged_record() {
        let (_dir, mut directory) = directory(6);
        let user = directory.create(input("erin", "erin@x.com"));
        let updated = directory.update(&user.id, &UserUpdate::default()).unwrap();
        assert_eq!(updated, user);
        assert_eq!(directory.list_all(), vec![user]);
    }

    #[test]
    fn test_delete_miss_leaves_file_untouched() {
        let (_dir, mut directory) = directory(7);
        directory.create(input("frank", "frank@x.com"));
        let before = std::fs::read_to_string(directory.store().path()).unwrap();

        assert!(!directory.delete("missing-id"));

        let after = std::fs::read_to_string(directory.store().path()).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_delete_removes_owned_posts() {
        let (_dir, mut directory) = directory(8);
        let keep = directory.create(input("gina", "gina@x.com"));
        let gone = directory.create(input("hank", "hank@x.com"));
        let gone_posts: HashSet<_> = gone.posts.iter().map(|p| p.id.clone()).collect();

        assert!(directory.delete(&gone.id));

        let remaining: Vec<User> = directory.list_all();
        assert_eq!(remaining, vec![keep]);
        assert!(remaining
            .iter()
            .flat_map(|u| u.posts.iter())
            .all(|p| !gone_posts.contains(&p.id)));
        assert_eq!(directory.aggregate().total_posts, remaining[0].posts.len());
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let (_dir, mut directory) = directory(9);
        directory.create(input("Alice", "alice@example.com"));
        directory.create(input("bob", "BOB@alice.org"));
        directory.create(input("carol", "carol@example.com"));

        let upper = directory.search("Alice");
        let lower = directory.search("alice");
        assert_eq!(upper, lower);
        let names: Vec<_> = upper.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, vec!["Alice", "bob"]);

        assert_eq!(directory.search("EXAMPLE.com").len(), 2);
        assert!(directory.search("zed").is_empty());
    }

    #[test]
    fn test_operations_see_external_writes() {
        let (_dir, mut directory) = directory(10);
        let user = directory.create(input("ivy", "ivy@x.com"));

        // another process empties the file
        RecordStore::at(directory.store().path()).save(&[]);

        assert_eq!(directory.find_by_id(&user.id), None);
        assert!(!directory.delete(&user.id));
    }

    #[test]
    fn test_aggregate_counts() {
        let (_dir, mut directory) = directory(11);
        assert_eq!(directory.aggregate(), Stats::default());

        let a = directory.create(input("a", "a@x.com"));
        let b = directory.create(input("b", "b@x.com"));

        let mut users = directory.list_all();
        users[1].posts.clear();
        users[1].created_at = Utc::now() - Duration::days(30);
        directory.store().save(&users);

        let stats = directory.aggregate();
        assert_eq!(stats.total_users, 2);
        assert_eq!(stats.total_posts, a.posts.len());
        assert_eq!(stats.users_with_posts, 1);
        assert_eq!(stats.recent_users, 1);
        assert_eq!(
            directory.post_counts(),
            vec![
                UserPostCount {
                    user_id: a.id.clone(),
                    username: "a".to_string(),
                    post_count: a.posts.len(),
                },
                UserPostCount {
                    user_id: b.id.clone(),
                    username: "b".to_string(),
                    post_count: 0,
                },
            ]
        );
    }

    #[test]
    fn test_file_info_and_backup() {
        let (dir, mut directory) = directory(12);
        let info = directory.file_info();
        assert!(!info.exists);
        assert_eq!(info.user_count, 0);
        assert_eq!(directory.backup().unwrap(), None);

        directory.create(input("jo", "jo@x.com"));
        let info = directory.file_info();
        assert!(info.exists);
        assert_eq!(info.user_count, 1);
        assert!(info.path.ends_with("users.json"));

        let backup = directory.backup().unwrap().unwrap();
        assert!(backup.starts_with(dir.path().join("backups")));
        assert_eq!(RecordStore::at(backup).load().len(), 1);
    }
}
