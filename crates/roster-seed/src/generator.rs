use chrono::{DateTime, Duration, Utc};
use rand::distributions::Alphanumeric;
use rand::seq::SliceRandom;
use rand::Rng;
use roster_directory::lorem;
use roster_types::{Post, User, SEED_POST_TAGS};
use serde::Serialize;
use uuid::{Builder, Uuid};

pub const DEFAULT_SEED_USERS: usize = 20;
pub const MAX_SEED_POSTS: usize = 5;
pub const POST_AGE_DAYS: i64 = 60;
pub const USER_AGE_DAYS: i64 = 365;

const ADJECTIVES: &[&str] = &[
    "quiet", "brave", "lucky", "sunny", "clever", "swift", "mellow", "bold", "gentle", "witty",
    "rusty", "cosmic",
];

const NOUNS: &[&str] = &[
    "otter", "falcon", "maple", "river", "comet", "badger", "pixel", "harbor", "willow", "lynx",
    "cedar", "nova",
];

const DOMAINS: &[&str] = &[
    "example.com",
    "example.org",
    "example.net",
    "mail.test",
    "inbox.test",
];

/// Document written by `--snapshot`: the generated users plus totals.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot<'a> {
    #[serde(with = "roster_types::timestamp")]
    pub generated_at: DateTime<Utc>,
    pub total_users: usize,
    pub total_posts: usize,
    pub users: &'a [User],
}

impl<'a> Snapshot<'a> {
    pub fn new(users: &'a [User], generated_at: DateTime<Utc>) -> Self {
        Self {
            generated_at,
            total_users: users.len(),
            total_posts: total_posts(users),
            users,
        }
    }
}

pub fn generate_users<R: Rng + ?Sized>(rng: &mut R, count: usize, now: DateTime<Utc>) -> Vec<User> {
    (0..count).map(|_| generate_user(rng, now)).collect()
}

pub fn generate_user<R: Rng + ?Sized>(rng: &mut R, now: DateTime<Utc>) -> User {
    let id = random_id(rng);
    let username = generate_username(rng);
    let post_count = rng.gen_range(1..=MAX_SEED_POSTS);
    let posts = (0..post_count)
        .map(|_| generate_post(rng, &id, now))
        .collect();

    User {
        email: generate_email(rng, &username),
        password: generate_password(rng),
        created_at: random_past(rng, now, USER_AGE_DAYS),
        id,
        username,
        posts,
    }
}

fn generate_post<R: Rng + ?Sized>(rng: &mut R, user_id: &str, now: DateTime<Utc>) -> Post {
    Post {
        id: random_id(rng),
        title: lorem::sentence(rng),
        tag: SEED_POST_TAGS.choose(rng).copied().unwrap_or("technology").to_string(),
        content: lorem::paragraphs(rng, 3),
        created_at: random_past(rng, now, POST_AGE_DAYS),
        published_by: user_id.to_string(),
    }
}

/// Lowercase `[a-z0-9_]` only.
fn generate_username<R: Rng + ?Sized>(rng: &mut R) -> String {
    let adjective = ADJECTIVES.choose(rng).copied().unwrap_or("quiet");
    let noun = NOUNS.choose(rng).copied().unwrap_or("otter");
    format!("{}_{}{}", adjective, noun, rng.gen_range(10..100))
}

fn generate_email<R: Rng + ?Sized>(rng: &mut R, username: &str) -> String {
    let domain = DOMAINS.choose(rng).copied().unwrap_or("example.com");
    format!("{}@{}", username, domain)
}

fn generate_password<R: Rng + ?Sized>(rng: &mut R) -> String {
    let base: String = (0..12).map(|_| rng.sample(Alphanumeric) as char).collect();
    format!("{}A1!", base)
}

fn random_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    let uuid: Uuid = Builder::from_random_bytes(rng.gen()).into_uuid();
    uuid.to_string()
}

/// A millisecond-aligned instant within the last `days` days.
fn random_past<R: Rng + ?Sized>(rng: &mut R, now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    let max_ms = days * 24 * 60 * 60 * 1000;
    now - Duration::milliseconds(rng.gen_range(1..=max_ms))
}

pub fn total_posts(users: &[User]) -> usize {
    users.iter().map(User::post_count).sum()
}

pub fn format_summary(users: &[User]) -> String {
    let mut lines = vec![
        "SAMPLE DATA SUMMARY".to_string(),
        "===================".to_string(),
        format!("Total users: {}", users.len()),
        format!("Total posts: {}", total_posts(users)),
    ];

    if !users.is_empty() {
        lines.push(String::new());
        lines.push("First users:".to_string());
        for (index, user) in users.iter().take(5).enumerate() {
            lines.push(format!(
                "{}. {}\t{}\t{} posts",
                index + 1,
                user.username,
                user.email,
                user.post_count()
            ));
        }
    }

    if let Some(post) = users.first().and_then(|u| u.posts.first()) {
        let preview: String = post.content.chars().take(100).collect();
        lines.push(String::new());
        lines.push("Sample post:".to_string());
        lines.push(format!("Title: {}", post.title));
        lines.push(format!("Tag: {}", post.tag));
        lines.push(format!("Content: {} ...", preview));
    }

    lines.join("\n")
}
