use roster_types::{FileInfo, Stats, User, UserPostCount};

use crate::table::{render_box, render_table, truncate};

const CONTENT_PREVIEW_CHARS: usize = 42;
/// Wide enough for a full UUID, since view, edit and delete need the exact id.
const ID_WIDTH: usize = 36;

pub const MENU_OPTIONS: [&str; 9] = [
    "List All Users",
    "View User Details",
    "Add New User",
    "Edit User",
    "Delete User",
    "Search Users",
    "Statistics",
    "Reload from File",
    "Exit",
];

pub fn format_intro(platform: &str, pid: u32) -> String {
    let mut lines = vec![
        "USER MANAGEMENT SYSTEM".to_string(),
        String::new(),
        format!("Platform:   {}", platform),
        format!("Process ID: {}", pid),
        format!("Version:    {}", env!("CARGO_PKG_VERSION")),
    ];
    lines.push(String::new());
    lines.push("Ready to manage your users.".to_string());
    lines.join("\n")
}

pub fn format_menu() -> String {
    let entries: Vec<Option<String>> = MENU_OPTIONS
        .iter()
        .enumerate()
        .map(|(i, label)| Some(format!("{}. {}", i + 1, label)))
        .collect();
    format!("\nUSER MANAGEMENT SYSTEM\n{}", render_box(&entries))
}

pub fn format_user_table(users: &[User]) -> String {
    if users.is_empty() {
        return "No users found.".to_string();
    }

    let rows: Vec<Vec<String>> = users
        .iter()
        .map(|user| {
            vec![
                user.id.clone(),
                user.username.clone(),
                user.email.clone(),
                user.post_count().to_string(),
                user.created_at.format("%Y-%m-%d").to_string(),
            ]
        })
        .collect();

    format!(
        "\nALL USERS ({})\n{}",
        users.len(),
        render_table(
            &["ID", "Username", "Email", "Posts", "Created At"],
            &[ID_WIDTH, 18, 25, 5, 10],
            &rows,
        )
    )
}

pub fn format_search_results(users: &[User]) -> String {
    if users.is_empty() {
        return "No users found matching your search.".to_string();
    }

    let rows: Vec<Vec<String>> = users
        .iter()
        .map(|user| {
            vec![
                user.id.clone(),
                user.username.clone(),
                user.email.clone(),
                user.post_count().to_string(),
            ]
        })
        .collect();

    format!(
        "\nSEARCH RESULTS ({} found)\n{}",
        users.len(),
        render_table(&["ID", "Username", "Email", "Posts"], &[ID_WIDTH, 18, 25, 5], &rows)
    )
}

pub fn format_user_details(user: &User) -> String {
    let mut lines = vec![
        "\nUSER DETAILS".to_string(),
        render_box(&[
            Some(format!("ID: {}", user.id)),
            Some(format!("Username: {}", user.username)),
            Some(format!("Email: {}", user.email)),
            Some(format!(
                "Created At: {}",
                user.created_at.format("%Y-%m-%d %H:%M:%S UTC")
            )),
            Some(format!("Total Posts: {}", user.post_count())),
        ]),
    ];

    if user.posts.is_empty() {
        lines.push("\nNo posts found for this user.".to_string());
        return lines.join("\n");
    }

    let mut entries = Vec::new();
    for (index, post) in user.posts.iter().enumerate() {
        if index > 0 {
            entries.push(None);
        }
        entries.push(Some(format!("{}. {}", index + 1, post.title)));
        entries.push(Some(format!("Tag: {}", post.tag)));
        entries.push(Some(format!(
            "Created: {}",
            post.created_at.format("%Y-%m-%d")
        )));
        entries.push(Some(format!(
            "Content: {}",
            truncate(&post.content.replace('\n', " "), CONTENT_PREVIEW_CHARS)
        )));
    }
    lines.push("\nPOSTS".to_string());
    lines.push(render_box(&entries));
    lines.join("\n")
}

pub fn format_created_user(user: &User) -> String {
    format!(
        "User created successfully!\n{}",
        render_box(&[
            Some(format!("ID: {}", user.id)),
            Some(format!("Username: {}", user.username)),
            Some(format!("Email: {}", user.email)),
            Some(format!("Welcome posts: {}", user.post_count())),
        ])
    )
}

pub fn format_updated_user(user: &User) -> String {
    format!(
        "User updated successfully!\n{}",
        render_box(&[
            Some(format!("Username: {}", user.username)),
            Some(format!("Email: {}", user.email)),
        ])
    )
}

pub fn format_delete_warning(user: &User) -> String {
    render_box(&[
        Some("WARNING: This action cannot be undone!".to_string()),
        Some(format!("You are about to delete user: {}", user.username)),
        Some(format!("This will also delete {} posts.", user.post_count())),
    ])
}

pub fn format_stats(stats: &Stats, top_posters: &[UserPostCount]) -> String {
    let mut lines = vec![
        "\nSTATISTICS".to_string(),
        render_box(&[
            Some(format!("Total Users: {}", stats.total_users)),
            Some(format!("Total Posts: {}", stats.total_posts)),
            Some(format!("Users with Posts: {}", stats.users_with_posts)),
            Some(format!(
                "Average Posts per User: {:.2}",
                stats.average_posts_per_user()
            )),
            Some(format!("New Users (last 7 days): {}", stats.recent_users)),
        ]),
    ];

    if !top_posters.is_empty() {
        let rows: Vec<Vec<String>> = top_posters
            .iter()
            .map(|entry| vec![entry.username.clone(), entry.post_count.to_string()])
            .collect();
        lines.push("\nTOP POSTERS".to_string());
        lines.push(render_table(&["Username", "Posts"], &[30, 5], &rows));
    }

    lines.join("\n")
}

pub fn format_file_info(info: &FileInfo) -> String {
    let mut lines = vec![
        format!("Data File: {}", info.path),
        format!("Loaded Users: {}", info.user_count),
    ];
    if !info.exists {
        lines.push("(file does not exist yet)".to_string());
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use roster_types::Post;

    fn user_with_posts(posts: usize) -> User {
        let ts = Utc.with_ymd_and_hms(2024, 6, 7, 8, 9, 10).unwrap();
        User {
            id: "0f8c2a6e-4b1d-4c55-9a3e-2d7f6b1e9c01".to_string(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "hunter2".to_string(),
            created_at: ts,
            posts: (0..posts)
                .map(|i| Post {
                    id: format!("p{}", i),
                    title: format!("Post {}", i + 1),
                    tag: "travel".to_string(),
                    content: "Lorem ipsum dolor sit amet, consectetur adipiscing elit.\nSed do."
                        .to_string(),
                    created_at: ts,
                    published_by: "0f8c2a6e".to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_menu_lists_nine_options() {
        let menu = format_menu();
        assert!(menu.contains("1. List All Users"));
        assert!(menu.contains("8. Reload from File"));
        assert!(menu.contains("9. Exit"));
    }

    #[test]
    fn test_user_table() {
        assert_eq!(format_user_table(&[]), "No users found.");
        let table = format_user_table(&[user_with_posts(2)]);
        assert!(table.contains("ALL USERS (1)"));
        assert!(table.contains("│ 0f8c2a6e-4b1d-4c55-9a3e-2d7f6b1e9c01 │"));
        assert!(table.contains("alice@example.com"));
        assert!(table.contains("2024-06-07"));
    }

    #[test]
    fn test_details_never_show_password() {
        let details = format_user_details(&user_with_posts(1));
        assert!(!details.contains("hunter2"));
        assert!(details.contains("Total Posts: 1"));
        assert!(details.contains("Tag: travel"));
        assert!(details.contains("Content: Lorem ipsum dolor sit amet, consectetur..."));
    }

    #[test]
    fn test_details_without_posts() {
        let details = format_user_details(&user_with_posts(0));
        assert!(details.contains("No posts found for this user."));
    }

    #[test]
    fn test_stats() {
        let stats = Stats {
            total_users: 3,
            total_posts: 4,
            users_with_posts: 2,
            recent_users: 1,
        };
        let text = format_stats(&stats, &[]);
        assert!(text.contains("Average Posts per User: 1.33"));
        assert!(!text.contains("TOP POSTERS"));
    }

    #[test]
    fn test_search_results() {
        assert_eq!(
            format_search_results(&[]),
            "No users found matching your search."
        );
        let results = format_search_results(&[user_with_posts(0)]);
        assert!(results.contains("SEARCH RESULTS (1 found)"));
        assert!(results.contains("0f8c2a6e-4b1d-4c55-9a3e-2d7f6b1e9c01"));
    }
}
