use std::fmt::Display;
use std::io::Write;

use anyhow::Result;
use roster_config::Config;
use roster_directory::UserDirectory;
use roster_output::*;
use roster_store::RecordStore;
use roster_types::{UserInput, UserPostCount, UserUpdate};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info};

const TOP_POSTERS: usize = 5;

/// The interactive menu loop.
///
/// Reads one line at a time from `input` and writes every screen to `output`.
/// End of input behaves like choosing "Exit".
pub struct Session<I, W> {
    config: Config,
    directory: UserDirectory,
    input: I,
    output: W,
    running: bool,
    input_closed: bool,
}

impl<I, W> Session<I, W>
where
    I: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(config: Config, input: I, output: W) -> Self {
        let directory = open_directory(&config);
        Self {
            config,
            directory,
            input,
            output,
            running: true,
            input_closed: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        if self.config.session.show_intro {
            self.say(format_intro(std::env::consts::OS, std::process::id()))?;
            self.pause().await?;
        }
        self.say("Welcome to User Management System!")?;

        while self.running {
            self.say(format_menu())?;
            let choice = self.ask("\nChoose an option (1-9): ").await?;
            if self.input_closed && choice.trim().is_empty() {
                self.exit()?;
                break;
            }

            debug!("Menu choice {:?}", choice.trim());
            match choice.trim() {
                "1" => self.list_all_users().await?,
                "2" => self.view_user_details().await?,
                "3" => self.add_user().await?,
                "4" => self.edit_user().await?,
                "5" => self.delete_user().await?,
                "6" => self.search_users().await?,
                "7" => self.show_statistics().await?,
                "8" => self.reload_from_file().await?,
                "9" => self.exit()?,
                _ => self.say("Invalid option! Please choose 1-9.")?,
            }
        }

        Ok(())
    }

    async fn list_all_users(&mut self) -> Result<()> {
        let users = self.directory.list_all();
        self.say(format_user_table(&users))?;
        if !users.is_empty() {
            self.pause().await?;
        }
        Ok(())
    }

    async fn view_user_details(&mut self) -> Result<()> {
        let id = self.ask("Enter User ID: ").await?;
        let Some(user) = self.directory.find_by_id(id.trim()) else {
            return self.say("User not found!");
        };

        self.say(format_user_details(&user))?;
        self.pause().await
    }

    async fn add_user(&mut self) -> Result<()> {
        self.say("\nADD NEW USER")?;
        let username = self.ask("Username: ").await?;
        let email = self.ask("Email: ").await?;
        let password = self.ask("Password: ").await?;

        let input = match UserInput::new(&username, &email, &password) {
            Ok(input) => input,
            Err(e) => return self.say(e),
        };

        let user = self.directory.create(input);
        self.say(format_created_user(&user))?;
        self.pause().await
    }

    async fn edit_user(&mut self) -> Result<()> {
        let id = self.ask("Enter User ID to edit: ").await?;
        let id = id.trim();
        let Some(user) = self.directory.find_by_id(id) else {
            return self.say("User not found!");
        };

        self.say("\nEDIT USER (leave blank to keep current value)")?;
        let username = self.ask(&format!("Username ({}): ", user.username)).await?;
        let email = self.ask(&format!("Email ({}): ", user.email)).await?;
        let password = self.ask("Password (leave blank to keep): ").await?;

        let update = UserUpdate::from_answers(&username, &email, &password);
        if update.is_empty() {
            return self.say("No changes made.");
        }

        match self.directory.update(id, &update) {
            Some(updated) => self.say(format_updated_user(&updated))?,
            None => self.say("Failed to update user!")?,
        }
        self.pause().await
    }

    async fn delete_user(&mut self) -> Result<()> {
        let id = self.ask("Enter User ID to delete: ").await?;
        let id = id.trim();
        let Some(user) = self.directory.find_by_id(id) else {
            return self.say("User not found!");
        };

        self.say(format_delete_warning(&user))?;
        let token = self.config.session.delete_confirmation.clone();
        let confirm = self.ask(&format!("Type '{}' to confirm: ", token)).await?;

        if confirm.trim() == token {
            if self.directory.delete(id) {
                info!("Operator deleted user {}", id);
                self.say("User deleted successfully!")?;
            } else {
                self.say("Failed to delete user!")?;
            }
        } else {
            self.say("Deletion cancelled.")?;
        }
        self.pause().await
    }

    async fn search_users(&mut self) -> Result<()> {
        let query = self.ask("Search by username or email: ").await?;
        let query = query.trim();
        if query.is_empty() {
            return self.say("Please enter a search query!");
        }

        let results = self.directory.search(query);
        self.say(format_search_results(&results))?;
        if !results.is_empty() {
            self.pause().await?;
        }
        Ok(())
    }

    async fn show_statistics(&mut self) -> Result<()> {
        let stats = self.directory.aggregate();
        let top = top_posters(self.directory.post_counts());
        self.say(format_stats(&stats, &top))?;
        self.pause().await
    }

    async fn reload_from_file(&mut self) -> Result<()> {
        self.say(format!(
            "Reloading data from {}...",
            self.config.storage.data_file
        ))?;

        self.directory = open_directory(&self.config);
        let info = self.directory.file_info();

        self.say(format!("Reloaded {} users from file", info.user_count))?;
        self.say(format_file_info(&info))?;
        self.pause().await
    }

    fn exit(&mut self) -> Result<()> {
        self.running = false;
        self.say("\nThank you for using User Management System!")
    }

    async fn pause(&mut self) -> Result<()> {
        if self.config.session.pause_after_output {
            self.ask("\nPress Enter to continue...").await?;
        }
        Ok(())
    }

    /// Prints `prompt` and reads one line without its line ending. Returns an
    /// empty string once input is exhausted.
    async fn ask(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line).await? == 0 {
            self.input_closed = true;
            writeln!(self.output)?;
        }
        Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string())
    }

    fn say(&mut self, text: impl Display) -> Result<()> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }
}

fn open_directory(config: &Config) -> UserDirectory {
    let store = RecordStore::new(&config.data_dir(), &config.storage.data_file);
    UserDirectory::new(store)
}

fn top_posters(mut counts: Vec<UserPostCount>) -> Vec<UserPostCount> {
    counts.retain(|entry| entry.post_count > 0);
    counts.sort_by(|a, b| b.post_count.cmp(&a.post_count));
    counts.truncate(TOP_POSTERS);
    counts
}
