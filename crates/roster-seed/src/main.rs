use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use roster_config::Config;
use roster_directory::UserDirectory;
use roster_store::RecordStore;
use roster_types::timestamp;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod generator;

use generator::{format_summary, generate_users, Snapshot, DEFAULT_SEED_USERS};

const ABOUT: &str = r#"Generate sample users with posts and write them to the roster data file.

The data file is replaced. Unless --no-backup is given, an existing file is
first copied to backups/backup-<unix millis>.json next to it. Run this once
before the first `roster` session to start with demo data."#;

#[derive(Parser)]
#[command(name = "roster-seed")]
#[command(about = ABOUT)]
#[command(version)]
struct Cli {
    #[arg(short = 'n', long, default_value_t = DEFAULT_SEED_USERS, help = "Number of users to generate")]
    count: usize,

    #[arg(short = 'f', long, help = "Data file name (default: storage.data_file from config)")]
    file: Option<String>,

    #[arg(short = 'd', long, help = "Data directory (default: storage.data_dir from config)")]
    data_dir: Option<String>,

    #[arg(long, help = "Also write a snapshot with totals to this file in the data directory")]
    snapshot: Option<String>,

    #[arg(long, help = "Do not back up an existing data file")]
    no_backup: bool,

    #[arg(long, help = "Seed for the random generator, for reproducible data")]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(file) = cli.file {
        config.storage.data_file = file;
    }
    if let Some(dir) = cli.data_dir {
        config.storage.data_dir = Some(dir);
    }

    let data_dir = config.data_dir();
    let store = RecordStore::new(&data_dir, &config.storage.data_file);

    if !cli.no_backup {
        let directory = UserDirectory::new(store.clone());
        match directory.backup()? {
            Some(path) => println!("Backed up existing data to {}", path.display()),
            None => info!("No existing data file to back up"),
        }
    }

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let now = timestamp::now();
    let users = generate_users(&mut rng, cli.count, now);

    println!("{}\n", format_summary(&users));

    store
        .try_save(&users)
        .with_context(|| format!("writing {}", store.path().display()))?;
    println!("{} users saved to: {}", users.len(), store.path().display());

    if let Some(name) = cli.snapshot {
        let path: PathBuf = data_dir.join(name);
        let content = serde_json::to_string_pretty(&Snapshot::new(&users, now))?;
        std::fs::write(&path, content).with_context(|| format!("writing {}", path.display()))?;
        println!("Snapshot saved to: {}", path.display());
    }

    println!("Ready. Run `roster` to start managing users.");
    Ok(())
}
