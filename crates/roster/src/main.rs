use std::fs::OpenOptions;

use anyhow::Result;
use roster_config::{get_log_dir, Config};
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod session;

use session::Session;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let code = match run().await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Application error: {:#}", e);
            1
        }
    };
    // Exit from inside the runtime: a pending stdin read would otherwise keep
    // runtime shutdown waiting for another line.
    std::process::exit(code);
}

async fn run() -> Result<()> {
    let config = Config::load()?;
    init_logging(&config)?;

    info!("Starting roster, data file {}", config.data_path().display());

    let input = BufReader::new(tokio::io::stdin());
    let mut session = Session::new(config, input, std::io::stdout());

    tokio::select! {
        result = session.run() => result,
        _ = tokio::signal::ctrl_c() => {
            println!("\nGoodbye!");
            info!("Interrupted, shutting down");
            Ok(())
        }
    }
}

fn init_logging(config: &Config) -> Result<()> {
    let log_dir = get_log_dir();
    std::fs::create_dir_all(&log_dir)?;

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("roster.log"))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(log_file)
        .with_ansi(false)
        .init();

    Ok(())
}
