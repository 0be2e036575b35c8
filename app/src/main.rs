//! Member registration CLI.
//!
//! Loads settings from the local database, then runs one command against it.

use tracing_subscriber::EnvFilter;

use member_registration_lib::cli::{self, Command, USAGE};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let command = Command::parse(std::env::args().skip(1))?;
    if !command.needs_foundation() {
        println!("{USAGE}");
        return Ok(());
    }

    let (db, config, dir) = member_registration_lib::init_foundation()?;
    cli::run(command, db, &config, &dir).await
}
