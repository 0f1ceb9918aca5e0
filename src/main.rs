use anyhow::Result;
use clap::Parser;

use inistore::cli::{self, setup, Cli, Commands};
use inistore::LoggerCell;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let loggers = LoggerCell::new();
    let logger = setup::init_logging(&cli.config, &loggers)?;
    tracing::debug!(config = %cli.config.display(), level = %logger.level(), "Logger ready");

    match cli.command {
        Commands::Init { force } => cli::commands::init(&cli.config, force),
        Commands::Show { file, format } => cli::commands::show(&file, format),
        Commands::Get { file, section, key } => cli::commands::get(&file, &section, &key),
        Commands::Set {
            file,
            section,
            key,
            value,
        } => cli::commands::set(&file, &section, &key, &value),
        Commands::Check { file } => cli::commands::check(&file),
    }
}
