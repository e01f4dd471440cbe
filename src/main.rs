use crate::commands::{Cli, Commands};
use anyhow::Result;
use clap::Parser;
use indicatif::MultiProgress;
use indicatif_log_bridge::LogWrapper;

mod actions;
mod akai;
mod cd;
mod commands;
mod error;
mod fat;
mod generalized;
mod roland;
mod stream;
mod transcoder;
mod tree;
mod util;
mod wav;

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let logger = env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .build();

    let level = logger.filter();
    let pb = MultiProgress::new();

    LogWrapper::new(pb.clone(), logger).try_init()?;
    log::set_max_level(level);

    let cli = Cli::parse();

    match cli.command {
        Commands::Ls(cmd) => actions::ls(&cmd.image, &cmd.path)?,
        Commands::Export(cmd) => {
            actions::export(&cmd.image, cmd.format, &cmd.destination, &pb)?;
        }
    }

    Ok(())
}
