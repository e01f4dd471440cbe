use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI for browsing and extracting samples from sampler disc images.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Eq, PartialEq)]
pub enum Commands {
    Ls(LsCommand),
    Export(ExportCommand),
}

/// Lists the contents of a directory in the image, or the details of a sample or program.
#[derive(Parser, Debug, Clone, Eq, PartialEq)]
pub struct LsCommand {
    /// Disc image, MDF/MDX file or cue sheet
    #[arg(value_name = "IMAGE")]
    pub image: PathBuf,

    /// Path inside the image, separated by `/` or `\`
    #[arg(value_name = "PATH", default_value = "")]
    pub path: String,
}

/// Exports every sample in the image as audio files.
#[derive(Parser, Debug, Clone, Eq, PartialEq)]
pub struct ExportCommand {
    /// Disc image, MDF/MDX file or cue sheet
    #[arg(value_name = "IMAGE")]
    pub image: PathBuf,

    /// Output audio format
    #[arg(long, short = 'f', value_enum, default_value_t = ExportFormat::Wav)]
    pub format: ExportFormat,

    /// Directory the exported files are written to
    #[arg(long, short = 'd', value_name = "DESTINATION", default_value = ".")]
    pub destination: PathBuf,
}

#[derive(ValueEnum, Debug, Clone, Copy, Eq, PartialEq)]
pub enum ExportFormat {
    Wav,
}
