use clap::Subcommand;
use std::path::PathBuf;

pub mod decompress;
pub mod inspect;

#[derive(Subcommand)]
pub enum Commands {
    /// Decompress CPRNAV_2 container files
    Decompress {
        /// Container files to decompress
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        paths: Vec<PathBuf>,

        /// Decompress every file in a directory instead
        #[arg(short, long)]
        all: bool,

        /// Directory to scan with --all (defaults to the current directory)
        #[arg(short, long, requires = "all")]
        dir: Option<PathBuf>,

        /// Search subdirectories recursively with --all
        #[arg(short, long, requires = "all")]
        recursive: bool,

        /// Output directory (defaults to alongside each input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Suppress per-file progress output
        #[arg(short, long)]
        quiet: bool,
    },

    /// Show header and block table info without decoding
    Inspect {
        /// Container file to inspect
        path: PathBuf,

        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::Decompress {
                paths,
                all,
                dir,
                recursive,
                output,
                quiet,
            } => decompress::execute(
                paths,
                *all,
                dir.as_deref(),
                *recursive,
                output.as_deref(),
                *quiet,
            ),
            Commands::Inspect { path, json } => inspect::execute(path, *json),
        }
    }
}
