use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

mod browse;
mod commands;

#[derive(Parser, Debug)]
#[command(name = "scenewright", version, about = "Screenplay scene indexer and numbering tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the scenes of a script
    Scenes {
        file: PathBuf,
    },
    /// Word counts, durations and per-character statistics
    Stats {
        file: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Report malformed headers and numbering problems
    Check {
        file: PathBuf,
    },
    /// Render the script as plain text, HTML or Fountain
    Export(commands::ExportArgs),
    /// Insert a new scene header below a line, renumbering later scenes
    NewScene {
        file: PathBuf,

        /// Line the cursor is on (1-based); the new header goes below it
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        line: u64,
    },
    /// Make scene numbers dense within every episode
    Renumber {
        file: PathBuf,
    },
    /// Completion candidates for the text left of the cursor
    Suggest {
        file: PathBuf,

        /// Line text from its start up to the cursor
        prefix: String,

        /// Print the completion as JSON
        #[arg(long)]
        json: bool,
    },
    /// Browse the scripts of a project in the terminal
    Browse {
        /// Project directory (defaults to the configured projects path)
        path: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scenes { file } => commands::scenes(&file),
        Commands::Stats { file, json } => commands::stats(&file, json),
        Commands::Check { file } => {
            if commands::check(&file)? {
                process::exit(1);
            }
            Ok(())
        }
        Commands::Export(args) => commands::export(&args),
        Commands::NewScene { file, line } => {
            let cursor_line = usize::try_from(line - 1)?;
            commands::new_scene(&file, cursor_line)
        }
        Commands::Renumber { file } => commands::renumber(&file),
        Commands::Suggest { file, prefix, json } => commands::suggest(&file, &prefix, json),
        Commands::Browse { path } => browse::run(path),
    }
}
