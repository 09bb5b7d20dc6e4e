mod app;
mod commands;
mod render;

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use vocab_srs::srs::StudyMode;

#[derive(Parser)]
#[command(name = "vocab-srs", about = "Spaced repetition study for vocabulary lists", version)]
struct Cli {
    /// Data directory holding config.toml and saved progress
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Study direction: forward (word -> translation) or reverse
    #[arg(long, global = true)]
    mode: Option<StudyMode>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Show due, new and learning counts for a list
    Status {
        /// Path to a vocabulary list JSON file
        list: PathBuf,
    },

    /// Study a list interactively
    Study {
        /// Path to a vocabulary list JSON file
        list: PathBuf,
        /// Shuffle the queue before starting
        #[arg(long)]
        shuffle: bool,
        /// Override the new-card cap for this session
        #[arg(long)]
        max_new: Option<usize>,
    },

    /// Erase saved progress for a list in one study direction
    Reset {
        /// Path to a vocabulary list JSON file
        list: PathBuf,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && std::io::stdout().is_terminal();
    let app = app::App::new(cli.data_dir)?;

    match cli.command {
        Command::Status { list } => {
            commands::status::run(&app, &list, cli.mode, &cli.format, use_color)?;
        }
        Command::Study { list, shuffle, max_new } => {
            let mode = app.resolve_mode(cli.mode);
            let options = commands::study::StudyOptions {
                mode,
                shuffle: shuffle || app.config.shuffle_on_start,
                max_new_cards: max_new.unwrap_or(app.config.max_new_cards),
            };
            commands::study::run(&app, &list, options, &cli.format, use_color)?;
        }
        Command::Reset { list, yes } => {
            let mode = app.resolve_mode(cli.mode);
            commands::reset::run(&app, &list, mode, yes, &cli.format)?;
        }
    }

    Ok(())
}
