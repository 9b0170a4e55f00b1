mod board;
mod session;
mod solver;
mod trie;
mod tui;

use crate::session::{BoardSource, MISSING_BOARD, Session, load_words};
use crate::solver::{BoggleSolver, total_score};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::Level;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

/// Finds and scores every dictionary word traceable on a Boggle board
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Word list, whitespace separated
    #[arg(short, long)]
    dictionary: PathBuf,

    /// Board file: a `rows cols` header followed by the tiles
    #[arg(short, long)]
    board: Option<PathBuf>,

    /// Board given inline as comma separated rows, e.g. `CAT,ORE,DEN`
    #[arg(short, long, conflicts_with = "board")]
    grid: Option<String>,

    /// More logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

/// Available subcommands
#[derive(Subcommand)]
enum Commands {
    /// Print the total score of the board
    Score,
    /// List every word found on the board with its score
    Words,
    /// List dictionary words starting with prefix
    Prefix { prefix: String },
    /// List dictionary words matching a pattern, `.` matches any letter
    Match { pattern: String },
    /// Print the longest dictionary word that query starts with
    Longest { query: String },
}

impl Cli {
    fn board_source(&self) -> Option<BoardSource> {
        match (&self.board, &self.grid) {
            (Some(path), _) => Some(BoardSource::File(path.clone())),
            (None, Some(grid)) => Some(BoardSource::Grid(grid.clone())),
            (None, None) => None,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_file.as_deref(), cli.command.is_none())?;

    let board = cli.board_source();

    match cli.command {
        Some(Commands::Score) => {
            let board = board.context(MISSING_BOARD)?.load()?;
            let solver = BoggleSolver::new(load_words(&cli.dictionary)?);
            println!("Score = {}", total_score(solver.solve(&board)));
        }
        Some(Commands::Words) => {
            let session = Session::load(&cli.dictionary, board.as_ref())?;
            session.require_board()?;
            for found in session.found() {
                println!("{} {}", found.word, found.score());
            }
            println!("Score = {}", session.total_score());
        }
        Some(Commands::Prefix { prefix }) => {
            let session = Session::load(&cli.dictionary, None)?;
            for word in session.words_starting_with(&prefix) {
                println!("{word}");
            }
        }
        Some(Commands::Match { pattern }) => {
            let session = Session::load(&cli.dictionary, None)?;
            for word in session.words_matching(&pattern) {
                println!("{word}");
            }
        }
        Some(Commands::Longest { query }) => {
            let session = Session::load(&cli.dictionary, None)?;
            match session.longest_word_in(&query) {
                Some(word) => println!("{word}"),
                None => anyhow::bail!("no dictionary word is a prefix of {query:?}"),
            }
        }
        None => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(async {
                let session = Session::load_in_background(cli.dictionary, board).await?;
                session.require_board()?;
                tui::run_tui(session).await
            })?;
        }
    }

    Ok(())
}

/// Installs the fmt subscriber. The interactive mode never logs to the
/// terminal it draws on.
fn init_logging(verbose: u8, log_file: Option<&Path>, interactive: bool) -> Result<()> {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let writer = match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None if interactive => BoxMakeWriter::new(std::io::sink),
        None => BoxMakeWriter::new(std::io::stderr),
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(log_file.is_none() && !interactive)
        .with_writer(writer)
        .init();
    Ok(())
}
