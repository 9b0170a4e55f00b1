use crate::board::Board;
use crate::solver::{BoggleSolver, WordPath, total_score};
use crate::trie::Trie;
use anyhow::{Context, Result, anyhow};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task;
use tracing::{info, warn};

pub const MISSING_BOARD: &str = "board is null: pass one with --board or --grid";

/// Where a board comes from
#[derive(Debug, Clone)]
pub enum BoardSource {
    /// Board file with a `rows cols` header
    File(PathBuf),
    /// Comma separated rows of letters, e.g. `CA,TS`
    Grid(String),
}

impl BoardSource {
    pub fn load(&self) -> Result<Board> {
        match self {
            BoardSource::File(path) => load_board(path),
            BoardSource::Grid(grid) => {
                let rows: Vec<&str> = grid.split(',').map(str::trim).collect();
                Board::from_rows(&rows).with_context(|| format!("invalid grid {grid:?}"))
            }
        }
    }
}

/// A loaded dictionary, an optional board, and the words found on it
#[derive(Clone)]
pub struct Session {
    solver: Arc<BoggleSolver>,
    board: Option<Board>,
    found: Vec<WordPath>,
    found_index: Arc<Trie<usize>>,
}

impl Session {
    /// Loads the dictionary and, if given, solves the board
    pub fn load(dictionary: &Path, board: Option<&BoardSource>) -> Result<Self> {
        let words = load_words(dictionary)?;
        let board = board.map(BoardSource::load).transpose()?;
        Ok(Self::new(BoggleSolver::new(&words), board))
    }

    /// Same as [`Session::load`], on the blocking thread pool
    pub async fn load_in_background(
        dictionary: PathBuf,
        board: Option<BoardSource>,
    ) -> Result<Self> {
        task::spawn_blocking(move || Self::load(&dictionary, board.as_ref())).await?
    }

    pub fn new(solver: BoggleSolver, board: Option<Board>) -> Self {
        let found = board
            .as_ref()
            .map(|board| solver.solve_with_paths(board))
            .unwrap_or_default();

        let mut found_index = Trie::new();
        for (i, path) in found.iter().enumerate() {
            if let Err(err) = found_index.insert(&path.word, i) {
                warn!(index = i, "skipping found word: {err}");
            }
        }

        if board.is_some() {
            info!(
                words = found.len(),
                score = total_score(found.iter().map(|f| f.word.as_str())),
                "board solved"
            );
        }

        Self {
            solver: Arc::new(solver),
            board,
            found,
            found_index: Arc::new(found_index),
        }
    }

    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    /// The board, or an error when none was loaded
    pub fn require_board(&self) -> Result<&Board> {
        self.board
            .as_ref()
            .ok_or_else(|| anyhow!(MISSING_BOARD))
    }

    pub fn dictionary_size(&self) -> usize {
        self.solver.dictionary().len()
    }

    /// Found words in traversal order
    pub fn found(&self) -> &[WordPath] {
        &self.found
    }

    pub fn total_score(&self) -> u32 {
        total_score(self.found.iter().map(|f| f.word.as_str()))
    }

    /// Found words starting with prefix, sorted
    pub fn found_starting_with(&self, prefix: &str) -> Vec<&WordPath> {
        self.found_index
            .keys_with_prefix(&prefix.to_ascii_uppercase())
            .iter()
            .filter_map(|word| self.found_index.get(word).ok().flatten())
            .map(|&i| &self.found[i])
            .collect()
    }

    /// Dictionary words starting with prefix
    pub fn words_starting_with(&self, prefix: &str) -> Vec<String> {
        self.solver
            .dictionary()
            .keys_with_prefix(&prefix.to_ascii_uppercase())
    }

    /// Dictionary words matching a `.` wildcard pattern
    pub fn words_matching(&self, pattern: &str) -> Vec<String> {
        self.solver
            .dictionary()
            .keys_that_match(&pattern.to_ascii_uppercase())
    }

    /// Longest dictionary word that `query` starts with
    pub fn longest_word_in(&self, query: &str) -> Option<String> {
        let query = query.to_ascii_uppercase();
        self.solver
            .dictionary()
            .longest_prefix_of(&query)
            .map(str::to_string)
    }
}

/// Reads a whitespace separated word list, uppercased
pub fn load_words(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read dictionary {}", path.display()))?;
    let words = parse_words(&text);
    info!(path = %path.display(), words = words.len(), "dictionary loaded");
    Ok(words)
}

fn load_board(path: &Path) -> Result<Board> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read board {}", path.display()))?;
    let board = Board::parse(&text)
        .with_context(|| format!("failed to parse board {}", path.display()))?;
    info!(path = %path.display(), rows = board.rows(), cols = board.cols(), "board loaded");
    Ok(board)
}

pub fn parse_words(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|word| word.to_ascii_uppercase())
        .collect()
}
