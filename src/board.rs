use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

static TILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?i)(qu|[a-z])$").expect("tile pattern is valid"));

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("board is missing its `rows cols` header")]
    MissingHeader,
    #[error("invalid board header: {0:?}")]
    BadHeader(String),
    #[error("invalid tile {token:?} at row {row}, col {col}")]
    BadTile { token: String, row: usize, col: usize },
    #[error("expected {expected} tiles, found {found}")]
    TileCount { expected: usize, found: usize },
    #[error("row {row} has {found} letters, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Rectangular grid of uppercase letters. A `Qu` tile is stored as `Q`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: usize,
    cols: usize,
    letters: Vec<u8>,
}

impl Board {
    /// Builds a board from rows of letters, one cell per character
    pub fn from_rows(rows: &[&str]) -> Result<Self, BoardError> {
        let cols = rows.first().map_or(0, |row| row.len());
        let mut letters = Vec::with_capacity(rows.len() * cols);

        for (r, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(BoardError::RaggedRow {
                    row: r,
                    expected: cols,
                    found: row.len(),
                });
            }
            for (c, ch) in row.chars().enumerate() {
                if !ch.is_ascii_alphabetic() {
                    return Err(BoardError::BadTile {
                        token: ch.to_string(),
                        row: r,
                        col: c,
                    });
                }
                letters.push(ch.to_ascii_uppercase() as u8);
            }
        }

        Ok(Self {
            rows: rows.len(),
            cols,
            letters,
        })
    }

    /// Parses the text board format: a `rows cols` header followed by
    /// `rows * cols` whitespace separated tiles (single letters or `Qu`).
    pub fn parse(text: &str) -> Result<Self, BoardError> {
        let mut lines = text.lines().skip_while(|line| line.trim().is_empty());
        let header = lines.next().ok_or(BoardError::MissingHeader)?;

        let dims: Vec<usize> = header
            .split_whitespace()
            .map(str::parse)
            .collect::<Result<_, _>>()
            .map_err(|_| BoardError::BadHeader(header.trim().to_string()))?;
        let &[rows, cols] = dims.as_slice() else {
            return Err(BoardError::BadHeader(header.trim().to_string()));
        };

        let tokens: Vec<&str> = lines.flat_map(str::split_whitespace).collect();
        let expected = rows
            .checked_mul(cols)
            .ok_or_else(|| BoardError::BadHeader(header.trim().to_string()))?;
        if tokens.len() != expected {
            return Err(BoardError::TileCount {
                expected,
                found: tokens.len(),
            });
        }

        let mut letters = Vec::with_capacity(expected);
        for (i, token) in tokens.iter().enumerate() {
            if !TILE.is_match(token) {
                return Err(BoardError::BadTile {
                    token: token.to_string(),
                    row: i / cols,
                    col: i % cols,
                });
            }
            letters.push(token.as_bytes()[0].to_ascii_uppercase());
        }

        Ok(Self {
            rows,
            cols,
            letters,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    pub fn letter_at(&self, row: usize, col: usize) -> u8 {
        self.letters[row * self.cols + col]
    }

    /// In-bounds cells of the 3x3 block around `(row, col)`, excluding itself
    pub fn neighbors(&self, row: usize, col: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        let rows = row.saturating_sub(1)..(row + 2).min(self.rows);
        rows.flat_map(move |r| {
            (col.saturating_sub(1)..(col + 2).min(self.cols)).map(move |c| (r, c))
        })
        .filter(move |&cell| cell != (row, col))
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.rows, self.cols)?;
        for r in 0..self.rows {
            let tiles: Vec<&str> = (0..self.cols)
                .map(|c| tile_label(self.letter_at(r, c)))
                .collect();
            writeln!(f, "{}", tiles.join(" "))?;
        }
        Ok(())
    }
}

/// Printable face of a tile
pub fn tile_label(letter: u8) -> &'static str {
    const FACES: [&str; 26] = [
        "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Qu", "R",
        "S", "T", "U", "V", "W", "X", "Y", "Z",
    ];
    FACES
        .get(letter.wrapping_sub(b'A') as usize)
        .copied()
        .unwrap_or("?")
}
