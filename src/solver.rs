use crate::board::Board;
use crate::trie::Trie;
use std::collections::HashSet;
use std::time::Instant;
use tracing::{debug, warn};

/// Words must be longer than this to count
const MIN_WORD_LEN: usize = 2;

/// An accepted word and the cells of the first path that spelled it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordPath {
    pub word: String,
    pub cells: Vec<(usize, usize)>,
}

impl WordPath {
    pub fn score(&self) -> u32 {
        score_of(&self.word)
    }
}

/// Points for a word, by length
pub fn score_of(word: &str) -> u32 {
    match word.len() {
        0..=2 => 0,
        3 | 4 => 1,
        5 => 2,
        6 => 3,
        7 => 5,
        _ => 11,
    }
}

pub fn total_score<I, S>(words: I) -> u32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    words.into_iter().map(|word| score_of(word.as_ref())).sum()
}

/// Distinct dictionary words traceable on `board`, in traversal order
pub fn solve<V>(board: &Board, trie: &Trie<V>) -> Vec<String> {
    solve_with_paths(board, trie)
        .into_iter()
        .map(|found| found.word)
        .collect()
}

/// Like [`solve`], also keeping the first path found for each word
pub fn solve_with_paths<V>(board: &Board, trie: &Trie<V>) -> Vec<WordPath> {
    if board.is_empty() {
        return Vec::new();
    }

    let started = Instant::now();
    let mut search = PathSearch::new(board, trie);
    for row in 0..board.rows() {
        for col in 0..board.cols() {
            search.visited.fill(false);
            search.dfs(row, col);
        }
    }

    debug!(
        rows = board.rows(),
        cols = board.cols(),
        words = search.found.len(),
        elapsed = ?started.elapsed(),
        "board solved"
    );
    search.found
}

/// Backtracking state for one solve. `visited`, `word` and `path` are
/// restored on every return from `dfs`.
struct PathSearch<'a, V> {
    board: &'a Board,
    trie: &'a Trie<V>,
    visited: Vec<bool>,
    word: String,
    path: Vec<(usize, usize)>,
    seen: HashSet<String>,
    found: Vec<WordPath>,
}

impl<'a, V> PathSearch<'a, V> {
    fn new(board: &'a Board, trie: &'a Trie<V>) -> Self {
        Self {
            board,
            trie,
            visited: vec![false; board.rows() * board.cols()],
            word: String::new(),
            path: Vec::new(),
            seen: HashSet::new(),
            found: Vec::new(),
        }
    }

    fn dfs(&mut self, row: usize, col: usize) {
        let board = self.board;
        let cell = row * board.cols() + col;
        let restore_len = self.word.len();

        self.visited[cell] = true;
        self.path.push((row, col));
        let letter = board.letter_at(row, col);
        self.word.push(letter as char);
        if letter == b'Q' {
            self.word.push('U');
        }

        if self.trie.has_prefix(&self.word) {
            if self.word.len() > MIN_WORD_LEN
                && self.trie.contains(&self.word).unwrap_or(false)
                && !self.seen.contains(&self.word)
            {
                self.seen.insert(self.word.clone());
                self.found.push(WordPath {
                    word: self.word.clone(),
                    cells: self.path.clone(),
                });
            }

            for (r, c) in board.neighbors(row, col) {
                if !self.visited[r * board.cols() + c] {
                    self.dfs(r, c);
                }
            }
        }

        self.word.truncate(restore_len);
        self.path.pop();
        self.visited[cell] = false;
    }
}

/// Dictionary plus solver entry points
pub struct BoggleSolver {
    dictionary: Trie<usize>,
}

impl BoggleSolver {
    /// Builds the dictionary trie. Each word maps to its position in `words`;
    /// empty words are skipped.
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut dictionary = Trie::new();
        for (i, word) in words.into_iter().enumerate() {
            if let Err(err) = dictionary.insert(word.as_ref(), i) {
                warn!(index = i, "skipping dictionary entry: {err}");
            }
        }
        debug!(words = dictionary.len(), "dictionary built");
        Self { dictionary }
    }

    pub fn dictionary(&self) -> &Trie<usize> {
        &self.dictionary
    }

    pub fn solve(&self, board: &Board) -> Vec<String> {
        solve(board, &self.dictionary)
    }

    pub fn solve_with_paths(&self, board: &Board) -> Vec<WordPath> {
        solve_with_paths(board, &self.dictionary)
    }
}

#[cfg(test)]
mod solver_tests {
    use super::*;

    const BOARD_4X4: [&str; 4] = ["ATEE", "APYO", "TINU", "EDSQ"];

    fn expand(letter: u8) -> String {
        if letter == b'Q' {
            "QU".to_string()
        } else {
            (letter as char).to_string()
        }
    }

    fn assert_valid_path(board: &Board, found: &WordPath) {
        let mut seen = HashSet::new();
        let mut spelled = String::new();
        for (i, &(r, c)) in found.cells.iter().enumerate() {
            assert!(seen.insert((r, c)), "{} reuses a cell", found.word);
            if i > 0 {
                let (pr, pc) = found.cells[i - 1];
                assert!(pr.abs_diff(r) <= 1 && pc.abs_diff(c) <= 1, "{}", found.word);
            }
            spelled.push_str(&expand(board.letter_at(r, c)));
        }
        assert_eq!(spelled, found.word);
    }

    #[test]
    fn test_score_of() {
        let lengths = [0, 3, 4, 5, 6, 7, 8, 9, 10];
        let expected = [0, 1, 1, 2, 3, 5, 11, 11, 11];
        for (len, points) in lengths.iter().zip(expected) {
            assert_eq!(score_of(&"A".repeat(*len)), points, "length {len}");
        }
        assert_eq!(score_of("AT"), 0);
        assert_eq!(total_score(["CAT", "CATS", "TRAINS"]), 5);
        assert_eq!(total_score(Vec::<String>::new()), 0);
    }

    #[test]
    fn test_cat_cats() {
        let solver = BoggleSolver::new(["CAT", "CATS", "AT", "DO"]);
        let board = Board::from_rows(&["CA", "TS"]).unwrap();
        let words = solver.solve(&board);
        assert_eq!(words, vec!["CAT", "CATS"]);
        assert!(!words.contains(&"AT".to_string()));
        assert_eq!(total_score(&words), 2);
    }

    #[test]
    fn test_q_expands_to_qu() {
        let solver = BoggleSolver::new(["QUIZ", "QU", "QUA", "QIZ"]);
        let board = Board::from_rows(&["QI", "AZ"]).unwrap();
        let words = solver.solve(&board);
        assert_eq!(words, vec!["QUIZ", "QUA"]);
    }

    #[test]
    fn test_short_words_never_accepted() {
        let solver = BoggleSolver::new(["A", "AB", "BA", "QU"]);
        let board = Board::from_rows(&["AB", "QA"]).unwrap();
        assert!(solver.solve(&board).is_empty());
    }

    #[test]
    fn test_empty_dictionary() {
        let solver = BoggleSolver::new(Vec::<String>::new());
        let board = Board::from_rows(&BOARD_4X4).unwrap();
        let words = solver.solve(&board);
        assert!(words.is_empty());
        assert_eq!(total_score(&words), 0);
    }

    #[test]
    fn test_single_cell_board() {
        let solver = BoggleSolver::new(["AAA", "A"]);
        let board = Board::from_rows(&["A"]).unwrap();
        assert!(solver.solve(&board).is_empty());
    }

    #[test]
    fn test_zero_sized_board() {
        let solver = BoggleSolver::new(["CAT"]);
        let board = Board::parse("0 3\n").unwrap();
        assert!(solver.solve(&board).is_empty());
    }

    #[test]
    fn test_duplicates_suppressed() {
        let solver = BoggleSolver::new(["AAA", "AAAA"]);
        let board = Board::from_rows(&["AAA", "AAA"]).unwrap();
        assert_eq!(solver.solve(&board), vec!["AAA", "AAAA"]);
    }

    #[test]
    fn test_cells_not_reused() {
        let solver = BoggleSolver::new(["ABA", "BAB", "ABAB"]);
        let board = Board::from_rows(&["AB"]).unwrap();
        assert!(solver.solve(&board).is_empty());
    }

    #[test]
    fn test_board_4x4() {
        let solver = BoggleSolver::new(["TIN", "PIN", "DIN", "TAPE", "PIT", "TAT", "TIT", "PIP", "ZOO"]);
        let board = Board::from_rows(&BOARD_4X4).unwrap();
        let found = solver.solve_with_paths(&board);

        let mut words: Vec<&str> = found.iter().map(|f| f.word.as_str()).collect();
        words.sort_unstable();
        assert_eq!(words, vec!["DIN", "PIN", "PIT", "TAPE", "TAT", "TIN"]);

        for word in &found {
            assert_valid_path(&board, word);
        }
        assert_eq!(total_score(solver.solve(&board)), 6);
    }

    #[test]
    fn test_paths_with_qu() {
        let solver = BoggleSolver::new(["SQUID", "QUOTE", "SUQ"]);
        let board = Board::from_rows(&["SQ", "DI"]).unwrap();
        let found = solver.solve_with_paths(&board);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].word, "SQUID");
        assert_eq!(found[0].cells, vec![(0, 0), (0, 1), (1, 1), (1, 0)]);
        assert_eq!(found[0].score(), 2);
        assert_valid_path(&board, &found[0]);
    }

    #[test]
    fn test_solve_matches_solve_with_paths() {
        let solver = BoggleSolver::new(["TIN", "PIN", "TAPE", "PEA", "YEA", "APT"]);
        let board = Board::from_rows(&BOARD_4X4).unwrap();
        let words = solver.solve(&board);
        let paths: Vec<String> = solver
            .solve_with_paths(&board)
            .into_iter()
            .map(|f| f.word)
            .collect();
        assert_eq!(words, paths);
    }
}
