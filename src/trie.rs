use std::cmp::Ordering;
use thiserror::Error;

/// Wildcard accepted by [`Trie::keys_that_match`]
pub const WILDCARD: u8 = b'.';

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TrieError {
    #[error("key must have length >= 1")]
    EmptyKey,
}

type Link<V> = Option<Box<TrieNode<V>>>;

struct TrieNode<V> {
    c: u8,
    lo: Link<V>,
    mid: Link<V>,
    hi: Link<V>,
    value: Option<V>,
}

impl<V> TrieNode<V> {
    fn new(c: u8) -> Self {
        Self {
            c,
            lo: None,
            mid: None,
            hi: None,
            value: None,
        }
    }
}

/// Ternary search trie mapping string keys to values.
///
/// Each node holds one byte of a key. The `lo` and `hi` children hold bytes
/// that sort before and after it at the same position, `mid` continues the
/// key one position deeper. The shape depends on insertion order; no
/// rebalancing is done.
pub struct Trie<V> {
    root: Link<V>,
    len: usize,
}

impl<V> Default for Trie<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Trie<V> {
    pub fn new() -> Self {
        Self { root: None, len: 0 }
    }

    /// Number of distinct keys stored
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Inserts `key`, overwriting any previous value
    pub fn insert(&mut self, key: &str, value: V) -> Result<(), TrieError> {
        let key = key.as_bytes();
        if key.is_empty() {
            return Err(TrieError::EmptyKey);
        }

        let mut link = &mut self.root;
        let mut d = 0;
        loop {
            let node = link.get_or_insert_with(|| Box::new(TrieNode::new(key[d])));
            match key[d].cmp(&node.c) {
                Ordering::Less => link = &mut node.lo,
                Ordering::Greater => link = &mut node.hi,
                Ordering::Equal if d + 1 < key.len() => {
                    link = &mut node.mid;
                    d += 1;
                }
                Ordering::Equal => {
                    if node.value.replace(value).is_none() {
                        self.len += 1;
                    }
                    return Ok(());
                }
            }
        }
    }

    pub fn get(&self, key: &str) -> Result<Option<&V>, TrieError> {
        if key.is_empty() {
            return Err(TrieError::EmptyKey);
        }
        Ok(self
            .get_node(key.as_bytes())
            .and_then(|node| node.value.as_ref()))
    }

    pub fn contains(&self, key: &str) -> Result<bool, TrieError> {
        Ok(self.get(key)?.is_some())
    }

    /// True if at least one stored key starts with `prefix`.
    /// The empty prefix is a prefix of every key.
    pub fn has_prefix(&self, prefix: &str) -> bool {
        if prefix.is_empty() {
            return !self.is_empty();
        }
        self.get_node(prefix.as_bytes()).is_some()
    }

    /// Longest stored key that is a prefix of `query`
    pub fn longest_prefix_of<'q>(&self, query: &'q str) -> Option<&'q str> {
        let bytes = query.as_bytes();
        let mut length = 0;
        let mut link = self.root.as_deref();
        let mut i = 0;
        while let Some(node) = link {
            if i == bytes.len() {
                break;
            }
            match bytes[i].cmp(&node.c) {
                Ordering::Less => link = node.lo.as_deref(),
                Ordering::Greater => link = node.hi.as_deref(),
                Ordering::Equal => {
                    i += 1;
                    if node.value.is_some() {
                        length = i;
                    }
                    link = node.mid.as_deref();
                }
            }
        }

        if length == 0 {
            None
        } else {
            query.get(..length)
        }
    }

    /// All keys in lexicographic order
    pub fn keys(&self) -> Vec<String> {
        let mut results = Vec::with_capacity(self.len);
        Self::dfs_collect(self.root.as_deref(), &mut Vec::new(), &mut results);
        results
    }

    /// Keys starting with `prefix`, in lexicographic order
    pub fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        if prefix.is_empty() {
            return self.keys();
        }

        let mut results = Vec::new();
        if let Some(node) = self.get_node(prefix.as_bytes()) {
            if node.value.is_some() {
                results.push(prefix.to_string());
            }
            let mut buffer = prefix.as_bytes().to_vec();
            Self::dfs_collect(node.mid.as_deref(), &mut buffer, &mut results);
        }
        results
    }

    /// Keys matching `pattern`, where `.` stands for any single letter
    pub fn keys_that_match(&self, pattern: &str) -> Vec<String> {
        let mut results = Vec::new();
        if !pattern.is_empty() {
            Self::dfs_match(
                self.root.as_deref(),
                &mut Vec::new(),
                pattern.as_bytes(),
                &mut results,
            );
        }
        results
    }

    fn get_node(&self, key: &[u8]) -> Option<&TrieNode<V>> {
        let mut link = self.root.as_deref();
        let mut d = 0;
        while let Some(node) = link {
            match key[d].cmp(&node.c) {
                Ordering::Less => link = node.lo.as_deref(),
                Ordering::Greater => link = node.hi.as_deref(),
                Ordering::Equal if d + 1 < key.len() => {
                    link = node.mid.as_deref();
                    d += 1;
                }
                Ordering::Equal => return Some(node),
            }
        }
        None
    }

    fn dfs_collect(link: Option<&TrieNode<V>>, buffer: &mut Vec<u8>, results: &mut Vec<String>) {
        let Some(node) = link else {
            return;
        };

        Self::dfs_collect(node.lo.as_deref(), buffer, results);
        buffer.push(node.c);
        if node.value.is_some() {
            results.push(String::from_utf8_lossy(buffer).into_owned());
        }
        Self::dfs_collect(node.mid.as_deref(), buffer, results);
        buffer.pop();
        Self::dfs_collect(node.hi.as_deref(), buffer, results);
    }

    fn dfs_match(
        link: Option<&TrieNode<V>>,
        buffer: &mut Vec<u8>,
        pattern: &[u8],
        results: &mut Vec<String>,
    ) {
        let Some(node) = link else {
            return;
        };

        let c = pattern[buffer.len()];
        if c == WILDCARD || c < node.c {
            Self::dfs_match(node.lo.as_deref(), buffer, pattern, results);
        }
        if c == WILDCARD || c == node.c {
            buffer.push(node.c);
            if buffer.len() == pattern.len() {
                if node.value.is_some() {
                    results.push(String::from_utf8_lossy(buffer).into_owned());
                }
            } else {
                Self::dfs_match(node.mid.as_deref(), buffer, pattern, results);
            }
            buffer.pop();
        }
        if c == WILDCARD || c > node.c {
            Self::dfs_match(node.hi.as_deref(), buffer, pattern, results);
        }
    }
}

#[cfg(test)]
mod trie_tests {
    use super::*;

    fn build(words: &[&str]) -> Trie<usize> {
        let mut trie = Trie::new();
        for (i, word) in words.iter().enumerate() {
            trie.insert(word, i).unwrap();
        }
        trie
    }

    #[test]
    fn test_insert_and_contains() {
        let words = ["SHE", "SELLS", "SEA", "SHELLS", "BY", "THE", "SHORE"];
        let mut trie = Trie::new();
        for (i, word) in words.iter().enumerate() {
            trie.insert(word, i).unwrap();
            assert!(trie.contains(word).unwrap());
            // earlier keys survive later inserts
            for earlier in &words[..i] {
                assert!(trie.contains(earlier).unwrap());
            }
        }
        assert_eq!(trie.len(), words.len());
        assert!(!trie.contains("SH").unwrap());
        assert!(!trie.contains("SHELL").unwrap());
        assert!(!trie.contains("SHORES").unwrap());
    }

    #[test]
    fn test_reinsert_keeps_len_and_overwrites() {
        let mut trie = build(&["CAT", "CATS"]);
        trie.insert("CAT", 42).unwrap();
        assert_eq!(trie.len(), 2);
        assert_eq!(trie.get("CAT").unwrap(), Some(&42));
        assert_eq!(trie.get("CATS").unwrap(), Some(&1));
        assert_eq!(trie.get("CA").unwrap(), None);
    }

    #[test]
    fn test_empty_key_rejected() {
        let mut trie = build(&["DOG"]);
        assert_eq!(trie.insert("", 7), Err(TrieError::EmptyKey));
        assert_eq!(trie.contains(""), Err(TrieError::EmptyKey));
        assert_eq!(trie.get(""), Err(TrieError::EmptyKey));
        assert_eq!(trie.len(), 1);
        assert_eq!(trie.keys(), vec!["DOG"]);
    }

    #[test]
    fn test_has_prefix() {
        let trie = build(&["CATS", "DOG", "QUIZ"]);
        for key in ["CATS", "DOG", "QUIZ"] {
            for end in 1..=key.len() {
                assert!(trie.has_prefix(&key[..end]), "{}", &key[..end]);
            }
        }
        assert!(!trie.has_prefix("CATSS"));
        assert!(!trie.has_prefix("X"));
        assert!(!trie.has_prefix("DA"));
        assert!(!trie.has_prefix("QI"));
        assert!(trie.has_prefix(""));
        assert!(!Trie::<usize>::new().has_prefix(""));
    }

    #[test]
    fn test_contains_implies_has_prefix() {
        let words = ["A", "AB", "ABC", "B", "BA", "ZZZ", "MIDDLE"];
        let trie = build(&words);
        for probe in ["A", "AB", "ABC", "ABCD", "B", "BA", "BB", "ZZ", "ZZZ", "MID", "MIDDLE"] {
            if trie.contains(probe).unwrap() {
                assert!(trie.has_prefix(probe));
            }
        }
    }

    #[test]
    fn test_empty_trie() {
        let trie: Trie<()> = Trie::new();
        assert!(trie.is_empty());
        assert!(!trie.contains("A").unwrap());
        assert!(!trie.has_prefix("A"));
        assert!(trie.keys().is_empty());
        assert!(trie.keys_that_match("...").is_empty());
        assert_eq!(trie.longest_prefix_of("ANYTHING"), None);
    }

    #[test]
    fn test_keys_sorted() {
        let trie = build(&["SHE", "SELLS", "SEA", "SHELLS", "BY", "THE", "SHORE"]);
        assert_eq!(
            trie.keys(),
            vec!["BY", "SEA", "SELLS", "SHE", "SHELLS", "SHORE", "THE"]
        );
    }

    #[test]
    fn test_keys_with_prefix() {
        let trie = build(&["SHE", "SELLS", "SEA", "SHELLS", "BY", "THE", "SHORE"]);
        assert_eq!(trie.keys_with_prefix("SH"), vec!["SHE", "SHELLS", "SHORE"]);
        assert_eq!(trie.keys_with_prefix("SHE"), vec!["SHE", "SHELLS"]);
        assert_eq!(trie.keys_with_prefix("SE"), vec!["SEA", "SELLS"]);
        assert!(trie.keys_with_prefix("X").is_empty());
        assert_eq!(trie.keys_with_prefix("").len(), 7);
    }

    #[test]
    fn test_keys_that_match() {
        let trie = build(&["SHE", "SELLS", "SEA", "SHELLS", "BY", "THE", "SHORE"]);
        assert_eq!(trie.keys_that_match(".HE"), vec!["SHE", "THE"]);
        assert_eq!(trie.keys_that_match("S.."), vec!["SEA", "SHE"]);
        assert_eq!(trie.keys_that_match("SH.LLS"), vec!["SHELLS"]);
        assert!(trie.keys_that_match("....").is_empty());
        assert!(trie.keys_that_match("").is_empty());
    }

    #[test]
    fn test_longest_prefix_of() {
        let trie = build(&["SHE", "SHELLS", "SEA"]);
        assert_eq!(trie.longest_prefix_of("SHELL"), Some("SHE"));
        assert_eq!(trie.longest_prefix_of("SHELLSORT"), Some("SHELLS"));
        assert_eq!(trie.longest_prefix_of("SEASHELL"), Some("SEA"));
        assert_eq!(trie.longest_prefix_of("SH"), None);
        assert_eq!(trie.longest_prefix_of(""), None);
    }
}
