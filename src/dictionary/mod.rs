use std::collections::HashSet;
use std::path::Path;
use tokio::fs;
use anyhow::{Context, Result};

/// Membership test the move evaluator needs from a word list
pub trait WordList {
    /// `false` while the word list cannot answer; lookups must then fail closed
    fn is_ready(&self) -> bool {
        true
    }

    /// Case-insensitive membership test
    fn contains(&self, word: &str) -> bool;
}

#[derive(Debug)]
pub struct Dictionary {
    words: HashSet<String>,
    ready: bool,
}

impl Dictionary {
    /// Load dictionary from a word list file
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read dictionary at {}", path.display()))?;
        let dictionary = Self::parse(&content);

        tracing::info!("Loaded {} words into dictionary", dictionary.len());

        Ok(dictionary)
    }

    /// Parse a word list: one word per line. Blank lines, `#` comments, the
    /// numeric header of hunspell `.dic` files and single letters are skipped;
    /// hunspell affix flags (`word/FLAGS`) are stripped.
    pub fn parse(content: &str) -> Self {
        Self::from_words(content.lines().filter_map(|line| {
            let line = line.trim();
            if line.starts_with('#') || line.chars().all(|c| c.is_ascii_digit()) {
                return None;
            }
            line.split('/').next()
        }))
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|word| normalize(word.as_ref()))
            .filter(|word| word.chars().count() >= 2)
            .collect();

        Self { words, ready: true }
    }

    /// A dictionary that could not be loaded. Every move checked against it is rejected.
    pub fn unavailable() -> Self {
        Self {
            words: HashSet::new(),
            ready: false,
        }
    }

    /// Get the number of words in the dictionary
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Check if dictionary is empty
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl WordList for Dictionary {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn contains(&self, word: &str) -> bool {
        self.ready && self.words.contains(&normalize(word))
    }
}

fn normalize(word: &str) -> String {
    word.trim().to_uppercase()
}
