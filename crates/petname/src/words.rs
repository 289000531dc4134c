//! Word lists embedded at build time

use crate::error::{Error, Result};

const ADVERBS: &str = include_str!("../words/adverbs.txt");
const ADJECTIVES: &str = include_str!("../words/adjectives.txt");
const NAMES: &str = include_str!("../words/names.txt");

/// The three lists a name is drawn from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordLists {
    pub(crate) adverbs: Vec<String>,
    pub(crate) adjectives: Vec<String>,
    pub(crate) names: Vec<String>,
}

impl WordLists {
    /// The lists shipped with the crate
    pub fn embedded() -> Result<Self> {
        Ok(Self {
            adverbs: parse("adverbs", ADVERBS)?,
            adjectives: parse("adjectives", ADJECTIVES)?,
            names: parse("names", NAMES)?,
        })
    }

    /// Lists from caller-supplied words
    ///
    /// Words are lower-cased; each list must keep at least one entry.
    pub fn new<S: AsRef<str>>(adverbs: &[S], adjectives: &[S], names: &[S]) -> Result<Self> {
        Ok(Self {
            adverbs: from_words("adverbs", adverbs)?,
            adjectives: from_words("adjectives", adjectives)?,
            names: from_words("names", names)?,
        })
    }

    /// Number of entries in each list: (adverbs, adjectives, names)
    pub fn sizes(&self) -> (usize, usize, usize) {
        (self.adverbs.len(), self.adjectives.len(), self.names.len())
    }
}

/// Parse a list file: one word per line, `#` comments and blank lines skipped
fn parse(list: &'static str, content: &str) -> Result<Vec<String>> {
    let mut words = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        words.push(check_word(list, line, idx + 1)?);
    }
    if words.is_empty() {
        return Err(Error::Exhausted { list });
    }
    Ok(words)
}

fn from_words<S: AsRef<str>>(list: &'static str, words: &[S]) -> Result<Vec<String>> {
    let checked = words
        .iter()
        .enumerate()
        .map(|(idx, w)| check_word(list, w.as_ref().trim(), idx + 1))
        .collect::<Result<Vec<_>>>()?;
    if checked.is_empty() {
        return Err(Error::Exhausted { list });
    }
    Ok(checked)
}

fn check_word(list: &'static str, word: &str, line: usize) -> Result<String> {
    let lower = word.to_lowercase();
    if lower.is_empty() || !lower.chars().all(|c| c.is_ascii_lowercase()) {
        return Err(Error::InvalidWord {
            list,
            word: word.to_string(),
            line,
        });
    }
    Ok(lower)
}
