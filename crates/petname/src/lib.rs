//! # petname
//!
//! Random, human-readable identifiers such as `calmly-brave-otter`.
//!
//! Names are built from embedded word lists:
//! - 1 word: a name (`otter`)
//! - 2 words: an adjective and a name (`brave-otter`)
//! - n words: n-2 adverbs, an adjective and a name
//!
//! The random source is handed to the [`Generator`] when it is built and
//! kept behind a mutex, so one generator can be shared across threads.
//!
//! ## Example
//!
//! ```
//! use petname::Generator;
//!
//! let generator = Generator::seeded(42)?;
//! let name = generator.generate(3, "-");
//! assert_eq!(name.split('-').count(), 3);
//! # Ok::<(), petname::Error>(())
//! ```

mod error;
mod words;

pub use error::{Error, Result};
pub use words::WordLists;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::sync::{Mutex, PoisonError};

/// Generates pet names from word lists and a shared random source
#[derive(Debug)]
pub struct Generator {
    words: WordLists,
    rng: Mutex<StdRng>,
}

impl Generator {
    /// Build a generator from word lists and a random source
    pub fn new(words: WordLists, rng: StdRng) -> Self {
        let (adverbs, adjectives, names) = words.sizes();
        log::debug!(
            "Name generator ready: {adverbs} adverbs, {adjectives} adjectives, {names} names"
        );
        Self {
            words,
            rng: Mutex::new(rng),
        }
    }

    /// Embedded word lists with an OS-seeded random source
    pub fn from_entropy() -> Result<Self> {
        Ok(Self::new(WordLists::embedded()?, StdRng::from_entropy()))
    }

    /// Embedded word lists with a fixed seed, for reproducible names
    pub fn seeded(seed: u64) -> Result<Self> {
        Ok(Self::new(WordLists::embedded()?, StdRng::seed_from_u64(seed)))
    }

    /// Generate a lower-case name of `word_count` words joined by `separator`
    ///
    /// A `word_count` of zero is treated as one.
    pub fn generate(&self, word_count: u32, separator: &str) -> String {
        let word_count = word_count.max(1) as usize;
        // A panic while holding the lock cannot leave the RNG half-updated.
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);

        let mut parts: Vec<&str> = Vec::with_capacity(word_count);
        for _ in 2..word_count {
            parts.push(pick(&self.words.adverbs, &mut rng));
        }
        if word_count >= 2 {
            parts.push(pick(&self.words.adjectives, &mut rng));
        }
        parts.push(pick(&self.words.names, &mut rng));

        parts.join(separator)
    }
}

fn pick<'a>(list: &'a [String], rng: &mut StdRng) -> &'a str {
    // Lists are checked non-empty when WordLists is built.
    list.choose(rng).map_or("", String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny() -> Generator {
        let words = WordLists::new(&["quickly"], &["brave"], &["fox"]).unwrap();
        Generator::new(words, StdRng::seed_from_u64(7))
    }

    #[test]
    fn test_word_shapes() {
        let generator = tiny();
        assert_eq!(generator.generate(1, "-"), "fox");
        assert_eq!(generator.generate(2, "-"), "brave-fox");
        assert_eq!(generator.generate(4, "_"), "quickly_quickly_brave_fox");
    }

    #[test]
    fn test_zero_words_is_one() {
        assert_eq!(tiny().generate(0, "-"), "fox");
    }

    #[test]
    fn test_lower_cased() {
        let words = WordLists::new(&["Quickly"], &["BRAVE"], &["Fox"]).unwrap();
        let generator = Generator::new(words, StdRng::seed_from_u64(1));
        assert_eq!(generator.generate(3, "-"), "quickly-brave-fox");
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let a = Generator::seeded(99).unwrap();
        let b = Generator::seeded(99).unwrap();
        for _ in 0..5 {
            assert_eq!(a.generate(3, "-"), b.generate(3, "-"));
        }
    }

    #[test]
    fn test_word_count_from_embedded_lists() {
        let generator = Generator::seeded(3).unwrap();
        let name = generator.generate(5, ".");
        assert_eq!(name.split('.').count(), 5);
        assert!(name.chars().all(|c| c.is_ascii_lowercase() || c == '.'));
    }

    #[test]
    fn test_shared_across_threads() {
        let generator = std::sync::Arc::new(Generator::seeded(5).unwrap());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let generator = std::sync::Arc::clone(&generator);
                std::thread::spawn(move || generator.generate(2, "-"))
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap().split('-').count(), 2);
        }
    }
}
