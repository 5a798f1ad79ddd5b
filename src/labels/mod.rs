// Label candidates — discovery and filtering.

pub mod extractor;
pub mod filters;

use std::collections::BTreeSet;

use crate::preprocessing::PreprocessingContext;

/// A word or phrase that may become a cluster label.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelCandidate {
    /// Rendered word sequence (indices into the word table).
    pub words: Vec<usize>,
    /// Content identity: the stem of each word.
    pub stems: Vec<usize>,
    /// Occurrences across the whole corpus.
    pub frequency: u32,
    /// Documents containing the candidate.
    pub documents: BTreeSet<usize>,
}

impl LabelCandidate {
    pub fn is_phrase(&self) -> bool {
        self.words.len() > 1
    }

    /// Surface text, words joined by single spaces.
    pub fn text(&self, context: &PreprocessingContext<'_>) -> String {
        self.words
            .iter()
            .map(|&w| context.words[w].image.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
