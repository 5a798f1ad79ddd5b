// Language resources — stop-word sets, stemmers, and the shared tokenizer.
//
// Everything here is loaded once at process start into a LanguageRegistry and
// is read-only afterwards, so one registry can be shared across concurrent
// clustering requests behind an Arc.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use rust_stemmers::{Algorithm, Stemmer};
use serde::{Deserialize, Serialize};
use stop_words::LANGUAGE;
use tracing::debug;

use crate::error::{Error, Result};
use crate::preprocessing::tokenizer::Tokenizer;

/// Languages with both a stop-word list and a Snowball stemmer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    German,
    French,
    Spanish,
    Italian,
    Portuguese,
    Dutch,
    Swedish,
    Norwegian,
    Danish,
    Russian,
    Hungarian,
    Romanian,
    Turkish,
    Finnish,
}

impl Language {
    pub const ALL: [Language; 15] = [
        Language::English,
        Language::German,
        Language::French,
        Language::Spanish,
        Language::Italian,
        Language::Portuguese,
        Language::Dutch,
        Language::Swedish,
        Language::Norwegian,
        Language::Danish,
        Language::Russian,
        Language::Hungarian,
        Language::Romanian,
        Language::Turkish,
        Language::Finnish,
    ];

    /// ISO 639-1 code.
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::German => "de",
            Language::French => "fr",
            Language::Spanish => "es",
            Language::Italian => "it",
            Language::Portuguese => "pt",
            Language::Dutch => "nl",
            Language::Swedish => "sv",
            Language::Norwegian => "no",
            Language::Danish => "da",
            Language::Russian => "ru",
            Language::Hungarian => "hu",
            Language::Romanian => "ro",
            Language::Turkish => "tr",
            Language::Finnish => "fi",
        }
    }

    fn stop_word_list(self) -> LANGUAGE {
        match self {
            Language::English => LANGUAGE::English,
            Language::German => LANGUAGE::German,
            Language::French => LANGUAGE::French,
            Language::Spanish => LANGUAGE::Spanish,
            Language::Italian => LANGUAGE::Italian,
            Language::Portuguese => LANGUAGE::Portuguese,
            Language::Dutch => LANGUAGE::Dutch,
            Language::Swedish => LANGUAGE::Swedish,
            Language::Norwegian => LANGUAGE::Norwegian,
            Language::Danish => LANGUAGE::Danish,
            Language::Russian => LANGUAGE::Russian,
            Language::Hungarian => LANGUAGE::Hungarian,
            Language::Romanian => LANGUAGE::Romanian,
            Language::Turkish => LANGUAGE::Turkish,
            Language::Finnish => LANGUAGE::Finnish,
        }
    }

    fn stemmer_algorithm(self) -> Algorithm {
        match self {
            Language::English => Algorithm::English,
            Language::German => Algorithm::German,
            Language::French => Algorithm::French,
            Language::Spanish => Algorithm::Spanish,
            Language::Italian => Algorithm::Italian,
            Language::Portuguese => Algorithm::Portuguese,
            Language::Dutch => Algorithm::Dutch,
            Language::Swedish => Algorithm::Swedish,
            Language::Norwegian => Algorithm::Norwegian,
            Language::Danish => Algorithm::Danish,
            Language::Russian => Algorithm::Russian,
            Language::Hungarian => Algorithm::Hungarian,
            Language::Romanian => Algorithm::Romanian,
            Language::Turkish => Algorithm::Turkish,
            Language::Finnish => Algorithm::Finnish,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = Error;

    /// Accepts either the ISO code (`en`) or the English name (`english`).
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Language::ALL
            .into_iter()
            .find(|lang| {
                lang.code() == wanted || format!("{lang:?}").to_lowercase() == wanted
            })
            .ok_or_else(|| Error::config("language", format!("unsupported language '{s}'")))
    }
}

/// Stop words and stemmer for one language.
pub struct LanguageResources {
    language: Language,
    stop_words: HashSet<String>,
    stemmer: Stemmer,
}

impl LanguageResources {
    /// Load the bundled stop-word list and Snowball stemmer for a language.
    pub fn load(language: Language) -> Self {
        let words: Vec<String> = stop_words::get(language.stop_word_list());
        Self::with_stop_words(language, words)
    }

    /// Use a caller-supplied stop-word list instead of the bundled one.
    pub fn with_stop_words<I, S>(language: Language, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let stop_words = words
            .into_iter()
            .map(|w| w.as_ref().to_lowercase())
            .collect();
        Self {
            language,
            stop_words,
            stemmer: Stemmer::create(language.stemmer_algorithm()),
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Is this (lowercase) word image a stop word?
    pub fn is_stop_word(&self, lowercase: &str) -> bool {
        self.stop_words.contains(lowercase)
    }

    pub fn stop_word_count(&self) -> usize {
        self.stop_words.len()
    }

    /// Stem a lowercase word image.
    pub fn stem(&self, lowercase: &str) -> String {
        self.stemmer.stem(lowercase).into_owned()
    }
}

impl fmt::Debug for LanguageResources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LanguageResources")
            .field("language", &self.language)
            .field("stop_words", &self.stop_words.len())
            .finish()
    }
}

/// Process-lifetime cache of language resources plus the tokenizer.
#[derive(Debug)]
pub struct LanguageRegistry {
    resources: BTreeMap<Language, LanguageResources>,
    tokenizer: Tokenizer,
}

impl LanguageRegistry {
    /// Load every supported language.
    pub fn load_all() -> Result<Self> {
        Self::load(&Language::ALL)
    }

    /// Load only the given languages.
    pub fn load(languages: &[Language]) -> Result<Self> {
        Self::from_resources(languages.iter().map(|&lang| LanguageResources::load(lang)))
    }

    /// Build a registry from already prepared resources.
    pub fn from_resources(resources: impl IntoIterator<Item = LanguageResources>) -> Result<Self> {
        let resources: BTreeMap<Language, LanguageResources> = resources
            .into_iter()
            .map(|r| (r.language(), r))
            .collect();
        for r in resources.values() {
            debug!(
                language = %r.language(),
                stop_words = r.stop_word_count(),
                "Loaded language resources"
            );
        }
        Ok(Self {
            resources,
            tokenizer: Tokenizer::new()?,
        })
    }

    /// Resources for a language, or a configuration error if it was not loaded.
    pub fn get(&self, language: Language) -> Result<&LanguageResources> {
        self.resources.get(&language).ok_or_else(|| {
            Error::config(
                "language",
                format!("language '{language}' is not loaded in this registry"),
            )
        })
    }

    pub fn languages(&self) -> impl Iterator<Item = Language> + '_ {
        self.resources.keys().copied()
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }
}
