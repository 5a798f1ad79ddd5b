// Tokenizer — splits field text into typed tokens.
//
// URLs and e-mail addresses are matched first with regexes (they contain
// characters that word segmentation would tear apart). The text between them
// is segmented on Unicode word boundaries and each segment is classified by
// the characters it contains.

use std::fmt;

use regex_lite::Regex;
use unicode_segmentation::UnicodeSegmentation;

use crate::error::{Error, Result};

/// Token kind in the low byte, separator flags in the high bits.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TokenType(u16);

impl TokenType {
    pub const TERM: TokenType = TokenType(0x0001);
    pub const NUMERIC: TokenType = TokenType(0x0002);
    pub const PUNCTUATION: TokenType = TokenType(0x0003);
    pub const EMAIL: TokenType = TokenType(0x0004);
    pub const ACRONYM: TokenType = TokenType(0x0005);
    pub const URL: TokenType = TokenType(0x0006);

    pub const SENTENCE_SEPARATOR: u16 = 0x0100;
    pub const DOCUMENT_SEPARATOR: u16 = 0x0200;
    pub const FIELD_SEPARATOR: u16 = 0x0800;

    const KIND_MASK: u16 = 0x00ff;
    const ANY_SEPARATOR: u16 =
        Self::SENTENCE_SEPARATOR | Self::DOCUMENT_SEPARATOR | Self::FIELD_SEPARATOR;

    /// A pure separator token with no kind, used between fields and documents.
    pub const fn separator(flag: u16) -> Self {
        TokenType(flag)
    }

    pub fn bits(self) -> u16 {
        self.0
    }

    /// The kind with all flags stripped.
    pub fn kind(self) -> TokenType {
        TokenType(self.0 & Self::KIND_MASK)
    }

    pub fn with_flag(self, flag: u16) -> Self {
        TokenType(self.0 | flag)
    }

    pub fn has_flag(self, flag: u16) -> bool {
        self.0 & flag != 0
    }

    pub fn is_separator(self) -> bool {
        self.has_flag(Self::ANY_SEPARATOR)
    }

    /// Kinds that become entries in the word table.
    pub fn is_word(self) -> bool {
        matches!(
            self.kind(),
            Self::TERM | Self::NUMERIC | Self::ACRONYM | Self::EMAIL
        )
    }

    /// Kinds that may appear inside a label.
    pub fn is_label_word(self) -> bool {
        matches!(self.kind(), Self::TERM | Self::NUMERIC | Self::ACRONYM)
    }

    pub fn is_numeric(self) -> bool {
        self.kind() == Self::NUMERIC
    }
}

impl fmt::Debug for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind() {
            Self::TERM => "Term",
            Self::NUMERIC => "Numeric",
            Self::PUNCTUATION => "Punctuation",
            Self::EMAIL => "Email",
            Self::ACRONYM => "Acronym",
            Self::URL => "Url",
            _ => "Separator",
        };
        write!(f, "{kind}({:#06x})", self.0)
    }
}

/// A token inside one field of one document. `start..end` are byte offsets
/// into that field's text; separators have `start == end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub document: usize,
    pub field: usize,
    pub start: usize,
    pub end: usize,
    pub kind: TokenType,
}

/// A classified span of text, before it is attached to a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub kind: TokenType,
}

const URL_PATTERN: &str = r#"(?i)\b(?:(?:https?|ftp)://|www\.)[^\s<>"'()\[\]{}]+"#;
const EMAIL_PATTERN: &str = r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(?:\.[A-Za-z0-9\-]+)+";

/// Stateless once built; shared by every request through the language registry.
#[derive(Debug)]
pub struct Tokenizer {
    special: Regex,
}

impl Tokenizer {
    pub fn new() -> Result<Self> {
        let pattern = format!("(?P<url>{URL_PATTERN})|(?P<email>{EMAIL_PATTERN})");
        let special = Regex::new(&pattern)
            .map_err(|e| Error::Processing(format!("tokenizer pattern failed to compile: {e}")))?;
        Ok(Self { special })
    }

    /// Split text into classified spans. Whitespace is dropped; empty or
    /// malformed text simply yields fewer spans.
    pub fn tokenize(&self, text: &str) -> Vec<Span> {
        let mut spans = Vec::new();
        let mut cursor = 0;

        for caps in self.special.captures_iter(text) {
            let (m, kind) = match (caps.name("url"), caps.name("email")) {
                (Some(m), _) => (m, TokenType::URL),
                (None, Some(m)) => (m, TokenType::EMAIL),
                (None, None) => continue,
            };
            // Trailing sentence punctuation belongs to the sentence, not the address.
            let trimmed = m.as_str().trim_end_matches(['.', ',', ';', ':', '!', '?']);
            if trimmed.is_empty() {
                continue;
            }
            let end = m.start() + trimmed.len();
            segment_words(text, cursor, m.start(), &mut spans);
            spans.push(Span {
                start: m.start(),
                end,
                kind,
            });
            cursor = end;
        }
        segment_words(text, cursor, text.len(), &mut spans);
        spans
    }
}

fn segment_words(text: &str, from: usize, to: usize, out: &mut Vec<Span>) {
    if from >= to {
        return;
    }
    for (offset, segment) in text[from..to].split_word_bound_indices() {
        if let Some(kind) = classify(segment) {
            let start = from + offset;
            out.push(Span {
                start,
                end: start + segment.len(),
                kind,
            });
        }
    }
}

fn classify(segment: &str) -> Option<TokenType> {
    if segment.chars().all(char::is_whitespace) {
        return None;
    }
    let letters = segment.chars().any(char::is_alphabetic);
    let digits = segment.chars().any(char::is_numeric);

    let kind = if letters {
        if segment.len() > 1 && segment.contains('.') {
            TokenType::ACRONYM
        } else {
            TokenType::TERM
        }
    } else if digits {
        TokenType::NUMERIC
    } else if matches!(segment, "." | "!" | "?" | ";" | "…") {
        TokenType::PUNCTUATION.with_flag(TokenType::SENTENCE_SEPARATOR)
    } else {
        TokenType::PUNCTUATION
    };
    Some(kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<(String, TokenType)> {
        let tokenizer = Tokenizer::new().unwrap();
        tokenizer
            .tokenize(text)
            .into_iter()
            .map(|s| (text[s.start..s.end].to_string(), s.kind.kind()))
            .collect()
    }

    #[test]
    fn classifies_basic_kinds() {
        let tokens = kinds("Rust 2024, now!");
        assert_eq!(
            tokens,
            vec![
                ("Rust".to_string(), TokenType::TERM),
                ("2024".to_string(), TokenType::NUMERIC),
                (",".to_string(), TokenType::PUNCTUATION),
                ("now".to_string(), TokenType::TERM),
                ("!".to_string(), TokenType::PUNCTUATION),
            ]
        );
    }

    #[test]
    fn urls_and_emails_are_single_tokens() {
        let tokens = kinds("see https://example.com/a?b=1. or mail bob@example.org");
        assert!(tokens.contains(&("https://example.com/a?b=1".to_string(), TokenType::URL)));
        assert!(tokens.contains(&("bob@example.org".to_string(), TokenType::EMAIL)));
        // The trailing period after the URL is still a sentence separator.
        assert!(tokens.contains(&(".".to_string(), TokenType::PUNCTUATION)));
    }

    #[test]
    fn sentence_separator_flag() {
        let tokenizer = Tokenizer::new().unwrap();
        let spans = tokenizer.tokenize("one. two");
        assert!(spans[1].kind.has_flag(TokenType::SENTENCE_SEPARATOR));
        assert!(!spans[0].kind.is_separator());
    }

    #[test]
    fn empty_text_yields_nothing() {
        let tokenizer = Tokenizer::new().unwrap();
        assert!(tokenizer.tokenize("").is_empty());
        assert!(tokenizer.tokenize("   \n\t").is_empty());
    }
}
