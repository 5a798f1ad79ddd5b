// Linguistic preprocessing — tokens, words, and stems for one request.
//
// The context is an arena: words and stems live in vectors and refer to each
// other by index. It is built fresh for every clustering request and dropped
// when the request finishes.

pub mod normalizer;
pub mod tokenizer;

use tracing::debug;

use crate::config::ClusteringConfig;
use crate::document::Document;
use crate::language::LanguageResources;

use tokenizer::{Token, TokenType, Tokenizer};

/// A distinct case-normalized surface form.
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    /// Canonical image: the most frequent casing seen in the corpus.
    pub image: String,
    pub lowercase: String,
    pub kind: TokenType,
    pub tf: u32,
    /// Sparse (document index, term frequency) pairs, ascending by document.
    pub tf_by_document: Vec<(usize, u32)>,
    /// Bit `i` is set when the word occurs in field `i`.
    pub field_mask: u32,
    pub stem: usize,
    pub stop: bool,
}

impl Word {
    pub fn df(&self) -> usize {
        self.tf_by_document.len()
    }
}

/// A linguistic root shared by one or more words.
#[derive(Debug, Clone, PartialEq)]
pub struct Stem {
    pub image: String,
    pub tf: u32,
    pub tf_by_document: Vec<(usize, u32)>,
    pub field_mask: u32,
    /// Word with the highest tf among this stem's words.
    pub most_frequent_word: usize,
    pub words: Vec<usize>,
}

impl Stem {
    pub fn df(&self) -> usize {
        self.tf_by_document.len()
    }
}

/// Everything the later stages need to know about the input text.
#[derive(Debug)]
pub struct PreprocessingContext<'a> {
    pub documents: &'a [Document],
    pub fields: Vec<String>,
    pub title_field: Option<usize>,
    /// All tokens in document order, with separator tokens between fields
    /// and documents.
    pub tokens: Vec<Token>,
    /// Word index of each token, parallel to `tokens`.
    pub token_words: Vec<Option<usize>>,
    pub words: Vec<Word>,
    pub stems: Vec<Stem>,
}

impl<'a> PreprocessingContext<'a> {
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Source text of a token; empty for separators.
    pub fn token_image(&self, index: usize) -> &str {
        let token = &self.tokens[index];
        self.documents[token.document]
            .field(&self.fields[token.field])
            .and_then(|text| text.get(token.start..token.end))
            .unwrap_or("")
    }

    pub fn has_words(&self) -> bool {
        !self.words.is_empty()
    }

    /// Does this stem occur in the title field?
    pub fn is_title_stem(&self, stem: usize) -> bool {
        self.title_field
            .is_some_and(|bit| self.stems[stem].field_mask & (1 << bit) != 0)
    }
}

/// Run the whole preprocessing chain: tokenize, normalize case, stem, and
/// mark stop words.
pub fn preprocess<'a>(
    documents: &'a [Document],
    config: &ClusteringConfig,
    language: &LanguageResources,
    tokenizer: &Tokenizer,
) -> PreprocessingContext<'a> {
    let mut context = tokenize(documents, config, tokenizer);
    normalizer::normalize_case(&mut context, config.word_df_threshold);
    normalizer::stem_words(&mut context, language);
    normalizer::mark_stop_words(&mut context, language);

    debug!(
        documents = documents.len(),
        tokens = context.tokens.len(),
        words = context.words.len(),
        stems = context.stems.len(),
        "Preprocessed documents"
    );
    context
}

/// Tokenize the configured fields of every document. Missing fields
/// contribute no tokens.
pub fn tokenize<'a>(
    documents: &'a [Document],
    config: &ClusteringConfig,
    tokenizer: &Tokenizer,
) -> PreprocessingContext<'a> {
    let mut tokens = Vec::new();

    for (document, doc) in documents.iter().enumerate() {
        for (field, name) in config.fields.iter().enumerate() {
            if let Some(text) = doc.field(name) {
                tokens.extend(tokenizer.tokenize(text).into_iter().map(|span| Token {
                    document,
                    field,
                    start: span.start,
                    end: span.end,
                    kind: span.kind,
                }));
            }
            tokens.push(separator(document, field, TokenType::FIELD_SEPARATOR));
        }
        tokens.push(separator(document, 0, TokenType::DOCUMENT_SEPARATOR));
    }

    let token_words = vec![None; tokens.len()];
    PreprocessingContext {
        documents,
        fields: config.fields.clone(),
        title_field: config.title_field_index(),
        tokens,
        token_words,
        words: Vec::new(),
        stems: Vec::new(),
    }
}

fn separator(document: usize, field: usize, flag: u16) -> Token {
    Token {
        document,
        field,
        start: 0,
        end: 0,
        kind: TokenType::separator(flag),
    }
}
