// Unit tests for linguistic preprocessing.
//
// Tests the tokenizer → case normalizer → stemmer → stop marker chain through
// the public `preprocess` entry point, on small hand-built corpora.

use lingo::config::ClusteringConfig;
use lingo::document::Document;
use lingo::language::{Language, LanguageRegistry};
use lingo::preprocessing::tokenizer::TokenType;
use lingo::preprocessing::{preprocess, PreprocessingContext};

fn registry() -> LanguageRegistry {
    LanguageRegistry::load(&[Language::English]).unwrap()
}

fn run<'a>(
    registry: &LanguageRegistry,
    documents: &'a [Document],
    config: &ClusteringConfig,
) -> PreprocessingContext<'a> {
    let language = registry.get(Language::English).unwrap();
    preprocess(documents, config, language, registry.tokenizer())
}

fn word<'c>(context: &'c PreprocessingContext<'_>, lowercase: &str) -> &'c lingo::preprocessing::Word {
    context
        .words
        .iter()
        .find(|w| w.lowercase == lowercase)
        .unwrap_or_else(|| panic!("word {lowercase} missing"))
}

// ============================================================
// Case normalization
// ============================================================

#[test]
fn most_frequent_casing_becomes_canonical() {
    let registry = registry();
    let docs = vec![
        Document::from_title_summary("1", "Rust rust", "rust rust"),
        Document::from_title_summary("2", "", "Rust"),
    ];
    let context = run(&registry, &docs, &ClusteringConfig::default());

    let rust = word(&context, "rust");
    assert_eq!(rust.image, "rust");
    assert_eq!(rust.tf, 5);
    assert_eq!(rust.df(), 2);
    assert_eq!(
        context.words.iter().filter(|w| w.lowercase == "rust").count(),
        1,
        "differently-cased images must collapse to one word"
    );
}

#[test]
fn casing_tie_goes_to_lexical_order() {
    let registry = registry();
    let docs = vec![Document::from_title_summary("1", "Apple apple", "")];
    let context = run(&registry, &docs, &ClusteringConfig::default());
    // "Apple" sorts before "apple" (uppercase code points are smaller).
    assert_eq!(word(&context, "apple").image, "Apple");
}

#[test]
fn document_frequency_threshold_drops_rare_words() {
    let registry = registry();
    let docs = vec![
        Document::from_title_summary("1", "common rare", ""),
        Document::from_title_summary("2", "common", ""),
    ];
    let config = ClusteringConfig::builder().word_df_threshold(2).build().unwrap();
    let context = run(&registry, &docs, &config);

    assert!(context.words.iter().any(|w| w.lowercase == "common"));
    assert!(context.words.iter().all(|w| w.lowercase != "rare"));
}

// ============================================================
// Stems, stop words, fields
// ============================================================

#[test]
fn inflected_forms_share_a_stem() {
    let registry = registry();
    let docs = vec![
        Document::from_title_summary("1", "clusters", "clustering"),
        Document::from_title_summary("2", "cluster", ""),
    ];
    let context = run(&registry, &docs, &ClusteringConfig::default());

    let stem = word(&context, "clusters").stem;
    assert_eq!(word(&context, "clustering").stem, stem);
    assert_eq!(word(&context, "cluster").stem, stem);

    let stem = &context.stems[stem];
    assert_eq!(stem.tf, 3);
    assert_eq!(stem.df(), 2);
    assert_eq!(stem.words.len(), 3);
}

#[test]
fn stem_document_frequency_never_exceeds_document_count() {
    let registry = registry();
    let docs = vec![
        Document::from_title_summary("1", "data data data", "mining data"),
        Document::from_title_summary("2", "data", "text mining"),
        Document::from_title_summary("3", "", ""),
    ];
    let context = run(&registry, &docs, &ClusteringConfig::default());
    for stem in &context.stems {
        assert!(stem.df() <= docs.len());
        assert!(stem.tf as usize >= stem.df());
    }
}

#[test]
fn stop_words_are_flagged() {
    let registry = registry();
    let docs = vec![Document::from_title_summary("1", "The history of Rome", "")];
    let context = run(&registry, &docs, &ClusteringConfig::default());

    assert!(word(&context, "the").stop);
    assert!(word(&context, "of").stop);
    assert!(!word(&context, "rome").stop);
}

#[test]
fn title_field_is_tracked_per_stem() {
    let registry = registry();
    let docs = vec![Document::from_title_summary("1", "galaxy", "telescope")];
    let context = run(&registry, &docs, &ClusteringConfig::default());

    assert!(context.is_title_stem(word(&context, "galaxy").stem));
    assert!(!context.is_title_stem(word(&context, "telescope").stem));
}

#[test]
fn only_configured_fields_are_tokenized() {
    let registry = registry();
    let docs = vec![Document::from_title_summary("1", "alpha", "beta").with_field("url", "gamma")];
    let context = run(&registry, &docs, &ClusteringConfig::default());

    assert!(context.words.iter().any(|w| w.lowercase == "alpha"));
    assert!(context.words.iter().all(|w| w.lowercase != "gamma"));
}

// ============================================================
// Degenerate input
// ============================================================

#[test]
fn empty_and_missing_fields_contribute_nothing() {
    let registry = registry();
    let docs = vec![
        Document::new("1"),
        Document::from_title_summary("2", "", "   "),
        Document::from_title_summary("3", "!!!", "... ???"),
    ];
    let context = run(&registry, &docs, &ClusteringConfig::default());

    assert!(!context.has_words());
    assert!(context.stems.is_empty());
    // Only separators and punctuation remain.
    assert!(context
        .tokens
        .iter()
        .all(|t| t.kind.is_separator() || t.kind.kind() == TokenType::PUNCTUATION));
}

#[test]
fn separators_mark_field_and_document_boundaries() {
    let registry = registry();
    let docs = vec![
        Document::from_title_summary("1", "a", "b"),
        Document::from_title_summary("2", "c", "d"),
    ];
    let context = run(&registry, &docs, &ClusteringConfig::default());

    let documents = context
        .tokens
        .iter()
        .filter(|t| t.kind.has_flag(TokenType::DOCUMENT_SEPARATOR))
        .count();
    let fields = context
        .tokens
        .iter()
        .filter(|t| t.kind.has_flag(TokenType::FIELD_SEPARATOR))
        .count();
    assert_eq!(documents, 2);
    assert_eq!(fields, 4);
}

#[test]
fn token_words_point_at_matching_words() {
    let registry = registry();
    let docs = vec![Document::from_title_summary("1", "Graph theory", "graph")];
    let context = run(&registry, &docs, &ClusteringConfig::default());

    for (i, w) in context.token_words.iter().enumerate() {
        if let Some(w) = w {
            assert_eq!(
                context.token_image(i).to_lowercase(),
                context.words[*w].lowercase
            );
        }
    }
}
