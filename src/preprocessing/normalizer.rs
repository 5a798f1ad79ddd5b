// Case normalization, stemming, and stop-word marking.

use std::collections::{BTreeMap, HashMap};

use crate::language::LanguageResources;

use super::tokenizer::TokenType;
use super::{PreprocessingContext, Stem, Word};

#[derive(Default)]
struct CaseGroup {
    variants: BTreeMap<String, u32>,
    tf: u32,
    tf_by_document: BTreeMap<usize, u32>,
    field_mask: u32,
    kind: TokenType,
}

/// Collapse token images that differ only by case into one word each.
///
/// The canonical image is the most frequent variant, ties going to the
/// lexically smallest. Words found in fewer than `df_threshold` documents are
/// dropped and their tokens map to no word.
pub fn normalize_case(context: &mut PreprocessingContext<'_>, df_threshold: usize) {
    let mut groups: BTreeMap<String, CaseGroup> = BTreeMap::new();

    for (i, token) in context.tokens.iter().enumerate() {
        if !token.kind.is_word() {
            continue;
        }
        let image = context.token_image(i);
        if image.is_empty() {
            continue;
        }
        let group = groups.entry(image.to_lowercase()).or_insert_with(|| CaseGroup {
            kind: token.kind.kind(),
            ..CaseGroup::default()
        });
        *group.variants.entry(image.to_string()).or_insert(0) += 1;
        group.tf += 1;
        *group.tf_by_document.entry(token.document).or_insert(0) += 1;
        group.field_mask |= 1 << token.field;
    }

    let mut index: HashMap<String, usize> = HashMap::new();
    let mut words = Vec::new();
    for (lowercase, group) in groups {
        if group.tf_by_document.len() < df_threshold {
            continue;
        }
        let mut image = String::new();
        let mut best = 0;
        for (variant, count) in group.variants {
            if count > best {
                best = count;
                image = variant;
            }
        }
        index.insert(lowercase.clone(), words.len());
        words.push(Word {
            image,
            lowercase,
            kind: group.kind,
            tf: group.tf,
            tf_by_document: group.tf_by_document.into_iter().collect(),
            field_mask: group.field_mask,
            stem: 0,
            stop: false,
        });
    }

    let token_words = (0..context.tokens.len())
        .map(|i| {
            if context.tokens[i].kind.is_word() {
                index.get(&context.token_image(i).to_lowercase()).copied()
            } else {
                None
            }
        })
        .collect();

    context.words = words;
    context.token_words = token_words;
}

/// Group words by stem and aggregate their statistics. Numbers and e-mail
/// addresses are their own stem.
pub fn stem_words(context: &mut PreprocessingContext<'_>, language: &LanguageResources) {
    let mut by_stem: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (i, word) in context.words.iter().enumerate() {
        let key = match word.kind {
            TokenType::TERM | TokenType::ACRONYM => {
                let stem = language.stem(&word.lowercase);
                if stem.is_empty() {
                    word.lowercase.clone()
                } else {
                    stem
                }
            }
            _ => word.lowercase.clone(),
        };
        by_stem.entry(key).or_default().push(i);
    }

    let mut stems = Vec::with_capacity(by_stem.len());
    for (stem_index, (image, word_ids)) in by_stem.into_iter().enumerate() {
        let mut tf = 0;
        let mut field_mask = 0;
        let mut per_document: BTreeMap<usize, u32> = BTreeMap::new();
        let mut most_frequent_word = word_ids[0];
        let mut best_tf = 0;

        for &w in &word_ids {
            let word = &mut context.words[w];
            word.stem = stem_index;
            tf += word.tf;
            field_mask |= word.field_mask;
            for &(doc, count) in &word.tf_by_document {
                *per_document.entry(doc).or_insert(0) += count;
            }
            if word.tf > best_tf {
                best_tf = word.tf;
                most_frequent_word = w;
            }
        }

        stems.push(Stem {
            image,
            tf,
            tf_by_document: per_document.into_iter().collect(),
            field_mask,
            most_frequent_word,
            words: word_ids,
        });
    }
    context.stems = stems;
}

pub fn mark_stop_words(context: &mut PreprocessingContext<'_>, language: &LanguageResources) {
    for word in &mut context.words {
        word.stop = language.is_stop_word(&word.lowercase);
    }
}
