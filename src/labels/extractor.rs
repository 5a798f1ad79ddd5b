// Label candidate extraction.
//
// Word candidates come straight from the stem table. Phrase candidates are
// every contiguous sub-sequence (length 2 up to the cap) of a run of non-stop
// label words; runs end at separators, punctuation, stop words, and dropped
// words. Phrases are deduplicated by stem sequence.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::config::ClusteringConfig;
use crate::preprocessing::PreprocessingContext;

use super::LabelCandidate;

#[derive(Default)]
struct PhraseOccurrences {
    frequency: u32,
    documents: BTreeSet<usize>,
    variants: BTreeMap<Vec<usize>, u32>,
}

/// Find all word and phrase label candidates.
///
/// Order: word candidates by stem index, then phrases by stem sequence.
pub fn extract_candidates(
    context: &PreprocessingContext<'_>,
    config: &ClusteringConfig,
) -> Vec<LabelCandidate> {
    let mut candidates: Vec<LabelCandidate> = context
        .stems
        .iter()
        .enumerate()
        .filter(|(_, stem)| context.words[stem.most_frequent_word].kind.is_label_word())
        .map(|(index, stem)| LabelCandidate {
            words: vec![stem.most_frequent_word],
            stems: vec![index],
            frequency: stem.tf,
            documents: stem.tf_by_document.iter().map(|&(doc, _)| doc).collect(),
        })
        .collect();
    let word_candidates = candidates.len();

    let mut phrases: BTreeMap<Vec<usize>, PhraseOccurrences> = BTreeMap::new();
    let mut run: Vec<usize> = Vec::new();
    let mut run_document = 0;

    for (i, token) in context.tokens.iter().enumerate() {
        let word = context.token_words[i].filter(|&w| {
            let word = &context.words[w];
            !word.stop && word.kind.is_label_word()
        });
        match word {
            Some(w) if !token.kind.is_separator() => {
                run.push(w);
                run_document = token.document;
            }
            _ => {
                collect_phrases(context, &run, run_document, config.max_phrase_length, &mut phrases);
                run.clear();
            }
        }
    }
    collect_phrases(context, &run, run_document, config.max_phrase_length, &mut phrases);

    for (stems, occurrences) in phrases {
        if occurrences.frequency < config.min_phrase_frequency {
            continue;
        }
        let mut words = Vec::new();
        let mut best = 0;
        for (variant, count) in occurrences.variants {
            if count > best {
                best = count;
                words = variant;
            }
        }
        candidates.push(LabelCandidate {
            words,
            stems,
            frequency: occurrences.frequency,
            documents: occurrences.documents,
        });
    }

    debug!(
        words = word_candidates,
        phrases = candidates.len() - word_candidates,
        "Extracted label candidates"
    );
    candidates
}

fn collect_phrases(
    context: &PreprocessingContext<'_>,
    run: &[usize],
    document: usize,
    max_length: usize,
    phrases: &mut BTreeMap<Vec<usize>, PhraseOccurrences>,
) {
    for start in 0..run.len() {
        for length in 2..=max_length {
            let Some(words) = run.get(start..start + length) else {
                break;
            };
            let stems: Vec<usize> = words.iter().map(|&w| context.words[w].stem).collect();
            let entry = phrases.entry(stems).or_default();
            entry.frequency += 1;
            entry.documents.insert(document);
            *entry.variants.entry(words.to_vec()).or_insert(0) += 1;
        }
    }
}
