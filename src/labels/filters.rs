// Label filter chain — a fixed, ordered set of independently enabled filters.
//
// Each filter can only reject candidates, so the chain's output is always a
// subset of its input whatever combination of filters is enabled.

use std::collections::HashMap;

use tracing::debug;

use crate::config::ClusteringConfig;
use crate::preprocessing::PreprocessingContext;

use super::LabelCandidate;

/// One stage of the filter chain.
pub trait LabelFilter: Send + Sync {
    fn name(&self) -> &'static str;

    /// Clear `accepted[i]` for every candidate this filter rejects.
    fn reject(
        &self,
        context: &PreprocessingContext<'_>,
        candidates: &[LabelCandidate],
        accepted: &mut [bool],
    );
}

/// Rejects candidates that begin or end with a stop word.
pub struct StopWordLabelFilter;

impl LabelFilter for StopWordLabelFilter {
    fn name(&self) -> &'static str {
        "stop-word"
    }

    fn reject(
        &self,
        context: &PreprocessingContext<'_>,
        candidates: &[LabelCandidate],
        accepted: &mut [bool],
    ) {
        for (candidate, keep) in candidates.iter().zip(accepted.iter_mut()) {
            let first = candidate.words.first().map(|&w| context.words[w].stop);
            let last = candidate.words.last().map(|&w| context.words[w].stop);
            if first == Some(true) || last == Some(true) {
                *keep = false;
            }
        }
    }
}

/// Rejects candidates that start with a number (which includes purely
/// numeric ones).
pub struct NumericLabelFilter;

impl LabelFilter for NumericLabelFilter {
    fn name(&self) -> &'static str {
        "numeric"
    }

    fn reject(
        &self,
        context: &PreprocessingContext<'_>,
        candidates: &[LabelCandidate],
        accepted: &mut [bool],
    ) {
        for (candidate, keep) in candidates.iter().zip(accepted.iter_mut()) {
            if candidate
                .words
                .first()
                .is_some_and(|&w| context.words[w].kind.is_numeric())
            {
                *keep = false;
            }
        }
    }
}

/// Rejects candidates that are truncations of a super-phrase one word longer.
///
/// A candidate L goes when some left or right extension P has
/// `freq(P) / freq(L) > label_override_threshold`.
pub struct CompleteLabelFilter {
    pub label_override_threshold: f64,
}

impl CompleteLabelFilter {
    /// Highest frequency among the one-word extensions of each candidate.
    fn extension_frequencies(candidates: &[LabelCandidate]) -> Vec<u32> {
        let index: HashMap<&[usize], usize> = candidates
            .iter()
            .enumerate()
            .map(|(i, c)| (c.stems.as_slice(), i))
            .collect();

        let mut best = vec![0u32; candidates.len()];
        for phrase in candidates.iter().filter(|c| c.is_phrase()) {
            let n = phrase.stems.len();
            for sub in [&phrase.stems[1..], &phrase.stems[..n - 1]] {
                if let Some(&i) = index.get(sub) {
                    best[i] = best[i].max(phrase.frequency);
                }
            }
        }
        best
    }
}

impl LabelFilter for CompleteLabelFilter {
    fn name(&self) -> &'static str {
        "complete"
    }

    fn reject(
        &self,
        _context: &PreprocessingContext<'_>,
        candidates: &[LabelCandidate],
        accepted: &mut [bool],
    ) {
        let extensions = Self::extension_frequencies(candidates);
        for ((candidate, keep), &extension) in
            candidates.iter().zip(accepted.iter_mut()).zip(&extensions)
        {
            if candidate.frequency == 0 || extension == 0 {
                continue;
            }
            let ratio = f64::from(extension) / f64::from(candidate.frequency);
            if ratio > self.label_override_threshold {
                *keep = false;
            }
        }
    }
}

/// The configured filters, in their fixed order.
pub struct LabelFilterChain {
    filters: Vec<Box<dyn LabelFilter>>,
}

impl LabelFilterChain {
    pub fn from_config(config: &ClusteringConfig) -> Self {
        let mut filters: Vec<Box<dyn LabelFilter>> = Vec::new();
        if config.stop_word_label_filter {
            filters.push(Box::new(StopWordLabelFilter));
        }
        if config.numeric_label_filter {
            filters.push(Box::new(NumericLabelFilter));
        }
        if config.complete_label_filter {
            filters.push(Box::new(CompleteLabelFilter {
                label_override_threshold: config.label_override_threshold,
            }));
        }
        Self { filters }
    }

    pub fn filter_names(&self) -> Vec<&'static str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    /// Keep the candidates no enabled filter rejects, preserving order.
    pub fn apply(
        &self,
        context: &PreprocessingContext<'_>,
        candidates: Vec<LabelCandidate>,
    ) -> Vec<LabelCandidate> {
        let mut accepted = vec![true; candidates.len()];
        for filter in &self.filters {
            filter.reject(context, &candidates, &mut accepted);
            debug!(
                filter = filter.name(),
                remaining = accepted.iter().filter(|&&a| a).count(),
                "Applied label filter"
            );
        }
        candidates
            .into_iter()
            .zip(accepted)
            .filter_map(|(candidate, keep)| keep.then_some(candidate))
            .collect()
    }
}
