// Clustering configuration — one validated struct per request.
//
// Options come from three layers: built-in defaults, LINGO_* environment
// variables (the CLI loads .env via dotenvy first), and explicit builder
// calls. Validation runs eagerly in `build()`, so a bad option is reported
// before any document is touched.

use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::clustering::label_builder::LabelAssigner;
use crate::error::{Error, Result};
use crate::language::Language;
use crate::matrix::factorization::{FactorizationKind, SeedingStrategy};
use crate::vsm::weighting::TermWeighting;

/// Longest phrase the candidate extractor will emit.
pub const MAX_PHRASE_LENGTH_LIMIT: usize = 8;

/// Field occurrence is tracked as a u32 bitmask.
pub const MAX_FIELDS: usize = 32;

/// Every option of the Lingo pipeline. Construct with [`ClusteringConfig::builder`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClusteringConfig {
    pub language: Language,
    /// Document fields that are tokenized and clustered.
    pub fields: Vec<String>,
    /// Field whose words get the title boost.
    pub title_field: String,

    // Matrix model
    pub desired_cluster_count_base: usize,
    pub max_matrix_size: usize,
    pub max_word_df: f64,
    pub title_words_boost: f64,
    pub term_weighting: TermWeighting,

    // Factorization
    pub factorization: FactorizationKind,
    pub max_iterations: usize,
    pub stop_threshold: f64,
    pub seeding: SeedingStrategy,
    pub ordered_concepts: bool,

    // Labels and clusters
    pub phrase_label_boost: f64,
    /// Phrases of at least this many words start losing score.
    pub phrase_length_penalty_start: usize,
    /// Phrases of at least this many words score zero.
    pub phrase_length_penalty_stop: usize,
    pub label_assigner: LabelAssigner,
    pub cluster_merging_threshold: f64,
    pub min_cluster_size: usize,
    pub label_override_threshold: f64,
    pub stop_word_label_filter: bool,
    pub numeric_label_filter: bool,
    pub complete_label_filter: bool,
    pub exact_phrase_assignment: bool,
    pub exact_phrase_bonus: f64,
    pub cluster_assignment_threshold: f64,
    pub score_weight: f64,

    // Preprocessing
    pub max_phrase_length: usize,
    pub min_phrase_frequency: u32,
    pub word_df_threshold: usize,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            language: Language::English,
            fields: vec!["title".to_string(), "summary".to_string()],
            title_field: "title".to_string(),
            desired_cluster_count_base: 30,
            max_matrix_size: 250 * 150,
            max_word_df: 1.0,
            title_words_boost: 2.0,
            term_weighting: TermWeighting::LogTfIdf,
            factorization: FactorizationKind::LocalNmfKl,
            max_iterations: 15,
            stop_threshold: -1.0,
            seeding: SeedingStrategy::Random { seed: 0 },
            ordered_concepts: true,
            phrase_label_boost: 1.5,
            phrase_length_penalty_start: MAX_PHRASE_LENGTH_LIMIT,
            phrase_length_penalty_stop: MAX_PHRASE_LENGTH_LIMIT,
            label_assigner: LabelAssigner::Unique,
            cluster_merging_threshold: 0.7,
            min_cluster_size: 2,
            label_override_threshold: 0.65,
            stop_word_label_filter: true,
            numeric_label_filter: true,
            complete_label_filter: true,
            exact_phrase_assignment: false,
            exact_phrase_bonus: 0.25,
            cluster_assignment_threshold: 0.225,
            score_weight: 0.0,
            max_phrase_length: MAX_PHRASE_LENGTH_LIMIT,
            min_phrase_frequency: 2,
            word_df_threshold: 1,
        }
    }
}

impl ClusteringConfig {
    pub fn builder() -> ClusteringConfigBuilder {
        ClusteringConfigBuilder {
            config: Self::default(),
        }
    }

    /// Defaults overlaid with any LINGO_* environment variables, validated.
    pub fn from_env() -> Result<Self> {
        ClusteringConfigBuilder::from_env()?.build()
    }

    /// Check every option against its allowed range.
    pub fn validate(&self) -> Result<()> {
        if self.fields.is_empty() || self.fields.len() > MAX_FIELDS {
            return Err(Error::config(
                "fields",
                format!("expected 1 to {MAX_FIELDS} field names, got {}", self.fields.len()),
            ));
        }
        if self.title_field.trim().is_empty() {
            return Err(Error::config("titleField", "must not be empty"));
        }
        check_range("desiredClusterCountBase", self.desired_cluster_count_base, 2, 100)?;
        check_range("maxMatrixSize", self.max_matrix_size, 1, usize::MAX)?;
        check_unit("maxWordDf", self.max_word_df)?;
        if self.max_word_df <= 0.0 {
            return Err(Error::config("maxWordDf", "must be greater than 0"));
        }
        check_float("titleWordsBoost", self.title_words_boost, 0.0, 10.0)?;
        check_range("maxIterations", self.max_iterations, 1, usize::MAX)?;
        if !self.stop_threshold.is_finite() {
            return Err(Error::config("stopThreshold", "must be a finite number"));
        }
        check_float("phraseLabelBoost", self.phrase_label_boost, 0.0, 10.0)?;
        check_range(
            "phraseLengthPenaltyStart",
            self.phrase_length_penalty_start,
            2,
            MAX_PHRASE_LENGTH_LIMIT,
        )?;
        check_range(
            "phraseLengthPenaltyStop",
            self.phrase_length_penalty_stop,
            2,
            MAX_PHRASE_LENGTH_LIMIT,
        )?;
        check_unit("clusterMergingThreshold", self.cluster_merging_threshold)?;
        check_range("minClusterSize", self.min_cluster_size, 1, usize::MAX)?;
        check_unit("labelOverrideThreshold", self.label_override_threshold)?;
        check_unit("exactPhraseBonus", self.exact_phrase_bonus)?;
        check_unit("clusterAssignmentThreshold", self.cluster_assignment_threshold)?;
        check_unit("scoreWeight", self.score_weight)?;
        check_range("maxPhraseLength", self.max_phrase_length, 2, MAX_PHRASE_LENGTH_LIMIT)?;
        check_range("minPhraseFrequency", self.min_phrase_frequency as usize, 1, usize::MAX)?;
        check_range("wordDfThreshold", self.word_df_threshold, 1, 100)?;
        Ok(())
    }

    /// Index of the title field within `fields`, if it is clustered at all.
    pub fn title_field_index(&self) -> Option<usize> {
        self.fields.iter().position(|f| *f == self.title_field)
    }
}

fn check_range(option: &'static str, value: usize, min: usize, max: usize) -> Result<()> {
    if value < min || value > max {
        let message = if max == usize::MAX {
            format!("{value} is below the minimum of {min}")
        } else {
            format!("{value} is outside {min}..={max}")
        };
        return Err(Error::config(option, message));
    }
    Ok(())
}

fn check_float(option: &'static str, value: f64, min: f64, max: f64) -> Result<()> {
    if !value.is_finite() || value < min || value > max {
        return Err(Error::config(option, format!("{value} is outside [{min}, {max}]")));
    }
    Ok(())
}

fn check_unit(option: &'static str, value: f64) -> Result<()> {
    check_float(option, value, 0.0, 1.0)
}

/// Fluent construction of a [`ClusteringConfig`]; `build()` validates.
#[derive(Debug, Clone)]
pub struct ClusteringConfigBuilder {
    config: ClusteringConfig,
}

macro_rules! setters {
    ($($name:ident: $ty:ty),* $(,)?) => {
        $(
            pub fn $name(mut self, value: $ty) -> Self {
                self.config.$name = value;
                self
            }
        )*
    };
}

impl ClusteringConfigBuilder {
    setters! {
        language: Language,
        title_field: String,
        desired_cluster_count_base: usize,
        max_matrix_size: usize,
        max_word_df: f64,
        title_words_boost: f64,
        term_weighting: TermWeighting,
        factorization: FactorizationKind,
        max_iterations: usize,
        stop_threshold: f64,
        seeding: SeedingStrategy,
        ordered_concepts: bool,
        phrase_label_boost: f64,
        phrase_length_penalty_start: usize,
        phrase_length_penalty_stop: usize,
        label_assigner: LabelAssigner,
        cluster_merging_threshold: f64,
        min_cluster_size: usize,
        label_override_threshold: f64,
        stop_word_label_filter: bool,
        numeric_label_filter: bool,
        complete_label_filter: bool,
        exact_phrase_assignment: bool,
        exact_phrase_bonus: f64,
        cluster_assignment_threshold: f64,
        score_weight: f64,
        max_phrase_length: usize,
        min_phrase_frequency: u32,
        word_df_threshold: usize,
    }

    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Shorthand for `seeding(SeedingStrategy::Random { seed })`.
    pub fn seed(self, seed: u64) -> Self {
        self.seeding(SeedingStrategy::Random { seed })
    }

    /// Start from defaults and apply LINGO_* environment variables.
    ///
    /// Unset variables keep their defaults; unparseable ones are
    /// configuration errors.
    pub fn from_env() -> Result<Self> {
        let mut b = ClusteringConfig::builder();
        let c = &mut b.config;

        if let Some(v) = env_value("LINGO_LANGUAGE", "language")? {
            c.language = v;
        }
        if let Ok(raw) = env::var("LINGO_FIELDS") {
            c.fields = raw
                .split(',')
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(String::from)
                .collect();
        }
        if let Ok(raw) = env::var("LINGO_TITLE_FIELD") {
            c.title_field = raw.trim().to_string();
        }
        if let Some(v) = env_value("LINGO_DESIRED_CLUSTER_COUNT_BASE", "desiredClusterCountBase")? {
            c.desired_cluster_count_base = v;
        }
        if let Some(v) = env_value("LINGO_MAX_MATRIX_SIZE", "maxMatrixSize")? {
            c.max_matrix_size = v;
        }
        if let Some(v) = env_value("LINGO_MAX_WORD_DF", "maxWordDf")? {
            c.max_word_df = v;
        }
        if let Some(v) = env_value("LINGO_TITLE_WORDS_BOOST", "titleWordsBoost")? {
            c.title_words_boost = v;
        }
        if let Some(v) = env_value("LINGO_TERM_WEIGHTING", "termWeighting")? {
            c.term_weighting = v;
        }
        if let Some(v) = env_value("LINGO_FACTORIZATION", "factorizationFactory")? {
            c.factorization = v;
        }
        if let Some(v) = env_value("LINGO_MAX_ITERATIONS", "maxIterations")? {
            c.max_iterations = v;
        }
        if let Some(v) = env_value("LINGO_STOP_THRESHOLD", "stopThreshold")? {
            c.stop_threshold = v;
        }
        if let Some(seed) = env_value::<u64>("LINGO_SEED", "seeding")? {
            c.seeding = c.seeding.with_seed(seed);
        }
        if let Some(v) = env_value("LINGO_PHRASE_LABEL_BOOST", "phraseLabelBoost")? {
            c.phrase_label_boost = v;
        }
        if let Some(v) = env_value("LINGO_PHRASE_LENGTH_PENALTY_START", "phraseLengthPenaltyStart")? {
            c.phrase_length_penalty_start = v;
        }
        if let Some(v) = env_value("LINGO_PHRASE_LENGTH_PENALTY_STOP", "phraseLengthPenaltyStop")? {
            c.phrase_length_penalty_stop = v;
        }
        if let Some(v) = env_value("LINGO_LABEL_ASSIGNER", "labelAssigner")? {
            c.label_assigner = v;
        }
        if let Some(v) = env_value("LINGO_CLUSTER_MERGING_THRESHOLD", "clusterMergingThreshold")? {
            c.cluster_merging_threshold = v;
        }
        if let Some(v) = env_value("LINGO_MIN_CLUSTER_SIZE", "minClusterSize")? {
            c.min_cluster_size = v;
        }
        if let Some(v) = env_value("LINGO_LABEL_OVERRIDE_THRESHOLD", "labelOverrideThreshold")? {
            c.label_override_threshold = v;
        }
        if let Some(v) = env_value("LINGO_EXACT_PHRASE_ASSIGNMENT", "exactPhraseAssignment")? {
            c.exact_phrase_assignment = v;
        }

        Ok(b)
    }

    pub fn build(self) -> Result<ClusteringConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

fn env_value<T>(var: &str, option: &'static str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| Error::config(option, format!("{var}={raw}: {e}"))),
        Err(_) => Ok(None),
    }
}
