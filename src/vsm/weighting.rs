// Term weighting schemes for the term-document matrix.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// How a stem's raw frequency becomes a matrix weight.
///
/// Every scheme returns 0 for a stem that occurs in no document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TermWeighting {
    /// Raw term frequency.
    Tf,
    /// `tf * ln(N / df)`.
    #[default]
    LogTfIdf,
    /// `tf * N / df`.
    LinearTfIdf,
}

impl TermWeighting {
    pub fn weight(self, tf: u32, df: usize, document_count: usize) -> f64 {
        if df == 0 {
            return 0.0;
        }
        let tf = f64::from(tf);
        let ratio = document_count as f64 / df as f64;
        match self {
            TermWeighting::Tf => tf,
            TermWeighting::LogTfIdf => tf * ratio.ln(),
            TermWeighting::LinearTfIdf => tf * ratio,
        }
    }
}

impl fmt::Display for TermWeighting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TermWeighting::Tf => "tf",
            TermWeighting::LogTfIdf => "log-tfidf",
            TermWeighting::LinearTfIdf => "linear-tfidf",
        })
    }
}

impl FromStr for TermWeighting {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "tf" => Ok(TermWeighting::Tf),
            "log-tfidf" | "log-tf-idf" => Ok(TermWeighting::LogTfIdf),
            "linear-tfidf" | "linear-tf-idf" => Ok(TermWeighting::LinearTfIdf),
            other => Err(Error::config(
                "termWeighting",
                format!("unknown weighting '{other}' (expected tf, log-tfidf, linear-tfidf)"),
            )),
        }
    }
}
