// Colored terminal output for cluster listings.
//
// This module handles all terminal-specific formatting: colors, alignment,
// document previews. The main.rs display functions delegate here.

use colored::Colorize;

use crate::clustering::{Cluster, ClusteringResult};
use crate::config::ClusteringConfig;
use crate::document::Document;

/// How many documents to preview under each cluster.
const PREVIEW_DOCUMENTS: usize = 5;

/// Display the clusters of one request, largest first, Other Topics last.
pub fn display_clusters(result: &ClusteringResult, documents: &[Document], title_field: &str) {
    if result.clusters.is_empty() {
        println!("No documents to cluster.");
        return;
    }

    let topical = result.topical().count();
    println!(
        "\n{}",
        format!(
            "=== {} clusters from {} documents ===",
            topical, result.diagnostics.documents
        )
        .bold()
    );
    println!();

    for (i, cluster) in result.clusters.iter().enumerate() {
        display_cluster(i + 1, cluster, documents, title_field);
    }

    if let Some(other) = result.other_topics() {
        let share = other.size() as f64 / documents.len().max(1) as f64;
        if share > 0.5 {
            println!(
                "  {} {:.0}% of documents did not fit any topic",
                "~".yellow(),
                share * 100.0
            );
        }
    }
}

fn display_cluster(rank: usize, cluster: &Cluster, documents: &[Document], title_field: &str) {
    let label = if cluster.other_topics {
        cluster.label.dimmed().italic()
    } else {
        colorize_score(&cluster.label, cluster.score)
    };
    println!(
        "  {:>3}. {}  {}",
        rank,
        label,
        format!("({} docs, score {:.2})", cluster.size(), cluster.score).dimmed()
    );

    for &doc in cluster.documents.iter().take(PREVIEW_DOCUMENTS) {
        let Some(document) = documents.get(doc) else {
            continue;
        };
        let title = document.field(title_field).unwrap_or("");
        println!(
            "       {:<8} {}",
            format!("[{}]", document.id).dimmed(),
            super::truncate_chars(title, 90)
        );
    }
    if cluster.size() > PREVIEW_DOCUMENTS {
        println!(
            "       {}",
            format!("... and {} more", cluster.size() - PREVIEW_DOCUMENTS).dimmed()
        );
    }
    println!();
}

/// Display the effective configuration.
pub fn display_config(config: &ClusteringConfig) {
    println!("\n{}", "=== Lingo configuration ===".bold());
    match serde_json::to_string_pretty(config) {
        Ok(json) => println!("{json}"),
        Err(e) => println!("  {} {}", "!".red(), e),
    }
}

/// Stronger labels get brighter colors.
fn colorize_score(label: &str, score: f64) -> colored::ColoredString {
    if score >= 0.8 {
        label.green().bold()
    } else if score >= 0.5 {
        label.green()
    } else if score >= 0.25 {
        label.yellow()
    } else {
        label.normal()
    }
}
