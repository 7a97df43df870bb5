use std::io::IsTerminal;
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::error::Error;
use crate::explain::{Direction, ExplainerArtifact, Explanation};
use crate::model::ModelArtifact;
use crate::pipeline::ScoreReport;
use crate::policy::{ConfidenceBand, Verdict};

/// Format a probability as a percentage with one decimal ("73.2%")
pub fn format_probability(probability: f64) -> String {
    if probability.is_nan() {
        return "n/a".to_string();
    }
    format!("{:.1}%", probability * 100.0)
}

/// Format a signed contribution with three decimals ("+0.110", "-0.054")
/// Values that round to zero print without a sign.
pub fn format_contribution(contribution: f64) -> String {
    let formatted = format!("{:+.3}", contribution);
    if formatted == "+0.000" || formatted == "-0.000" {
        "0.000".to_string()
    } else {
        formatted
    }
}

fn direction_marker(direction: Direction) -> &'static str {
    match direction {
        Direction::Raises => "⬆",
        Direction::Lowers => "⬇",
        Direction::Neutral => "·",
    }
}

fn format_explanation_line(explanation: &Explanation, use_colors: bool) -> String {
    let marker = direction_marker(explanation.direction);
    // Pad before coloring; escape codes would count toward the width.
    let contribution = format!("{:>8}", format_contribution(explanation.contribution));
    if use_colors {
        let contribution = match explanation.direction {
            Direction::Raises => contribution.green().to_string(),
            Direction::Lowers => contribution.red().to_string(),
            Direction::Neutral => contribution.dimmed().to_string(),
        };
        format!("  {} {}  {}", marker, contribution, explanation)
    } else {
        format!("  {} {}  {}", marker, contribution, explanation)
    }
}

/// Format a score report as a multi-line human-readable block
///
/// ```text
/// ELIGIBLE (HIGH confidence)  73.2%
///   baseline 49.6%  model scenario-2024.1
///   ⬆   +0.110  'income' raises the eligibility score by 0.110
/// ```
pub fn format_report(report: &ScoreReport, use_colors: bool) -> String {
    let probability = format_probability(report.probability);
    let confidence = format!("({} confidence)", report.confidence_band);

    let header = if use_colors {
        let verdict = match report.verdict {
            Verdict::Eligible => report.verdict.green().bold().to_string(),
            Verdict::NotEligible => report.verdict.red().bold().to_string(),
        };
        let confidence = match report.confidence_band {
            ConfidenceBand::Low => confidence.yellow().to_string(),
            _ => confidence.dimmed().to_string(),
        };
        format!("{} {}  {}", verdict, confidence, probability.bold())
    } else {
        format!("{} {}  {}", report.verdict, confidence, probability)
    };

    let context = format!(
        "  baseline {}  model {}",
        format_probability(report.baseline),
        report.model_version
    );
    let context = if use_colors {
        context.dimmed().to_string()
    } else {
        context
    };

    let mut lines = vec![header, context];
    lines.extend(
        report
            .explanations()
            .iter()
            .map(|e| format_explanation_line(e, use_colors)),
    );
    lines.join("\n")
}

/// Format reports as tab-separated values for scripting
/// Columns: source, verdict, confidence, probability, top feature (no headers, no colors)
pub fn format_tsv(rows: &[(String, ScoreReport)]) -> String {
    rows.iter()
        .map(|(source, report)| {
            let top = report
                .explanations()
                .first()
                .map(|e| e.feature.clone())
                .unwrap_or_default();
            format!(
                "{}\t{}\t{}\t{:.6}\t{}",
                source, report.verdict, report.confidence_band, report.probability, top
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// One entry of `score --json` output: the report and its ranked
/// explanations, or the error that rejected the record.
#[derive(Serialize)]
struct JsonEntry<'a> {
    source: &'a str,
    #[serde(flatten)]
    report: Option<&'a ScoreReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    explanations: Option<Vec<Explanation>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonError>,
}

#[derive(Serialize)]
struct JsonError {
    code: &'static str,
    message: String,
}

/// Format results as a pretty-printed JSON array, one entry per source
pub fn format_json(
    results: &[(String, &Result<ScoreReport, Error>)],
) -> serde_json::Result<String> {
    let entries: Vec<JsonEntry> = results
        .iter()
        .map(|(source, result)| match result {
            Ok(report) => JsonEntry {
                source,
                report: Some(report),
                explanations: Some(report.explanations()),
                error: None,
            },
            Err(e) => JsonEntry {
                source,
                report: None,
                explanations: None,
                error: Some(JsonError {
                    code: e.error_code(),
                    message: e.to_string(),
                }),
            },
        })
        .collect();
    serde_json::to_string_pretty(&entries)
}

/// Summarize loaded artifacts for the `inspect` command
pub fn format_artifact_summary(
    model: &ModelArtifact,
    explainer: Option<&ExplainerArtifact>,
    use_colors: bool,
) -> String {
    let created = model
        .created_at
        .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let title = format!("Model {}", model.model_version);
    let mut lines = vec![
        if use_colors {
            title.bold().to_string()
        } else {
            title
        },
        format!("  format:   v{}", model.format_version),
        format!("  created:  {}", created),
        format!(
            "  forest:   {} trees, {} nodes, max depth {}",
            model.forest.trees.len(),
            model.forest.node_count(),
            model.forest.max_depth()
        ),
        format!("  baseline: {:.6}", model.forest.expected_value()),
        "  features:".to_string(),
    ];
    lines.extend(
        model
            .encoder
            .features
            .iter()
            .enumerate()
            .map(|(i, spec)| format!("    {:>2}. {}", i, spec.name())),
    );

    match explainer {
        Some(explainer) => {
            lines.push(format!(
                "Explainer for {} (baseline {:.6})",
                explainer.model_version, explainer.expected_value
            ));
        }
        None => {
            let missing = "Explainer: not found";
            lines.push(if use_colors {
                missing.yellow().to_string()
            } else {
                missing.to_string()
            });
        }
    }

    lines.join("\n")
}

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}
