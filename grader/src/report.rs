//! # Report Module
//!
//! Assembles the final [`Scores`] breakdown and the serializable
//! [`GradingResult`] returned to the caller. The breakdown is where degraded
//! phases become visible: a zero sub-score always arrives with feedback text
//! saying why, so the user never receives a silent zero.

use crate::scorer::Composite;
use crate::types::{Grade, ProjectType, QualityAnalysis, ScoreBreakdown, Scores, TestResult};
use serde::Serialize;

/// Terminal result of a completed grading run.
#[derive(Debug, Clone, Serialize)]
pub struct GradingResult {
    pub grade: Grade,
    pub scores: Scores,
    /// Markdown quality report.
    pub report: String,
}

/// Derives the 0-100 test score from the measured run, falling back to the
/// model's own estimate only when the run produced no counts at all.
pub fn effective_test_score(
    test_result: Option<&TestResult>,
    analysis: &QualityAnalysis,
    project_type: ProjectType,
) -> f64 {
    if !project_type.runs_tests() {
        return 0.0;
    }
    match test_result {
        Some(result) if result.total > 0 => {
            f64::from(result.passed) / f64::from(result.total) * 100.0
        }
        _ => analysis.test_score.unwrap_or(0.0),
    }
}

/// Builds the full score record for a completed submission.
pub fn build_scores(
    test_result: Option<&TestResult>,
    analysis: &QualityAnalysis,
    test_score: f64,
    composite: &Composite,
    project_type: ProjectType,
) -> Scores {
    let mut breakdown = Vec::new();

    let test_feedback = if !project_type.runs_tests() {
        "Test phase skipped for this project type.".to_string()
    } else {
        match test_result {
            Some(result) if result.total > 0 => {
                format!("{} of {} tests passed.", result.passed, result.total)
            }
            Some(result) => format!(
                "Test run produced no results: {}",
                first_line(&result.details)
            ),
            None => "No test results were recorded.".to_string(),
        }
    };
    breakdown.push(ScoreBreakdown {
        category: "Tests Passed".to_string(),
        score: test_score,
        max_score: 100.0,
        feedback: test_feedback,
    });

    breakdown.push(ScoreBreakdown {
        category: "Code Quality".to_string(),
        score: analysis.code_quality_score,
        max_score: 100.0,
        feedback: "AI-reviewed code quality; see the report for details.".to_string(),
    });

    if let Some(code_smell_score) = analysis.code_smell_score {
        breakdown.push(ScoreBreakdown {
            category: "Code Smells".to_string(),
            score: code_smell_score,
            max_score: 100.0,
            feedback: "AI-reviewed code smells; see the report for details.".to_string(),
        });
    }

    Scores {
        total: composite.total,
        test_score,
        quality_score: analysis.code_quality_score,
        breakdown,
    }
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("").trim()
}
