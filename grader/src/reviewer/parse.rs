//! Resilient parsing of the model's review response.
//!
//! The model is instructed to return a bare JSON object, but the parser
//! assumes it will not always comply. Three tiers:
//!
//! 1. strict JSON parse of the whole response;
//! 2. extraction of the largest balanced `{...}` substring that parses;
//! 3. regex rescue of score values out of the report's own text
//!    (e.g. "Code Quality Score: 85/100");
//!
//! and when everything fails, a zero-score analysis whose report carries the
//! raw model output as a diagnostic instead of silently dropping it. Scores
//! are clamped to [0, 100] regardless of tier.

use crate::types::{ProjectType, QualityAnalysis};
use regex::Regex;
use serde_json::Value;

/// Clamps a model-reported score into the valid range.
pub fn clamp_score(score: f64) -> f64 {
    score.clamp(0.0, 100.0)
}

/// Finds the largest balanced `{...}` substring that parses as JSON.
/// Balance tracking is string- and escape-aware so braces inside report text
/// do not confuse it.
fn extract_json_object(text: &str) -> Option<Value> {
    let bytes = text.as_bytes();
    let mut best: Option<(usize, Value)> = None;

    for start in 0..bytes.len() {
        if bytes[start] != b'{' {
            continue;
        }
        let mut depth = 0usize;
        let mut in_string = false;
        let mut escaped = false;

        for (offset, &b) in bytes[start..].iter().enumerate() {
            if in_string {
                if escaped {
                    escaped = false;
                } else if b == b'\\' {
                    escaped = true;
                } else if b == b'"' {
                    in_string = false;
                }
                continue;
            }
            match b {
                b'"' => in_string = true,
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        let candidate = &text[start..start + offset + 1];
                        if best.as_ref().is_none_or(|(len, _)| candidate.len() > *len) {
                            if let Ok(value) = serde_json::from_str::<Value>(candidate) {
                                best = Some((candidate.len(), value));
                            }
                        }
                        break;
                    }
                }
                _ => {}
            }
        }
    }

    best.map(|(_, value)| value)
}

/// Pattern-matches a labeled score out of markdown text, accepting the
/// "Label Score: 85/100", "Label Score: 85", and table-cell forms the model
/// tends to produce. The word "score" is required so prose that merely
/// mentions the label next to a number ("ran the test 3 times") is not
/// mistaken for a rating.
fn rescue_score(report: &str, label: &str) -> Option<f64> {
    let pattern = format!(
        r"(?i){}\s*score\s*[:|]*\s*\**\s*(\d+(?:\.\d+)?)\s*(?:/\s*100)?",
        regex::escape(label)
    );
    let re = Regex::new(&pattern).ok()?;
    re.captures(report)
        .and_then(|c| c[1].parse::<f64>().ok())
}

fn numeric_field(value: &Value, key: &str) -> Option<f64> {
    match value.get(key) {
        Some(Value::Number(n)) => n.as_f64(),
        // Models sometimes quote their numbers.
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Parses the model's response into a [`QualityAnalysis`]. Never fails.
pub fn parse_analysis(raw: &str, project_type: ProjectType) -> QualityAnalysis {
    let parsed = serde_json::from_str::<Value>(raw.trim())
        .ok()
        .filter(Value::is_object)
        .or_else(|| extract_json_object(raw));

    let Some(value) = parsed else {
        return QualityAnalysis {
            code_quality_score: 0.0,
            code_smell_score: (!project_type.is_executable()).then_some(0.0),
            test_score: None,
            report: format!(
                "## Automated Review Unavailable\n\nThe AI reviewer returned no parseable \
                 result. Raw model output:\n\n{}",
                raw
            ),
        };
    };

    let report = value
        .get("report")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| raw.to_string());

    let code_quality_score = numeric_field(&value, "codeQualityScore")
        .or_else(|| numeric_field(&value, "score"))
        .or_else(|| rescue_score(&report, "code quality"))
        .map(clamp_score)
        .unwrap_or(0.0);

    let code_smell_score = if project_type.is_executable() {
        None
    } else {
        Some(
            numeric_field(&value, "codeSmellScore")
                .or_else(|| rescue_score(&report, "code smell"))
                .map(clamp_score)
                .unwrap_or(0.0),
        )
    };

    let test_score = if project_type.is_executable() {
        numeric_field(&value, "testScore")
            .or_else(|| rescue_score(&report, "test"))
            .map(clamp_score)
    } else {
        None
    };

    QualityAnalysis {
        code_quality_score,
        code_smell_score,
        test_score,
        report,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_json_round_trips_exactly() {
        let raw = r##"{"codeQualityScore": 85, "testScore": 90, "report": "# Review\nGood."}"##;
        let analysis = parse_analysis(raw, ProjectType::Express);
        assert_eq!(analysis.code_quality_score, 85.0);
        assert_eq!(analysis.test_score, Some(90.0));
        assert_eq!(analysis.report, "# Review\nGood.");
        assert!(analysis.code_smell_score.is_none());
    }

    #[test]
    fn json_embedded_in_prose_is_recovered() {
        let raw = "Sure! Here is the review you asked for:\n\
                   {\"codeQualityScore\": 72, \"testScore\": 60, \"report\": \"ok {braces} inside\"}\n\
                   Let me know if you need anything else.";
        let analysis = parse_analysis(raw, ProjectType::Express);
        assert_eq!(analysis.code_quality_score, 72.0);
        assert_eq!(analysis.report, "ok {braces} inside");
    }

    #[test]
    fn no_json_anywhere_defaults_to_zero_with_raw_text() {
        let raw = "I am sorry, I cannot review this code.";
        let analysis = parse_analysis(raw, ProjectType::Express);
        assert_eq!(analysis.code_quality_score, 0.0);
        assert!(analysis.report.contains(raw));
    }

    #[test]
    fn missing_scores_are_rescued_from_report_text() {
        let raw = r#"{"report": "| Code Quality Score | 85/100 |\n| Test Score | 70/100 |"}"#;
        let analysis = parse_analysis(raw, ProjectType::Express);
        assert_eq!(analysis.code_quality_score, 85.0);
        assert_eq!(analysis.test_score, Some(70.0));
    }

    #[test]
    fn incidental_numbers_near_labels_are_not_rescued() {
        let raw = r#"{"report": "We ran the test 3 times and the code quality 2 reviewers saw varied."}"#;
        let analysis = parse_analysis(raw, ProjectType::Express);
        assert!(analysis.test_score.is_none());
        assert_eq!(analysis.code_quality_score, 0.0);
    }

    #[test]
    fn stringified_numbers_are_accepted() {
        let raw = r#"{"codeQualityScore": "88", "testScore": "100", "report": "r"}"#;
        let analysis = parse_analysis(raw, ProjectType::Express);
        assert_eq!(analysis.code_quality_score, 88.0);
        assert_eq!(analysis.test_score, Some(100.0));
    }

    #[test]
    fn out_of_range_scores_are_clamped() {
        let raw = r#"{"codeQualityScore": 130, "testScore": -5, "report": "r"}"#;
        let analysis = parse_analysis(raw, ProjectType::Express);
        assert_eq!(analysis.code_quality_score, 100.0);
        assert_eq!(analysis.test_score, Some(0.0));
    }

    #[test]
    fn c_variant_reads_code_smell_score() {
        let raw = r#"{"codeQualityScore": 85, "codeSmellScore": 80, "report": "r"}"#;
        let analysis = parse_analysis(raw, ProjectType::C);
        assert_eq!(analysis.code_quality_score, 85.0);
        assert_eq!(analysis.code_smell_score, Some(80.0));
        assert!(analysis.test_score.is_none());
    }

    #[test]
    fn code_fenced_json_is_recovered() {
        let raw = "```json\n{\"codeQualityScore\": 64, \"testScore\": 50, \"report\": \"r\"}\n```";
        let analysis = parse_analysis(raw, ProjectType::Express);
        assert_eq!(analysis.code_quality_score, 64.0);
    }
}
