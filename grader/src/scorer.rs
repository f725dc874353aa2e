//! # Scorer Module
//!
//! Pure score composition: combines the measured test score and the
//! AI-derived quality score into a weighted total and a pass/fail grade.
//! Policy lives in [`Weights`]; the 80/20 split and the pass mark of 70 are
//! the product defaults.

use crate::config::Weights;
use crate::types::{Grade, ProjectType};

/// The composed outcome of one grading run.
#[derive(Debug, Clone, PartialEq)]
pub struct Composite {
    /// 0-100.
    pub total: f64,
    pub grade: Grade,
}

/// Composes the final score for a submission.
///
/// - Executable project types: `total = test_score * test_weight +
///   quality_score * quality_weight`.
/// - Non-executable types (no test phase ran): `total = quality_score`; the
///   test weight collapses to zero since no tests ran.
/// - `grade` is `Pass` iff `total >= pass_mark`.
///
/// The total is not rounded here: grading happens on the exact value so a
/// 69.999 stays below a pass mark of 70.
pub fn compose(
    test_score: f64,
    quality_score: f64,
    project_type: ProjectType,
    weights: &Weights,
) -> Composite {
    let total = if project_type.is_executable() {
        test_score * weights.test_weight + quality_score * weights.quality_weight
    } else {
        quality_score
    };

    let grade = if total >= weights.pass_mark {
        Grade::Pass
    } else {
        Grade::Fail
    };

    Composite { total, grade }
}
