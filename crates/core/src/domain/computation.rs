use super::{Grade, GradingPolicy};

/// Semester key used when a result is computed across all semesters.
pub const NO_SEMESTER: &str = "N/A";

pub fn semester_key(semester: Option<&str>) -> String {
    match semester.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => NO_SEMESTER.to_string(),
    }
}

/// Rounds half away from zero to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// One mark as seen by the calculator. `max_marks` is `None` when the
/// subject could not be resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkLine {
    pub marks_obtained: f64,
    pub max_marks: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResultComputation {
    pub total_marks: f64,
    pub total_max_marks: f64,
    pub percentage: f64,
    pub grade: Grade,
    pub sgpa: f64,
    pub cgpa: f64,
}

impl ResultComputation {
    /// Returns `None` for an empty mark set.
    pub fn compute(lines: &[MarkLine], policy: &dyn GradingPolicy) -> Option<Self> {
        if lines.is_empty() {
            return None;
        }

        let total_marks: f64 = lines.iter().map(|line| line.marks_obtained).sum();
        // Unresolvable or non-positive maxima add nothing to the denominator.
        let total_max_marks: f64 = lines
            .iter()
            .filter_map(|line| line.max_marks)
            .filter(|max| max.is_finite() && *max > 0.0)
            .sum();

        let percentage = if total_max_marks > 0.0 {
            round2(total_marks / total_max_marks * 100.0)
        } else {
            0.0
        };
        let grade = policy.grade_of(percentage);
        let sgpa = policy.grade_point_of(grade);

        Some(Self {
            total_marks,
            total_max_marks,
            percentage,
            grade,
            sgpa,
            // Single-semester placeholder until cumulative history is tracked.
            cgpa: sgpa,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FixedGradingPolicy;

    fn line(obtained: f64, max: f64) -> MarkLine {
        MarkLine {
            marks_obtained: obtained,
            max_marks: Some(max),
        }
    }

    #[test]
    fn percentage_is_rounded_to_two_decimals() {
        let lines = [line(50.0, 75.0), line(50.0, 75.0), line(0.0, 75.0)];
        let result = ResultComputation::compute(&lines, &FixedGradingPolicy).expect("non-empty");

        assert_eq!(result.total_marks, 100.0);
        assert_eq!(result.total_max_marks, 225.0);
        assert_eq!(result.percentage, 44.44);
        assert_eq!(result.grade, Grade::C);
        assert_eq!(result.sgpa, 5.0);
        assert_eq!(result.cgpa, result.sgpa);
    }

    #[test]
    fn mixed_maxima_sum_numerator_and_denominator_separately() {
        let lines = [line(45.0, 50.0), line(90.0, 100.0)];
        let result = ResultComputation::compute(&lines, &FixedGradingPolicy).expect("non-empty");

        assert_eq!(result.percentage, 90.0);
        assert_eq!(result.grade, Grade::APlus);
        assert_eq!(result.sgpa, 10.0);
    }

    #[test]
    fn unresolved_subject_contributes_nothing_to_denominator() {
        let lines = [
            line(40.0, 50.0),
            MarkLine {
                marks_obtained: 10.0,
                max_marks: None,
            },
        ];
        let result = ResultComputation::compute(&lines, &FixedGradingPolicy).expect("non-empty");

        assert_eq!(result.total_marks, 50.0);
        assert_eq!(result.total_max_marks, 50.0);
        assert_eq!(result.percentage, 100.0);
    }

    #[test]
    fn zero_denominator_yields_zero_percentage() {
        let lines = [MarkLine {
            marks_obtained: 12.0,
            max_marks: None,
        }];
        let result = ResultComputation::compute(&lines, &FixedGradingPolicy).expect("non-empty");

        assert_eq!(result.percentage, 0.0);
        assert_eq!(result.grade, Grade::F);
        assert_eq!(result.sgpa, 0.0);
    }

    #[test]
    fn empty_marks_compute_nothing() {
        assert!(ResultComputation::compute(&[], &FixedGradingPolicy).is_none());
    }

    #[test]
    fn semester_key_defaults_to_placeholder() {
        assert_eq!(semester_key(None), "N/A");
        assert_eq!(semester_key(Some("  ")), "N/A");
        assert_eq!(semester_key(Some(" Fall-2025 ")), "Fall-2025");
    }

    #[test]
    fn round2_behaviour() {
        assert_eq!(round2(66.666_666), 66.67);
        assert_eq!(round2(12.344), 12.34);
        assert_eq!(round2(0.0), 0.0);
    }
}
