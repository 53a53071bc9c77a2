use std::collections::HashSet;

use super::{DomainError, Grade};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradeRange {
    pub grade: Grade,
    pub min_percentage: f64,
    pub max_percentage: f64,
    pub grade_point: f64,
}

impl GradeRange {
    pub fn new(grade: Grade, min_percentage: f64, max_percentage: f64, grade_point: f64) -> Self {
        Self {
            grade,
            min_percentage,
            max_percentage,
            grade_point,
        }
    }
}

/// A named, versioned grade table whose ranges are known not to overlap.
#[derive(Debug, Clone, PartialEq)]
pub struct GradingSchema {
    name: String,
    version: i32,
    ranges: Vec<GradeRange>,
    pass_percentage: f64,
}

impl GradingSchema {
    pub fn new(
        name: impl Into<String>,
        version: i32,
        ranges: Vec<GradeRange>,
        pass_percentage: f64,
    ) -> Result<Self, DomainError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::EmptySchemaName);
        }
        if !(0.0..=100.0).contains(&pass_percentage) {
            return Err(DomainError::InvalidPassPercentage(pass_percentage));
        }
        validate_ranges(&ranges)?;

        Ok(Self {
            name,
            version,
            ranges,
            pass_percentage,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    pub fn ranges(&self) -> &[GradeRange] {
        &self.ranges
    }

    pub fn pass_percentage(&self) -> f64 {
        self.pass_percentage
    }
}

fn validate_ranges(ranges: &[GradeRange]) -> Result<(), DomainError> {
    if ranges.is_empty() {
        return Err(DomainError::EmptyGradeRanges);
    }

    let mut seen = HashSet::new();
    for range in ranges {
        let label = range.grade.as_str().to_string();
        let bounded = (0.0..=100.0).contains(&range.min_percentage)
            && (0.0..=100.0).contains(&range.max_percentage)
            && range.min_percentage <= range.max_percentage;
        if !bounded {
            return Err(DomainError::InvalidGradeRange {
                grade: label,
                min: range.min_percentage,
                max: range.max_percentage,
            });
        }
        if !(range.grade_point >= 0.0 && range.grade_point.is_finite()) {
            return Err(DomainError::InvalidGradePoint {
                grade: label,
                point: range.grade_point,
            });
        }
        if !seen.insert(range.grade) {
            return Err(DomainError::DuplicateGrade(label));
        }
    }

    // Bounds are inclusive on both ends.
    let mut sorted = ranges.to_vec();
    sorted.sort_by(|a, b| a.min_percentage.total_cmp(&b.min_percentage));
    for pair in sorted.windows(2) {
        if pair[1].min_percentage <= pair[0].max_percentage {
            return Err(DomainError::OverlappingGradeRanges {
                first: pair[0].grade.as_str().to_string(),
                second: pair[1].grade.as_str().to_string(),
            });
        }
    }

    Ok(())
}
