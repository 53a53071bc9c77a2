use super::{Grade, GradingSchema};

/// Percentage a single subject mark must reach to count as a pass in
/// subject analysis.
pub const SUBJECT_PASS_PERCENTAGE: f64 = 33.0;

/// Converts percentages to grades and grades to grade points.
///
/// Every input maps to a grade; out-of-range values fall into the nearest band.
pub trait GradingPolicy: Send + Sync {
    fn grade_of(&self, percentage: f64) -> Grade;
    fn grade_point_of(&self, grade: Grade) -> f64;
}

/// The hard-coded breakpoint table.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedGradingPolicy;

impl FixedGradingPolicy {
    /// Inclusive lower bounds, checked top-down.
    const BANDS: [(f64, Grade); 7] = [
        (90.0, Grade::APlus),
        (80.0, Grade::A),
        (70.0, Grade::BPlus),
        (60.0, Grade::B),
        (50.0, Grade::CPlus),
        (40.0, Grade::C),
        (33.0, Grade::D),
    ];
}

impl GradingPolicy for FixedGradingPolicy {
    fn grade_of(&self, percentage: f64) -> Grade {
        Self::BANDS
            .iter()
            .find(|(min, _)| percentage >= *min)
            .map(|(_, grade)| *grade)
            .unwrap_or(Grade::F)
    }

    fn grade_point_of(&self, grade: Grade) -> f64 {
        match grade {
            Grade::APlus => 10.0,
            Grade::A => 9.0,
            Grade::BPlus => 8.0,
            Grade::B => 7.0,
            Grade::CPlus => 6.0,
            Grade::C => 5.0,
            Grade::D => 4.0,
            Grade::F => 0.0,
        }
    }
}

/// Policy backed by a validated grading schema.
///
/// Bands are tried from the highest minimum down; the first whose minimum is
/// reached wins, so gaps between a band's maximum and the next band's minimum
/// resolve to the lower band. Anything below every minimum gets the lowest band.
#[derive(Debug, Clone)]
pub struct SchemaGradingPolicy {
    bands: Vec<(f64, Grade, f64)>,
}

impl SchemaGradingPolicy {
    pub fn new(schema: &GradingSchema) -> Self {
        let mut bands: Vec<(f64, Grade, f64)> = schema
            .ranges()
            .iter()
            .map(|range| (range.min_percentage, range.grade, range.grade_point))
            .collect();
        bands.sort_by(|a, b| b.0.total_cmp(&a.0));
        Self { bands }
    }
}

impl GradingPolicy for SchemaGradingPolicy {
    fn grade_of(&self, percentage: f64) -> Grade {
        self.bands
            .iter()
            .find(|(min, _, _)| percentage >= *min)
            .or_else(|| self.bands.last())
            .map(|(_, grade, _)| *grade)
            .unwrap_or(Grade::F)
    }

    fn grade_point_of(&self, grade: Grade) -> f64 {
        self.bands
            .iter()
            .find(|(_, band_grade, _)| *band_grade == grade)
            .map(|(_, _, point)| *point)
            .unwrap_or(0.0)
    }
}
