use std::fmt;
use std::str::FromStr;

use super::DomainError;

/// Letter grade, ordered from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Grade {
    APlus,
    A,
    BPlus,
    B,
    CPlus,
    C,
    D,
    F,
}

impl Grade {
    pub const ALL: [Grade; 8] = [
        Grade::APlus,
        Grade::A,
        Grade::BPlus,
        Grade::B,
        Grade::CPlus,
        Grade::C,
        Grade::D,
        Grade::F,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::BPlus => "B+",
            Grade::B => "B",
            Grade::CPlus => "C+",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }

    /// Every grade except `F` counts as a pass.
    pub fn is_pass(self) -> bool {
        self != Grade::F
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Grade {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Grade::ALL
            .into_iter()
            .find(|grade| grade.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| DomainError::UnknownGrade(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::Grade;

    #[test]
    fn grade_labels_parse_back() {
        for grade in Grade::ALL {
            assert_eq!(grade.as_str().parse::<Grade>(), Ok(grade));
        }
        assert_eq!("b+".parse::<Grade>(), Ok(Grade::BPlus));
    }

    #[test]
    fn unknown_grade_is_rejected() {
        let err = "E".parse::<Grade>().expect_err("E is not a grade");
        assert_eq!(err.to_string(), "unknown grade: E");
    }

    #[test]
    fn only_f_fails() {
        assert!(Grade::D.is_pass());
        assert!(!Grade::F.is_pass());
    }
}
