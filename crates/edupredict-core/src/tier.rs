//! Qualitative interpretation of a predicted score.

use std::fmt;

/// Performance bucket for a predicted math score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Excellent,
    Good,
    Average,
    BelowAverage,
}

impl Tier {
    /// Lower bounds are inclusive: 85.0 is Excellent, 70.0 Good, 50.0 Average.
    /// NaN lands in [`Tier::BelowAverage`].
    pub fn from_score(score: f64) -> Self {
        if score >= 85.0 {
            Self::Excellent
        } else if score >= 70.0 {
            Self::Good
        } else if score >= 50.0 {
            Self::Average
        } else {
            Self::BelowAverage
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Average => "Average",
            Self::BelowAverage => "Below average",
        }
    }

    /// Sentence shown under the score.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent performance!",
            Self::Good => "Good performance",
            Self::Average => "Average performance - room for improvement",
            Self::BelowAverage => "Below average - consider additional support",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
