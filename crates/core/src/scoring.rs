//! Scoring rules applied when a rating is recorded.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::CoreError;

/// Lowest allowed dimension score.
pub const MIN_SCORE: Decimal = Decimal::ZERO;

/// Highest allowed dimension score.
pub const MAX_SCORE: Decimal = Decimal::ONE_HUNDRED;

/// Decimal places kept for totals and averages (matches `NUMERIC(5,2)`).
pub const SCORE_SCALE: u32 = 2;

/// The four dimension scores of a single rating.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DimensionScores {
    pub content: Option<Decimal>,
    pub market: Option<Decimal>,
    pub compliance: Option<Decimal>,
    pub commercial: Option<Decimal>,
}

impl DimensionScores {
    fn named(&self) -> [(&'static str, Option<Decimal>); 4] {
        [
            ("contentScore", self.content),
            ("marketScore", self.market),
            ("complianceScore", self.compliance),
            ("commercialScore", self.commercial),
        ]
    }

    /// Round every present score to [`SCORE_SCALE`] places, the precision the
    /// columns store. Validation and the total both run on these values.
    pub fn normalized(self) -> Self {
        Self {
            content: self.content.map(round_score),
            market: self.market.map(round_score),
            compliance: self.compliance.map(round_score),
            commercial: self.commercial.map(round_score),
        }
    }

    /// Check every present score lies in `[MIN_SCORE, MAX_SCORE]`.
    pub fn validate(&self) -> Result<(), CoreError> {
        for (name, score) in self.named() {
            if let Some(score) = score {
                if score < MIN_SCORE || score > MAX_SCORE {
                    return Err(CoreError::Validation(format!(
                        "{name} must be between {MIN_SCORE} and {MAX_SCORE}, got {score}"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Total score: mean of the present dimension scores, rounded half away
    /// from zero to [`SCORE_SCALE`] places. `None` when no score is present.
    pub fn total(&self) -> Option<Decimal> {
        let present: Vec<Decimal> = self.named().iter().filter_map(|(_, s)| *s).collect();
        if present.is_empty() {
            return None;
        }
        let sum: Decimal = present.iter().copied().sum();
        let mean = sum / Decimal::from(present.len());
        Some(round_score(mean))
    }
}

/// Round a score to [`SCORE_SCALE`] places.
pub fn round_score(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(SCORE_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Letter grade for an average score.
pub fn grade(score: Decimal) -> &'static str {
    const BANDS: &[(i64, &str)] = &[(90, "S"), (80, "A"), (70, "B+"), (60, "B"), (50, "C+")];
    BANDS
        .iter()
        .find(|(floor, _)| score >= Decimal::from(*floor))
        .map_or("C", |(_, grade)| grade)
}
