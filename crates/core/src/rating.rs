//! Film rating aggregation.
//!
//! A film's `vote_average` and `vote_count` are derived exclusively from its
//! live votes. The database layer feeds every live rating through
//! [`aggregate`] after each vote mutation.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::error::CoreError;

pub const MIN_RATING: f64 = 0.0;
pub const MAX_RATING: f64 = 10.0;

/// Derived vote statistics for one film.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VoteAggregate {
    pub vote_average: f64,
    pub vote_count: i32,
}

impl VoteAggregate {
    pub const EMPTY: Self = Self {
        vote_average: 0.0,
        vote_count: 0,
    };
}

/// Reject ratings outside `[0, 10]`, including NaN and infinities.
pub fn validate_rating(rating: f64) -> Result<f64, CoreError> {
    if !rating.is_finite() || !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(CoreError::Validation(format!(
            "Rating must be a number between {MIN_RATING} and {MAX_RATING}"
        )));
    }
    Ok(rating)
}

/// Round to one decimal place.
///
/// Works on the exact binary value of `value`, ties to even: `8.25` gives
/// `8.2`, and `0.15` (stored as `0.1499...`) gives `0.1`.
pub fn round_to_tenth(value: f64) -> f64 {
    Decimal::from_f64_retain(value)
        .map(|d| d.round_dp_with_strategy(1, RoundingStrategy::MidpointNearestEven))
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}

/// Compute the aggregate for a film from all of its live ratings.
pub fn aggregate(ratings: &[f64]) -> VoteAggregate {
    if ratings.is_empty() {
        return VoteAggregate::EMPTY;
    }
    let sum: f64 = ratings.iter().sum();
    let count = ratings.len();
    VoteAggregate {
        vote_average: round_to_tenth(sum / count as f64),
        vote_count: i32::try_from(count).unwrap_or(i32::MAX),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn no_votes_yields_zero_aggregate() {
        assert_eq!(aggregate(&[]), VoteAggregate::EMPTY);
    }

    #[test]
    fn single_vote_is_its_own_average() {
        let agg = aggregate(&[7.5]);
        assert_eq!(agg.vote_count, 1);
        assert_eq!(agg.vote_average, 7.5);
    }

    #[test]
    fn average_is_rounded_to_one_decimal() {
        // 26 / 3 = 8.666...
        let agg = aggregate(&[8.0, 9.0, 9.0]);
        assert_eq!(agg.vote_count, 3);
        assert_eq!(agg.vote_average, 8.7);

        // 10 / 3 = 3.333...
        assert_eq!(aggregate(&[1.0, 4.0, 5.0]).vote_average, 3.3);
    }

    #[test]
    fn extremes_are_allowed() {
        let agg = aggregate(&[0.0, 10.0]);
        assert_eq!(agg.vote_average, 5.0);
        assert_eq!(agg.vote_count, 2);
    }

    #[test]
    fn rating_bounds_are_inclusive() {
        assert_eq!(validate_rating(0.0).unwrap(), 0.0);
        assert_eq!(validate_rating(10.0).unwrap(), 10.0);
        assert_eq!(validate_rating(6.4).unwrap(), 6.4);
    }

    #[test]
    fn out_of_range_ratings_are_rejected() {
        assert_matches!(validate_rating(-0.1), Err(CoreError::Validation(_)));
        assert_matches!(validate_rating(10.01), Err(CoreError::Validation(_)));
        assert_matches!(validate_rating(f64::NAN), Err(CoreError::Validation(_)));
        assert_matches!(validate_rating(f64::INFINITY), Err(CoreError::Validation(_)));
    }

    #[test]
    fn rounding_helper() {
        assert_eq!(round_to_tenth(4.25), 4.2);
        assert_eq!(round_to_tenth(4.35), 4.3);
        assert_eq!(round_to_tenth(4.75), 4.8);
        assert_eq!(round_to_tenth(4.24), 4.2);
        assert_eq!(round_to_tenth(0.0), 0.0);
    }

    #[test]
    fn midpoint_averages_round_to_even_on_exact_value() {
        // 8.25 is exact in binary: ties to the even digit.
        assert_eq!(aggregate(&[8.0, 8.5]).vote_average, 8.2);
        // 0.15 is stored as 0.1499...
        assert_eq!(aggregate(&[0.0, 0.3]).vote_average, 0.1);
        assert_eq!(aggregate(&[7.0, 7.5]).vote_average, 7.2);
        assert_eq!(aggregate(&[6.5, 7.0]).vote_average, 6.8);
    }
}
