//! Film listing windows and the popularity score used by `/films/popular`.

use chrono::NaiveDate;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Listing windows
// ---------------------------------------------------------------------------

/// Days of upcoming sessions shown on a film's details page.
pub const DETAILS_WINDOW_DAYS: i64 = 7;
/// Days ahead a session may be scheduled for a film to count as "now playing".
pub const NOW_PLAYING_WINDOW_DAYS: i64 = 30;
/// Days ahead advertised in the upcoming-films date range.
pub const UPCOMING_WINDOW_DAYS: i64 = 90;
/// Films released longer ago than this are not considered popular.
pub const POPULAR_LOOKBACK_DAYS: i64 = 180;
/// Maximum films returned by the popular/upcoming listings.
pub const LISTING_LIMIT: usize = 20;

/// Inclusive date range advertised alongside a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub minimum: NaiveDate,
    pub maximum: NaiveDate,
}

impl DateRange {
    /// `today ..= today + days`.
    pub fn starting(today: NaiveDate, days: i64) -> Self {
        Self {
            minimum: today,
            maximum: today + chrono::Duration::days(days),
        }
    }
}

// ---------------------------------------------------------------------------
// Popularity
// ---------------------------------------------------------------------------

/// Vote count at which a film's rating carries half weight.
pub const VOTE_WEIGHT_PRIOR: f64 = 100.0;
/// Booking count treated as "a lot" when normalizing booking interest.
pub const BOOKING_NORMALIZER: f64 = 100.0;

pub const VOTE_SHARE: f64 = 0.4;
pub const RECENCY_SHARE: f64 = 0.4;
pub const BOOKING_SHARE: f64 = 0.2;

/// Inputs for scoring a single film.
#[derive(Debug, Clone, Copy)]
pub struct PopularityInput {
    pub vote_average: f64,
    pub vote_count: i32,
    pub release_date: NaiveDate,
    pub booking_count: i64,
}

/// Rating damped by how many votes back it up.
pub fn weighted_vote(vote_average: f64, vote_count: i32) -> f64 {
    if vote_count <= 0 {
        return 0.0;
    }
    let count = f64::from(vote_count);
    vote_average * (count / (count + VOTE_WEIGHT_PRIOR))
}

/// 1.0 for unreleased films, decaying linearly over the lookback window.
pub fn recency(release_date: NaiveDate, today: NaiveDate) -> f64 {
    if release_date > today {
        return 1.0;
    }
    let days = (today - release_date).num_days() as f64;
    1.0 - days / POPULAR_LOOKBACK_DAYS as f64
}

pub fn popularity_score(input: &PopularityInput, today: NaiveDate) -> f64 {
    weighted_vote(input.vote_average, input.vote_count) * VOTE_SHARE
        + recency(input.release_date, today) * RECENCY_SHARE
        + (input.booking_count as f64 / BOOKING_NORMALIZER) * BOOKING_SHARE
}

/// Whether a film is recent enough to compete in the popularity ranking.
pub fn is_popularity_candidate(release_date: NaiveDate, today: NaiveDate) -> bool {
    release_date >= today - chrono::Duration::days(POPULAR_LOOKBACK_DAYS)
}

/// Rank `items` by popularity, highest first, keeping at most `limit`.
pub fn rank_by_popularity<T, F>(mut items: Vec<T>, today: NaiveDate, limit: usize, input_of: F) -> Vec<T>
where
    F: Fn(&T) -> PopularityInput,
{
    items.retain(|item| is_popularity_candidate(input_of(item).release_date, today));
    items.sort_by(|a, b| {
        let sa = popularity_score(&input_of(a), today);
        let sb = popularity_score(&input_of(b), today);
        sb.partial_cmp(&sa).unwrap_or(std::cmp::Ordering::Equal)
    });
    items.truncate(limit);
    items
}
