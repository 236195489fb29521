//! Booking status lifecycle, seat selection validation and price totals.
//!
//! ```text
//! PENDING ──► CONFIRMED ──► CANCELLED
//!    │                         ▲
//!    └─────────────────────────┘
//! ```
//!
//! `CANCELLED` is terminal. Both `PENDING` and `CONFIRMED` bookings hold
//! their reserved seats; only the transition into `CANCELLED` releases them.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::pricing::{PriceList, TicketCategory};
use crate::types::{DbId, Money};

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Whether a booking in this status currently holds reserved seats.
    pub fn holds_seats(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }

    pub fn is_terminal(self) -> bool {
        self == Self::Cancelled
    }

    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Confirmed)
                | (Self::Pending, Self::Cancelled)
                | (Self::Confirmed, Self::Cancelled)
        )
    }

    /// Validate a transition, returning the new status.
    pub fn transition(self, next: Self) -> Result<Self, CoreError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(CoreError::Conflict(format!(
                "Booking cannot move from {self} to {next}"
            )))
        }
    }

    /// Decide what cancelling a booking in this status does.
    pub fn cancel(self) -> CancelOutcome {
        if self.holds_seats() {
            CancelOutcome::ReleaseSeats
        } else {
            CancelOutcome::AlreadyCancelled
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "CONFIRMED" => Ok(Self::Confirmed),
            "CANCELLED" => Ok(Self::Cancelled),
            other => Err(CoreError::Validation(format!(
                "Unknown booking status '{other}'"
            ))),
        }
    }
}

/// Result of applying a cancellation to a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    /// The booking held seats; they must be returned to the session.
    ReleaseSeats,
    /// The booking was already cancelled; nothing changes.
    AlreadyCancelled,
}

// ---------------------------------------------------------------------------
// Seat selection
// ---------------------------------------------------------------------------

/// One explicitly chosen seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatChoice {
    pub number: i32,
    #[serde(default)]
    pub ticket_type: TicketCategory,
}

/// Seats requested by a booking: a bare count or an explicit seat list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SeatSelection {
    Count(i64),
    Seats(Vec<SeatChoice>),
}

impl SeatSelection {
    /// Number of seats to reserve. Validates the selection.
    pub fn seat_count(&self) -> Result<i32, CoreError> {
        match self {
            Self::Count(n) => validate_seat_count(*n),
            Self::Seats(seats) => {
                if seats.is_empty() {
                    return Err(CoreError::Validation("No seats provided".into()));
                }
                let mut seen = HashSet::with_capacity(seats.len());
                for seat in seats {
                    if seat.number <= 0 {
                        return Err(CoreError::Validation(format!(
                            "Seat number {} must be positive",
                            seat.number
                        )));
                    }
                    if !seen.insert(seat.number) {
                        return Err(CoreError::Validation(format!(
                            "Seat {} selected more than once",
                            seat.number
                        )));
                    }
                }
                validate_seat_count(seats.len() as i64)
            }
        }
    }

    /// Ticket category of every requested seat. Bare counts are sold as adult.
    pub fn categories(&self) -> Vec<TicketCategory> {
        match self {
            Self::Count(n) => vec![TicketCategory::Adult; usize::try_from(*n).unwrap_or(0)],
            Self::Seats(seats) => seats.iter().map(|s| s.ticket_type).collect(),
        }
    }

    /// Explicit seat numbers, empty for bare counts.
    pub fn seat_numbers(&self) -> Vec<i32> {
        match self {
            Self::Count(_) => Vec::new(),
            Self::Seats(seats) => seats.iter().map(|s| s.number).collect(),
        }
    }
}

/// Validate a requested seat count. Zero and negatives are rejected.
pub fn validate_seat_count(requested: i64) -> Result<i32, CoreError> {
    if requested <= 0 {
        return Err(CoreError::Validation(format!(
            "Seat count must be positive, got {requested}"
        )));
    }
    i32::try_from(requested)
        .map_err(|_| CoreError::Validation(format!("Seat count {requested} is too large")))
}

/// Check that `requested` seats fit into `available`.
pub fn check_capacity(session_id: DbId, available: i32, requested: i32) -> Result<(), CoreError> {
    if available < requested {
        return Err(CoreError::InsufficientCapacity {
            session_id,
            requested,
            available,
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Totals
// ---------------------------------------------------------------------------

/// Compute a booking's total from the session's price list.
///
/// A caller-supplied total is accepted only when it equals the computed one.
pub fn settle_total(
    prices: &PriceList,
    selection: &SeatSelection,
    supplied: Option<Money>,
) -> Result<Money, CoreError> {
    let computed = prices.total_for(selection.categories());
    match supplied {
        Some(total) if total != computed => Err(CoreError::Validation(format!(
            "total_price {total} does not match the computed price {computed}"
        ))),
        _ => Ok(computed),
    }
}
