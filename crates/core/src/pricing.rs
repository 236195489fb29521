//! Ticket pricing policy.
//!
//! A session's unit prices depend on whether it starts in the day or night
//! bucket. Explicit prices stored on the session win only when the whole
//! bucket is filled in; otherwise the default price table applies.

use chrono::{NaiveTime, Timelike};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Money;

/// Sessions starting at or after this hour use night prices.
pub const NIGHT_START_HOUR: u32 = 18;

/// Default day prices.
pub const DEFAULT_ADULT_PRICE: Money = dec!(2000);
pub const DEFAULT_STUDENT_PRICE: Money = dec!(1000);
pub const DEFAULT_CHILD_PRICE: Money = dec!(800);

/// Multiplier applied to the default day prices for night sessions.
pub const NIGHT_SURCHARGE: Money = dec!(1.25);

/// Ticket category a seat is sold under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketCategory {
    #[default]
    Adult,
    Student,
    Child,
}

impl TicketCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Adult => "adult",
            Self::Student => "student",
            Self::Child => "child",
        }
    }
}

/// The six optional price columns of a movie session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionPriceFields {
    pub price_adult: Option<Money>,
    pub price_student: Option<Money>,
    pub price_child: Option<Money>,
    pub price_adult_night: Option<Money>,
    pub price_student_night: Option<Money>,
    pub price_child_night: Option<Money>,
}

impl SessionPriceFields {
    /// Reject negative explicit prices.
    pub fn validate(&self) -> Result<(), CoreError> {
        let fields = [
            ("price_adult", self.price_adult),
            ("price_student", self.price_student),
            ("price_child", self.price_child),
            ("price_adult_night", self.price_adult_night),
            ("price_student_night", self.price_student_night),
            ("price_child_night", self.price_child_night),
        ];
        for (name, value) in fields {
            if matches!(value, Some(v) if v < Money::ZERO) {
                return Err(CoreError::Validation(format!("{name} must not be negative")));
            }
        }
        Ok(())
    }
}

/// Unit price per ticket category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceList {
    pub adult: Money,
    pub student: Money,
    pub child: Money,
}

impl PriceList {
    pub fn default_day() -> Self {
        Self {
            adult: DEFAULT_ADULT_PRICE,
            student: DEFAULT_STUDENT_PRICE,
            child: DEFAULT_CHILD_PRICE,
        }
    }

    pub fn default_night() -> Self {
        let day = Self::default_day();
        Self {
            adult: day.adult * NIGHT_SURCHARGE,
            student: day.student * NIGHT_SURCHARGE,
            child: day.child * NIGHT_SURCHARGE,
        }
    }

    pub fn unit_price(&self, category: TicketCategory) -> Money {
        match category {
            TicketCategory::Adult => self.adult,
            TicketCategory::Student => self.student,
            TicketCategory::Child => self.child,
        }
    }

    /// Sum of unit prices for the given seat categories.
    pub fn total_for<I>(&self, categories: I) -> Money
    where
        I: IntoIterator<Item = TicketCategory>,
    {
        categories
            .into_iter()
            .map(|c| self.unit_price(c))
            .sum()
    }
}

pub fn is_night(time: NaiveTime) -> bool {
    time.hour() >= NIGHT_START_HOUR
}

/// Resolve the unit prices for a session starting at `time`.
pub fn price_list(fields: &SessionPriceFields, time: NaiveTime) -> PriceList {
    if is_night(time) {
        match (
            fields.price_adult_night,
            fields.price_student_night,
            fields.price_child_night,
        ) {
            (Some(adult), Some(student), Some(child)) => PriceList {
                adult,
                student,
                child,
            },
            _ => PriceList::default_night(),
        }
    } else {
        match (fields.price_adult, fields.price_student, fields.price_child) {
            (Some(adult), Some(student), Some(child)) => PriceList {
                adult,
                student,
                child,
            },
            _ => PriceList::default_day(),
        }
    }
}

/// Unit price for a single ticket category.
pub fn unit_price(fields: &SessionPriceFields, time: NaiveTime, category: TicketCategory) -> Money {
    price_list(fields, time).unit_price(category)
}

/// Parse a session start time given as `HH:MM` or `HH:MM:SS`.
pub fn parse_session_time(input: &str) -> Result<NaiveTime, CoreError> {
    let trimmed = input.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map_err(|_| {
            CoreError::Validation(format!(
                "Invalid time '{input}': expected HH:MM or HH:MM:SS"
            ))
        })
}
