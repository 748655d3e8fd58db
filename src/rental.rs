//! Rental Periods

use jiff::{ToSpan, civil::Date};
use thiserror::Error;

/// Error returned when a date range ends before it starts.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("range end {end} precedes start {start}")]
pub struct InvalidDateRange {
    /// Requested first day.
    pub start: Date,

    /// Requested last day.
    pub end: Date,
}

/// An inclusive rental date range at day granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RentalPeriod {
    start: Date,
    end: Date,
}

impl RentalPeriod {
    /// Create a rental period covering `start` to `end` inclusive.
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidDateRange`] if `end` precedes `start`.
    pub fn new(start: Date, end: Date) -> Result<Self, InvalidDateRange> {
        if end < start {
            return Err(InvalidDateRange { start, end });
        }

        Ok(Self { start, end })
    }

    /// First day of the rental.
    pub const fn start(&self) -> Date {
        self.start
    }

    /// Last day of the rental.
    pub const fn end(&self) -> Date {
        self.end
    }

    /// Number of days covered, counting both endpoints.
    pub fn days(&self) -> i64 {
        i64::from((self.end - self.start).get_days()) + 1
    }

    /// Number of charged weeks: any started week counts as a full week.
    pub fn weeks(&self) -> i64 {
        ((self.days() + 6) / 7).max(1)
    }

    /// Whether the given day falls inside the period.
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }

    /// Iterate over every day of the period in calendar order.
    pub fn iter_days(&self) -> impl Iterator<Item = Date> + use<> {
        let end = self.end;

        self.start.series(1.days()).take_while(move |day| *day <= end)
    }
}
