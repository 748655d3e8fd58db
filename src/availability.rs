//! Panel Availability
//!
//! Pure validators over a panel's blocked-date list. No state, no I/O: the
//! caller supplies a panel snapshot and a requested rental period.

use jiff::civil::Date;
use thiserror::Error;

use crate::{
    panels::Panel,
    rental::{InvalidDateRange, RentalPeriod},
};

/// Fallback minimum rental length in days for panels that do not set one.
pub const DEFAULT_MIN_RENTAL_DAYS: i64 = 7;

/// Errors raised when a requested rental period cannot be honoured.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AvailabilityError {
    /// The requested range covers a day the panel is blocked on.
    #[error("panel is unavailable on {blocked_day}")]
    RangeBlocked {
        /// First blocked day found when walking the range in calendar order.
        blocked_day: Date,
    },

    /// The requested range is shorter than the panel's minimum rental length.
    #[error("rental of {requested} days is below the minimum of {required} days")]
    BelowMinimumDuration {
        /// Minimum rental length in days for this panel.
        required: i64,

        /// Inclusive day count of the requested range.
        requested: i64,
    },
}

/// A date interval during which a panel cannot be rented.
///
/// Bounds are inclusive at day granularity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockedRange {
    start: Date,
    end: Date,
    reason: Option<String>,
}

impl BlockedRange {
    /// Create a blocked range covering `start` to `end` inclusive.
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidDateRange`] if `end` precedes `start`.
    pub fn new(start: Date, end: Date, reason: Option<String>) -> Result<Self, InvalidDateRange> {
        if end < start {
            return Err(InvalidDateRange { start, end });
        }

        Ok(Self { start, end, reason })
    }

    /// First blocked day.
    pub const fn start(&self) -> Date {
        self.start
    }

    /// Last blocked day.
    pub const fn end(&self) -> Date {
        self.end
    }

    /// Reason the panel is blocked, when recorded.
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    /// Whether the given day falls inside the blocked interval.
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }
}

impl Panel<'_> {
    /// Minimum rental length in days, applying the engine default.
    pub fn effective_min_rental_days(&self) -> i64 {
        self.min_rental_days.unwrap_or(DEFAULT_MIN_RENTAL_DAYS)
    }

    /// Whether the panel is blocked on the given day.
    pub fn is_blocked(&self, date: Date) -> bool {
        self.blocked.iter().any(|range| range.contains(date))
    }

    /// Check that no day of the requested period is blocked.
    ///
    /// Walks the period in calendar order and fails fast on the first
    /// blocked day, so the caller can tell the customer which day collides.
    ///
    /// # Errors
    ///
    /// Returns [`AvailabilityError::RangeBlocked`] carrying the first
    /// blocked day found.
    pub fn validate_range(&self, period: &RentalPeriod) -> Result<(), AvailabilityError> {
        if let Some(blocked_day) = period.iter_days().find(|day| self.is_blocked(*day)) {
            return Err(AvailabilityError::RangeBlocked { blocked_day });
        }

        Ok(())
    }

    /// Check that the requested period meets the panel's minimum rental length.
    ///
    /// # Errors
    ///
    /// Returns [`AvailabilityError::BelowMinimumDuration`] with the required
    /// and requested day counts.
    pub fn check_minimum_duration(&self, period: &RentalPeriod) -> Result<(), AvailabilityError> {
        let required = self.effective_min_rental_days();
        let requested = period.days();

        if requested < required {
            return Err(AvailabilityError::BelowMinimumDuration {
                required,
                requested,
            });
        }

        Ok(())
    }
}
