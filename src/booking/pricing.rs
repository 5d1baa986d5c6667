// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Rental cost calculation.
//!
//! Pure and total: every input, including missing or reversed dates and
//! non-finite prices, yields a breakdown rather than an error, so callers can
//! recompute on every keystroke.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Cost of a rental: day count, subtotal, service fee, and total.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CostBreakdown {
    pub days: u32,
    pub subtotal: f64,
    pub service_fee: f64,
    pub total: f64,
}

impl CostBreakdown {
    pub const ZERO: CostBreakdown = CostBreakdown {
        days: 0,
        subtotal: 0.0,
        service_fee: 0.0,
        total: 0.0,
    };

    /// A draft can only be submitted for at least one rental day.
    pub fn is_bookable(&self) -> bool {
        self.days >= 1
    }
}

/// Number of billable days between two instants, rounded up.
///
/// Zero when `end` is not strictly after `start`.
pub fn rental_days(start: NaiveDateTime, end: NaiveDateTime) -> u32 {
    let millis = (end - start).num_milliseconds();
    if millis <= 0 {
        return 0;
    }
    let days = (millis + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY;
    u32::try_from(days).unwrap_or(u32::MAX)
}

/// Compute the cost of a rental between two calendar dates.
///
/// Time of day is ignored: both dates are taken at midnight.
pub fn compute_booking_cost(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    price_per_day: f64,
    service_fee_rate: f64,
) -> CostBreakdown {
    compute_cost_for_span(
        start.map(|d| d.and_time(NaiveTime::MIN)),
        end.map(|d| d.and_time(NaiveTime::MIN)),
        price_per_day,
        service_fee_rate,
    )
}

/// Compute the cost of a rental between two instants.
///
/// Partial days are billed as whole days (25 hours is 2 days).
pub fn compute_cost_for_span(
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
    price_per_day: f64,
    service_fee_rate: f64,
) -> CostBreakdown {
    let (Some(start), Some(end)) = (start, end) else {
        return CostBreakdown::ZERO;
    };

    let days = rental_days(start, end);
    if days == 0 {
        return CostBreakdown::ZERO;
    }

    let subtotal = f64::from(days) * non_negative(price_per_day);
    // No fractional currency: half-up to the nearest unit.
    let service_fee = (subtotal * non_negative(service_fee_rate)).round();
    let total = subtotal + service_fee;

    // Overflow to infinity is the only way amounts can stop being finite.
    if !total.is_finite() {
        return CostBreakdown {
            days,
            ..CostBreakdown::ZERO
        };
    }

    CostBreakdown {
        days,
        subtotal,
        service_fee,
        total,
    }
}

/// Compute a quote from raw form input. Unparseable dates count as missing.
pub fn quote_from_strs(
    start: &str,
    end: &str,
    price_per_day: f64,
    service_fee_rate: f64,
) -> CostBreakdown {
    compute_booking_cost(
        crate::time_utils::parse_date(start),
        crate::time_utils::parse_date(end),
        price_per_day,
        service_fee_rate,
    )
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
