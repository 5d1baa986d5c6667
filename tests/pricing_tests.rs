// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Booking cost calculation tests.

use chrono::{NaiveDate, NaiveDateTime};
use getsetride::booking::{
    compute_booking_cost, compute_cost_for_span, quote_from_strs, rental_days, CostBreakdown,
};
use getsetride::config::DEFAULT_SERVICE_FEE_RATE;

fn date(s: &str) -> Option<NaiveDate> {
    Some(s.parse().unwrap())
}

#[test]
fn test_quote_scenarios() {
    let cost = quote_from_strs("2024-06-01", "2024-06-03", 2500.0, DEFAULT_SERVICE_FEE_RATE);
    assert_eq!(
        cost,
        CostBreakdown {
            days: 2,
            subtotal: 5000.0,
            service_fee: 250.0,
            total: 5250.0,
        }
    );

    let cost = quote_from_strs("2024-06-01", "2024-06-01", 2500.0, DEFAULT_SERVICE_FEE_RATE);
    assert_eq!(cost, CostBreakdown::ZERO);
    assert!(!cost.is_bookable());

    let cost = quote_from_strs("2024-06-01", "2024-06-02", 999.0, DEFAULT_SERVICE_FEE_RATE);
    assert_eq!(cost.service_fee, 50.0);
    assert_eq!(cost.total, 1049.0);
}

#[test]
fn test_quote_accepts_timestamps() {
    let cost = quote_from_strs(
        "2024-06-01T00:00:00.000Z",
        "2024-06-04T00:00:00Z",
        1000.0,
        DEFAULT_SERVICE_FEE_RATE,
    );
    assert_eq!(cost.days, 3);
    assert_eq!(cost.total, 3150.0);
}

#[test]
fn test_crosses_month_and_leap_day() {
    let cost = compute_booking_cost(date("2024-02-28"), date("2024-03-01"), 100.0, 0.05);
    assert_eq!(cost.days, 2);

    let cost = compute_booking_cost(date("2023-12-30"), date("2024-01-02"), 100.0, 0.05);
    assert_eq!(cost.days, 3);
}

#[test]
fn test_twenty_five_hours_is_two_days() {
    let start = NaiveDateTime::parse_from_str("2024-06-01 09:00", "%Y-%m-%d %H:%M").unwrap();
    let end = NaiveDateTime::parse_from_str("2024-06-02 10:00", "%Y-%m-%d %H:%M").unwrap();

    assert_eq!(rental_days(start, end), 2);
    assert_eq!(rental_days(end, start), 0);
    assert_eq!(rental_days(start, start), 0);

    let cost = compute_cost_for_span(Some(start), Some(end), 2500.0, 0.05);
    assert_eq!(cost.subtotal, 5000.0);
}

#[test]
fn test_zero_price_is_bookable_but_free() {
    let cost = compute_booking_cost(date("2024-06-01"), date("2024-06-03"), 0.0, 0.05);
    assert!(cost.is_bookable());
    assert_eq!(cost.total, 0.0);
}
