//! Client-side booking draft.

use super::pricing::{compute_booking_cost, CostBreakdown};
use crate::models::{BookingRequest, Car};
use crate::time_utils::{format_date, format_time};
use chrono::{NaiveDate, NaiveTime};

/// Pickup and dropoff time used until the renter picks one (10:00).
pub fn default_handover_time() -> NaiveTime {
    NaiveTime::from_hms_opt(10, 0, 0).unwrap_or(NaiveTime::MIN)
}

/// The parts of a listing the booking flow reads.
#[derive(Debug, Clone, PartialEq)]
pub struct CarRef {
    pub id: String,
    pub price_per_day: f64,
    pub is_active: bool,
}

impl From<&Car> for CarRef {
    fn from(car: &Car) -> Self {
        Self {
            id: car.id.clone(),
            price_per_day: car.price_per_day,
            is_active: car.is_active,
        }
    }
}

/// An unsaved booking proposal for one car.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingDraft {
    pub car_id: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub pickup_time: NaiveTime,
    pub dropoff_time: NaiveTime,
}

impl BookingDraft {
    pub fn new(car_id: impl Into<String>) -> Self {
        Self {
            car_id: car_id.into(),
            start_date: None,
            end_date: None,
            pickup_time: default_handover_time(),
            dropoff_time: default_handover_time(),
        }
    }

    pub fn has_dates(&self) -> bool {
        self.start_date.is_some() && self.end_date.is_some()
    }

    /// Derived cost; never stored.
    pub fn cost(&self, price_per_day: f64, service_fee_rate: f64) -> CostBreakdown {
        compute_booking_cost(self.start_date, self.end_date, price_per_day, service_fee_rate)
    }

    /// Wire payload, or `None` while either date is missing.
    pub fn to_request(&self) -> Option<BookingRequest> {
        Some(BookingRequest {
            car_id: self.car_id.clone(),
            start_date: format_date(self.start_date?),
            end_date: format_date(self.end_date?),
            pickup_time: format_time(self.pickup_time),
            dropoff_time: format_time(self.dropoff_time),
        })
    }

    /// Discard everything but the car.
    pub fn clear(&mut self) {
        *self = Self::new(std::mem::take(&mut self.car_id));
    }
}
