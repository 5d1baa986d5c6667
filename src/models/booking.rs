//! Booking models.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::Car;

/// Server-side booking lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Active,
    Completed,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl BookingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Active => "active",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Unknown => "unknown",
        }
    }

    /// Whether a renter may still cancel a booking in this status.
    pub fn is_cancellable(self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }
}

/// The booked car: a bare id or the populated listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BookingCar {
    Id(String),
    Details(Box<Car>),
}

impl BookingCar {
    pub fn id(&self) -> &str {
        match self {
            BookingCar::Id(id) => id,
            BookingCar::Details(car) => &car.id,
        }
    }
}

/// Grouping used by the "my bookings" view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingCategory {
    Upcoming,
    Past,
    Cancelled,
}

/// A booking created on the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(alias = "_id", deserialize_with = "super::deserialize_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub car: Option<BookingCar>,
    #[serde(deserialize_with = "super::deserialize_date")]
    pub start_date: NaiveDate,
    #[serde(deserialize_with = "super::deserialize_date")]
    pub end_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pickup_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dropoff_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_price: Option<f64>,
    #[serde(default = "default_status")]
    pub status: BookingStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancellation_reason: Option<String>,
}

fn default_status() -> BookingStatus {
    BookingStatus::Pending
}

impl Booking {
    /// Classify the booking relative to `now`.
    pub fn category(&self, now: DateTime<Utc>) -> BookingCategory {
        if self.status == BookingStatus::Cancelled {
            return BookingCategory::Cancelled;
        }

        let start = self.start_date.and_time(NaiveTime::MIN).and_utc();
        let end = self.end_date.and_time(NaiveTime::MIN).and_utc();

        if self.status == BookingStatus::Completed || end < now {
            return BookingCategory::Past;
        }
        if start > now || matches!(self.status, BookingStatus::Confirmed | BookingStatus::Active) {
            return BookingCategory::Upcoming;
        }
        BookingCategory::Past
    }
}

/// Body of `POST /bookings`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub car_id: String,
    /// ISO 8601 date
    pub start_date: String,
    /// ISO 8601 date
    pub end_date: String,
    /// `HH:MM`
    pub pickup_time: String,
    /// `HH:MM`
    pub dropoff_time: String,
}

/// Booking counters for the current user.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingStats {
    #[serde(default)]
    pub total_bookings: u32,
    #[serde(default)]
    pub upcoming: u32,
    #[serde(default)]
    pub completed: u32,
    #[serde(default)]
    pub cancelled: u32,
    #[serde(default)]
    pub total_spent: f64,
}
