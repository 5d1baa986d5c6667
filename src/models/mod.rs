// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models exchanged with the marketplace API.

pub mod booking;
pub mod car;
pub mod chat;
pub mod upload;
pub mod user;

pub use booking::{
    Booking, BookingCar, BookingCategory, BookingRequest, BookingStats, BookingStatus,
};
pub use car::{Car, CarFilters, CarListing, CarPage, HostRef, HostStats, Location};
pub use chat::{ChatMessage, ChatReply, ChatRole};
pub use upload::{UploadFile, UploadedImage};
pub use user::{LoginRequest, ProfileUpdate, Role, SignupProfile, User, UserPatch};

use serde::{Deserialize, Deserializer};

/// Deserialize an opaque identifier that the API may send as a string or a number.
pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

/// Deserialize a calendar date sent either as `YYYY-MM-DD` or as a full timestamp.
pub(crate) fn deserialize_date<'de, D>(deserializer: D) -> Result<chrono::NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    crate::time_utils::parse_date(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {raw}")))
}
