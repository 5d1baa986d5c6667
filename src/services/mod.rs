// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - one gateway per API resource.

pub mod api;
pub mod auth;
pub mod bookings;
pub mod cars;
pub mod chat;
pub mod uploads;

pub use api::ApiClient;
pub use auth::AuthService;
pub use bookings::BookingsService;
pub use cars::CarsService;
pub use chat::{ChatService, FALLBACK_SUGGESTIONS};
pub use uploads::UploadsService;
