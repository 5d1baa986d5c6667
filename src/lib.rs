// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! GetSetRide: client for the GetSetRide car-rental marketplace API
//!
//! This crate provides typed gateways for the marketplace's cars, bookings,
//! chat and upload endpoints, a persisted login session, and the booking
//! core: cost calculation and the confirmation state machine.

pub mod booking;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod session;
pub mod time_utils;

use booking::{BookingFlow, CarRef};
use config::Config;
use services::{
    ApiClient, AuthService, BookingsService, CarsService, ChatService, UploadsService,
};
use session::SessionStore;

/// Shared client state: configuration, session, and every gateway.
#[derive(Clone)]
pub struct Marketplace {
    pub config: Config,
    pub session: SessionStore,
    pub auth: AuthService,
    pub cars: CarsService,
    pub bookings: BookingsService,
    pub chat: ChatService,
    pub uploads: UploadsService,
}

impl Marketplace {
    /// Wire all gateways to one HTTP client and session.
    pub fn new(config: Config, session: SessionStore) -> error::Result<Self> {
        let client = ApiClient::new(&config, session.clone())?;

        Ok(Self {
            auth: AuthService::new(client.clone()),
            cars: CarsService::new(client.clone()),
            bookings: BookingsService::new(client.clone()),
            chat: ChatService::new(client.clone()),
            uploads: UploadsService::new(client),
            config,
            session,
        })
    }

    /// Start a booking draft for a car.
    pub fn booking_flow(&self, car: CarRef) -> BookingFlow<BookingsService> {
        BookingFlow::from_config(car, self.bookings.clone(), self.session.clone(), &self.config)
    }
}
