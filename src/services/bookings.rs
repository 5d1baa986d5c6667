// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Booking gateway.

use super::api::{validation_error, ApiClient};
use crate::booking::BookingGateway;
use crate::error::Result;
use crate::models::{Booking, BookingRequest, BookingStats, BookingStatus};
use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize)]
struct BookingResponse {
    booking: Booking,
}

#[derive(Debug, Deserialize)]
struct BookingsResponse {
    #[serde(default)]
    bookings: Vec<Booking>,
}

#[derive(Debug, Deserialize)]
struct StatsResponse {
    #[serde(default)]
    stats: BookingStats,
}

/// Body of `POST /bookings/{id}/review`.
#[derive(Debug, Serialize, Validate)]
struct ReviewRequest {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    rating: u8,
    #[validate(length(max = 500, message = "Review must be at most 500 characters"))]
    comment: String,
}

/// Gateway for `/bookings` endpoints.
#[derive(Clone)]
pub struct BookingsService {
    client: ApiClient,
}

impl BookingsService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Submit a booking for the draft's car and dates.
    pub async fn create_booking(&self, request: &BookingRequest) -> Result<Booking> {
        self.client.require_session()?;

        tracing::info!(
            car_id = %request.car_id,
            start_date = %request.start_date,
            end_date = %request.end_date,
            "Creating booking"
        );

        let response: BookingResponse = self
            .client
            .send_json(self.client.request(Method::POST, "/bookings").json(request))
            .await?;

        tracing::info!(booking_id = %response.booking.id, "Booking created");
        Ok(response.booking)
    }

    /// Bookings made by the current user, optionally filtered by status.
    pub async fn list_my_bookings(&self, status: Option<BookingStatus>) -> Result<Vec<Booking>> {
        self.list("/bookings/my-bookings", status).await
    }

    /// Bookings on cars owned by the current host.
    pub async fn list_host_bookings(&self, status: Option<BookingStatus>) -> Result<Vec<Booking>> {
        self.list("/bookings/host/bookings", status).await
    }

    pub async fn get(&self, booking_id: &str) -> Result<Booking> {
        self.client.require_session()?;

        let path = format!("/bookings/{}", urlencoding::encode(booking_id));
        let response: BookingResponse = self
            .client
            .send_json(self.client.request(Method::GET, &path))
            .await?;
        Ok(response.booking)
    }

    /// Host-side status change (confirm, activate, complete).
    pub async fn update_status(&self, booking_id: &str, status: BookingStatus) -> Result<Booking> {
        self.client.require_session()?;

        let path = format!("/bookings/{}/status", urlencoding::encode(booking_id));
        let response: BookingResponse = self
            .client
            .send_json(
                self.client
                    .request(Method::PUT, &path)
                    .json(&serde_json::json!({ "status": status })),
            )
            .await?;
        Ok(response.booking)
    }

    pub async fn cancel_booking(&self, booking_id: &str, reason: &str) -> Result<Booking> {
        self.client.require_session()?;

        let path = format!("/bookings/{}/cancel", urlencoding::encode(booking_id));
        let response: BookingResponse = self
            .client
            .send_json(
                self.client
                    .request(Method::PUT, &path)
                    .json(&serde_json::json!({ "reason": reason })),
            )
            .await?;

        tracing::info!(booking_id, "Booking cancelled");
        Ok(response.booking)
    }

    /// Rate a completed booking (1-5 stars).
    pub async fn add_review(&self, booking_id: &str, rating: u8, comment: &str) -> Result<()> {
        self.client.require_session()?;

        let body = ReviewRequest {
            rating,
            comment: comment.to_string(),
        };
        body.validate().map_err(validation_error)?;

        let path = format!("/bookings/{}/review", urlencoding::encode(booking_id));
        self.client
            .send(self.client.request(Method::POST, &path).json(&body))
            .await?;
        Ok(())
    }

    pub async fn stats(&self) -> Result<BookingStats> {
        self.client.require_session()?;

        let response: StatsResponse = self
            .client
            .send_json(self.client.request(Method::GET, "/bookings/stats"))
            .await?;
        Ok(response.stats)
    }

    async fn list(&self, path: &str, status: Option<BookingStatus>) -> Result<Vec<Booking>> {
        self.client.require_session()?;

        let mut builder = self.client.request(Method::GET, path);
        if let Some(status) = status {
            builder = builder.query(&[("status", status.as_str())]);
        }

        let response: BookingsResponse = self.client.send_json(builder).await?;
        Ok(response.bookings)
    }
}

#[async_trait]
impl BookingGateway for BookingsService {
    async fn create_booking(&self, request: &BookingRequest) -> Result<Booking> {
        BookingsService::create_booking(self, request).await
    }
}
