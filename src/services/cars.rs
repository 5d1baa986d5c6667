// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Car listing gateway.

use super::api::{decode, ApiClient};
use crate::error::Result;
use crate::models::{Car, CarFilters, CarListing, CarPage, HostStats};
use reqwest::Method;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct CarResponse {
    car: Car,
}

#[derive(Debug, Deserialize)]
struct CarsResponse {
    #[serde(default)]
    cars: Vec<Car>,
}

/// Gateway for `/cars` endpoints.
#[derive(Clone)]
pub struct CarsService {
    client: ApiClient,
}

impl CarsService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Search the marketplace.
    pub async fn list(&self, filters: &CarFilters) -> Result<CarPage> {
        self.client
            .send_json(self.client.request(Method::GET, "/cars").query(filters))
            .await
    }

    /// Get a single listing.
    pub async fn get(&self, car_id: &str) -> Result<Car> {
        let path = format!("/cars/{}", urlencoding::encode(car_id));
        let response: CarResponse = self
            .client
            .send_json(self.client.request(Method::GET, &path))
            .await?;
        Ok(response.car)
    }

    /// List a new car. Requires a session.
    pub async fn create(&self, listing: &CarListing) -> Result<Car> {
        self.client.require_session()?;

        let response: CarResponse = self
            .client
            .send_json(self.client.request(Method::POST, "/cars").json(listing))
            .await?;

        tracing::info!(car_id = %response.car.id, "Car listing created");
        Ok(response.car)
    }

    pub async fn update(&self, car_id: &str, listing: &CarListing) -> Result<Car> {
        self.client.require_session()?;

        let path = format!("/cars/{}", urlencoding::encode(car_id));
        let response: CarResponse = self
            .client
            .send_json(self.client.request(Method::PUT, &path).json(listing))
            .await?;
        Ok(response.car)
    }

    pub async fn delete(&self, car_id: &str) -> Result<()> {
        self.client.require_session()?;

        let path = format!("/cars/{}", urlencoding::encode(car_id));
        self.client
            .send(self.client.request(Method::DELETE, &path))
            .await?;

        tracing::info!(car_id, "Car listing deleted");
        Ok(())
    }

    /// Listings owned by the logged-in host.
    pub async fn host_cars(&self) -> Result<Vec<Car>> {
        self.client.require_session()?;

        let payload = self
            .client
            .send(self.client.request(Method::GET, "/cars/host/my-cars"))
            .await?;

        // Older servers return the bare array.
        if payload.is_array() {
            return decode(payload);
        }
        let response: CarsResponse = decode(payload)?;
        Ok(response.cars)
    }

    /// Flip a listing between active and inactive.
    pub async fn toggle_status(&self, car_id: &str) -> Result<Car> {
        self.client.require_session()?;

        let path = format!("/cars/{}/toggle-status", urlencoding::encode(car_id));
        let response: CarResponse = self
            .client
            .send_json(self.client.request(Method::PATCH, &path))
            .await?;
        Ok(response.car)
    }

    pub async fn host_stats(&self) -> Result<HostStats> {
        self.client.require_session()?;

        let payload = self
            .client
            .send(self.client.request(Method::GET, "/cars/host/stats"))
            .await?;

        // Stats may be wrapped in `stats` or sent at the top level.
        let stats = payload.get("stats").cloned().unwrap_or(payload);
        if stats.is_null() {
            return Ok(HostStats::default());
        }
        decode(stats)
    }
}
