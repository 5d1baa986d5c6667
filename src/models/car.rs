//! Car listing models.

use serde::{Deserialize, Serialize};

/// Where a car is parked for pickup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
}

/// Public host details embedded in a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostProfile {
    #[serde(alias = "_id", deserialize_with = "super::deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Host reference: a bare id or a populated profile, depending on the endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HostRef {
    Id(String),
    Profile(HostProfile),
}

impl HostRef {
    pub fn id(&self) -> &str {
        match self {
            HostRef::Id(id) => id,
            HostRef::Profile(profile) => &profile.id,
        }
    }
}

/// A car listing. Owned by the server; read-only on this side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    #[serde(alias = "_id", deserialize_with = "super::deserialize_id")]
    pub id: String,
    pub brand: String,
    pub model: String,
    #[serde(default)]
    pub year: u16,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub transmission: String,
    #[serde(default)]
    pub fuel_type: String,
    #[serde(default)]
    pub seats: u8,
    pub price_per_day: f64,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<HostRef>,
}

fn default_active() -> bool {
    true
}

impl Car {
    /// Display name, e.g. "2022 Hyundai Creta".
    pub fn title(&self) -> String {
        if self.year > 0 {
            format!("{} {} {}", self.year, self.brand, self.model)
        } else {
            format!("{} {}", self.brand, self.model)
        }
    }
}

/// Body of `POST /cars` and `PUT /cars/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarListing {
    pub brand: String,
    pub model: String,
    pub year: u16,
    pub category: String,
    pub transmission: String,
    pub fuel_type: String,
    pub seats: u8,
    pub price_per_day: f64,
    pub location: Location,
    pub description: String,
    pub license_plate: String,
    pub mileage: u32,
    pub features: Vec<String>,
    pub images: Vec<String>,
    pub is_active: bool,
}

/// Marketplace search filters, sent as query parameters to `GET /cars`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transmission: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seats: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Sort key, e.g. `-createdAt` or `pricePerDay`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
}

/// One page of search results.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarPage {
    #[serde(default)]
    pub cars: Vec<Car>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default = "first_page")]
    pub current_page: u32,
}

fn first_page() -> u32 {
    1
}

/// Dashboard numbers for a host's listings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostStats {
    #[serde(default)]
    pub total_cars: u32,
    #[serde(default)]
    pub active_cars: u32,
    #[serde(default)]
    pub total_bookings: u32,
    #[serde(default)]
    pub total_earnings: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_car_defaults_and_host_reference() {
        let car: Car = serde_json::from_str(
            r#"{"_id": "c1", "brand": "Hyundai", "model": "Creta", "year": 2022,
                "pricePerDay": 2500, "location": {"city": "Delhi", "state": "DL"},
                "host": "h42"}"#,
        )
        .unwrap();

        assert!(car.is_active);
        assert_eq!(car.price_per_day, 2500.0);
        assert_eq!(car.host.as_ref().map(HostRef::id), Some("h42"));
        assert_eq!(car.title(), "2022 Hyundai Creta");
    }

    #[test]
    fn test_populated_host_profile() {
        let car: Car = serde_json::from_str(
            r#"{"id": 7, "brand": "Tata", "model": "Nexon", "pricePerDay": 1800.5,
                "isActive": false, "host": {"_id": "h1", "name": "Ravi"}}"#,
        )
        .unwrap();

        assert_eq!(car.id, "7");
        assert!(!car.is_active);
        match car.host {
            Some(HostRef::Profile(profile)) => assert_eq!(profile.name.as_deref(), Some("Ravi")),
            other => panic!("expected populated host, got {:?}", other),
        }
    }

    #[test]
    fn test_filters_skip_empty_fields() {
        let filters = CarFilters {
            city: Some("Delhi".to_string()),
            max_price: Some(3000.0),
            ..Default::default()
        };
        let value = serde_json::to_value(&filters).unwrap();
        assert_eq!(value, serde_json::json!({"city": "Delhi", "maxPrice": 3000.0}));
    }
}
