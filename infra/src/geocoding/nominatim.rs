//! Nominatim implementation of the Geocoder trait.
//!
//! Forward lookups use `/search?q=...&format=json&limit=1`, reverse lookups
//! use `/reverse?lat=...&lon=...&format=json`. Nominatim returns coordinates
//! as strings. Every failure is logged and reported as `None`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use sh_core::domain::value_objects::geo::Coordinates;
use sh_core::services::external::Geocoder;
use sh_shared::config::GeocodingConfig;

use crate::InfrastructureError;

#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
}

#[derive(Debug, Deserialize)]
struct ReverseHit {
    display_name: Option<String>,
}

/// HTTP client for a Nominatim server
pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
}

impl NominatimGeocoder {
    pub fn new(config: &GeocodingConfig) -> Result<Self, InfrastructureError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn search(&self, address: &str) -> Result<Option<Coordinates>, InfrastructureError> {
        let hits: Vec<SearchHit> = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[("q", address), ("format", "json"), ("limit", "1")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let Some(hit) = hits.into_iter().next() else {
            return Ok(None);
        };
        match (hit.lat.trim().parse::<f64>(), hit.lon.trim().parse::<f64>()) {
            (Ok(latitude), Ok(longitude)) => Ok(Some(Coordinates::new(latitude, longitude))),
            _ => {
                warn!(lat = %hit.lat, lon = %hit.lon, "Geocoder returned unparsable coordinates");
                Ok(None)
            }
        }
    }

    async fn reverse(&self, coordinates: Coordinates) -> Result<Option<String>, InfrastructureError> {
        let hit: ReverseHit = self
            .client
            .get(format!("{}/reverse", self.base_url))
            .query(&[
                ("lat", coordinates.latitude.to_string()),
                ("lon", coordinates.longitude.to_string()),
                ("format", "json".to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(hit.display_name.filter(|name| !name.trim().is_empty()))
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, address: &str) -> Option<Coordinates> {
        let address = address.trim();
        if address.is_empty() {
            return None;
        }

        match self.search(address).await {
            Ok(Some(coordinates)) => {
                debug!(address, ?coordinates, "Address geocoded");
                Some(coordinates)
            }
            Ok(None) => {
                warn!(address, "No geocoding result for address");
                None
            }
            Err(e) => {
                warn!(address, error = %e, "Geocoding request failed");
                None
            }
        }
    }

    async fn reverse_geocode(&self, coordinates: Coordinates) -> Option<String> {
        match self.reverse(coordinates).await {
            Ok(address) => address,
            Err(e) => {
                warn!(?coordinates, error = %e, "Reverse geocoding request failed");
                None
            }
        }
    }
}
