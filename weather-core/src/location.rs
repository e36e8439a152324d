//! Single-shot device position lookup.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::{fmt::Debug, time::Duration};
use tracing::debug;

use crate::error::GeolocationError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[async_trait]
pub trait LocationProvider: Send + Sync + Debug {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError>;
}

/// For platforms with no position source.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedLocationProvider;

#[async_trait]
impl LocationProvider for UnsupportedLocationProvider {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        Err(GeolocationError::Unsupported)
    }
}

/// Always reports the same position.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocationProvider {
    position: Coordinates,
}

impl FixedLocationProvider {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { position: Coordinates { latitude, longitude } }
    }
}

#[async_trait]
impl LocationProvider for FixedLocationProvider {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        Ok(self.position)
    }
}

const IP_API_URL: &str = "http://ip-api.com/json/?fields=status,message,lat,lon";
const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    lat: f64,
    #[serde(default)]
    lon: f64,
}

/// Approximate position from the public IP address.
#[derive(Debug, Clone)]
pub struct IpLocationProvider {
    http: Client,
    url: String,
}

impl IpLocationProvider {
    pub fn new() -> Result<Self, GeolocationError> {
        Self::with_url(IP_API_URL)
    }

    pub fn with_url(url: impl Into<String>) -> Result<Self, GeolocationError> {
        Self::with_timeout(url, Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    /// Lookups slower than `timeout` fail with [`GeolocationError::Timeout`].
    pub fn with_timeout(
        url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GeolocationError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GeolocationError::Unavailable(e.to_string()))?;

        Ok(Self { http, url: url.into() })
    }
}

fn transport_error(err: reqwest::Error) -> GeolocationError {
    if err.is_timeout() {
        GeolocationError::Timeout
    } else {
        GeolocationError::Unavailable(err.to_string())
    }
}

#[async_trait]
impl LocationProvider for IpLocationProvider {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        debug!(url = %self.url, "looking up position by IP");

        let res = self.http.get(&self.url).send().await.map_err(transport_error)?;
        let body: IpApiResponse = res.json().await.map_err(transport_error)?;

        if body.status != "success" {
            let reason = body.message.unwrap_or_else(|| "lookup failed".to_string());
            return Err(GeolocationError::Unavailable(reason));
        }

        Ok(Coordinates { latitude: body.lat, longitude: body.lon })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unsupported_provider_reports_unsupported() {
        let err = UnsupportedLocationProvider.current_position().await.unwrap_err();
        assert_eq!(err, GeolocationError::Unsupported);
    }

    #[tokio::test]
    async fn fixed_provider_returns_its_position() {
        let pos = FixedLocationProvider::new(23.81, 90.41).current_position().await.unwrap();
        assert_eq!(pos, Coordinates { latitude: 23.81, longitude: 90.41 });
    }
}
