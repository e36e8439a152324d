use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::WeatherError,
    model::{SearchResult, WeatherPayload},
};

pub mod mock;
pub mod weatherapi;

pub use mock::mock_weather_data;
pub use weatherapi::WeatherApiProvider;

/// Remote source of forecast payloads.
///
/// Every call is a direct pass-through: no retries, caching or de-duplication.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Seven-day forecast with air quality and alerts for a coordinate pair.
    async fn fetch_by_coordinates(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<WeatherPayload, WeatherError>;

    /// Same as [`WeatherProvider::fetch_by_coordinates`], queried by free-text
    /// name. The provider resolves ambiguous names.
    async fn fetch_by_city(&self, city: &str) -> Result<WeatherPayload, WeatherError>;

    /// Autocomplete candidates for a partial name.
    async fn search_locations(&self, query: &str) -> Result<Vec<SearchResult>, WeatherError>;
}

/// Query string the provider expects for a coordinate lookup.
pub fn coordinate_query(lat: f64, lon: f64) -> String {
    format!("{lat},{lon}")
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_query_joins_with_comma() {
        assert_eq!(coordinate_query(23.81, 90.41), "23.81,90.41");
        assert_eq!(coordinate_query(-33.5, 0.0), "-33.5,0");
    }

    #[test]
    fn truncate_body_keeps_short_bodies() {
        assert_eq!(truncate_body("not found"), "not found");
    }

    #[test]
    fn truncate_body_cuts_on_char_boundary() {
        let body = "é".repeat(300);
        let cut = truncate_body(&body);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 203);
    }
}
