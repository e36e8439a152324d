use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{
    error::WeatherError,
    model::{SearchResult, WeatherPayload},
    provider::{coordinate_query, truncate_body},
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com/v1";

const FORECAST_DAYS: &str = "7";

/// Client for WeatherAPI.com.
#[derive(Debug, Clone)]
pub struct WeatherApiProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl WeatherApiProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { api_key, base_url, http: Client::new() }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch_forecast(&self, query: &str) -> Result<WeatherPayload, WeatherError> {
        self.get(
            "forecast.json",
            &[
                ("key", self.api_key.as_str()),
                ("q", query),
                ("days", FORECAST_DAYS),
                ("aqi", "yes"),
                ("alerts", "yes"),
            ],
        )
        .await
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T, WeatherError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!(%url, "requesting weather provider");

        let res = self.http.get(&url).query(params).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            debug!(%url, %status, "weather provider returned an error status");
            return Err(WeatherError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl WeatherProvider for WeatherApiProvider {
    async fn fetch_by_coordinates(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<WeatherPayload, WeatherError> {
        self.fetch_forecast(&coordinate_query(lat, lon)).await
    }

    async fn fetch_by_city(&self, city: &str) -> Result<WeatherPayload, WeatherError> {
        self.fetch_forecast(city).await
    }

    async fn search_locations(&self, query: &str) -> Result<Vec<SearchResult>, WeatherError> {
        self.get("search.json", &[("key", self.api_key.as_str()), ("q", query)]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_drops_trailing_slash() {
        let provider = WeatherApiProvider::with_base_url("KEY".into(), "http://localhost:1234/v1/");
        assert_eq!(provider.base_url(), "http://localhost:1234/v1");
    }

    #[test]
    fn default_base_url_points_at_weatherapi() {
        let provider = WeatherApiProvider::new("KEY".into());
        assert_eq!(provider.base_url(), DEFAULT_BASE_URL);
    }
}
