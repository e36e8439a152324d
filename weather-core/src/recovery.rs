use std::fmt::Debug;

use crate::{
    config::RunMode, error::WeatherError, model::WeatherPayload, provider::mock_weather_data,
};

/// What the coordinator shows after a failed fetch.
pub trait ErrorRecoveryPolicy: Send + Sync + Debug {
    /// Payload to display in place of the failed result, if any.
    fn recover(&self, error: &WeatherError) -> Option<WeatherPayload>;
}

/// Production behaviour: keep the error visible and offer a retry.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShowError;

impl ErrorRecoveryPolicy for ShowError {
    fn recover(&self, _error: &WeatherError) -> Option<WeatherPayload> {
        None
    }
}

/// Development behaviour: keep the dashboard populated with demo data.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockFallback;

impl ErrorRecoveryPolicy for MockFallback {
    fn recover(&self, _error: &WeatherError) -> Option<WeatherPayload> {
        Some(mock_weather_data())
    }
}

pub fn policy_for(mode: RunMode) -> Box<dyn ErrorRecoveryPolicy> {
    match mode {
        RunMode::Production => Box::new(ShowError),
        RunMode::Development => Box::new(MockFallback),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn network_error() -> WeatherError {
        WeatherError::Status { status: 500, body: String::new() }
    }

    #[test]
    fn production_policy_recovers_nothing() {
        assert!(policy_for(RunMode::Production).recover(&network_error()).is_none());
    }

    #[test]
    fn development_policy_recovers_with_mock() {
        let payload = policy_for(RunMode::Development).recover(&network_error()).unwrap();
        assert_eq!(payload, mock_weather_data());
    }
}
