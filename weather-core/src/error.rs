use std::fmt;

/// Failures reported by a [`crate::location::LocationProvider`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeolocationError {
    #[error("geolocation is not supported on this device")]
    Unsupported,
    #[error("location permission denied")]
    Denied,
    #[error("location request timed out")]
    Timeout,
    #[error("location unavailable: {0}")]
    Unavailable(String),
}

/// Errors produced by the weather pipeline.
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("weather provider request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to parse weather provider response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Geolocation(#[from] GeolocationError),

    #[error("{name}, {country} is already in your saved locations")]
    DuplicateLocation { name: String, country: String },

    #[error("failed to persist preferences: {0}")]
    Storage(#[source] anyhow::Error),
}

impl WeatherError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WeatherError::Network(_) | WeatherError::Status { .. } => ErrorKind::Network,
            WeatherError::Parse(_) => ErrorKind::Parse,
            WeatherError::Geolocation(GeolocationError::Unsupported) => {
                ErrorKind::GeolocationUnsupported
            }
            WeatherError::Geolocation(GeolocationError::Denied) => ErrorKind::GeolocationDenied,
            WeatherError::Geolocation(GeolocationError::Timeout) => ErrorKind::GeolocationTimeout,
            WeatherError::Geolocation(GeolocationError::Unavailable(_)) => {
                ErrorKind::GeolocationUnavailable
            }
            WeatherError::DuplicateLocation { .. } => ErrorKind::DuplicateLocation,
            WeatherError::Storage(_) => ErrorKind::Storage,
        }
    }
}

/// Cloneable classification of a [`WeatherError`], kept in the coordinator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Network,
    Parse,
    GeolocationUnsupported,
    GeolocationDenied,
    GeolocationTimeout,
    GeolocationUnavailable,
    DuplicateLocation,
    Storage,
}

impl ErrorKind {
    pub fn is_geolocation(&self) -> bool {
        matches!(
            self,
            ErrorKind::GeolocationUnsupported
                | ErrorKind::GeolocationDenied
                | ErrorKind::GeolocationTimeout
                | ErrorKind::GeolocationUnavailable
        )
    }

    /// Message shown next to the retry affordance.
    pub fn user_message(&self) -> &'static str {
        match self {
            ErrorKind::Network | ErrorKind::Parse => {
                "Failed to fetch weather data. Please try again."
            }
            ErrorKind::GeolocationUnsupported => "Geolocation is not supported on this device.",
            ErrorKind::GeolocationDenied
            | ErrorKind::GeolocationTimeout
            | ErrorKind::GeolocationUnavailable => {
                "Failed to get your location. Please try again or search for a city."
            }
            ErrorKind::DuplicateLocation => "This location is already saved.",
            ErrorKind::Storage => "Failed to save preferences.",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::Network => "network",
            ErrorKind::Parse => "parse",
            ErrorKind::GeolocationUnsupported => "geolocation-unsupported",
            ErrorKind::GeolocationDenied => "geolocation-denied",
            ErrorKind::GeolocationTimeout => "geolocation-timeout",
            ErrorKind::GeolocationUnavailable => "geolocation-unavailable",
            ErrorKind::DuplicateLocation => "duplicate-location",
            ErrorKind::Storage => "storage",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_errors_classify_as_network() {
        let err = WeatherError::Status { status: 503, body: "down".into() };
        assert_eq!(err.kind(), ErrorKind::Network);
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn geolocation_errors_keep_their_kind() {
        let err: WeatherError = GeolocationError::Denied.into();
        assert_eq!(err.kind(), ErrorKind::GeolocationDenied);
        assert!(err.kind().is_geolocation());

        let err: WeatherError = GeolocationError::Unavailable("no fix".into()).into();
        assert_eq!(err.kind(), ErrorKind::GeolocationUnavailable);
        assert!(err.to_string().contains("no fix"));
    }

    #[test]
    fn parse_errors_classify_as_parse() {
        let source = serde_json::from_str::<u32>("nope").unwrap_err();
        let err = WeatherError::from(source);
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert!(!err.kind().is_geolocation());
    }

    #[test]
    fn storage_errors_keep_their_source() {
        let err = WeatherError::Storage(anyhow::anyhow!("disk full"));
        assert_eq!(err.kind(), ErrorKind::Storage);
        assert!(err.to_string().contains("disk full"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
