//! Core library for the `weather` dashboard.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The WeatherAPI.com client and a deterministic demo payload
//! - Preference persistence behind a key-value capability
//! - The state coordinator that front ends observe
//! - Background selection and display formatting
//!
//! It is used by `weather-cli`, but can also be reused by other front ends.

pub mod background;
pub mod config;
pub mod coordinator;
pub mod display;
pub mod error;
pub mod location;
pub mod model;
pub mod preferences;
pub mod provider;
pub mod recovery;

pub use config::{Config, RunMode};
pub use coordinator::{Notice, NoticeLevel, WeatherCoordinator, WeatherState};
pub use error::{ErrorKind, GeolocationError, WeatherError};
pub use location::{Coordinates, LocationProvider};
pub use model::{
    Location, SearchResult, TemperatureUnit, TimeFormat, UserPreferences, WeatherPayload,
};
pub use preferences::{FileStore, KeyValueStore, MemoryStore, PreferenceStore};
pub use provider::{WeatherApiProvider, WeatherProvider};
pub use recovery::ErrorRecoveryPolicy;
