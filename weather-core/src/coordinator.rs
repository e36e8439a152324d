//! Shared weather state and the actions that drive it.
//!
//! The coordinator owns the current payload, loading and error flags, and the
//! resolved location. Presentation code reads snapshots through
//! [`WeatherCoordinator::subscribe`] and never mutates state directly.
//!
//! Every fetch is tagged with an increasing request id. A result is applied
//! only while its id is still the latest issued, so a slow response can never
//! overwrite the outcome of a newer request.

use parking_lot::Mutex;
use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicU64, Ordering},
};
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use crate::{
    error::{ErrorKind, WeatherError},
    location::LocationProvider,
    model::{Location, SearchResult, TemperatureUnit, TimeFormat, UserPreferences, WeatherPayload},
    preferences::PreferenceStore,
    provider::WeatherProvider,
    recovery::ErrorRecoveryPolicy,
};

const NOTICE_CAPACITY: usize = 32;

/// Snapshot of what the dashboard shows.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherState {
    pub payload: Option<Arc<WeatherPayload>>,
    pub loading: bool,
    pub error: Option<ErrorKind>,
    pub current_location: Option<Location>,
}

impl Default for WeatherState {
    /// Starts in the loading state: the startup position fetch is pending.
    fn default() -> Self {
        Self { payload: None, loading: true, error: None, current_location: None }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Transient, user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

#[derive(Debug)]
pub struct WeatherCoordinator {
    provider: Arc<dyn WeatherProvider>,
    locator: Arc<dyn LocationProvider>,
    recovery: Box<dyn ErrorRecoveryPolicy>,
    preferences: Mutex<PreferenceStore>,
    state: watch::Sender<WeatherState>,
    notices: broadcast::Sender<Notice>,
    latest_request: AtomicU64,
    started: AtomicBool,
}

/// An issued fetch. Dropping it unsettled (e.g. the future was cancelled)
/// clears `loading` if it is still the latest request.
struct Request<'a> {
    coordinator: &'a WeatherCoordinator,
    id: u64,
    settled: bool,
}

impl Drop for Request<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }

        let id = self.id;
        let coordinator = self.coordinator;
        coordinator.state.send_if_modified(|state| {
            if !coordinator.is_latest(id) || !state.loading {
                return false;
            }
            debug!(request = id, "weather request dropped before completion");
            state.loading = false;
            true
        });
    }
}

impl WeatherCoordinator {
    pub fn new(
        provider: Arc<dyn WeatherProvider>,
        locator: Arc<dyn LocationProvider>,
        preferences: PreferenceStore,
        recovery: Box<dyn ErrorRecoveryPolicy>,
    ) -> Self {
        let (state, _) = watch::channel(WeatherState::default());
        let (notices, _) = broadcast::channel(NOTICE_CAPACITY);

        Self {
            provider,
            locator,
            recovery,
            preferences: Mutex::new(preferences),
            state,
            notices,
            latest_request: AtomicU64::new(0),
            started: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> WeatherState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<WeatherState> {
        self.state.subscribe()
    }

    pub fn notices(&self) -> broadcast::Receiver<Notice> {
        self.notices.subscribe()
    }

    /// Startup hook: resolves the device position once. Later calls do nothing.
    pub async fn start(&self) {
        if self.started.swap(true, Ordering::SeqCst) {
            debug!("coordinator already started");
            return;
        }
        self.fetch_for_current_position().await;
    }

    /// Fetches by the location's coordinates and keeps `location` as current.
    pub async fn fetch_for_location(&self, location: Location) {
        let request = self.begin();
        let result = self
            .provider
            .fetch_by_coordinates(location.lat, location.lon)
            .await
            .map(|payload| (payload, location));
        self.settle(request, result);
    }

    /// Fetches by name; the current location is whatever the provider resolved.
    pub async fn fetch_for_city(&self, city: &str) {
        let request = self.begin();
        let result = self.provider.fetch_by_city(city).await.map(with_resolved_location);
        self.settle(request, result);
    }

    pub async fn fetch_for_current_position(&self) {
        let request = self.begin();
        let result = match self.locator.current_position().await {
            Ok(position) => self
                .provider
                .fetch_by_coordinates(position.latitude, position.longitude)
                .await
                .map(with_resolved_location),
            Err(err) => Err(err.into()),
        };
        self.settle(request, result);
    }

    /// Pass-through to the provider for autocomplete.
    pub async fn search_locations(&self, query: &str) -> Result<Vec<SearchResult>, WeatherError> {
        self.provider.search_locations(query).await
    }

    pub fn preferences(&self) -> UserPreferences {
        self.preferences.lock().preferences().clone()
    }

    pub fn saved_locations(&self) -> Vec<Location> {
        self.preferences.lock().preferences().saved_locations.clone()
    }

    /// Appends `location` unless one with the same name and country is saved.
    pub fn add_saved_location(&self, location: Location) -> Result<(), WeatherError> {
        let mut store = self.preferences.lock();

        if store.preferences().contains(&location) {
            drop(store);
            self.notify(
                NoticeLevel::Error,
                format!("{} is already in your saved locations", location.name),
            );
            return Err(WeatherError::DuplicateLocation {
                name: location.name,
                country: location.country,
            });
        }

        let name = location.name.clone();
        let (_, persisted) = store.modify(|prefs| prefs.add_location(location));
        drop(store);

        self.report_persist(persisted);
        self.notify(NoticeLevel::Success, format!("{name} added to saved locations"));
        Ok(())
    }

    /// Removes every saved entry called `name`, regardless of country.
    /// Returns the number of entries removed.
    pub fn remove_saved_location(&self, name: &str) -> usize {
        let (removed, persisted) =
            self.preferences.lock().modify(|prefs| prefs.remove_location(name));

        self.report_persist(persisted);
        self.notify(NoticeLevel::Success, format!("{name} removed from saved locations"));
        removed
    }

    pub fn set_temperature_unit(&self, unit: TemperatureUnit) {
        let ((), persisted) = self.preferences.lock().modify(|prefs| prefs.temperature_unit = unit);
        self.report_persist(persisted);
    }

    pub fn set_time_format(&self, format: TimeFormat) {
        let ((), persisted) = self.preferences.lock().modify(|prefs| prefs.time_format = format);
        self.report_persist(persisted);
    }

    fn is_latest(&self, id: u64) -> bool {
        self.latest_request.load(Ordering::SeqCst) == id
    }

    fn begin(&self) -> Request<'_> {
        let mut id = 0;
        self.state.send_modify(|state| {
            id = self.latest_request.fetch_add(1, Ordering::SeqCst) + 1;
            state.loading = true;
            state.error = None;
        });
        debug!(request = id, "weather request started");

        Request { coordinator: self, id, settled: false }
    }

    fn settle(
        &self,
        mut request: Request<'_>,
        result: Result<(WeatherPayload, Location), WeatherError>,
    ) {
        request.settled = true;
        let id = request.id;

        match result {
            Ok((payload, location)) => {
                let name = location.to_string();
                let applied = self.apply(id, |state| {
                    state.payload = Some(Arc::new(payload));
                    state.current_location = Some(location);
                    state.error = None;
                });
                if applied {
                    info!(request = id, location = %name, "weather updated");
                }
            }
            Err(err) => {
                let kind = err.kind();
                let fallback = match kind {
                    ErrorKind::GeolocationUnsupported => None,
                    _ => self.recovery.recover(&err),
                };
                let recovered = fallback.is_some();

                let applied = self.apply(id, |state| {
                    state.error = Some(kind);
                    if let Some(mock) = fallback {
                        state.current_location = Some(Location::from_payload(&mock));
                        state.payload = Some(Arc::new(mock));
                    }
                });

                if applied {
                    warn!(request = id, error = %err, recovered, "weather request failed");
                    self.notify(NoticeLevel::Error, failure_notice(kind));
                }
            }
        }
    }

    /// Runs `update` and clears `loading` only if `id` is still the latest request.
    fn apply(&self, id: u64, update: impl FnOnce(&mut WeatherState)) -> bool {
        let applied = self.state.send_if_modified(|state| {
            if !self.is_latest(id) {
                return false;
            }
            update(state);
            state.loading = false;
            true
        });

        if !applied {
            debug!(request = id, "discarding stale weather result");
        }
        applied
    }

    fn report_persist(&self, persisted: Result<(), WeatherError>) {
        if let Err(err) = persisted {
            warn!(error = %err, kind = %err.kind(), "failed to persist preferences");
            self.notify(NoticeLevel::Error, "Failed to save preferences".to_string());
        }
    }

    fn notify(&self, level: NoticeLevel, message: String) {
        // No subscribers is fine.
        let _ = self.notices.send(Notice { level, message });
    }
}

fn with_resolved_location(payload: WeatherPayload) -> (WeatherPayload, Location) {
    let location = Location::from_payload(&payload);
    (payload, location)
}

fn failure_notice(kind: ErrorKind) -> String {
    let message = match kind {
        ErrorKind::GeolocationUnsupported => "Geolocation is not supported on this device",
        k if k.is_geolocation() => "Failed to get your location",
        _ => "Failed to fetch weather data",
    };
    message.to_string()
}
