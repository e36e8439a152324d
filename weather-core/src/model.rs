use anyhow::anyhow;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// A place the user can look weather up for.
///
/// Saved locations are de-duplicated by `(name, country)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    pub fn new(name: impl Into<String>, country: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self { name: name.into(), country: country.into(), lat, lon }
    }

    /// Location as resolved by the provider for a payload.
    pub fn from_payload(payload: &WeatherPayload) -> Self {
        let loc = &payload.location;
        Self::new(loc.name.clone(), loc.country.clone(), loc.lat, loc.lon)
    }

    pub fn same_place(&self, other: &Location) -> bool {
        self.name == other.name && self.country == other.country
    }

    /// Key for list rendering, `name:lat:lon`.
    pub fn display_key(&self) -> String {
        format!("{}:{}:{}", self.name, self.lat, self.lon)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.country.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}, {}", self.name, self.country)
        }
    }
}

/// Full forecast payload as returned by `/forecast.json`.
///
/// Replaced wholesale on every successful fetch, never patched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherPayload {
    pub location: PayloadLocation,
    pub current: CurrentConditions,
    pub forecast: Forecast,
    #[serde(default, with = "alert_list")]
    pub alerts: Vec<Alert>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayloadLocation {
    pub name: String,
    #[serde(default)]
    pub region: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(alias = "timezone")]
    pub tz_id: String,
    /// Provider local time, `YYYY-MM-DD H:MM`.
    pub localtime: String,
}

impl PayloadLocation {
    pub fn local_time(&self) -> Option<NaiveDateTime> {
        parse_local_time(&self.localtime)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub text: String,
    pub icon: String,
    pub code: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temp_c: f64,
    pub temp_f: f64,
    pub feelslike_c: f64,
    pub feelslike_f: f64,
    #[serde(with = "int_bool")]
    pub is_day: bool,
    pub condition: Condition,
    pub wind_kph: f64,
    pub wind_mph: f64,
    #[serde(default)]
    pub wind_dir: String,
    #[serde(default)]
    pub pressure_mb: f64,
    pub precip_mm: f64,
    pub precip_in: f64,
    pub humidity: u8,
    #[serde(default)]
    pub cloud: u8,
    pub vis_km: f64,
    pub vis_miles: f64,
    pub uv: f64,
    #[serde(default)]
    pub gust_kph: f64,
    #[serde(default)]
    pub gust_mph: f64,
    #[serde(default)]
    pub air_quality: Option<AirQuality>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AirQuality {
    #[serde(default)]
    pub co: f64,
    #[serde(default)]
    pub no2: f64,
    #[serde(default)]
    pub o3: f64,
    #[serde(default)]
    pub so2: f64,
    #[serde(default)]
    pub pm2_5: f64,
    #[serde(default)]
    pub pm10: f64,
    #[serde(rename = "us-epa-index", default)]
    pub us_epa_index: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub forecastday: Vec<ForecastDay>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub date_epoch: i64,
    pub day: DaySummary,
    pub astro: Astro,
    pub hour: Vec<HourForecast>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    pub maxtemp_c: f64,
    pub maxtemp_f: f64,
    pub mintemp_c: f64,
    pub mintemp_f: f64,
    pub avgtemp_c: f64,
    pub avgtemp_f: f64,
    pub maxwind_kph: f64,
    pub maxwind_mph: f64,
    pub totalprecip_mm: f64,
    pub totalprecip_in: f64,
    pub avghumidity: f64,
    #[serde(default)]
    pub daily_chance_of_rain: u8,
    #[serde(default)]
    pub daily_chance_of_snow: u8,
    pub condition: Condition,
    pub uv: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Astro {
    pub sunrise: String,
    pub sunset: String,
    pub moonrise: String,
    pub moonset: String,
    pub moon_phase: String,
    /// Percent; the provider has sent this both as a number and as a string.
    #[serde(deserialize_with = "number_or_string")]
    pub moon_illumination: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourForecast {
    pub time_epoch: i64,
    pub time: String,
    pub temp_c: f64,
    pub temp_f: f64,
    #[serde(with = "int_bool")]
    pub is_day: bool,
    pub condition: Condition,
    pub wind_kph: f64,
    pub wind_mph: f64,
    #[serde(default)]
    pub wind_dir: String,
    pub precip_mm: f64,
    pub precip_in: f64,
    pub humidity: u8,
    #[serde(default)]
    pub chance_of_rain: u8,
    #[serde(default)]
    pub chance_of_snow: u8,
    pub feelslike_c: f64,
    pub feelslike_f: f64,
    pub uv: f64,
}

impl HourForecast {
    pub fn local_time(&self) -> Option<NaiveDateTime> {
        parse_local_time(&self.time)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub headline: String,
    pub event: String,
    pub severity: String,
    pub expires: String,
    #[serde(default)]
    pub areas: String,
    #[serde(default)]
    pub desc: String,
}

/// Candidate returned by `/search.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub region: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub url: String,
}

impl SearchResult {
    pub fn to_location(&self) -> Location {
        Location::new(self.name.clone(), self.country.clone(), self.lat, self.lon)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    /// Metric: °C, km/h, mm.
    #[default]
    Celsius,
    /// Imperial: °F, mph, in.
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "celsius",
            TemperatureUnit::Fahrenheit => "fahrenheit",
        }
    }

    pub fn is_metric(&self) -> bool {
        matches!(self, TemperatureUnit::Celsius)
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemperatureUnit {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "celsius" | "c" | "metric" => Ok(TemperatureUnit::Celsius),
            "fahrenheit" | "f" | "imperial" => Ok(TemperatureUnit::Fahrenheit),
            _ => Err(anyhow!(
                "Unknown temperature unit '{value}'. Supported units: celsius, fahrenheit."
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeFormat {
    #[serde(rename = "12h")]
    TwelveHour,
    #[default]
    #[serde(rename = "24h")]
    TwentyFourHour,
}

impl TimeFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeFormat::TwelveHour => "12h",
            TimeFormat::TwentyFourHour => "24h",
        }
    }
}

impl fmt::Display for TimeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeFormat {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "12h" | "12" => Ok(TimeFormat::TwelveHour),
            "24h" | "24" => Ok(TimeFormat::TwentyFourHour),
            _ => Err(anyhow!("Unknown time format '{value}'. Supported formats: 12h, 24h.")),
        }
    }
}

/// Preferences persisted between sessions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    pub temperature_unit: TemperatureUnit,
    pub time_format: TimeFormat,
    /// Insertion order is display order.
    pub saved_locations: Vec<Location>,
}

impl UserPreferences {
    pub fn contains(&self, location: &Location) -> bool {
        self.saved_locations.iter().any(|saved| saved.same_place(location))
    }

    /// Appends unless an entry with the same `(name, country)` exists.
    /// Returns whether the list changed.
    pub fn add_location(&mut self, location: Location) -> bool {
        if self.contains(&location) {
            return false;
        }
        self.saved_locations.push(location);
        true
    }

    /// Removes every entry named `name`, whatever its country.
    /// Returns how many entries were dropped.
    pub fn remove_location(&mut self, name: &str) -> usize {
        let before = self.saved_locations.len();
        self.saved_locations.retain(|loc| loc.name != name);
        before - self.saved_locations.len()
    }

    pub fn find_location(&self, name: &str) -> Option<&Location> {
        self.saved_locations.iter().find(|loc| loc.name.eq_ignore_ascii_case(name))
    }
}

fn parse_local_time(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M").ok()
}

/// The provider encodes booleans as `0`/`1`.
mod int_bool {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Flag {
            Int(u8),
            Bool(bool),
        }

        Ok(match Flag::deserialize(deserializer)? {
            Flag::Int(v) => v != 0,
            Flag::Bool(v) => v,
        })
    }
}

/// Alerts arrive as `{ "alert": [...] }`; a bare list is accepted too.
mod alert_list {
    use super::Alert;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize)]
    struct Wrapped<'a> {
        alert: &'a [Alert],
    }

    pub fn serialize<S: Serializer>(alerts: &[Alert], serializer: S) -> Result<S::Ok, S::Error> {
        Wrapped { alert: alerts }.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Alert>, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Alerts {
            Wrapped {
                #[serde(default)]
                alert: Vec<Alert>,
            },
            List(Vec<Alert>),
        }

        Ok(match Alerts::deserialize(deserializer)? {
            Alerts::Wrapped { alert } => alert,
            Alerts::List(list) => list,
        })
    }
}

fn number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Value {
        Number(f64),
        Text(String),
    }

    match Value::deserialize(deserializer)? {
        Value::Number(n) => Ok(n),
        Value::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paris(country: &str) -> Location {
        Location::new("Paris", country, 48.85, 2.35)
    }

    #[test]
    fn default_preferences_serialize_with_camel_case_keys() {
        let json = serde_json::to_value(UserPreferences::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "temperatureUnit": "celsius",
                "timeFormat": "24h",
                "savedLocations": [],
            })
        );
    }

    #[test]
    fn add_location_rejects_same_name_and_country() {
        let mut prefs = UserPreferences::default();
        assert!(prefs.add_location(paris("France")));
        assert!(!prefs.add_location(paris("France")));
        assert!(prefs.add_location(paris("United States")));
        assert_eq!(prefs.saved_locations.len(), 2);
    }

    #[test]
    fn remove_location_matches_on_name_only() {
        let mut prefs = UserPreferences::default();
        prefs.add_location(paris("France"));
        prefs.add_location(paris("United States"));
        prefs.add_location(Location::new("Dhaka", "Bangladesh", 23.81, 90.41));

        assert_eq!(prefs.remove_location("Paris"), 2);
        assert_eq!(prefs.saved_locations.len(), 1);
        assert_eq!(prefs.saved_locations[0].name, "Dhaka");
    }

    #[test]
    fn display_key_distinguishes_same_name_by_coordinates() {
        assert_eq!(paris("France").display_key(), "Paris:48.85:2.35");
        assert_ne!(
            paris("France").display_key(),
            Location::new("Paris", "France", 33.66, -95.55).display_key()
        );
        assert_eq!(paris("France").to_string(), "Paris, France");
    }

    #[test]
    fn unit_and_format_parse_from_cli_strings() {
        assert_eq!("Fahrenheit".parse::<TemperatureUnit>().unwrap(), TemperatureUnit::Fahrenheit);
        assert_eq!("metric".parse::<TemperatureUnit>().unwrap(), TemperatureUnit::Celsius);
        assert_eq!("12h".parse::<TimeFormat>().unwrap(), TimeFormat::TwelveHour);

        let err = "kelvin".parse::<TemperatureUnit>().unwrap_err();
        assert!(err.to_string().contains("Unknown temperature unit"));
    }

    #[test]
    fn alerts_accept_wrapped_and_bare_lists() {
        let alert = serde_json::json!({
            "headline": "Flood Watch",
            "event": "Flood",
            "severity": "Moderate",
            "expires": "2023-10-21T06:00:00-07:00"
        });

        #[derive(Deserialize)]
        struct Holder {
            #[serde(with = "alert_list")]
            alerts: Vec<Alert>,
        }

        let wrapped: Holder =
            serde_json::from_value(serde_json::json!({ "alerts": { "alert": [alert.clone()] } }))
                .unwrap();
        let bare: Holder =
            serde_json::from_value(serde_json::json!({ "alerts": [alert] })).unwrap();

        assert_eq!(wrapped.alerts.len(), 1);
        assert_eq!(wrapped.alerts, bare.alerts);
        assert_eq!(bare.alerts[0].event, "Flood");
    }

    #[test]
    fn hour_time_parses_unpadded_hours() {
        let parsed = parse_local_time("2023-10-20 9:30").unwrap();
        assert_eq!(parsed.format("%H:%M").to_string(), "09:30");
    }
}
