//! Formatting helpers shared by front ends.

use chrono::NaiveDateTime;

use crate::model::{TemperatureUnit, TimeFormat};

pub fn format_temperature(celsius: f64, fahrenheit: f64, unit: TemperatureUnit) -> String {
    match unit {
        TemperatureUnit::Celsius => format!("{}°C", celsius.round()),
        TemperatureUnit::Fahrenheit => format!("{}°F", fahrenheit.round()),
    }
}

/// Rounded degrees without the unit letter, for compact strips.
pub fn format_degrees(celsius: f64, fahrenheit: f64, unit: TemperatureUnit) -> String {
    let value = if unit.is_metric() { celsius } else { fahrenheit };
    format!("{}°", value.round())
}

pub fn format_wind(kph: f64, mph: f64, unit: TemperatureUnit) -> String {
    if unit.is_metric() { format!("{kph} km/h") } else { format!("{mph} mph") }
}

pub fn format_precipitation(mm: f64, inches: f64, unit: TemperatureUnit) -> String {
    if unit.is_metric() { format!("{mm} mm") } else { format!("{inches} in") }
}

pub fn format_visibility(km: f64, miles: f64, unit: TemperatureUnit) -> String {
    if unit.is_metric() { format!("{km} km") } else { format!("{miles} mi") }
}

/// Hour label for forecast strips: `3 PM` or `15:00`.
pub fn format_hour(time: NaiveDateTime, format: TimeFormat) -> String {
    match format {
        TimeFormat::TwelveHour => time.format("%-I %p").to_string(),
        TimeFormat::TwentyFourHour => time.format("%H:00").to_string(),
    }
}

/// Wall clock with weekday: `Friday 9:30 AM` or `Friday 09:30`.
pub fn format_clock(time: NaiveDateTime, format: TimeFormat) -> String {
    match format {
        TimeFormat::TwelveHour => time.format("%A %-I:%M %p").to_string(),
        TimeFormat::TwentyFourHour => time.format("%A %H:%M").to_string(),
    }
}

pub fn uv_category(uv: f64) -> &'static str {
    if uv < 3.0 {
        "Low"
    } else if uv < 6.0 {
        "Moderate"
    } else if uv < 8.0 {
        "High"
    } else {
        "Very High"
    }
}

/// Category for a PM2.5 concentration in µg/m³.
pub fn air_quality_category(pm2_5: f64) -> &'static str {
    if pm2_5 < 12.0 {
        "Good"
    } else if pm2_5 < 35.4 {
        "Moderate"
    } else if pm2_5 < 150.4 {
        "Unhealthy"
    } else if pm2_5 < 250.4 {
        "Very Unhealthy"
    } else {
        "Hazardous"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AlertSeverity {
    Other,
    Minor,
    Moderate,
    Severe,
}

impl AlertSeverity {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "severe" | "extreme" => Self::Severe,
            "moderate" => Self::Moderate,
            "minor" => Self::Minor,
            _ => Self::Other,
        }
    }
}
