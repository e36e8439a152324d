//! Deterministic demo payload used when fetches fail in development mode.

use chrono::{Duration, NaiveDate};

use crate::model::{
    AirQuality, Astro, Condition, CurrentConditions, DaySummary, Forecast, ForecastDay,
    HourForecast, PayloadLocation, WeatherPayload,
};

const BASE_EPOCH: i64 = 1_697_760_000;
const DAY_SECS: i64 = 86_400;
const HOUR_SECS: i64 = 3_600;

const ICON_PARTLY_CLOUDY: &str = "//cdn.weatherapi.com/weather/64x64/day/116.png";
const ICON_CLEAR_NIGHT: &str = "//cdn.weatherapi.com/weather/64x64/night/113.png";
const ICON_LIGHT_RAIN: &str = "//cdn.weatherapi.com/weather/64x64/day/296.png";

fn condition(text: &str, icon: &str, code: u32) -> Condition {
    Condition { text: text.to_string(), icon: icon.to_string(), code }
}

fn partly_cloudy() -> Condition {
    condition("Partly cloudy", ICON_PARTLY_CLOUDY, 1003)
}

fn clear_night() -> Condition {
    condition("Clear", ICON_CLEAR_NIGHT, 1000)
}

fn light_rain() -> Condition {
    condition("Light rain", ICON_LIGHT_RAIN, 1183)
}

fn c_to_f(c: f64) -> f64 {
    c * 1.8 + 32.0
}

/// San Francisco, seven days of 24 hours. Every third day starting with the
/// second carries light rain between 10:00 and 15:00.
pub fn mock_weather_data() -> WeatherPayload {
    let start = NaiveDate::from_ymd_opt(2023, 10, 20).unwrap_or_default();

    let forecastday = (0..7).map(|index| mock_day(start, index)).collect();

    WeatherPayload {
        location: PayloadLocation {
            name: "San Francisco".to_string(),
            region: "California".to_string(),
            country: "United States".to_string(),
            lat: 37.77,
            lon: -122.42,
            tz_id: "America/Los_Angeles".to_string(),
            localtime: "2023-10-20 9:30".to_string(),
        },
        current: CurrentConditions {
            temp_c: 15.6,
            temp_f: 60.1,
            feelslike_c: 15.6,
            feelslike_f: 60.1,
            is_day: true,
            condition: partly_cloudy(),
            wind_kph: 13.0,
            wind_mph: 8.1,
            wind_dir: "W".to_string(),
            pressure_mb: 1015.0,
            precip_mm: 0.0,
            precip_in: 0.0,
            humidity: 76,
            cloud: 25,
            vis_km: 16.0,
            vis_miles: 9.9,
            uv: 4.0,
            gust_kph: 19.8,
            gust_mph: 12.3,
            air_quality: Some(AirQuality {
                co: 220.3,
                no2: 8.1,
                o3: 52.2,
                so2: 1.4,
                pm2_5: 6.3,
                pm10: 9.8,
                us_epa_index: Some(1),
            }),
        },
        forecast: Forecast { forecastday },
        alerts: Vec::new(),
    }
}

/// `index` 0 is today; the following days cycle through the variations.
fn mock_day(start: NaiveDate, index: i64) -> ForecastDay {
    let offset = index - 1;
    let (max_shift, min_shift, rainy) = if index == 0 {
        (0.0, 0.0, false)
    } else {
        ((offset % 4) as f64, (offset % 3) as f64, offset % 3 == 0)
    };

    let date = start + Duration::days(index);
    let date_epoch = BASE_EPOCH + index * DAY_SECS;

    let day_condition = if rainy { light_rain() } else { partly_cloudy() };
    let hour = (0..24).map(|h| mock_hour(date, date_epoch, h, max_shift, rainy)).collect();

    ForecastDay {
        date,
        date_epoch,
        day: DaySummary {
            maxtemp_c: 18.9 + max_shift,
            maxtemp_f: 66.0 + max_shift * 1.8,
            mintemp_c: 14.2 - min_shift,
            mintemp_f: 57.6 - min_shift * 1.8,
            avgtemp_c: 16.2,
            avgtemp_f: 61.2,
            maxwind_kph: 17.6,
            maxwind_mph: 11.0,
            totalprecip_mm: if rainy { 2.5 } else { 0.0 },
            totalprecip_in: if rainy { 0.1 } else { 0.0 },
            avghumidity: 80.0,
            daily_chance_of_rain: if rainy { 70 } else { 0 },
            daily_chance_of_snow: 0,
            condition: day_condition,
            uv: 4.0,
        },
        astro: Astro {
            sunrise: "07:23 AM".to_string(),
            sunset: "06:28 PM".to_string(),
            moonrise: "02:34 PM".to_string(),
            moonset: "11:45 PM".to_string(),
            moon_phase: "First Quarter".to_string(),
            moon_illumination: if index == 0 { 50.0 } else { 50.0 + offset as f64 },
        },
        hour,
    }
}

fn mock_hour(
    date: NaiveDate,
    date_epoch: i64,
    h: i64,
    shift: f64,
    rainy_day: bool,
) -> HourForecast {
    let daytime = (7..=18).contains(&h);
    let warming = if h > 6 && h < 18 { (h % 8) as f64 } else { 0.0 };
    let raining = rainy_day && (10..=15).contains(&h);

    let temp_c = 14.2 + warming + shift;
    let condition = if raining {
        light_rain()
    } else if daytime {
        partly_cloudy()
    } else {
        clear_night()
    };

    HourForecast {
        time_epoch: date_epoch + h * HOUR_SECS,
        time: format!("{} {:02}:00", date.format("%Y-%m-%d"), h),
        temp_c,
        temp_f: c_to_f(temp_c),
        is_day: daytime,
        condition,
        wind_kph: (8 + h % 8) as f64,
        wind_mph: (5 + h % 5) as f64,
        wind_dir: "W".to_string(),
        precip_mm: if raining { 0.5 } else { 0.0 },
        precip_in: if raining { 0.02 } else { 0.0 },
        humidity: 75 + (h % 10) as u8,
        chance_of_rain: if raining { 70 } else { 0 },
        chance_of_snow: 0,
        feelslike_c: temp_c,
        feelslike_f: c_to_f(temp_c),
        uv: if daytime { 4.0 } else { 1.0 },
    }
}
