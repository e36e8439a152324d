use weather_core::{
    Location, Notice, NoticeLevel, SearchResult, UserPreferences, WeatherPayload, background,
    display::{
        AlertSeverity, air_quality_category, format_clock, format_degrees, format_hour,
        format_precipitation, format_temperature, format_visibility, format_wind, uv_category,
    },
};

/// Hours shown in the hourly strip, every third hour.
const HOUR_STEP: usize = 3;

pub fn dashboard(payload: &WeatherPayload, prefs: &UserPreferences) {
    let unit = prefs.temperature_unit;
    let loc = &payload.location;
    let current = &payload.current;

    let clock = loc
        .local_time()
        .map(|t| format_clock(t, prefs.time_format))
        .unwrap_or_else(|| loc.localtime.clone());

    println!("{}, {}", loc.name, loc.country);
    println!("{clock} ({})", loc.tz_id);
    println!();

    println!(
        "{}  {}  (feels like {})",
        format_temperature(current.temp_c, current.temp_f, unit),
        current.condition.text,
        format_temperature(current.feelslike_c, current.feelslike_f, unit),
    );

    let bg = background::select(current.condition.code, current.is_day);
    println!(
        "Backdrop: {} {} ({} -> {})",
        bg.bucket.as_str(),
        if bg.is_day { "day" } else { "night" },
        bg.gradient.from,
        bg.gradient.to,
    );
    println!();

    println!(
        "  Wind           {} {}",
        format_wind(current.wind_kph, current.wind_mph, unit),
        current.wind_dir
    );
    println!("  Humidity       {}%", current.humidity);
    println!("  Visibility     {}", format_visibility(current.vis_km, current.vis_miles, unit));
    println!("  UV Index       {} ({})", current.uv, uv_category(current.uv));
    println!(
        "  Precipitation  {}",
        format_precipitation(current.precip_mm, current.precip_in, unit)
    );
    if let Some(aq) = &current.air_quality {
        println!("  Air Quality    {:.1} ({})", aq.pm2_5, air_quality_category(aq.pm2_5));
    }

    if !payload.alerts.is_empty() {
        println!();
        println!("Alerts ({}):", payload.alerts.len());

        let mut alerts: Vec<_> = payload.alerts.iter().collect();
        alerts.sort_by_key(|a| std::cmp::Reverse(AlertSeverity::parse(&a.severity)));
        for alert in alerts {
            println!("  [{}] {}: {}", alert.severity, alert.event, alert.headline);
            println!("      valid until {}", alert.expires);
        }
    }

    if let Some(today) = payload.forecast.forecastday.first() {
        println!();
        println!("Today:");
        let strip: Vec<String> = today
            .hour
            .iter()
            .step_by(HOUR_STEP)
            .map(|h| {
                let label = h
                    .local_time()
                    .map(|t| format_hour(t, prefs.time_format))
                    .unwrap_or_else(|| h.time.clone());
                format!(
                    "{label} {} {}%",
                    format_degrees(h.temp_c, h.temp_f, unit),
                    h.chance_of_rain
                )
            })
            .collect();
        println!("  {}", strip.join(" | "));
    }

    println!();
    println!("7-day forecast:");
    for (index, day) in payload.forecast.forecastday.iter().enumerate() {
        let label = if index == 0 {
            "Today".to_string()
        } else {
            day.date.format("%a, %b %-d").to_string()
        };
        let summary = &day.day;

        println!(
            "  {label:<12} {:>5} / {:<5} {:<20} rain {:>3}%  sunrise {} sunset {}",
            format_degrees(summary.mintemp_c, summary.mintemp_f, unit),
            format_degrees(summary.maxtemp_c, summary.maxtemp_f, unit),
            summary.condition.text,
            summary.daily_chance_of_rain,
            day.astro.sunrise,
            day.astro.sunset,
        );
    }
}

pub fn search_results(results: &[SearchResult]) {
    if results.is_empty() {
        println!("No locations found");
        return;
    }

    for result in results {
        if result.region.is_empty() {
            println!("{}, {}  ({:.2}, {:.2})", result.name, result.country, result.lat, result.lon);
        } else {
            println!(
                "{}, {}, {}  ({:.2}, {:.2})",
                result.name, result.region, result.country, result.lat, result.lon
            );
        }
    }
}

pub fn saved_locations(locations: &[Location]) {
    if locations.is_empty() {
        println!("No saved locations");
        return;
    }

    for (index, location) in locations.iter().enumerate() {
        println!("{:>2}. {}  ({:.2}, {:.2})", index + 1, location, location.lat, location.lon);
    }
}

pub fn preferences(prefs: &UserPreferences) {
    println!("Temperature unit: {}", prefs.temperature_unit);
    println!("Time format:      {}", prefs.time_format);
    println!("Saved locations:  {}", prefs.saved_locations.len());
}

pub fn notice(notice: &Notice) {
    match notice.level {
        NoticeLevel::Success => eprintln!("✓ {}", notice.message),
        NoticeLevel::Error => eprintln!("✗ {}", notice.message),
    }
}
