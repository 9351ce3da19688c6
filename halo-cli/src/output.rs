use halo_core::{CurrentReport, DailyEntry, Units};

/// Current conditions with the city label and timezone.
pub fn current(report: &CurrentReport, units: Units) -> String {
    format!(
        "{}\n  {:.1}{}  {} ({})\n  Timezone: {}",
        report.city_label,
        report.weather.temperature,
        units.temperature_suffix(),
        report.weather.description,
        report.weather.code,
        report.timezone,
    )
}

/// One line per entry; missing values print as `-`.
pub fn daily(title: &str, entries: &[DailyEntry], units: Units) -> String {
    if entries.is_empty() {
        return format!("{title}: no data.");
    }

    let suffix = units.temperature_suffix();
    let mut out = format!("{title}:\n");

    for entry in entries {
        out.push_str(&format!(
            "  {}  {:>6}{suffix}",
            entry.datetime().unwrap_or("-"),
            temperature(entry.temp()),
        ));

        if let (Some(min), Some(max)) = (entry.min_temp(), entry.max_temp()) {
            out.push_str(&format!("  ({min:.1} .. {max:.1})"));
        }
        if let Some(description) = entry.weather_description() {
            out.push_str(&format!("  {description}"));
        }
        out.push('\n');
    }

    out.trim_end().to_string()
}

/// Temperatures on one line, gaps as `-`.
pub fn chart(title: &str, series: &[Option<f64>], units: Units) -> String {
    if series.is_empty() {
        return format!("{title}: no data.");
    }

    let temps: Vec<String> = series.iter().map(|t| temperature(*t)).collect();
    format!("{title} ({}):\n  {}", units.temperature_suffix(), temps.join(" "))
}

fn temperature(value: Option<f64>) -> String {
    value.map(|t| format!("{t:.1}")).unwrap_or_else(|| "-".to_string())
}
