use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Measurement system understood by the Weatherbit `units` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Units {
    #[default]
    #[serde(rename = "M")]
    Metric,
    #[serde(rename = "S")]
    Scientific,
    #[serde(rename = "I")]
    Fahrenheit,
}

impl Units {
    /// Code sent upstream as `units=<code>`.
    pub fn code(&self) -> &'static str {
        match self {
            Units::Metric => "M",
            Units::Scientific => "S",
            Units::Fahrenheit => "I",
        }
    }

    /// Human-readable name, as shown in prompts.
    pub fn name(&self) -> &'static str {
        match self {
            Units::Metric => "Metric",
            Units::Scientific => "Scientific",
            Units::Fahrenheit => "Fahrenheit",
        }
    }

    /// Suffix for printed temperatures.
    pub fn temperature_suffix(&self) -> &'static str {
        match self {
            Units::Metric => "°C",
            Units::Scientific => "K",
            Units::Fahrenheit => "°F",
        }
    }

    /// Every supported unit system, in prompt order.
    pub const fn all() -> &'static [Units] {
        &[Units::Metric, Units::Scientific, Units::Fahrenheit]
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<&str> for Units {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "m" | "metric" => Ok(Units::Metric),
            "s" | "scientific" => Ok(Units::Scientific),
            "i" | "fahrenheit" => Ok(Units::Fahrenheit),
            _ => Err(anyhow::anyhow!(
                "Unknown units '{value}'. Supported units: Metric (M), Scientific (S), Fahrenheit (I)."
            )),
        }
    }
}

/// Already-encoded query string forwarded verbatim into the request URL.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Query(String);

impl Query {
    /// Wrap a string the caller has already encoded, e.g. `city=London`.
    pub fn raw(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Percent-encode `pairs` into a query string.
    pub fn from_pairs<K, V>(pairs: &[(K, V)]) -> anyhow::Result<Self>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let url = reqwest::Url::parse_with_params(
            "http://localhost/",
            pairs.iter().map(|(k, v)| (k.as_ref(), v.as_ref())),
        )?;

        Ok(Self(url.query().unwrap_or_default().to_string()))
    }

    /// Append one more pre-encoded `key=value` fragment.
    pub fn with(&self, fragment: &str) -> Self {
        if self.0.is_empty() {
            Self(fragment.to_string())
        } else {
            Self(format!("{}&{}", self.0, fragment))
        }
    }

    /// The encoded query string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Conditions reported by the `current` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub description: String,
    pub code: i32,
    pub temperature: f64,
}

/// Result of a current-weather lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentReport {
    /// `"{city}, {country_code}"`.
    pub city_label: String,
    /// IANA timezone of the city, e.g. `Europe/London`.
    pub timezone: String,
    pub weather: CurrentWeather,
}

/// One day of forecast or history data, exactly as upstream sent it.
///
/// Any field may be missing or `null` (history days with station gaps often
/// are), so accessors return `Option`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DailyEntry(Map<String, Value>);

impl DailyEntry {
    /// Date of the entry, e.g. `2024-05-01`.
    pub fn datetime(&self) -> Option<&str> {
        self.0.get("datetime").and_then(Value::as_str)
    }

    /// Average temperature.
    pub fn temp(&self) -> Option<f64> {
        self.number("temp")
    }

    /// Daily maximum temperature.
    pub fn max_temp(&self) -> Option<f64> {
        self.number("max_temp")
    }

    /// Daily minimum temperature.
    pub fn min_temp(&self) -> Option<f64> {
        self.number("min_temp")
    }

    /// Text of the nested `weather.description`, present on forecasts.
    pub fn weather_description(&self) -> Option<&str> {
        self.0.get("weather")?.get("description")?.as_str()
    }

    /// Any upstream field by name.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// All upstream fields.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    fn number(&self, field: &str) -> Option<f64> {
        self.0.get(field).and_then(Value::as_f64)
    }
}

impl From<Map<String, Value>> for DailyEntry {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

pub type ForecastEntry = DailyEntry;
pub type HistoryEntry = DailyEntry;

/// Temperatures in upstream order, one slot per entry.
///
/// `None` marks an entry whose temperature was missing or `null`.
pub type ChartSeries = Vec<Option<f64>>;
