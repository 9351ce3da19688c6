use chrono::Utc;
use serde::{Deserialize, de::DeserializeOwned};
use std::sync::Arc;

use crate::{
    config::ClientConfig,
    error::ApiError,
    model::{ChartSeries, CurrentReport, CurrentWeather, ForecastEntry, HistoryEntry, Query},
    registry::CityRegistry,
    transport::{ReqwestTransport, Transport},
    window::TimeWindow,
};

/// Days of forecast requested from the daily and 3-hourly endpoints.
pub const FORECAST_DAYS: u32 = 5;

/// Days covered by history lookups (the free plan limit).
pub const HISTORY_DAYS: i64 = 1;

const SLUG_CURRENT: &str = "current";
const SLUG_FORECAST_DAILY: &str = "forecast/daily";
const SLUG_FORECAST_3HOURLY: &str = "forecast/3hourly";
const SLUG_HISTORY_DAILY: &str = "history/daily";
const SLUG_HISTORY_HOURLY: &str = "history/hourly";

/// Client for the Weatherbit v2.0 REST endpoints.
///
/// Every public method sends exactly one GET request and waits for it.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    registry: Arc<dyn CityRegistry>,
}

impl WeatherClient {
    /// Client backed by a real HTTP transport.
    pub fn new(config: ClientConfig, registry: Arc<dyn CityRegistry>) -> Result<Self, reqwest::Error> {
        let transport = ReqwestTransport::new()?;
        Ok(Self::with_transport(config, Arc::new(transport), registry))
    }

    /// Client over any [`Transport`], e.g. a fake in tests.
    pub fn with_transport(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        registry: Arc<dyn CityRegistry>,
    ) -> Self {
        Self { config, transport, registry }
    }

    /// Current conditions for the first location matching `query`.
    ///
    /// Records the resolved city in the registry.
    pub async fn current_weather(&self, query: &Query) -> Result<CurrentReport, ApiError> {
        let url = self.url(SLUG_CURRENT, query, None);
        let res: WbResponse<WbCurrent> = self.fetch(SLUG_CURRENT, &url).await?;

        let current = res
            .data
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::bad_payload(SLUG_CURRENT, "response contained no data"))?;

        self.registry.add_city(&current.city_name, &current.country_code);

        Ok(CurrentReport {
            city_label: format!("{}, {}", current.city_name, current.country_code),
            timezone: current.timezone,
            weather: CurrentWeather {
                description: current.weather.description,
                code: current.weather.code,
                temperature: current.temp,
            },
        })
    }

    /// Daily forecast entries for the next five days, in upstream order.
    pub async fn forecast_weather(&self, query: &Query) -> Result<Vec<ForecastEntry>, ApiError> {
        let query = query.with(&format!("days={FORECAST_DAYS}"));
        let url = self.url(SLUG_FORECAST_DAILY, &query, None);

        let res: WbResponse<ForecastEntry> = self.fetch(SLUG_FORECAST_DAILY, &url).await?;
        Ok(res.data)
    }

    /// 3-hourly forecast temperatures.
    pub async fn forecast_chart(&self, query: &Query) -> Result<ChartSeries, ApiError> {
        let query = query.with(&format!("days={FORECAST_DAYS}"));
        let url = self.url(SLUG_FORECAST_3HOURLY, &query, None);

        let res: WbResponse<WbTemp> = self.fetch(SLUG_FORECAST_3HOURLY, &url).await?;
        Ok(project_temps(res.data))
    }

    /// Yesterday's daily summary, "yesterday" being relative to `city_timezone`.
    pub async fn weather_history(
        &self,
        query: &Query,
        city_timezone: &str,
    ) -> Result<Vec<HistoryEntry>, ApiError> {
        let window = TimeWindow::days_before_in(Utc::now(), city_timezone, HISTORY_DAYS)?;
        let url = self.url(SLUG_HISTORY_DAILY, query, Some(&window));

        let res: WbResponse<HistoryEntry> = self.fetch(SLUG_HISTORY_DAILY, &url).await?;
        Ok(res.data)
    }

    /// Yesterday's hourly temperatures.
    pub async fn weather_history_chart(
        &self,
        query: &Query,
        city_timezone: &str,
    ) -> Result<ChartSeries, ApiError> {
        let window = TimeWindow::days_before_in(Utc::now(), city_timezone, HISTORY_DAYS)?;
        let url = self.url(SLUG_HISTORY_HOURLY, query, Some(&window));

        let res: WbResponse<WbTemp> = self.fetch(SLUG_HISTORY_HOURLY, &url).await?;
        Ok(project_temps(res.data))
    }

    fn url(&self, slug: &str, query: &Query, window: Option<&TimeWindow>) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        let key = &self.config.api_key;

        match window {
            Some(w) => format!(
                "{base}/{slug}?{query}&start_date={}&end_date={}&key={key}",
                w.start_param(),
                w.end_param(),
            ),
            None => format!("{base}/{slug}?{query}&key={key}"),
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, slug: &str, url: &str) -> Result<T, ApiError> {
        let reply = self.transport.get(url).await.map_err(|err| {
            tracing::warn!(slug, error = %err, "weatherbit request failed");
            ApiError::Connectivity(err)
        })?;

        tracing::debug!(slug, status = reply.status, "weatherbit response");

        if let Some(err) = ApiError::from_status(reply.status) {
            tracing::warn!(slug, status = reply.status, "weatherbit returned an error status");
            return Err(err);
        }

        serde_json::from_str(&reply.body).map_err(|err| ApiError::bad_payload(slug, err))
    }
}

fn project_temps(entries: Vec<WbTemp>) -> ChartSeries {
    entries.into_iter().map(|e| e.temp).collect()
}

#[derive(Debug, Deserialize)]
struct WbResponse<T> {
    data: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct WbCondition {
    description: String,
    code: i32,
}

#[derive(Debug, Deserialize)]
struct WbCurrent {
    city_name: String,
    country_code: String,
    timezone: String,
    temp: f64,
    weather: WbCondition,
}

#[derive(Debug, Deserialize)]
struct WbTemp {
    temp: Option<f64>,
}
