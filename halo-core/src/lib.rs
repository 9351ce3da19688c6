//! Core library for the `halo` weather app.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - A client for the Weatherbit v2.0 REST API
//! - Shared domain models (current weather, daily entries, chart series)
//!
//! It is used by `halo-cli`, but can also be reused by other front ends.

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod registry;
pub mod transport;
pub mod window;

pub use client::WeatherClient;
pub use config::{ClientConfig, Config};
pub use error::{ApiError, ErrorKind};
pub use model::{
    ChartSeries, CurrentReport, CurrentWeather, DailyEntry, ForecastEntry, HistoryEntry, Query,
    Units,
};
pub use registry::{CityRegistry, MemoryCityRegistry};
pub use transport::{HttpReply, ReqwestTransport, Transport};
pub use window::TimeWindow;
