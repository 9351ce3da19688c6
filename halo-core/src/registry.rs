use std::{fmt::Debug, sync::Mutex};

/// Receives every city a current-weather lookup resolved to.
pub trait CityRegistry: Send + Sync + Debug {
    /// Record a city returned by a successful lookup.
    fn add_city(&self, city_name: &str, country_code: &str);
}

/// Keeps recently seen cities in memory, oldest first, without duplicates.
#[derive(Debug, Default)]
pub struct MemoryCityRegistry {
    cities: Mutex<Vec<(String, String)>>,
}

impl MemoryCityRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded `(city, country_code)` pairs, oldest first.
    pub fn cities(&self) -> Vec<(String, String)> {
        self.cities.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl CityRegistry for MemoryCityRegistry {
    fn add_city(&self, city_name: &str, country_code: &str) {
        let Ok(mut cities) = self.cities.lock() else {
            tracing::warn!(city_name, "city registry lock poisoned, skipping");
            return;
        };

        let seen = cities.iter().any(|(c, cc)| c == city_name && cc == country_code);
        if !seen {
            cities.push((city_name.to_string(), country_code.to_string()));
        }
    }
}
