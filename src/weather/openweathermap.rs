//! OpenWeatherMap current-weather client

use crate::config::WeatherConfig;
use crate::error::{FormchatError, Result};
use crate::weather::{ConditionsRecord, WeatherProvider};

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

/// Public OpenWeatherMap API base
pub const OPENWEATHERMAP_API_BASE: &str = "https://api.openweathermap.org/data/2.5";

/// Country shown when the response does not name one
const UNKNOWN_COUNTRY: &str = "Unknown";

/// OpenWeatherMap weather provider
pub struct OpenWeatherMapProvider {
    client: Client,
    config: WeatherConfig,
    api_key: String,
}

impl fmt::Debug for OpenWeatherMapProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenWeatherMapProvider")
            .field("api_base", &self.api_base())
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct OwmResponse {
    weather: Vec<OwmWeather>,
    wind: OwmWind,
    main: OwmMain,
    clouds: OwmClouds,
    #[serde(default)]
    sys: Option<OwmSys>,
}

#[derive(Debug, Deserialize)]
struct OwmWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwmWind {
    speed: f64,
    deg: f64,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
    temp_max: f64,
    temp_min: f64,
    humidity: u32,
}

#[derive(Debug, Deserialize)]
struct OwmClouds {
    all: u32,
}

#[derive(Debug, Deserialize)]
struct OwmSys {
    #[serde(default)]
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwmErrorBody {
    message: Option<String>,
}

impl OpenWeatherMapProvider {
    /// Create a new OpenWeatherMap client
    ///
    /// # Errors
    ///
    /// Returns error if the key is blank or the HTTP client cannot be built
    pub fn new(config: WeatherConfig, api_key: String) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(FormchatError::MissingCredentials(
                crate::config::WEATHER_API_KEY_VAR.to_string(),
            )
            .into());
        }

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("formchat/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FormchatError::Weather(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    /// API base in use, without a trailing slash
    pub fn api_base(&self) -> &str {
        self.config
            .api_base
            .as_deref()
            .unwrap_or(OPENWEATHERMAP_API_BASE)
            .trim_end_matches('/')
    }
}

fn into_record(body: OwmResponse) -> Result<ConditionsRecord> {
    let Some(weather) = body.weather.into_iter().next() else {
        return Err(FormchatError::Weather(
            "Weather response did not include a weather description".to_string(),
        )
        .into());
    };

    let country = body
        .sys
        .and_then(|sys| sys.country)
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN_COUNTRY.to_string());

    Ok(ConditionsRecord {
        country,
        description: weather.description,
        wind_speed: body.wind.speed,
        wind_direction_degrees: body.wind.deg.round().clamp(0.0, 360.0) as u32,
        humidity_percent: body.main.humidity,
        temp_current_c: body.main.temp,
        temp_max_c: body.main.temp_max,
        temp_min_c: body.main.temp_min,
        cloud_cover_percent: body.clouds.all,
    })
}

#[async_trait]
impl WeatherProvider for OpenWeatherMapProvider {
    async fn current_conditions(&self, place: &str) -> Result<ConditionsRecord> {
        let url = format!("{}/weather", self.api_base());
        tracing::debug!("Looking up weather for {}", place);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", place),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(|e| {
                // reqwest includes the URL, which carries the key as a query parameter
                let e = e.without_url();
                tracing::error!("Weather request failed: {}", e);
                FormchatError::Weather(format!("Weather request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<OwmErrorBody>(&text)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| text.trim().to_string());
            tracing::warn!("Weather lookup for {} failed with {}: {}", place, status, detail);
            return Err(FormchatError::Weather(format!(
                "Weather lookup failed ({}): {}",
                status, detail
            ))
            .into());
        }

        let text = response
            .text()
            .await
            .map_err(|e| {
                let e = e.without_url();
                tracing::error!("Failed to read weather response: {}", e);
                FormchatError::Weather(format!("Failed to read weather response: {}", e))
            })?;
        let body: OwmResponse = serde_json::from_str(&text).map_err(|e| {
            tracing::error!("Malformed weather response: {}", e);
            FormchatError::Weather(format!("Malformed weather response: {}", e))
        })?;

        let record = into_record(body)?;
        tracing::debug!("Weather for {}: {:?}", place, record);
        Ok(record)
    }
}
