//! Weather lookup for the weather assistant
//!
//! The weather provider is a black box from a place name to a
//! [`ConditionsRecord`]. The session turns the record into a fixed-shape
//! summary with [`format_conditions`] and uses it as the prompt context.

pub mod openweathermap;

pub use openweathermap::OpenWeatherMapProvider;

use crate::config::{Credentials, WeatherConfig};
use crate::error::{FormchatError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Current conditions at one place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionsRecord {
    /// Country code of the matched place
    pub country: String,
    /// Detailed status, e.g. "clear sky"
    pub description: String,
    /// Wind speed in m/s
    pub wind_speed: f64,
    /// Wind direction in degrees
    pub wind_direction_degrees: u32,
    /// Relative humidity in percent
    pub humidity_percent: u32,
    /// Current temperature in °C
    pub temp_current_c: f64,
    /// Maximum temperature in °C
    pub temp_max_c: f64,
    /// Minimum temperature in °C
    pub temp_min_c: f64,
    /// Cloud cover in percent
    pub cloud_cover_percent: u32,
}

/// Source of current weather conditions
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Look up current conditions for a place name
    ///
    /// # Errors
    ///
    /// Returns error on transport failure, an unknown place, or a response
    /// missing any required field.
    async fn current_conditions(&self, place: &str) -> Result<ConditionsRecord>;
}

/// Render a conditions record as the multi-line summary stored as context
///
/// # Examples
///
/// ```
/// use formchat::weather::{format_conditions, ConditionsRecord};
///
/// let record = ConditionsRecord {
///     country: "IN".to_string(),
///     description: "clear sky".to_string(),
///     wind_speed: 3.1,
///     wind_direction_degrees: 200,
///     humidity_percent: 60,
///     temp_current_c: 30.0,
///     temp_max_c: 32.0,
///     temp_min_c: 28.0,
///     cloud_cover_percent: 10,
/// };
/// let summary = format_conditions("Goa", &record);
/// assert!(summary.starts_with("In Goa, IN, the current weather is as follows:"));
/// ```
pub fn format_conditions(place: &str, record: &ConditionsRecord) -> String {
    format!(
        "In {place}, {country}, the current weather is as follows:\n\
         Detailed status: {description}\n\
         Wind speed: {speed} m/s, direction: {deg}°\n\
         Humidity: {humidity}%\n\
         Temperature:\n  \
         - Current: {current}°C\n  \
         - High: {high}°C\n  \
         - Low: {low}°C\n\
         Cloud cover: {clouds}%\n",
        place = place,
        country = record.country,
        description = record.description,
        speed = record.wind_speed,
        deg = record.wind_direction_degrees,
        humidity = record.humidity_percent,
        current = record.temp_current_c,
        high = record.temp_max_c,
        low = record.temp_min_c,
        clouds = record.cloud_cover_percent,
    )
}

/// Create the weather provider from configuration
///
/// # Errors
///
/// Returns error if the OpenWeatherMap key is missing or the client cannot be built
pub fn create_weather_provider(
    config: &WeatherConfig,
    credentials: &Credentials,
) -> Result<Box<dyn WeatherProvider>> {
    let api_key = credentials.weather_api_key.clone().ok_or_else(|| {
        FormchatError::MissingCredentials(crate::config::WEATHER_API_KEY_VAR.to_string())
    })?;
    Ok(Box::new(OpenWeatherMapProvider::new(config.clone(), api_key)?))
}
