//! Current-conditions lookup over Open-Meteo.
//!
//! Two sequential calls: geocode the city name, then fetch `current_weather`
//! for the first match. Every outcome — success or failure — is a sentence
//! meant to be pasted into the answer prompt, so [`WeatherTool::lookup`]
//! returns `String`, never `Result`.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Number;
use tracing::{debug, info, warn};

use crate::config::WeatherConfig;
use crate::error::AppError;

/// Stateless Open-Meteo client. Cheap to clone.
#[derive(Debug, Clone)]
pub struct WeatherTool {
    client: Client,
    geocoding_url: String,
    forecast_url: String,
}

impl WeatherTool {
    pub fn new(config: &WeatherConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| AppError::Config(format!("failed to build weather HTTP client: {e}")))?;

        Ok(Self {
            client,
            geocoding_url: config.geocoding_url.clone(),
            forecast_url: config.forecast_url.clone(),
        })
    }

    /// Look up current weather for a free-text city name.
    pub async fn lookup(&self, city: &str) -> String {
        let city = city.trim();
        if city.is_empty() {
            return "Please provide a valid city name to look up the weather.".to_string();
        }

        let geo: GeocodingResponse = match self
            .get_json(
                &self.geocoding_url,
                &[
                    ("name", city.to_string()),
                    ("count", "1".to_string()),
                    ("language", "en".to_string()),
                    ("format", "json".to_string()),
                ],
            )
            .await
        {
            Ok(geo) => geo,
            Err(e) => {
                warn!(%city, error = %e, "geocoding request failed");
                return format!("Sorry, I couldn't reach the geocoding service: {e}");
            }
        };

        let Some(place) = geo.results.unwrap_or_default().into_iter().next() else {
            info!(%city, "geocoding returned no match");
            return format!(
                "Sorry, I couldn't find weather data for '{city}'. Please check the city name and try again."
            );
        };

        let (Some(latitude), Some(longitude)) = (place.latitude, place.longitude) else {
            warn!(%city, "geocoding match has no coordinates");
            return format!("Sorry, I couldn't determine coordinates for '{city}'.");
        };

        let resolved_name = place.name.filter(|n| !n.is_empty());
        let country_code = place.country_code.filter(|c| !c.is_empty());
        let display_name = resolved_name.as_deref().unwrap_or(city);

        debug!(%city, %latitude, %longitude, name = display_name, "geocoded");

        let forecast: ForecastResponse = match self
            .get_json(
                &self.forecast_url,
                &[
                    ("latitude", latitude.to_string()),
                    ("longitude", longitude.to_string()),
                    ("current_weather", "true".to_string()),
                    ("temperature_unit", "celsius".to_string()),
                    ("windspeed_unit", "kmh".to_string()),
                ],
            )
            .await
        {
            Ok(forecast) => forecast,
            Err(e) => {
                warn!(%city, error = %e, "forecast request failed");
                return format!("Sorry, I couldn't reach the weather service: {e}");
            }
        };

        let current = forecast.current_weather.unwrap_or_default();
        let (Some(temperature), Some(windspeed), Some(time)) =
            (current.temperature, current.windspeed, current.time)
        else {
            info!(%city, "current conditions incomplete");
            return format!("Weather data for {display_name} is currently unavailable.");
        };

        let label = match country_code {
            Some(cc) => format!("{display_name}, {cc}"),
            None => display_name.to_string(),
        };

        info!(%city, location = %label, "weather lookup succeeded");
        format!("Current weather for {label}: {temperature}°C, wind {windspeed} km/h (as of {time}).")
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, reqwest::Error> {
        self.client
            .get(url)
            .query(query)
            .send()
            .await?
            .error_for_status()?
            .json::<T>()
            .await
    }
}

// ── Open-Meteo wire types ─────────────────────────────────────────────────────

// Numbers stay `serde_json::Number` so they print exactly as the API sent them.

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    results: Option<Vec<GeocodingResult>>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResult {
    #[serde(default)]
    latitude: Option<Number>,
    #[serde(default)]
    longitude: Option<Number>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    country_code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    current_weather: Option<CurrentWeather>,
}

#[derive(Debug, Deserialize, Default)]
struct CurrentWeather {
    #[serde(default)]
    temperature: Option<Number>,
    #[serde(default)]
    windspeed: Option<Number>,
    #[serde(default)]
    time: Option<String>,
}
