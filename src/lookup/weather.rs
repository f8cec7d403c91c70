//! OpenWeatherMap current-weather client

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use super::WeatherLookup;
use crate::errors::LookupError;
use crate::goals::kelvin_to_celsius;

/// Client for the OpenWeatherMap current-weather endpoint
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OpenWeatherClient {
    pub fn new(client: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl WeatherLookup for OpenWeatherClient {
    async fn temperature(&self, city: &str) -> Result<f64, LookupError> {
        let url = format!("{}/data/2.5/weather", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("q", city), ("appid", self.api_key.as_str())])
            .send()
            .await?;

        // Errors come back with a JSON body carrying the code, so the HTTP
        // status only matters when the body is unreadable.
        let status = response.status();
        let body: Value = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                warn!(status = %status, city = %city, error = %e, "Weather response is not JSON");
                return Err(LookupError::Status(status.as_u16()));
            }
        };

        let celsius = parse_weather_response(&body)?;
        debug!(city = %city, temperature = celsius, "Weather lookup succeeded");
        Ok(celsius)
    }
}

/// Read the status code and temperature out of a current-weather response
///
/// The `cod` field is a number on success and a string on errors.
pub fn parse_weather_response(body: &Value) -> Result<f64, LookupError> {
    let code = match body.get("cod") {
        Some(Value::Number(n)) => n.as_u64().and_then(|c| u16::try_from(c).ok()),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
    .ok_or_else(|| LookupError::InvalidResponse("missing cod field".to_string()))?;

    if code != 200 {
        return Err(LookupError::Status(code));
    }

    let kelvin = body
        .get("main")
        .and_then(|main| main.get("temp"))
        .and_then(Value::as_f64)
        .ok_or_else(|| LookupError::InvalidResponse("missing main.temp".to_string()))?;

    Ok(kelvin_to_celsius(kelvin))
}
