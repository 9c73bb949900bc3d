//! IP-based location lookup, used only when the caller gave no location.

use std::time::Duration;

use mindscreen_core::models::user::Location;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::InferenceError;

pub const DEFAULT_GEOLOCATION_URL: &str = "https://ipapi.co/json/";

#[derive(Debug, Deserialize)]
struct GeoResponse {
    #[serde(default)]
    country_name: Option<String>,
    #[serde(default)]
    city: Option<String>,
}

#[derive(Debug, Clone)]
pub struct IpGeolocator {
    http_client: reqwest::Client,
    url: String,
}

impl IpGeolocator {
    pub fn new(url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, InferenceError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| InferenceError::Client(e.to_string()))?;
        Ok(Self {
            http_client,
            url: url.into(),
        })
    }

    /// Look up the caller's approximate location. Any failure yields `None`.
    pub async fn locate(&self) -> Option<Location> {
        let response = match self.http_client.get(&self.url).send().await {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                warn!(status = r.status().as_u16(), "geolocation request rejected");
                return None;
            }
            Err(e) => {
                warn!(error = %e, "geolocation request failed");
                return None;
            }
        };
        match response.json::<GeoResponse>().await {
            Ok(geo) => {
                let location = location_from(geo);
                debug!(country = %location.country, city = %location.city, "geolocation resolved");
                Some(location)
            }
            Err(e) => {
                warn!(error = %e, "geolocation response unreadable");
                None
            }
        }
    }
}

fn location_from(geo: GeoResponse) -> Location {
    Location::normalized(
        geo.country_name.as_deref().unwrap_or_default(),
        geo.city.as_deref().unwrap_or_default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_become_unknown() {
        let geo: GeoResponse =
            serde_json::from_str(r#"{"ip": "1.2.3.4", "city": "Lahore"}"#).unwrap();
        let loc = location_from(geo);
        assert_eq!(loc.country, "Unknown");
        assert_eq!(loc.city, "Lahore");
    }

    #[test]
    fn reads_country_name() {
        let geo: GeoResponse =
            serde_json::from_str(r#"{"country_name": "Pakistan", "city": "Chitral"}"#).unwrap();
        assert_eq!(location_from(geo), Location::normalized("Pakistan", "Chitral"));
    }
}
