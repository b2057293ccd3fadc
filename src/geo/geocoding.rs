use anyhow::Result;
use log::error;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::distance::Coordinates;
use crate::config::Config;

const GEOCODE_URL: &str = "https://api.geoapify.com/v1/geocode/search";

#[derive(Debug, Deserialize)]
struct GeocodeApiResponse {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    properties: FeatureProperties,
}

#[derive(Debug, Deserialize)]
struct FeatureProperties {
    lat: f64,
    lon: f64,
    formatted: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeocodeResult {
    pub success: bool,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub formatted: Option<String>,
    pub message: Option<String>,
}

impl GeocodeResult {
    fn failure(message: &str) -> GeocodeResult {
        GeocodeResult {
            success: false,
            latitude: None,
            longitude: None,
            formatted: None,
            message: Some(message.to_string()),
        }
    }
}

#[derive(Debug)]
pub struct GeocodeClient {
    api_key: Option<String>,
    locality: String,
    country_code: String,
    bias: Coordinates,
    http: Client,
}

impl GeocodeClient {
    pub fn new(config: &Config) -> GeocodeClient {
        GeocodeClient {
            api_key: config.geocoding_api_key.clone(),
            locality: config.geocoding_locality.clone(),
            country_code: config.geocoding_country.clone(),
            bias: Coordinates {
                latitude: config.geocoding_bias_latitude,
                longitude: config.geocoding_bias_longitude,
            },
            http: Client::new(),
        }
    }

    /// One round trip, no caching, no retries. A failed or unconfigured
    /// lookup is a negative result, not an error.
    pub async fn geocode(&self, address: &str) -> GeocodeResult {
        let api_key = match &self.api_key {
            Some(key) => key,
            None => return GeocodeResult::failure("geocoding API key not configured"),
        };

        let search_query = format!("{}, {}", address.trim(), self.locality);

        match self.fetch_first_match(api_key, &search_query).await {
            Ok(Some(properties)) => GeocodeResult {
                success: true,
                latitude: Some(properties.lat),
                longitude: Some(properties.lon),
                formatted: Some(properties.formatted),
                message: None,
            },
            Ok(None) => GeocodeResult::failure("address not found"),
            Err(e) => {
                error!("error while geocoding {search_query}: {:?}", e);
                GeocodeResult::failure(&format!("geocoding request failed: {e}"))
            }
        }
    }

    async fn fetch_first_match(
        &self,
        api_key: &str,
        search_query: &str,
    ) -> Result<Option<FeatureProperties>> {
        let response = self
            .http
            .get(GEOCODE_URL)
            .query(&[
                ("text", search_query),
                ("filter", &format!("countrycode:{}", self.country_code)),
                (
                    "bias",
                    &format!("proximity:{},{}", self.bias.longitude, self.bias.latitude),
                ),
                ("limit", "1"),
                ("apiKey", api_key),
            ])
            .send()
            .await?
            .error_for_status()?;

        let api_response: GeocodeApiResponse = response.json().await?;

        Ok(api_response
            .features
            .into_iter()
            .next()
            .map(|f| f.properties))
    }
}
