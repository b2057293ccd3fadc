use anyhow::Result;
use log::error;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::distance::{
    distance_meters, fallback_transit_minutes, Coordinates, TRANSIT_BUFFER_MINUTES,
};

const DIRECTIONS_URL: &str = "https://api.openrouteservice.org/v2/directions/driving-car";

#[derive(Debug, Deserialize)]
struct DirectionsApiResponse {
    #[serde(default)]
    routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
struct Route {
    summary: RouteSummary,
}

#[derive(Debug, Deserialize)]
struct RouteSummary {
    duration: f64,
    distance: f64,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct TransitEstimate {
    pub minutes: i64,
    pub distance_meters: i64,
    pub message: Option<String>,
    pub approximate: bool,
}

#[derive(Debug)]
pub struct RoutingClient {
    api_key: Option<String>,
    http: Client,
}

impl RoutingClient {
    pub fn new(api_key: Option<String>) -> RoutingClient {
        RoutingClient {
            api_key,
            http: Client::new(),
        }
    }

    /// Never fails: a missing credential, a failed call, or an empty route
    /// set all degrade to the offline formula, flagged as approximate.
    pub async fn transit_estimate(&self, from: Coordinates, to: Coordinates) -> TransitEstimate {
        let api_key = match &self.api_key {
            Some(key) => key,
            None => {
                return approximate_estimate(from, to, "routing API key not configured");
            }
        };

        match self.fetch_route(api_key, from, to).await {
            Ok(Some(summary)) => TransitEstimate {
                minutes: (summary.duration / 60.0).round() as i64 + TRANSIT_BUFFER_MINUTES,
                distance_meters: summary.distance.round() as i64,
                message: None,
                approximate: false,
            },
            Ok(None) => approximate_estimate(from, to, "routing service returned no route"),
            Err(e) => {
                error!("error while fetching route from routing service: {:?}", e);
                approximate_estimate(from, to, &format!("routing request failed: {e}"))
            }
        }
    }

    async fn fetch_route(
        &self,
        api_key: &str,
        from: Coordinates,
        to: Coordinates,
    ) -> Result<Option<RouteSummary>> {
        // The routing service wants [longitude, latitude] pairs.
        let json_body = json!({
            "coordinates": [
                [from.longitude, from.latitude],
                [to.longitude, to.latitude],
            ],
        });

        let response = self
            .http
            .post(DIRECTIONS_URL)
            .header(AUTHORIZATION, api_key)
            .json(&json_body)
            .send()
            .await?
            .error_for_status()?;

        let api_response: DirectionsApiResponse = response.json().await?;

        Ok(api_response.routes.into_iter().next().map(|r| r.summary))
    }
}

fn approximate_estimate(from: Coordinates, to: Coordinates, reason: &str) -> TransitEstimate {
    TransitEstimate {
        minutes: fallback_transit_minutes(from, to),
        distance_meters: distance_meters(from, to),
        message: Some(format!("approximate estimate ({reason})")),
        approximate: true,
    }
}
