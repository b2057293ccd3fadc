use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;

use crate::config::Config;
use crate::db;
use crate::geo::distance::{distance_meters, walking_minutes, Coordinates};
use crate::geo::routing::RoutingClient;

const NO_COORDINATES_MESSAGE: &str = "coordinates not set for listing";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WalkingDistance {
    pub distance_meters: Option<i64>,
    pub minutes: Option<i64>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitTime {
    pub minutes: Option<i64>,
    pub distance_meters: Option<i64>,
    pub message: Option<String>,
    pub approximate: bool,
}

/// `Ok(None)` means the listing itself does not exist. A listing without
/// coordinates yields a null estimate with a message, not an error.
pub fn walking_distance(
    config: &Arc<Config>,
    listing_id: i32,
    destination: Coordinates,
) -> Result<Option<WalkingDistance>> {
    let Some(listing) = db::listing::get(config, listing_id)? else {
        return Ok(None);
    };

    let estimate = match listing.coordinates() {
        Some(origin) => WalkingDistance {
            distance_meters: Some(distance_meters(origin, destination)),
            minutes: Some(walking_minutes(origin, destination)),
            message: None,
        },
        None => WalkingDistance {
            distance_meters: None,
            minutes: None,
            message: Some(NO_COORDINATES_MESSAGE.to_string()),
        },
    };

    Ok(Some(estimate))
}

pub async fn transit_time(
    config: &Arc<Config>,
    routing: &RoutingClient,
    listing_id: i32,
    destination: Coordinates,
) -> Result<Option<TransitTime>> {
    let Some(listing) = db::listing::get(config, listing_id)? else {
        return Ok(None);
    };

    let Some(origin) = listing.coordinates() else {
        return Ok(Some(TransitTime {
            minutes: None,
            distance_meters: None,
            message: Some(NO_COORDINATES_MESSAGE.to_string()),
            approximate: false,
        }));
    };

    let estimate = routing.transit_estimate(origin, destination).await;

    Ok(Some(TransitTime {
        minutes: Some(estimate.minutes),
        distance_meters: Some(estimate.distance_meters),
        message: estimate.message,
        approximate: estimate.approximate,
    }))
}
