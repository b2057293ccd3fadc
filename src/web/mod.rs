use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, post},
    Json, Router,
};
use log::error;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

use crate::{
    config::Config,
    geo::{distance::Coordinates, geocoding::GeocodeClient, routing::RoutingClient},
    models::{contact::Contact, listing::ListingWithContacts},
    services::{
        distance::{self, TransitTime, WalkingDistance},
        listings::{self, ListingPayload, ListingQuery, ListingUpdate, NewContact, SortKey, SortOrder},
        stats::{self, ListingStats},
    },
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub routing: Arc<RoutingClient>,
    pub geocoding: Arc<GeocodeClient>,
}

#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

type ApiError = (StatusCode, String);

#[derive(Deserialize)]
pub struct ListingQueryParams {
    pub housing_type: Option<String>,
    pub room_type: Option<String>,
    pub contacted: Option<bool>,
    pub replied: Option<bool>,
    pub has_parking: Option<bool>,
    pub location_search: Option<String>,
    pub min_cost: Option<i32>,
    pub max_cost: Option<i32>,
    pub max_walking_minutes: Option<i64>,
    pub max_transit_minutes: Option<i64>,
    pub destination_lat: Option<f64>,
    pub destination_lng: Option<f64>,
    pub sort_by: Option<SortKey>,
    pub sort_order: Option<SortOrder>,
}

#[derive(Deserialize)]
pub struct DestinationParams {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Deserialize)]
pub struct GeocodeParams {
    pub address: String,
}

#[derive(Serialize)]
pub struct ListingsResponse {
    pub listings: Vec<ListingWithContacts>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/listings", get(list_listings).post(create_listing))
        .route(
            "/api/listings/:id",
            get(get_listing).patch(update_listing).delete(delete_listing),
        )
        .route("/api/listings/:id/contacts", post(add_contact))
        .route("/api/contacts/:id", delete(remove_contact))
        .route("/api/listings/:id/walking-distance", get(walking_distance))
        .route("/api/listings/:id/transit-time", get(transit_time))
        .route("/api/geocode", get(geocode_address))
        .route("/api/stats", get(get_stats))
        .layer(middleware::from_fn(cors_layer))
        .with_state(state)
}

pub async fn start_http_server(
    state: AppState,
    mut shutdown_rx: tokio::sync::broadcast::Receiver<()>,
) {
    let bind_addr = state
        .config
        .http_bind_address
        .clone()
        .unwrap_or_else(|| "0.0.0.0:8080".to_string());

    let listener = TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|err| panic!("failed to bind http listener on {}: {}", bind_addr, err));
    let app = router(state);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.recv().await;
        })
        .await
        .expect("HTTP server crashed");
}

async fn cors_layer(req: axum::http::Request<axum::body::Body>, next: Next) -> Response {
    if req.method() == Method::OPTIONS {
        let mut response = Response::new(axum::body::Body::empty());
        apply_cors_headers(response.headers_mut());
        *response.status_mut() = StatusCode::NO_CONTENT;
        response
    } else {
        let mut response = next.run(req).await;
        apply_cors_headers(response.headers_mut());
        response
    }
}

fn apply_cors_headers(headers: &mut axum::http::HeaderMap) {
    headers.insert(
        axum::http::header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        axum::http::header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("content-type"),
    );
    headers.insert(
        axum::http::header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, PATCH, DELETE, OPTIONS"),
    );
}

fn internal_error(err: anyhow::Error) -> ApiError {
    error!("request failed: {:?}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal error".to_string(),
    )
}

fn not_found(what: &str) -> ApiError {
    (StatusCode::NOT_FOUND, format!("{what} not found"))
}

fn invalid(message: String) -> ApiError {
    (StatusCode::UNPROCESSABLE_ENTITY, message)
}

impl ListingQueryParams {
    fn into_query(self) -> ListingQuery {
        let destination = match (self.destination_lat, self.destination_lng) {
            (Some(latitude), Some(longitude)) => Some(Coordinates {
                latitude,
                longitude,
            }),
            _ => None,
        };

        ListingQuery {
            filters: crate::db::listing::ListingFilters {
                housing_type: self.housing_type,
                room_type: self.room_type,
                contacted: self.contacted,
                replied: self.replied,
                has_parking: self.has_parking,
                location_search: self.location_search,
            },
            min_cost: self.min_cost,
            max_cost: self.max_cost,
            max_walking_minutes: self.max_walking_minutes,
            max_transit_minutes: self.max_transit_minutes,
            destination,
            sort_by: self.sort_by,
            sort_order: self.sort_order.unwrap_or_default(),
        }
    }
}

async fn list_listings(
    State(state): State<AppState>,
    axum::extract::Query(params): axum::extract::Query<ListingQueryParams>,
) -> Result<Json<ApiResponse<ListingsResponse>>, ApiError> {
    let query = params.into_query();
    let results = listings::list(&state.config, &query).map_err(internal_error)?;
    Ok(Json(ApiResponse {
        data: ListingsResponse { listings: results },
    }))
}

async fn get_listing(
    State(state): State<AppState>,
    axum::extract::Path(id): axum::extract::Path<i32>,
) -> Result<Json<ApiResponse<ListingWithContacts>>, ApiError> {
    listings::get(&state.config, id)
        .map_err(internal_error)?
        .map(|listing| Json(ApiResponse { data: listing }))
        .ok_or_else(|| not_found("listing"))
}

async fn create_listing(
    State(state): State<AppState>,
    Json(payload): Json<ListingPayload>,
) -> Result<Json<ApiResponse<ListingWithContacts>>, ApiError> {
    listings::validate_payload(&payload).map_err(invalid)?;
    let created = listings::create(&state.config, payload).map_err(internal_error)?;
    Ok(Json(ApiResponse { data: created }))
}

async fn update_listing(
    State(state): State<AppState>,
    axum::extract::Path(id): axum::extract::Path<i32>,
    Json(payload): Json<ListingUpdate>,
) -> Result<Json<ApiResponse<ListingWithContacts>>, ApiError> {
    listings::validate_update(&payload).map_err(invalid)?;
    listings::update(&state.config, id, payload)
        .map_err(internal_error)?
        .map(|listing| Json(ApiResponse { data: listing }))
        .ok_or_else(|| not_found("listing"))
}

async fn delete_listing(
    State(state): State<AppState>,
    axum::extract::Path(id): axum::extract::Path<i32>,
) -> Result<StatusCode, ApiError> {
    match listings::delete(&state.config, id).map_err(internal_error)? {
        true => Ok(StatusCode::NO_CONTENT),
        false => Err(not_found("listing")),
    }
}

async fn add_contact(
    State(state): State<AppState>,
    axum::extract::Path(id): axum::extract::Path<i32>,
    Json(payload): Json<NewContact>,
) -> Result<Json<ApiResponse<Contact>>, ApiError> {
    listings::validate_contact(&payload.kind, &payload.value).map_err(invalid)?;
    listings::add_contact(&state.config, id, payload)
        .map_err(internal_error)?
        .map(|contact| Json(ApiResponse { data: contact }))
        .ok_or_else(|| not_found("listing"))
}

async fn remove_contact(
    State(state): State<AppState>,
    axum::extract::Path(id): axum::extract::Path<i32>,
) -> Result<StatusCode, ApiError> {
    match listings::remove_contact(&state.config, id).map_err(internal_error)? {
        true => Ok(StatusCode::NO_CONTENT),
        false => Err(not_found("contact")),
    }
}

async fn walking_distance(
    State(state): State<AppState>,
    axum::extract::Path(id): axum::extract::Path<i32>,
    axum::extract::Query(params): axum::extract::Query<DestinationParams>,
) -> Result<Json<ApiResponse<WalkingDistance>>, ApiError> {
    let destination = Coordinates {
        latitude: params.lat,
        longitude: params.lng,
    };
    distance::walking_distance(&state.config, id, destination)
        .map_err(internal_error)?
        .map(|estimate| Json(ApiResponse { data: estimate }))
        .ok_or_else(|| not_found("listing"))
}

async fn transit_time(
    State(state): State<AppState>,
    axum::extract::Path(id): axum::extract::Path<i32>,
    axum::extract::Query(params): axum::extract::Query<DestinationParams>,
) -> Result<Json<ApiResponse<TransitTime>>, ApiError> {
    let destination = Coordinates {
        latitude: params.lat,
        longitude: params.lng,
    };
    distance::transit_time(&state.config, &state.routing, id, destination)
        .await
        .map_err(internal_error)?
        .map(|estimate| Json(ApiResponse { data: estimate }))
        .ok_or_else(|| not_found("listing"))
}

async fn geocode_address(
    State(state): State<AppState>,
    axum::extract::Query(params): axum::extract::Query<GeocodeParams>,
) -> Result<Json<ApiResponse<crate::geo::geocoding::GeocodeResult>>, ApiError> {
    if params.address.trim().is_empty() {
        return Err(invalid("address must not be empty".to_string()));
    }
    let result = state.geocoding.geocode(&params.address).await;
    Ok(Json(ApiResponse { data: result }))
}

async fn get_stats(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ListingStats>>, ApiError> {
    let computed = stats::fetch(&state.config).map_err(internal_error)?;
    Ok(Json(ApiResponse { data: computed }))
}
