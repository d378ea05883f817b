//! HTTP API for flightdesk.
//!
//! Maps the `/flight` endpoints onto [`FlightService`] and wraps results in
//! link-bearing envelopes:
//!
//! | Method | Path | Success |
//! |---|---|---|
//! | POST | `/flight/save` | 201 + flight |
//! | GET | `/flight/listAll` | 200 + collection |
//! | GET | `/flight/list/{id}` | 200 + flight |
//! | GET | `/flight/topFlights` | 202 + collection |
//! | PUT | `/flight/update` | 200 + flight |
//! | DELETE | `/flight/delete/{id}` | 200 + text |
//! | GET | `/flight/rating/{rating}` | 200 + collection |
//! | GET | `/flight/route?origin=&destination=` | 200 + collection |
//! | GET | `/flight/completed/{completed}` | 200 + collection |

pub mod links;
pub mod problem;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        OriginalUri, Path, Query, State,
    },
    http::{uri::PathAndQuery, HeaderValue, StatusCode, Uri},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::flight::{Flight, MAX_RATING};
use crate::service::FlightService;

use self::links::{LinkBuilder, Links};

/// A flight with its links, serialized as `{ ...fields, "_links": {...} }`.
#[derive(Debug, Serialize)]
pub struct FlightModel {
    /// The flight record.
    #[serde(flatten)]
    pub flight: Flight,
    /// Hypermedia links.
    #[serde(rename = "_links")]
    pub links: Links,
}

/// Embedded items of a [`FlightCollection`].
#[derive(Debug, Serialize)]
pub struct Embedded {
    /// The flights, each with its own links.
    pub items: Vec<FlightModel>,
}

/// A list of flights, serialized as `{ "_embedded": { "items": [...] }, "_links": {...} }`.
#[derive(Debug, Serialize)]
pub struct FlightCollection {
    /// The embedded flights.
    #[serde(rename = "_embedded")]
    pub embedded: Embedded,
    /// Links for the collection as a whole.
    #[serde(rename = "_links")]
    pub links: Links,
}

impl FlightCollection {
    fn new(flights: Vec<Flight>, item_links: impl Fn(&Flight) -> Links, links: Links) -> Self {
        let items = flights
            .into_iter()
            .map(|flight| FlightModel {
                links: item_links(&flight),
                flight,
            })
            .collect();
        Self {
            embedded: Embedded { items },
            links,
        }
    }
}

/// Shared state for all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    service: FlightService,
    links: Arc<LinkBuilder>,
}

impl AppState {
    /// Create handler state from a service and a link builder.
    #[must_use]
    pub fn new(service: FlightService, links: LinkBuilder) -> Self {
        Self {
            service,
            links: Arc::new(links),
        }
    }
}

/// Build the application router.
pub fn router(state: AppState, cors: CorsLayer) -> Router {
    let flights = Router::new()
        .route("/save", post(save_flight))
        .route("/listAll", get(list_all_flights))
        .route("/list/{id}", get(get_flight))
        .route("/topFlights", get(top_flights))
        .route("/update", put(update_flight))
        .route("/delete/{id}", delete(delete_flight))
        .route("/rating/{rating}", get(flights_by_rating))
        .route("/route", get(flights_by_route))
        .route("/completed/{completed}", get(flights_by_completed));

    Router::new()
        .route("/health", get(health))
        .nest("/flight", flights)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// CORS policy: any origin when `origins` is empty, otherwise only those listed.
#[must_use]
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = origins.iter().filter_map(|s| s.parse().ok()).collect();
        cors.allow_origin(AllowOrigin::list(origins))
    }
}

/// Serve the API until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the listener cannot be bound or the server fails.
pub async fn serve(config: &Config, service: FlightService) -> Result<()> {
    let state = AppState::new(
        service,
        LinkBuilder::new(config.server.base_url.as_deref()),
    );
    let app = router(state, cors_layer(&config.server.cors_origins));

    let listener = TcpListener::bind((config.server.host.as_str(), config.server.port)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    info!(addr = %addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}

#[derive(Debug, Serialize)]
struct HealthStatus {
    status: &'static str,
}

async fn health() -> Json<HealthStatus> {
    Json(HealthStatus { status: "ok" })
}

async fn save_flight(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Flight>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(mut flight) = payload.map_err(|rejection| Error::validation(rejection.body_text()))?;

    if flight.rating > MAX_RATING {
        return Err(Error::validation(format!("Rating must be <= {MAX_RATING}")));
    }
    flight.validate()?;
    flight.id = None;

    let saved = state.service.create(&flight).await?;
    let links = state.links.created(&saved);
    Ok((
        StatusCode::CREATED,
        Json(FlightModel {
            flight: saved,
            links,
        }),
    ))
}

async fn list_all_flights(State(state): State<AppState>) -> Result<Json<FlightCollection>> {
    let flights = state.service.list().await?;
    Ok(Json(FlightCollection::new(
        flights,
        |flight| state.links.listed_item(flight),
        state.links.all_collection(),
    )))
}

async fn get_flight(
    State(state): State<AppState>,
    id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<FlightModel>> {
    let Path(id) = id.map_err(|rejection| Error::validation(rejection.body_text()))?;

    let flight = state
        .service
        .get_by_id(id)
        .await?
        .ok_or_else(|| Error::not_found(format!("Flight ID not found: {id}")))?;

    let links = state.links.detail(&flight);
    Ok(Json(FlightModel { flight, links }))
}

async fn top_flights(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let flights = state.service.top_rated().await?;
    let collection = FlightCollection::new(
        flights,
        |flight| state.links.filtered_item(flight),
        state.links.top_collection(),
    );
    Ok((StatusCode::ACCEPTED, Json(collection)))
}

async fn update_flight(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Flight>, JsonRejection>,
) -> Result<Json<FlightModel>> {
    let Json(flight) = payload.map_err(|rejection| Error::validation(rejection.body_text()))?;
    flight.validate()?;

    let updated = state.service.update(&flight).await?;
    let links = state.links.updated(&updated);
    Ok(Json(FlightModel {
        flight: updated,
        links,
    }))
}

async fn delete_flight(
    State(state): State<AppState>,
    id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<&'static str> {
    let Path(id) = id.map_err(|rejection| Error::validation(rejection.body_text()))?;
    state.service.delete(id).await
}

async fn flights_by_rating(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    rating: std::result::Result<Path<i32>, PathRejection>,
) -> Result<Json<FlightCollection>> {
    let Path(rating) = rating.map_err(|rejection| Error::validation(rejection.body_text()))?;
    let flights = state.service.by_rating(rating).await?;
    Ok(Json(query_collection(&state, &uri, flights)))
}

/// Query parameters for the route lookup.
#[derive(Debug, Deserialize)]
pub struct RouteQuery {
    /// Departure location.
    pub origin: String,
    /// Arrival location.
    pub destination: String,
}

async fn flights_by_route(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    query: std::result::Result<Query<RouteQuery>, QueryRejection>,
) -> Result<Json<FlightCollection>> {
    let Query(route) = query.map_err(|rejection| Error::validation(rejection.body_text()))?;
    let flights = state
        .service
        .by_route(&route.origin, &route.destination)
        .await?;
    Ok(Json(query_collection(&state, &uri, flights)))
}

async fn flights_by_completed(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    completed: std::result::Result<Path<bool>, PathRejection>,
) -> Result<Json<FlightCollection>> {
    let Path(completed) =
        completed.map_err(|rejection| Error::validation(rejection.body_text()))?;
    let flights = state.service.by_completed(completed).await?;
    Ok(Json(query_collection(&state, &uri, flights)))
}

fn query_collection(state: &AppState, uri: &Uri, flights: Vec<Flight>) -> FlightCollection {
    let self_path = uri.path_and_query().map_or(uri.path(), PathAndQuery::as_str);
    FlightCollection::new(
        flights,
        |flight| state.links.filtered_item(flight),
        state.links.query_collection(self_path),
    )
}
