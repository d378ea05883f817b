//! Business rules layered over the flight store.
//!
//! Most operations pass straight through to [`FlightStore`]. Two carry policy:
//! [`FlightService::update`] merges onto the stored record, and
//! [`FlightService::top_rated`] treats an empty result as not-found.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::flight::{Flight, TOP_RATING_THRESHOLD};
use crate::storage::FlightStore;

/// Confirmation returned by [`FlightService::delete`].
pub const DELETE_CONFIRMATION: &str = "Flight removed";

/// Flight business logic.
#[derive(Clone)]
pub struct FlightService {
    store: Arc<dyn FlightStore>,
}

impl std::fmt::Debug for FlightService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlightService").finish_non_exhaustive()
    }
}

impl FlightService {
    /// Create a service over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn FlightStore>) -> Self {
        Self { store }
    }

    /// Persist a new flight and return it with its assigned id.
    ///
    /// # Errors
    ///
    /// Propagates store failures unchanged.
    pub async fn create(&self, flight: &Flight) -> Result<Flight> {
        let saved = self.store.save(flight).await?;
        info!(id = ?saved.id, flight_number = %saved.flight_number, "flight created");
        Ok(saved)
    }

    /// Delete a flight by id.
    ///
    /// Unknown ids are not an error; the confirmation is returned either way.
    ///
    /// # Errors
    ///
    /// Propagates store failures unchanged.
    pub async fn delete(&self, id: i64) -> Result<&'static str> {
        self.store.delete_by_id(id).await?;
        info!(id, "flight removed");
        Ok(DELETE_CONFIRMATION)
    }

    /// All stored flights.
    ///
    /// # Errors
    ///
    /// Propagates store failures unchanged.
    pub async fn list(&self) -> Result<Vec<Flight>> {
        self.store.find_all().await
    }

    /// Look up a flight. Absence is a normal outcome here.
    ///
    /// # Errors
    ///
    /// Propagates store failures unchanged.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Flight>> {
        let flight = self.store.find_by_id(id).await?;
        if flight.is_none() {
            debug!(id, "flight not found");
        }
        Ok(flight)
    }

    /// Replace every field of the stored flight, except its id, with `incoming`.
    ///
    /// The lookup and the save are separate store calls; concurrent updates
    /// of the same id race and the last save wins.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when `incoming` has no id or no flight has it.
    /// Nothing is written in that case.
    pub async fn update(&self, incoming: &Flight) -> Result<Flight> {
        let existing = match incoming.id {
            Some(id) => self.store.find_by_id(id).await?,
            None => None,
        };

        let Some(mut existing) = existing else {
            let shown = incoming
                .id
                .map_or_else(|| "null".to_string(), |id| id.to_string());
            debug!(id = %shown, "update target not found");
            return Err(Error::not_found(format!(
                "Flight not found with ID: {shown}"
            )));
        };

        existing.merge_from(incoming);
        let saved = self.store.save(&existing).await?;
        info!(id = ?saved.id, "flight updated");
        Ok(saved)
    }

    /// Flights rated [`TOP_RATING_THRESHOLD`] or higher.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when no flight qualifies, rather than an
    /// empty list.
    pub async fn top_rated(&self) -> Result<Vec<Flight>> {
        let flights = self
            .store
            .find_by_rating_at_least(TOP_RATING_THRESHOLD)
            .await?;
        if flights.is_empty() {
            debug!("no top-rated flights");
            return Err(Error::not_found(format!(
                "No flights found with rating >= {TOP_RATING_THRESHOLD}"
            )));
        }
        Ok(flights)
    }

    /// Flights with exactly the given rating. May be empty.
    ///
    /// # Errors
    ///
    /// Propagates store failures unchanged.
    pub async fn by_rating(&self, rating: i32) -> Result<Vec<Flight>> {
        self.store.find_by_rating(rating).await
    }

    /// Flights between two locations. May be empty.
    ///
    /// # Errors
    ///
    /// Propagates store failures unchanged.
    pub async fn by_route(&self, origin: &str, destination: &str) -> Result<Vec<Flight>> {
        self.store.find_by_route(origin, destination).await
    }

    /// Flights with the given completion flag. May be empty.
    ///
    /// # Errors
    ///
    /// Propagates store failures unchanged.
    pub async fn by_completed(&self, completed: bool) -> Result<Vec<Flight>> {
        self.store.find_by_completed(completed).await
    }

    /// Number of stored flights.
    ///
    /// # Errors
    ///
    /// Propagates store failures unchanged.
    pub async fn count(&self) -> Result<i64> {
        self.store.count().await
    }
}
