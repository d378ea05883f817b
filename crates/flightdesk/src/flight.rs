//! The flight record managed by flightdesk.
//!
//! A [`Flight`] is transient until the store assigns it an `id`. Identity is
//! carried by the `id` alone, so equality ignores every other field.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Maximum length, in characters, of every text field.
pub const MAX_TEXT_LEN: usize = 80;

/// Lowest accepted rating.
pub const MIN_RATING: i32 = 1;

/// Highest accepted rating.
pub const MAX_RATING: i32 = 5;

/// Ratings at or above this value make a flight "top rated".
pub const TOP_RATING_THRESHOLD: i32 = 4;

/// One scheduled flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flight {
    /// Identifier assigned by the store on first save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Name of the aircraft operating the flight.
    pub aircraft_name: String,

    /// Published flight number.
    pub flight_number: String,

    /// Departure location.
    pub origin: String,

    /// Arrival location.
    pub destination: String,

    /// Seat capacity.
    pub capacity: i32,

    /// Rating between [`MIN_RATING`] and [`MAX_RATING`].
    pub rating: i32,

    /// Reference to the external flight plan.
    pub flight_plan_id: i64,

    /// Whether the flight was completed; `None` when unknown.
    #[serde(default)]
    pub completed: Option<bool>,
}

impl Flight {
    /// Check the field-level constraints of a flight record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming the first violated constraint.
    pub fn validate(&self) -> Result<()> {
        let text_fields = [
            ("aircraftName", &self.aircraft_name),
            ("flightNumber", &self.flight_number),
            ("origin", &self.origin),
            ("destination", &self.destination),
        ];

        for (name, value) in text_fields {
            if value.trim().is_empty() {
                return Err(Error::validation(format!("{name} must not be empty")));
            }
            if value.chars().count() > MAX_TEXT_LEN {
                return Err(Error::validation(format!(
                    "{name} must be at most {MAX_TEXT_LEN} characters"
                )));
            }
        }

        if self.rating < MIN_RATING {
            return Err(Error::validation(format!(
                "Rating must be at least {MIN_RATING}"
            )));
        }
        if self.rating > MAX_RATING {
            return Err(Error::validation(format!(
                "Rating must be at most {MAX_RATING}"
            )));
        }

        Ok(())
    }

    /// Whether this flight qualifies for the top-rated list.
    #[must_use]
    pub fn is_top_rated(&self) -> bool {
        self.rating >= TOP_RATING_THRESHOLD
    }

    /// Overwrite every field except `id` with the values from `other`.
    ///
    /// This is a full replace: an unspecified `completed` in `other` clears it here.
    pub fn merge_from(&mut self, other: &Flight) {
        self.aircraft_name.clone_from(&other.aircraft_name);
        self.flight_number.clone_from(&other.flight_number);
        self.origin.clone_from(&other.origin);
        self.destination.clone_from(&other.destination);
        self.rating = other.rating;
        self.flight_plan_id = other.flight_plan_id;
        self.capacity = other.capacity;
        self.completed = other.completed;
    }
}

// Records are the same entity iff both carry the same id. Unsaved records
// never compare equal, so this is deliberately not `Eq`.
impl PartialEq for Flight {
    fn eq(&self, other: &Self) -> bool {
        match (self.id, other.id) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

impl std::fmt::Display for Flight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.id {
            Some(id) => write!(f, "#{id} ")?,
            None => write!(f, "(unsaved) ")?,
        }
        write!(
            f,
            "{} {} -> {} [{}] rating {}",
            self.flight_number, self.origin, self.destination, self.aircraft_name, self.rating
        )
    }
}
