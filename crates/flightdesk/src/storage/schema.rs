//! `SQLite` schema definitions for flightdesk.
//!
//! The CHECK constraints repeat the field rules of [`crate::flight::Flight::validate`]
//! so that writes bypassing the API are still rejected by the store.

use rusqlite::Connection;

use crate::error::Result;

/// SQL statement to create the flights table.
pub const CREATE_FLIGHTS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS flights (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    aircraft_name TEXT NOT NULL CHECK (length(aircraft_name) BETWEEN 1 AND 80),
    flight_number TEXT NOT NULL CHECK (length(flight_number) BETWEEN 1 AND 80),
    origin TEXT NOT NULL CHECK (length(origin) BETWEEN 1 AND 80),
    destination TEXT NOT NULL CHECK (length(destination) BETWEEN 1 AND 80),
    capacity INTEGER NOT NULL,
    rating INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),
    flight_plan_id INTEGER NOT NULL,
    completed INTEGER CHECK (completed IN (0, 1))
)
";

/// SQL statement to create an index on rating for the top-rated query.
pub const CREATE_RATING_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_flights_rating ON flights(rating)
";

/// SQL statement to create an index on origin and destination for route lookups.
pub const CREATE_ROUTE_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_flights_route ON flights(origin, destination)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_FLIGHTS_TABLE,
    CREATE_RATING_INDEX,
    CREATE_ROUTE_INDEX,
];

/// Column list shared by every flight query, in [`super::Storage`] row order.
pub const FLIGHT_COLUMNS: &str = "id, aircraft_name, flight_number, origin, destination, \
     capacity, rating, flight_plan_id, completed";

/// Create the tables and indexes that don't exist yet.
///
/// # Errors
///
/// Returns an error if any statement fails.
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    for statement in SCHEMA_STATEMENTS {
        conn.execute(statement, [])?;
    }
    Ok(())
}
