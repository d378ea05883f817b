//! Storage layer for flightdesk.
//!
//! [`FlightStore`] is the persistence contract the service layer depends on.
//! [`Storage`] fulfils it with `SQLite`.

pub mod schema;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::flight::Flight;

use self::schema::FLIGHT_COLUMNS;

/// Persistence operations over flight records.
///
/// Every operation is atomic on its own; nothing spans more than one call.
#[async_trait]
pub trait FlightStore: Send + Sync {
    /// Insert or replace a flight, returning it with `id` populated.
    async fn save(&self, flight: &Flight) -> Result<Flight>;

    /// Look up a flight by id.
    async fn find_by_id(&self, id: i64) -> Result<Option<Flight>>;

    /// All stored flights.
    async fn find_all(&self) -> Result<Vec<Flight>>;

    /// Remove a flight. Unknown ids are ignored.
    async fn delete_by_id(&self, id: i64) -> Result<()>;

    /// Flights whose rating is at least `threshold`.
    async fn find_by_rating_at_least(&self, threshold: i32) -> Result<Vec<Flight>>;

    /// Flights with exactly the given rating.
    async fn find_by_rating(&self, rating: i32) -> Result<Vec<Flight>>;

    /// Flights flying from `origin` to `destination`.
    async fn find_by_route(&self, origin: &str, destination: &str) -> Result<Vec<Flight>>;

    /// Flights whose completion flag equals `completed`.
    async fn find_by_completed(&self, completed: bool) -> Result<Vec<Flight>>;

    /// Number of stored flights.
    async fn count(&self) -> Result<i64>;
}

/// `SQLite`-backed flight store.
///
/// The connection is shared between requests behind an async mutex.
#[derive(Debug)]
pub struct Storage {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Mutex<Connection>,
}

impl Storage {
    /// Open or create a storage database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    /// Initializes the schema if this is a new database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        schema::initialize_schema(&conn)?;

        info!("Database opened successfully at {}", path.display());
        Ok(Self {
            path,
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory storage instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        schema::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn: Mutex::new(conn),
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn query_flights<P>(&self, filter: &str, params: P) -> Result<Vec<Flight>>
    where
        P: rusqlite::Params + Send,
    {
        let conn = self.conn.lock().await;
        let sql = format!("SELECT {FLIGHT_COLUMNS} FROM flights {filter} ORDER BY id");
        let mut stmt = conn.prepare(&sql)?;
        let flights = stmt
            .query_map(params, Self::row_to_flight)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(flights)
    }

    /// Convert a database row to a Flight struct.
    fn row_to_flight(row: &rusqlite::Row) -> rusqlite::Result<Flight> {
        Ok(Flight {
            id: Some(row.get(0)?),
            aircraft_name: row.get(1)?,
            flight_number: row.get(2)?,
            origin: row.get(3)?,
            destination: row.get(4)?,
            capacity: row.get(5)?,
            rating: row.get(6)?,
            flight_plan_id: row.get(7)?,
            completed: row.get(8)?,
        })
    }
}

#[async_trait]
impl FlightStore for Storage {
    async fn save(&self, flight: &Flight) -> Result<Flight> {
        let conn = self.conn.lock().await;
        conn.execute(
            r"
            INSERT INTO flights (id, aircraft_name, flight_number, origin, destination,
                                 capacity, rating, flight_plan_id, completed)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ON CONFLICT(id) DO UPDATE SET
                aircraft_name = excluded.aircraft_name,
                flight_number = excluded.flight_number,
                origin = excluded.origin,
                destination = excluded.destination,
                capacity = excluded.capacity,
                rating = excluded.rating,
                flight_plan_id = excluded.flight_plan_id,
                completed = excluded.completed
            ",
            params![
                flight.id,
                flight.aircraft_name,
                flight.flight_number,
                flight.origin,
                flight.destination,
                flight.capacity,
                flight.rating,
                flight.flight_plan_id,
                flight.completed,
            ],
        )?;

        let id = flight.id.unwrap_or_else(|| conn.last_insert_rowid());
        debug!("Saved flight with id {}", id);

        let mut saved = flight.clone();
        saved.id = Some(id);
        Ok(saved)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Flight>> {
        let conn = self.conn.lock().await;
        let result = conn
            .query_row(
                &format!("SELECT {FLIGHT_COLUMNS} FROM flights WHERE id = ?1"),
                [id],
                Self::row_to_flight,
            )
            .optional()?;
        Ok(result)
    }

    async fn find_all(&self) -> Result<Vec<Flight>> {
        self.query_flights("", []).await
    }

    async fn delete_by_id(&self, id: i64) -> Result<()> {
        let conn = self.conn.lock().await;
        let affected = conn.execute("DELETE FROM flights WHERE id = ?1", [id])?;
        debug!("Deleted {} flight(s) with id {}", affected, id);
        Ok(())
    }

    async fn find_by_rating_at_least(&self, threshold: i32) -> Result<Vec<Flight>> {
        self.query_flights("WHERE rating >= ?1", [threshold]).await
    }

    async fn find_by_rating(&self, rating: i32) -> Result<Vec<Flight>> {
        self.query_flights("WHERE rating = ?1", [rating]).await
    }

    async fn find_by_route(&self, origin: &str, destination: &str) -> Result<Vec<Flight>> {
        self.query_flights(
            "WHERE origin = ?1 AND destination = ?2",
            (origin, destination),
        )
        .await
    }

    async fn find_by_completed(&self, completed: bool) -> Result<Vec<Flight>> {
        self.query_flights("WHERE completed = ?1", [completed]).await
    }

    async fn count(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM flights", [], |row| row.get(0))?;
        Ok(count)
    }
}
