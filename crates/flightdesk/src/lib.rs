//! `flightdesk` - A flight record service with a hypermedia HTTP API
//!
//! This library provides the flight domain model, SQLite-backed persistence,
//! the business rules around creating, updating and ranking flights, and an
//! HTTP layer that decorates every response with navigational links.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod flight;
pub mod logging;
pub mod service;
pub mod storage;

pub use config::Config;
pub use error::{Error, Result};
pub use flight::Flight;
pub use logging::init_logging;
pub use service::FlightService;
pub use storage::{FlightStore, Storage};
