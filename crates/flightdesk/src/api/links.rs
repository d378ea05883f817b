//! Hypermedia links for flight responses.
//!
//! Each response shape gets a fixed set of relations. [`LinkBuilder`] owns
//! that table; handlers only pick the shape.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::flight::Flight;

/// Relation pointing at the resource itself.
pub const SELF_REL: &str = "self";
/// Relation pointing at the full flight listing.
pub const ALL_FLIGHTS_REL: &str = "all-flights";
/// Relation for deleting a flight.
pub const DELETE_REL: &str = "delete";
/// Relation for updating a flight.
pub const UPDATE_REL: &str = "update";
/// Relation pointing at the top-rated listing.
pub const TOP_FLIGHTS_REL: &str = "top-flights";
/// Relation for creating a flight.
pub const CREATE_FLIGHT_REL: &str = "create-flight";
/// Relation added to top-rated flights on the detail view.
pub const FEATURED_REL: &str = "featured";

/// A single hypermedia link.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Link {
    /// Target of the link.
    pub href: String,
    /// HTTP method to use when it isn't GET.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<&'static str>,
    /// Human-readable label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<&'static str>,
}

impl Link {
    fn get(href: String) -> Self {
        Self {
            href,
            method: None,
            title: None,
        }
    }

    fn with_method(mut self, method: &'static str) -> Self {
        self.method = Some(method);
        self
    }

    fn with_title(mut self, title: &'static str) -> Self {
        self.title = Some(title);
        self
    }
}

/// Ordered relation → link map, serialized as a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Links(Vec<(&'static str, Link)>);

impl Links {
    fn with(mut self, rel: &'static str, link: Link) -> Self {
        self.0.push((rel, link));
        self
    }

    /// Look up a link by relation name.
    #[must_use]
    pub fn get(&self, rel: &str) -> Option<&Link> {
        self.0.iter().find(|(r, _)| *r == rel).map(|(_, link)| link)
    }

    /// Relation names in insertion order.
    #[must_use]
    pub fn rels(&self) -> Vec<&'static str> {
        self.0.iter().map(|(rel, _)| *rel).collect()
    }
}

impl Serialize for Links {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (rel, link) in &self.0 {
            map.serialize_entry(rel, link)?;
        }
        map.end()
    }
}

/// Builds the link set for every response shape.
///
/// Hrefs are root-relative unless a base URL is configured.
#[derive(Debug, Clone, Default)]
pub struct LinkBuilder {
    base: String,
}

impl LinkBuilder {
    /// Create a builder. `base_url` is prepended to every href.
    #[must_use]
    pub fn new(base_url: Option<&str>) -> Self {
        Self {
            base: base_url.unwrap_or_default().trim_end_matches('/').to_string(),
        }
    }

    /// Prefix a root-relative path with the base URL.
    #[must_use]
    pub fn href(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    fn flight(&self, flight: &Flight) -> Link {
        Link::get(self.href(&format!("/flight/list/{}", id_of(flight))))
    }

    fn all_flights(&self) -> Link {
        Link::get(self.href("/flight/listAll"))
    }

    fn delete(&self, flight: &Flight) -> Link {
        Link::get(self.href(&format!("/flight/delete/{}", id_of(flight)))).with_method("DELETE")
    }

    fn update(&self) -> Link {
        Link::get(self.href("/flight/update")).with_method("PUT")
    }

    fn top_flights(&self) -> Link {
        Link::get(self.href("/flight/topFlights"))
    }

    fn create(&self) -> Link {
        Link::get(self.href("/flight/save")).with_method("POST")
    }

    /// Links on a freshly created flight.
    #[must_use]
    pub fn created(&self, flight: &Flight) -> Links {
        Links::default()
            .with(SELF_REL, self.flight(flight))
            .with(ALL_FLIGHTS_REL, self.all_flights())
            .with(DELETE_REL, self.delete(flight))
            .with(UPDATE_REL, self.update())
            .with(TOP_FLIGHTS_REL, self.top_flights())
    }

    /// Links on the single-flight view, including `featured` for top-rated flights.
    #[must_use]
    pub fn detail(&self, flight: &Flight) -> Links {
        let links = self
            .created(flight)
            .with(CREATE_FLIGHT_REL, self.create());
        if flight.is_top_rated() {
            links.with(
                FEATURED_REL,
                self.top_flights().with_title("Featured Flight"),
            )
        } else {
            links
        }
    }

    /// Links on an updated flight. Same set as a freshly created one.
    #[must_use]
    pub fn updated(&self, flight: &Flight) -> Links {
        self.created(flight)
    }

    /// Links on each item of the full listing.
    #[must_use]
    pub fn listed_item(&self, flight: &Flight) -> Links {
        Links::default()
            .with(SELF_REL, self.flight(flight))
            .with(DELETE_REL, self.delete(flight))
            .with(UPDATE_REL, self.update())
            .with(TOP_FLIGHTS_REL, self.top_flights())
    }

    /// Links on each item of a filtered listing (top-rated and the query views).
    #[must_use]
    pub fn filtered_item(&self, flight: &Flight) -> Links {
        Links::default()
            .with(SELF_REL, self.flight(flight))
            .with(DELETE_REL, self.delete(flight))
            .with(UPDATE_REL, self.update())
    }

    /// Links on the full listing.
    #[must_use]
    pub fn all_collection(&self) -> Links {
        Links::default()
            .with(SELF_REL, self.all_flights())
            .with(CREATE_FLIGHT_REL, self.create())
            .with(TOP_FLIGHTS_REL, self.top_flights())
    }

    /// Links on the top-rated listing.
    #[must_use]
    pub fn top_collection(&self) -> Links {
        Links::default()
            .with(SELF_REL, self.top_flights())
            .with(ALL_FLIGHTS_REL, self.all_flights())
            .with(CREATE_FLIGHT_REL, self.create())
    }

    /// Links on a query listing; `self_path` is the request path and query.
    #[must_use]
    pub fn query_collection(&self, self_path: &str) -> Links {
        Links::default()
            .with(SELF_REL, Link::get(self.href(self_path)))
            .with(ALL_FLIGHTS_REL, self.all_flights())
            .with(CREATE_FLIGHT_REL, self.create())
            .with(TOP_FLIGHTS_REL, self.top_flights())
    }
}

// Only stored flights are linked, and those always carry an id.
fn id_of(flight: &Flight) -> i64 {
    flight.id.unwrap_or_default()
}
