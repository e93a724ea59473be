//! # Static route table.
//!
//! [`RouteTable`] maps route names to [`ClientRegistration`]s (`url` + `assignedRoute`).
//! It is loaded once and never mutated. Several names may share one assigned route;
//! lookups return the first match in table order and fall back to [`BLANK`].
//!
//! ## JSON form
//! ```json
//! {
//!   "app1": { "url": "https://app1.example/#/", "assignedRoute": "app1" },
//!   "app2": { "url": "https://app2.example/",   "assignedRoute": "app2" }
//! }
//! ```
//! Document order is preserved. A repeated name keeps its first position and takes the
//! last value.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

/// Address a frame shows when no route matches.
pub const BLANK: &str = "about:blank";

/// Rendering and routing information for a client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRegistration {
    /// Address the frame is pointed at.
    pub url: String,
    /// Route name that selects this client.
    pub assigned_route: String,
}

/// One named entry of the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    /// Key of the entry.
    pub name: String,
    /// Where and when to render.
    pub registration: ClientRegistration,
}

/// Ordered, immutable route table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    /// Creates an empty table (every lookup resolves to [`BLANK`]).
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends (or replaces, keeping position) an entry.
    pub fn with_route(
        mut self,
        name: impl Into<String>,
        url: impl Into<String>,
        assigned_route: impl Into<String>,
    ) -> Self {
        self.upsert(
            name.into(),
            ClientRegistration {
                url: url.into(),
                assigned_route: assigned_route.into(),
            },
        );
        self
    }

    /// Parses a table from its JSON form.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// Url of the first entry assigned to `route`, if any.
    pub fn resolve(&self, route: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.registration.assigned_route == route)
            .map(|e| e.registration.url.as_str())
    }

    /// Url of the first entry assigned to `route`, or [`BLANK`].
    ///
    /// # Example
    /// ```
    /// use hostvisor::{RouteTable, BLANK};
    ///
    /// let table = RouteTable::new()
    ///     .with_route("a", "https://a.example/", "apps/a")
    ///     .with_route("a-legacy", "https://old.example/", "apps/a");
    ///
    /// assert_eq!(table.address_for("apps/a"), "https://a.example/");
    /// assert_eq!(table.address_for("missing"), BLANK);
    /// ```
    pub fn address_for(&self, route: &str) -> &str {
        self.resolve(route).unwrap_or(BLANK)
    }

    /// Entries in table order.
    pub fn iter(&self) -> impl Iterator<Item = &RouteEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn upsert(&mut self, name: String, registration: ClientRegistration) {
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => entry.registration = registration,
            None => self.entries.push(RouteEntry { name, registration }),
        }
    }
}

impl FromIterator<(String, ClientRegistration)> for RouteTable {
    fn from_iter<I: IntoIterator<Item = (String, ClientRegistration)>>(iter: I) -> Self {
        let mut table = RouteTable::new();
        for (name, registration) in iter {
            table.upsert(name, registration);
        }
        table
    }
}

impl<'de> Deserialize<'de> for RouteTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = RouteTable;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of route name to {url, assignedRoute}")
            }

            fn visit_map<A>(self, mut map: A) -> Result<RouteTable, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut table = RouteTable::new();
                while let Some((name, registration)) =
                    map.next_entry::<String, ClientRegistration>()?
                {
                    table.upsert(name, registration);
                }
                Ok(table)
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}
