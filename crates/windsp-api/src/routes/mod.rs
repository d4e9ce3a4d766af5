//! Route table for the API server
//!
//! Routes are declared as (verb, path, operation) entries and turned into an
//! axum `Router` by `crate::create_router`. The `/rest` prefixed paths keep
//! clients of the older deployment working.
//!
//! - json: read and save the configuration document

pub mod json;

use axum::routing::{on, MethodFilter, MethodRouter};

use crate::AppState;

/// HTTP verbs the table uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Put,
}

impl Verb {
    fn filter(self) -> MethodFilter {
        match self {
            Verb::Get => MethodFilter::GET,
            Verb::Put => MethodFilter::PUT,
        }
    }
}

impl std::fmt::Display for Verb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verb::Get => write!(f, "GET"),
            Verb::Put => write!(f, "PUT"),
        }
    }
}

/// Operation a route dispatches to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Return the configuration document
    ReadDocument,
    /// Replace the configuration document
    WriteDocument,
    /// Liveness probe
    Health,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteEntry {
    pub verb: Verb,
    pub path: &'static str,
    pub operation: Operation,
}

const fn entry(verb: Verb, path: &'static str, operation: Operation) -> RouteEntry {
    RouteEntry {
        verb,
        path,
        operation,
    }
}

pub const ROUTES: &[RouteEntry] = &[
    entry(Verb::Get, "/json", Operation::ReadDocument),
    entry(Verb::Put, "/json", Operation::WriteDocument),
    entry(Verb::Get, "/rest/json", Operation::ReadDocument),
    entry(Verb::Put, "/rest/json", Operation::WriteDocument),
    entry(Verb::Get, "/health", Operation::Health),
];

impl RouteEntry {
    /// Handler bound to this entry's verb
    pub fn method_router(&self) -> MethodRouter<AppState> {
        let filter = self.verb.filter();
        match self.operation {
            Operation::ReadDocument => on(filter, json::api_json_get),
            Operation::WriteDocument => on(filter, json::api_json_put),
            Operation::Health => on(filter, health_check),
        }
    }
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_operations_on_both_prefixes() {
        for path in ["/json", "/rest/json"] {
            for (verb, operation) in [
                (Verb::Get, Operation::ReadDocument),
                (Verb::Put, Operation::WriteDocument),
            ] {
                assert!(ROUTES.contains(&entry(verb, path, operation)), "{} {}", verb, path);
            }
        }
    }

    #[test]
    fn test_table_has_no_duplicate_entries() {
        for (i, a) in ROUTES.iter().enumerate() {
            for b in &ROUTES[i + 1..] {
                assert!(!(a.verb == b.verb && a.path == b.path), "duplicate {} {}", a.verb, a.path);
            }
        }
    }
}
