//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store the compiled allowlist
//! - Look up the route for an incoming request
//! - Return the matched route or an explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(1) path lookup via HashMap
//! - A query string, even an empty one, never matches

use std::collections::HashMap;

use axum::http::Uri;

use crate::routing::table::Route;

#[derive(Debug, Clone)]
pub struct RouteTable {
    by_path: HashMap<&'static str, Route>,
}

impl RouteTable {
    /// Build the table from every allowlisted route.
    pub fn new() -> Self {
        let by_path = Route::ALL
            .into_iter()
            .map(|route| (route.public_path(), route))
            .collect();
        Self { by_path }
    }

    /// Find the route for a request target, if its path is allowlisted.
    pub fn match_uri(&self, uri: &Uri) -> Option<Route> {
        if uri.query().is_some() {
            return None;
        }
        self.by_path.get(uri.path()).copied()
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new()
    }
}
