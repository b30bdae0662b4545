use std::fmt;

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::Stats;

/// A canned route suggestion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// The route's display name.
    pub name: String,
    /// The advertised travel time in minutes.
    pub minutes: u32,
}

impl Route {
    pub fn new(name: impl Into<String>, minutes: u32) -> Self {
        Self {
            name: name.into(),
            minutes,
        }
    }

    /// The stock set of suggestions.
    pub fn defaults() -> Vec<Route> {
        vec![
            Route::new("Route A", 12),
            Route::new("Route B", 9),
            Route::new("Route C", 6),
        ]
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} min", self.name, self.minutes)
    }
}

/// Hands out a random route from a fixed list.
///
/// No routing is performed; the suggestion is presentational.
#[derive(Clone, Debug)]
pub struct RouteAdvisor {
    /// The candidates, never empty.
    routes: Vec<Route>,
}

impl RouteAdvisor {
    /// Creates an advisor over the given routes. Returns `None` if there are none.
    pub fn new(routes: Vec<Route>) -> Option<Self> {
        if routes.is_empty() {
            None
        } else {
            Some(Self { routes })
        }
    }

    /// The candidate routes, in order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Picks a route uniformly at random and counts the suggestion.
    pub fn suggest<R: Rng + ?Sized>(&self, rng: &mut R, stats: &mut Stats) -> &Route {
        let route = &self.routes[rng.gen_range(0..self.routes.len())];
        stats.record_route_optimization();
        debug!("suggested {}", route);
        route
    }
}

impl Default for RouteAdvisor {
    fn default() -> Self {
        Self {
            routes: Route::defaults(),
        }
    }
}
