//! Route registry: CRUD and ranking queries on top of [`RbMap`].

use std::cmp::Ordering;

use log::{debug, info, warn};
use rbmap::{RbMap, Traversal};

use crate::error::{NavigatorError, Result};
use crate::route::Route;

/// Routes keyed by identifier.
///
/// Query results are cloned snapshots sorted by their own criteria, with the
/// route identifier as the final tie-breaker. They do not depend on the
/// enumeration order the registry was configured with.
pub struct Navigator {
    routes: RbMap<String, Route>,
    order: Traversal,
}

impl Navigator {
    pub fn new() -> Self {
        Self::with_order(Traversal::InOrder)
    }

    /// Registry that enumerates stored routes in `order` when scanning.
    pub fn with_order(order: Traversal) -> Self {
        Self {
            routes: RbMap::new(),
            order,
        }
    }

    /// Register `route`. Identifiers are unique: adding a route whose id is
    /// taken fails and leaves the stored route untouched.
    pub fn add_route(&mut self, route: Route) -> Result<()> {
        if self.contains(&route) || self.routes.contains_key(route.id()) {
            warn!("rejected duplicate route {}", route.id());
            return Err(NavigatorError::DuplicateRoute(route.id().to_string()));
        }
        info!("adding route {} ({} points)", route.id(), route.points().len());
        self.routes.insert(route.id().to_string(), route);
        Ok(())
    }

    pub fn remove_route(&mut self, id: &str) -> Result<Route> {
        match self.routes.remove(id) {
            Some(route) => {
                info!("removed route {}", id);
                Ok(route)
            }
            None => {
                warn!("cannot remove unknown route {}", id);
                Err(NavigatorError::UnknownRoute(id.to_string()))
            }
        }
    }

    /// Whether a route equal to `route` in every field is stored.
    pub fn contains(&self, route: &Route) -> bool {
        self.routes.contains_value(route)
    }

    pub fn size(&self) -> usize {
        self.routes.len()
    }

    pub fn get_route(&self, id: &str) -> Option<&Route> {
        self.routes.get(id)
    }

    /// Record that `id` was chosen. Returns its new popularity.
    pub fn choose_route(&mut self, id: &str) -> Result<u32> {
        let route = self
            .routes
            .get_mut(id)
            .ok_or_else(|| NavigatorError::UnknownRoute(id.to_string()))?;
        let popularity = route.bump_popularity();
        debug!("route {} chosen, popularity now {}", id, popularity);
        Ok(popularity)
    }

    /// Every stored route, in the configured enumeration order.
    pub fn routes(&self) -> Vec<Route> {
        self.scan().cloned().collect()
    }

    /// Routes passing through both `start` and `end`: favorites first, then
    /// fewer hops between the two points, then more popular.
    pub fn search_routes(&self, start: &str, end: &str) -> Vec<Route> {
        let mut found: Vec<Route> = self
            .scan()
            .filter(|r| r.contains_point(start) && r.contains_point(end))
            .cloned()
            .collect();
        found.sort_by(|a, b| {
            b.is_favorite()
                .cmp(&a.is_favorite())
                .then_with(|| a.point_span(start, end).cmp(&b.point_span(start, end)))
                .then_with(|| b.popularity().cmp(&a.popularity()))
                .then_with(|| by_id(a, b))
        });
        debug!("search {} -> {}: {} matches", start, end, found.len());
        found
    }

    /// Favorite routes that reach `destination` without starting there,
    /// longest first, then more popular.
    pub fn favorite_routes(&self, destination: &str) -> Vec<Route> {
        let mut found: Vec<Route> = self
            .scan()
            .filter(|r| {
                r.is_favorite() && r.contains_point(destination) && !r.starts_at(destination)
            })
            .cloned()
            .collect();
        found.sort_by(|a, b| {
            b.distance()
                .total_cmp(&a.distance())
                .then_with(|| b.popularity().cmp(&a.popularity()))
                .then_with(|| by_id(a, b))
        });
        debug!("favorites to {}: {} matches", destination, found.len());
        found
    }

    /// Up to `n` routes: most popular first, then shortest, then fewest
    /// points.
    pub fn top_routes(&self, n: usize) -> Vec<Route> {
        let mut ranked: Vec<&Route> = self.scan().collect();
        ranked.sort_by(|a, b| {
            b.popularity()
                .cmp(&a.popularity())
                .then_with(|| a.distance().total_cmp(&b.distance()))
                .then_with(|| a.points().len().cmp(&b.points().len()))
                .then_with(|| by_id(a, b))
        });
        ranked.into_iter().take(n).cloned().collect()
    }

    fn scan(&self) -> impl Iterator<Item = &Route> {
        self.routes.traverse(self.order).map(|(_, route)| route)
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

fn by_id(a: &Route, b: &Route) -> Ordering {
    a.id().cmp(b.id())
}
