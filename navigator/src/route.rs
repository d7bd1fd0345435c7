//! The route entity stored in the registry.

use std::fmt;

use smallvec::SmallVec;

use crate::error::{NavigatorError, Result};

/// Ordered location names along a route.
pub type Points = SmallVec<[String; 4]>;

/// A named route through an ordered list of locations.
///
/// Equality is structural over every field, so two separately built routes
/// with the same contents compare equal.
#[derive(Clone, Debug, PartialEq)]
pub struct Route {
    id: String,
    points: Points,
    distance: f64,
    popularity: u32,
    favorite: bool,
}

impl Route {
    /// Build a route. The identifier must be non-blank and the distance
    /// finite and non-negative.
    pub fn new<I, P>(
        id: impl Into<String>,
        points: I,
        distance: f64,
        popularity: u32,
        favorite: bool,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(NavigatorError::invalid("route id", id));
        }
        if !distance.is_finite() || distance < 0.0 {
            return Err(NavigatorError::invalid("distance", distance.to_string()));
        }
        Ok(Self {
            id,
            points: points.into_iter().map(Into::into).collect(),
            distance,
            popularity,
            favorite,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn points(&self) -> &[String] {
        &self.points
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn popularity(&self) -> u32 {
        self.popularity
    }

    pub fn is_favorite(&self) -> bool {
        self.favorite
    }

    pub fn contains_point(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn starts_at(&self, name: &str) -> bool {
        self.points.first().is_some_and(|p| p == name)
    }

    /// Hops between the first occurrences of `start` and `end`, in either
    /// direction. Zero when either point is missing.
    pub fn point_span(&self, start: &str, end: &str) -> usize {
        match (self.position(start), self.position(end)) {
            (Some(a), Some(b)) => a.abs_diff(b),
            _ => 0,
        }
    }

    /// Saturating increment; returns the new popularity.
    pub(crate) fn bump_popularity(&mut self) -> u32 {
        self.popularity = self.popularity.saturating_add(1);
        self.popularity
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.points.iter().position(|p| p == name)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Route {{id='{}', distance={}, popularity={}, favorite={}, points=[{}]}}",
            self.id,
            self.distance,
            self.popularity,
            self.favorite,
            self.points.join(", ")
        )
    }
}
