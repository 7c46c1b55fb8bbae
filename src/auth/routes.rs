//! Route classification
//!
//! An ordered table of path patterns, each with the roles allowed through.
//! The first matching rule wins; paths no rule matches are unrestricted.

use crate::core::models::UserRole;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PatternError {
    #[error("route pattern must start with '/': {0}")]
    NotAbsolute(String),
    #[error("'**' must be the last segment: {0}")]
    RestNotLast(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    /// `*`, exactly one segment
    Any,
    /// trailing `**`, zero or more segments
    Rest,
}

impl Segment {
    fn unifies(&self, other: &Segment) -> bool {
        match (self, other) {
            (Segment::Literal(a), Segment::Literal(b)) => a == b,
            _ => true,
        }
    }
}

/// Path pattern such as `/dashboard/**` or `/artist/*/edit`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    raw: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    pub fn new(raw: &str) -> Result<Self, PatternError> {
        if !raw.starts_with('/') {
            return Err(PatternError::NotAbsolute(raw.to_string()));
        }

        let segments: Vec<Segment> = split_path(raw)
            .map(|part| match part {
                "**" => Segment::Rest,
                "*" => Segment::Any,
                literal => Segment::Literal(literal.to_string()),
            })
            .collect();

        if let Some(index) = segments.iter().position(|s| *s == Segment::Rest) {
            if index != segments.len() - 1 {
                return Err(PatternError::RestNotLast(raw.to_string()));
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Match a request path; empty segments and trailing slashes are ignored
    pub fn matches(&self, path: &str) -> bool {
        let mut parts = split_path(path);
        for segment in &self.segments {
            match segment {
                Segment::Rest => return true,
                Segment::Any => {
                    if parts.next().is_none() {
                        return false;
                    }
                }
                Segment::Literal(literal) => match parts.next() {
                    Some(part) if part == literal => {}
                    _ => return false,
                },
            }
        }
        parts.next().is_none()
    }

    /// Whether some path matches both patterns
    pub fn overlaps(&self, other: &RoutePattern) -> bool {
        fn overlap(a: &[Segment], b: &[Segment]) -> bool {
            match (a.first(), b.first()) {
                (None, None) => true,
                (Some(Segment::Rest), _) | (_, Some(Segment::Rest)) => true,
                (None, Some(_)) | (Some(_), None) => false,
                (Some(x), Some(y)) => x.unifies(y) && overlap(&a[1..], &b[1..]),
            }
        }
        overlap(&self.segments, &other.segments)
    }
}

impl FromStr for RoutePattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|part| !part.is_empty())
}

/// A pattern and the roles allowed through it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedRoute {
    pub pattern: RoutePattern,
    pub allowed: Vec<UserRole>,
}

impl ProtectedRoute {
    pub fn new(pattern: &str, allowed: &[UserRole]) -> Result<Self, PatternError> {
        Ok(Self {
            pattern: RoutePattern::new(pattern)?,
            allowed: allowed.to_vec(),
        })
    }

    pub fn allows(&self, role: UserRole) -> bool {
        self.allowed.contains(&role)
    }
}

/// Classification of a request path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess<'a> {
    Unrestricted,
    Restricted(&'a ProtectedRoute),
}

/// Ordered protected-route table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    routes: Vec<ProtectedRoute>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::storefront()
    }
}

impl RouteTable {
    pub fn new(routes: Vec<ProtectedRoute>) -> Self {
        Self { routes }
    }

    /// The storefront's protected areas
    pub fn storefront() -> Self {
        use UserRole::*;

        let table = [
            ("/dashboard/**", &[Admin, SuperAdmin][..]),
            ("/super-admin/**", &[SuperAdmin][..]),
            ("/artist/**", &[Artist][..]),
            ("/account/**", &[Customer, Artist, Admin, SuperAdmin][..]),
        ];

        let routes = table
            .iter()
            .filter_map(|(pattern, allowed)| ProtectedRoute::new(pattern, allowed).ok())
            .collect();
        Self { routes }
    }

    pub fn routes(&self) -> &[ProtectedRoute] {
        &self.routes
    }

    /// First matching rule, or unrestricted
    pub fn classify(&self, path: &str) -> RouteAccess<'_> {
        self.routes
            .iter()
            .find(|route| route.pattern.matches(path))
            .map_or(RouteAccess::Unrestricted, RouteAccess::Restricted)
    }

    /// Pairs `(winner, shadowed)` of rules whose patterns overlap
    pub fn overlaps(&self) -> Vec<(&ProtectedRoute, &ProtectedRoute)> {
        let mut pairs = Vec::new();
        for (i, earlier) in self.routes.iter().enumerate() {
            for later in &self.routes[i + 1..] {
                if earlier.pattern.overlaps(&later.pattern) {
                    pairs.push((earlier, later));
                }
            }
        }
        pairs
    }

    /// Log a warning for every overlapping pair
    pub fn warn_overlaps(&self) {
        for (winner, shadowed) in self.overlaps() {
            warn!(
                "Route pattern {} overlaps {}; {} takes precedence",
                winner.pattern, shadowed.pattern, winner.pattern
            );
        }
    }
}
