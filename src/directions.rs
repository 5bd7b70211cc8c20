// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Conversion of routes into turn-by-turn directions.

use std::fmt;
use std::str::FromStr;

use crate::Graph;

/// Turn to take at the beginning of a [NavigationStep].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Start,
    Straight,
    SlightLeft,
    SlightRight,
    Left,
    Right,
    SharpLeft,
    SharpRight,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::Start,
        Direction::Straight,
        Direction::SlightLeft,
        Direction::SlightRight,
        Direction::Left,
        Direction::Right,
        Direction::SharpLeft,
        Direction::SharpRight,
    ];

    /// Returns the human-readable instruction for this direction.
    pub const fn text(self) -> &'static str {
        match self {
            Direction::Start => "Start",
            Direction::Straight => "Go straight",
            Direction::SlightLeft => "Slight left",
            Direction::SlightRight => "Slight right",
            Direction::Left => "Turn left",
            Direction::Right => "Turn right",
            Direction::SharpLeft => "Sharp left",
            Direction::SharpRight => "Sharp right",
        }
    }

    /// Inverse of [Direction::text].
    pub fn from_text(text: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.text() == text)
    }

    /// Classifies a change of bearing (new minus previous, in degrees) as a turn.
    ///
    /// The delta is first normalized into (-180, 180]; negative values are turns to the left.
    pub fn from_bearing_delta(delta: f64) -> Self {
        let delta = normalize_delta(delta);
        let left = delta < 0.0;

        match delta.abs() {
            d if d <= 15.0 => Direction::Straight,
            d if d <= 30.0 => {
                if left {
                    Direction::SlightLeft
                } else {
                    Direction::SlightRight
                }
            }
            d if d <= 100.0 => {
                if left {
                    Direction::Left
                } else {
                    Direction::Right
                }
            }
            _ => {
                if left {
                    Direction::SharpLeft
                } else {
                    Direction::SharpRight
                }
            }
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

fn normalize_delta(delta: f64) -> f64 {
    let delta = delta % 360.0;
    if delta > 180.0 {
        delta - 360.0
    } else if delta <= -180.0 {
        delta + 360.0
    } else {
        delta
    }
}

/// Single instruction of turn-by-turn directions: take a turn onto a way
/// and follow it for some distance (in miles).
///
/// Steps are rendered (with [std::fmt::Display]) and parsed (with [std::str::FromStr]) as
/// `<direction> on <way> and continue for <distance> miles.`, with the distance
/// rounded to 3 decimal places.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationStep {
    pub direction: Direction,
    pub way: String,
    pub distance: f64,
}

impl fmt::Display for NavigationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} on {} and continue for {:.3} miles.",
            self.direction, self.way, self.distance
        )
    }
}

/// Error returned when parsing a malformed [NavigationStep] line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseDirectionError {
    #[error("line does not end with \" miles.\"")]
    MissingSuffix,

    #[error("line does not contain \" and continue for \"")]
    MissingDistance,

    #[error("line does not contain \" on \"")]
    MissingWay,

    #[error("unknown direction: {0:?}")]
    UnknownDirection(String),

    #[error("invalid distance: {0:?}")]
    InvalidDistance(String),
}

impl FromStr for NavigationStep {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s
            .strip_suffix(" miles.")
            .ok_or(ParseDirectionError::MissingSuffix)?;

        let (head, distance) = rest
            .rsplit_once(" and continue for ")
            .ok_or(ParseDirectionError::MissingDistance)?;

        // Direction texts never contain " on ", so the first occurrence ends the direction
        let (direction, way) = head
            .split_once(" on ")
            .ok_or(ParseDirectionError::MissingWay)?;

        let direction = Direction::from_text(direction)
            .ok_or_else(|| ParseDirectionError::UnknownDirection(direction.to_string()))?;

        let invalid_distance = || ParseDirectionError::InvalidDistance(distance.to_string());
        if distance.is_empty() || !distance.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
            return Err(invalid_distance());
        }
        let distance: f64 = distance.parse().map_err(|_| invalid_distance())?;

        Ok(Self {
            direction,
            way: way.to_string(),
            distance,
        })
    }
}

/// Error conditions which may occur in [route_directions].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DirectionsError {
    /// Directions require a route with at least 2 vertices.
    #[error("route has {0} vertices, at least 2 are required")]
    PathTooShort(usize),

    /// Two consecutive vertices of the route are not connected by an edge.
    #[error("no edge between {0} and {1}")]
    NotConnected(i64, i64),
}

/// Converts a route (as returned by [find_route](crate::find_route)) into turn-by-turn directions.
///
/// Consecutive edges labeled with the same way are merged into a single [NavigationStep].
/// Whenever the way changes, the change of bearing between the two edges around the
/// junction determines the [Direction]. The first step is always [Direction::Start].
///
/// Distances of all steps add up to the length of the route.
pub fn route_directions(g: &Graph, route: &[i64]) -> Result<Vec<NavigationStep>, DirectionsError> {
    if route.len() < 2 {
        return Err(DirectionsError::PathTooShort(route.len()));
    }

    let mut steps: Vec<NavigationStep> = Vec::default();
    let mut previous_bearing = 0.0;

    for pair in route.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        let way = g
            .street_between(from, to)
            .ok_or(DirectionsError::NotConnected(from, to))?;
        let (Some(distance), Some(bearing)) = (g.distance(from, to), g.bearing(from, to)) else {
            return Err(DirectionsError::NotConnected(from, to));
        };

        match steps.last_mut() {
            Some(step) if step.way == way => step.distance += distance,

            Some(_) => steps.push(NavigationStep {
                direction: Direction::from_bearing_delta(bearing - previous_bearing),
                way: way.to_string(),
                distance,
            }),

            None => steps.push(NavigationStep {
                direction: Direction::Start,
                way: way.to_string(),
                distance,
            }),
        }

        previous_bearing = bearing;
    }

    Ok(steps)
}
