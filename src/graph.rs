// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::{earth_distance, initial_bearing, Street, Vertex};
use std::collections::btree_map::{BTreeMap, Entry};
use std::collections::BTreeSet;

/// Error returned when modifying a [Graph] in a way which would break its invariants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("unknown vertex: {0}")]
    UnknownVertex(i64),
}

/// Represents a road network as a set of [Vertices](Vertex)
/// and undirected, named [Streets](Street) between them.
///
/// A graph is populated once (usually by [osm::GraphBuilder](crate::osm::GraphBuilder))
/// and treated as read-only afterwards. Modifying a graph after it has been handed
/// to queries is a contract violation.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Graph(BTreeMap<i64, (Vertex, Vec<Street>)>);

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of vertices in the graph.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the graph has no vertices.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of undirected edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.0.values().map(|(_, streets)| streets.len()).sum::<usize>() / 2
    }

    /// Returns an iterator over all [Vertices](Vertex) in the graph, in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Vertex> {
        self.0.values().map(|(vertex, _)| vertex)
    }

    /// Returns an iterator over ids of all vertices in the graph, in ascending order.
    pub fn vertices(&self) -> impl Iterator<Item = i64> + '_ {
        self.0.keys().copied()
    }

    /// Retrieves a [Vertex] with the provided id.
    pub fn get_vertex(&self, id: i64) -> Option<&Vertex> {
        self.0.get(&id).map(|(vertex, _)| vertex)
    }

    /// Creates or updates a [Vertex] with `vertex.id`.
    ///
    /// All edges of an updated vertex are preserved. Moving a vertex which already
    /// has edges is only permitted during the build phase, as edge weights are
    /// computed from the current positions.
    pub fn add_vertex(&mut self, vertex: Vertex) {
        assert_ne!(vertex.id, 0);
        debug_assert!(vertex.lon.is_finite() && vertex.lat.is_finite());

        match self.0.entry(vertex.id) {
            Entry::Vacant(e) => {
                e.insert((vertex, Vec::default()));
            }
            Entry::Occupied(mut e) => {
                e.get_mut().0 = vertex;
            }
        }
    }

    /// Adds an undirected edge between two existing vertices, labeled with `way`.
    ///
    /// Nothing is inserted if any of the vertices is unknown.
    pub fn add_edge(&mut self, a: i64, b: i64, way: &str) -> Result<(), GraphError> {
        for id in [a, b] {
            if !self.0.contains_key(&id) {
                return Err(GraphError::UnknownVertex(id));
            }
        }

        for (from, to) in [(a, b), (b, a)] {
            if let Some((_, streets)) = self.0.get_mut(&from) {
                streets.push(Street {
                    to,
                    way: way.to_string(),
                });
            }
        }

        Ok(())
    }

    /// Removes all vertices without any edges, returning the number of removed vertices.
    pub(crate) fn remove_isolated(&mut self) -> usize {
        let before = self.0.len();
        self.0.retain(|_, (_, streets)| !streets.is_empty());
        before - self.0.len()
    }

    /// Gets all [Streets](Street) leaving a vertex with a given id,
    /// in insertion order.
    pub fn streets(&self, id: i64) -> &[Street] {
        self.0
            .get(&id)
            .map(|(_, streets)| streets.as_slice())
            .unwrap_or_default()
    }

    /// Returns ids of all vertices adjacent to the given one.
    pub fn adjacent(&self, id: i64) -> BTreeSet<i64> {
        self.streets(id).iter().map(|s| s.to).collect()
    }

    /// Maps every neighbor of a vertex to the name of the way connecting them.
    ///
    /// If multiple ways connect the same pair of vertices, the first added one is used.
    pub fn streets_of(&self, id: i64) -> BTreeMap<i64, &str> {
        let mut streets = BTreeMap::default();
        for street in self.streets(id) {
            streets.entry(street.to).or_insert(street.way.as_str());
        }
        streets
    }

    /// Returns the name of the (first added) way directly connecting `from` and `to`.
    pub fn street_between(&self, from: i64, to: i64) -> Option<&str> {
        self.streets(from)
            .iter()
            .find(|s| s.to == to)
            .map(|s| s.way.as_str())
    }

    /// Calculates the [earth_distance] between two vertices, in miles.
    /// Returns `None` if any of the vertices is unknown.
    pub fn distance(&self, a: i64, b: i64) -> Option<f64> {
        let a = self.get_vertex(a)?;
        let b = self.get_vertex(b)?;
        Some(earth_distance(a.lon, a.lat, b.lon, b.lat))
    }

    /// Calculates the [initial_bearing] from one vertex to another, in degrees.
    /// Returns `None` if any of the vertices is unknown.
    pub fn bearing(&self, from: i64, to: i64) -> Option<f64> {
        let from = self.get_vertex(from)?;
        let to = self.get_vertex(to)?;
        Some(initial_bearing(from.lon, from.lat, to.lon, to.lat))
    }

    /// Sums distances between consecutive vertices of a path.
    /// Returns `None` if the path references an unknown vertex.
    pub fn path_length(&self, path: &[i64]) -> Option<f64> {
        path.windows(2)
            .map(|pair| self.distance(pair[0], pair[1]))
            .sum()
    }

    /// Finds the closest [Vertex] to the given position, as measured by [earth_distance].
    /// Ties are broken in favor of the smallest id.
    ///
    /// This function requires computing the distance to every vertex in the graph;
    /// use [KDTree](crate::KDTree) for repeated lookups over large graphs.
    pub fn closest_vertex(&self, lon: f64, lat: f64) -> Option<i64> {
        self.iter()
            .map(|v| (earth_distance(lon, lat, v.lon, v.lat), v.id))
            // min_by returns the first of equal elements, and vertices are ordered by id
            .min_by(|(a_dist, _), (b_dist, _)| a_dist.total_cmp(b_dist))
            .map(|(_, id)| id)
    }
}
