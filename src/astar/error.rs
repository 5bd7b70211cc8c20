// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

/// Error conditions which may occur during [find_route](crate::find_route) or
/// [shortest_path](crate::shortest_path).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    /// The graph has no vertices, so coordinates can't be snapped to any of them.
    #[error("graph is empty")]
    EmptyGraph,

    /// The start or end vertices don't exist in a graph.
    #[error("invalid vertex: {0}")]
    InvalidReference(i64),

    /// The end vertex is not reachable from the start vertex,
    /// as they lie in different connected components.
    #[error("no route from {from} to {to}")]
    NoRoute { from: i64, to: i64 },
}
