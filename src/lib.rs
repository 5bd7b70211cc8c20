// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Geospatial queries over an [OpenStreetMap](https://www.openstreetmap.org/) road network.
//!
//! Road data is converted into an undirected [Graph] whose edges are labeled with
//! street names. Over that graph, bearmaps can:
//! - find the shortest path between two coordinates with A* ([shortest_path]),
//! - turn such a path into turn-by-turn [directions](route_directions),
//! - pick the pre-rendered map tiles covering a viewport ([Rasterer]),
//! - autocomplete and locate place names ([PlaceIndex]).
//!
//! The graph and the place index are built once and only read afterwards,
//! so they can be freely shared between threads (e.g. behind an [std::sync::Arc]).
//!
//! # Example
//!
//! ```no_run
//! let options = bearmaps::osm::Options {
//!     profile: &bearmaps::osm::CAR_PROFILE,
//!     file_format: bearmaps::osm::FileFormat::Unknown,
//!     prune_isolated: false,
//! };
//! let g = bearmaps::osm::graph_from_file(&options, "path/to/berkeley.osm")
//!     .expect("failed to load berkeley.osm");
//!
//! let route = bearmaps::shortest_path(&g, -122.2592, 37.8702, -122.2530, 37.8652)
//!     .expect("failed to find route");
//!
//! for step in bearmaps::route_directions(&g, &route).expect("route must be connected") {
//!     println!("{step}");
//! }
//! ```

mod astar;
pub mod directions;
mod distance;
#[cfg(test)]
mod fixtures;
mod graph;
mod kd;
pub mod osm;
mod places;
pub mod raster;
mod trie;

pub use astar::{find_route, shortest_path, RouteError};
pub use directions::{
    route_directions, Direction, DirectionsError, NavigationStep, ParseDirectionError,
};
pub use distance::{earth_distance, initial_bearing, EARTH_RADIUS_MILES};
pub use graph::{Graph, GraphError};
pub use kd::KDTree;
pub use places::{clean_name, Location, PlaceIndex};
pub use raster::{BoundingBox, RasterConfig, RasterQuery, RasterResult, Rasterer, TileId};
pub use trie::PrefixIndex;

/// Name given to edges of ways without a `name` tag.
pub const UNKNOWN_ROAD: &str = "unknown road";

/// Represents a vertex of the [Graph] - an OpenStreetMap node.
///
/// Vertices with `id == 0` are disallowed.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    pub id: i64,
    pub lon: f64,
    pub lat: f64,
    pub name: Option<String>,
}

impl Vertex {
    pub fn new(id: i64, lon: f64, lat: f64) -> Self {
        Self {
            id,
            lon,
            lat,
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Represents a connection from a specific [Vertex] to its neighbor,
/// labeled with the name of the way which produced it.
///
/// Streets are always inserted in pairs (`a → b` and `b → a`), as roads
/// are traversable in both directions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Street {
    pub to: i64,
    pub way: String,
}
