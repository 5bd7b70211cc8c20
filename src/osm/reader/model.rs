// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

/// Represents an [OSM node](https://wiki.openstreetmap.org/wiki/Node),
/// reduced to the attributes used by the [GraphBuilder](super::GraphBuilder).
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRecord {
    pub id: i64,
    pub lon: f64,
    pub lat: f64,

    /// Value of the `name` tag, if present.
    pub name: Option<String>,
}

/// Represents an [OSM way](https://wiki.openstreetmap.org/wiki/Way),
/// reduced to the attributes used by the [GraphBuilder](super::GraphBuilder).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WayRecord {
    pub id: i64,

    /// Ordered references to nodes of the way.
    pub nodes: Vec<i64>,

    /// Value of the road type tag (see [Profile::key](crate::osm::Profile::key)), if present.
    pub road_type: Option<String>,

    /// Value of the `name` tag, if present.
    pub name: Option<String>,
}

/// Union over OSM elements relevant to building a [Graph](crate::Graph).
#[derive(Debug, Clone, PartialEq)]
pub enum Feature {
    Node(NodeRecord),
    Way(WayRecord),
}
