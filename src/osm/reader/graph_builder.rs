// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::osm::Profile;
use crate::{Graph, GraphError, Vertex, UNKNOWN_ROAD};

use super::model::{Feature, NodeRecord, WayRecord};

/// Accepted way, waiting for all nodes to be known.
#[derive(Debug)]
struct PendingWay {
    id: i64,
    nodes: Vec<i64>,
    name: String,
}

/// Converts a stream of [node](NodeRecord) and [way](WayRecord) records into a [Graph].
///
/// Records may come in any order. Edges are only created by [GraphBuilder::finish],
/// once all nodes are known; the returned graph must not be modified afterwards.
///
/// ```
/// use bearmaps::osm::{GraphBuilder, NodeRecord, WayRecord, CAR_PROFILE};
///
/// let mut b = GraphBuilder::new(&CAR_PROFILE);
/// b.add_node(NodeRecord { id: 1, lon: 0.0, lat: 0.0, name: None });
/// b.add_node(NodeRecord { id: 2, lon: 0.0, lat: 0.01, name: Some("Top Dog".into()) });
/// b.add_way(WayRecord {
///     id: 10,
///     nodes: vec![1, 2],
///     road_type: Some("residential".into()),
///     name: None,
/// });
///
/// let g = b.finish();
/// assert_eq!(g.street_between(1, 2), Some("unknown road"));
/// ```
#[derive(Debug)]
pub struct GraphBuilder<'a> {
    g: Graph,
    profile: &'a Profile<'a>,
    prune_isolated: bool,
    pending_ways: Vec<PendingWay>,
    rejected_ways: usize,
}

impl<'a> GraphBuilder<'a> {
    /// Create a new, empty graph builder.
    pub fn new(profile: &'a Profile<'a>) -> Self {
        Self {
            g: Graph::default(),
            profile,
            prune_isolated: false,
            pending_ways: Vec::default(),
            rejected_ways: 0,
        }
    }

    /// Sets whether vertices without any edges should be removed by [GraphBuilder::finish].
    /// By default, such vertices remain in the graph (unreachable from anywhere).
    pub fn prune_isolated(mut self, prune_isolated: bool) -> Self {
        self.prune_isolated = prune_isolated;
        self
    }

    /// Add all features from the provided iterator, stopping at the first error.
    pub fn add_features<I, E>(&mut self, features: I) -> Result<(), E>
    where
        I: IntoIterator<Item = Result<Feature, E>>,
    {
        for f in features {
            self.add_feature(f?);
        }
        Ok(())
    }

    pub fn add_feature(&mut self, f: Feature) {
        match f {
            Feature::Node(n) => self.add_node(n),
            Feature::Way(w) => self.add_way(w),
        }
    }

    /// Creates or updates a vertex corresponding to the node.
    ///
    /// If a vertex with the same id already exists, its position is updated,
    /// and its name is only replaced if the record has one.
    pub fn add_node(&mut self, n: NodeRecord) {
        // Id 0 marks a missing id, and can't be stored in a Graph
        if n.id == 0 || !n.lon.is_finite() || !n.lat.is_finite() {
            log::warn!("skipping invalid node {} ({}, {})", n.id, n.lon, n.lat);
            return;
        }

        let name = n
            .name
            .or_else(|| self.g.get_vertex(n.id).and_then(|v| v.name.clone()));

        self.g.add_vertex(Vertex {
            id: n.id,
            lon: n.lon,
            lat: n.lat,
            name,
        });
    }

    /// Remembers the way if its road type is accepted by the [Profile].
    pub fn add_way(&mut self, w: WayRecord) {
        if !self.profile.is_accepted(w.road_type.as_deref()) {
            log::debug!(
                "skipping way {} with road type {:?}",
                w.id,
                w.road_type.as_deref().unwrap_or("")
            );
            self.rejected_ways += 1;
            return;
        }

        self.pending_ways.push(PendingWay {
            id: w.id,
            nodes: w.nodes,
            name: w.name.unwrap_or_else(|| UNKNOWN_ROAD.to_string()),
        });
    }

    /// Creates edges between consecutive nodes of all accepted ways
    /// and returns the finished [Graph].
    pub fn finish(mut self) -> Graph {
        for way in std::mem::take(&mut self.pending_ways) {
            self.create_edges(&way);
        }

        let pruned = if self.prune_isolated {
            self.g.remove_isolated()
        } else {
            0
        };

        log::info!(
            "graph built: {} vertices, {} edges ({} ways skipped, {} isolated vertices removed)",
            self.g.len(),
            self.g.edge_count(),
            self.rejected_ways,
            pruned,
        );

        self.g
    }

    fn create_edges(&mut self, way: &PendingWay) {
        for pair in way.nodes.windows(2) {
            if pair[0] == pair[1] {
                continue;
            }

            match self.g.add_edge(pair[0], pair[1], &way.name) {
                Ok(()) => {}
                Err(GraphError::UnknownVertex(node_id)) => {
                    log::warn!("way {} references unknown node {}", way.id, node_id);
                }
            }
        }
    }
}
