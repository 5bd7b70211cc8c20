// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::{BTreeSet, HashMap};

use crate::{earth_distance, Graph, RouteError, Street};

/// Entry of the priority queue. Items are ordered by `score`,
/// with ties broken by the smaller vertex id.
#[derive(Debug, Clone, Copy)]
struct QueueItem {
    score: f64,
    at: i64,
}

impl PartialEq for QueueItem {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other).is_eq()
    }
}

impl Eq for QueueItem {}

impl PartialOrd for QueueItem {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueItem {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| self.at.cmp(&other.at))
    }
}

/// Per-vertex state of a single search.
#[derive(Debug, Clone, Copy)]
struct SearchNode {
    before: Option<i64>,
    cost: f64,
    heuristic: f64,
}

impl SearchNode {
    #[inline]
    fn score(&self) -> f64 {
        self.cost + self.heuristic
    }
}

fn reconstruct_path(nodes: &HashMap<i64, SearchNode>, mut last: i64) -> Vec<i64> {
    let mut path = vec![last];

    while let Some(before) = nodes.get(&last).and_then(|n| n.before) {
        path.push(before);
        last = before;
    }

    path.reverse();
    path
}

/// Uses the [A* algorithm](https://en.wikipedia.org/wiki/A*_search_algorithm)
/// to find the shortest route between two vertices in the provided graph.
///
/// Returns the ids of all vertices on the route, including `from_id` and `to_id`,
/// or [RouteError::NoRoute] if `to_id` is not reachable from `from_id`.
///
/// Every vertex of the graph is put in the queue upfront (with an infinite cost,
/// except for the start). Vertices with equal scores are expanded in ascending id
/// order, so that the results are reproducible.
pub fn find_route(g: &Graph, from_id: i64, to_id: i64) -> Result<Vec<i64>, RouteError> {
    g.get_vertex(from_id)
        .ok_or(RouteError::InvalidReference(from_id))?;
    let to_vertex = g
        .get_vertex(to_id)
        .ok_or(RouteError::InvalidReference(to_id))?;

    let mut queue: BTreeSet<QueueItem> = BTreeSet::default();
    let mut nodes: HashMap<i64, SearchNode> = HashMap::with_capacity(g.len());

    for v in g.iter() {
        let node = SearchNode {
            before: None,
            cost: if v.id == from_id { 0.0 } else { f64::INFINITY },
            heuristic: earth_distance(v.lon, v.lat, to_vertex.lon, to_vertex.lat),
        };
        nodes.insert(v.id, node);
        queue.insert(QueueItem {
            score: node.score(),
            at: v.id,
        });
    }

    let mut steps: usize = 0;

    while let Some(item) = queue.pop_first() {
        let cost = nodes[&item.at].cost;
        if cost.is_infinite() {
            // Only vertices unreachable from the start are left in the queue
            break;
        }

        if item.at == to_id {
            log::debug!("route {from_id} → {to_id} found after {steps} expansions");
            return Ok(reconstruct_path(&nodes, to_id));
        }

        steps += 1;
        let Some(current) = g.get_vertex(item.at) else {
            continue;
        };

        for &Street { to: neighbor_id, .. } in g.streets(item.at) {
            let Some(neighbor) = g.get_vertex(neighbor_id) else {
                continue;
            };
            let Some(node) = nodes.get_mut(&neighbor_id) else {
                continue;
            };

            let neighbor_cost =
                cost + earth_distance(current.lon, current.lat, neighbor.lon, neighbor.lat);
            if neighbor_cost >= node.cost {
                continue;
            }

            // Re-prioritize the neighbor
            queue.remove(&QueueItem {
                score: node.score(),
                at: neighbor_id,
            });
            node.cost = neighbor_cost;
            node.before = Some(item.at);
            queue.insert(QueueItem {
                score: node.score(),
                at: neighbor_id,
            });
        }
    }

    log::debug!("no route {from_id} → {to_id} after {steps} expansions");
    Err(RouteError::NoRoute {
        from: from_id,
        to: to_id,
    })
}

/// Finds the shortest route between two arbitrary positions.
///
/// Both positions are first snapped to their [closest vertices](Graph::closest_vertex),
/// and then [find_route] is used to find the route between them.
pub fn shortest_path(
    g: &Graph,
    start_lon: f64,
    start_lat: f64,
    dest_lon: f64,
    dest_lat: f64,
) -> Result<Vec<i64>, RouteError> {
    let from_id = g
        .closest_vertex(start_lon, start_lat)
        .ok_or(RouteError::EmptyGraph)?;
    let to_id = g
        .closest_vertex(dest_lon, dest_lat)
        .ok_or(RouteError::EmptyGraph)?;
    find_route(g, from_id, to_id)
}

#[cfg(test)]
mod tests {
    use std::cmp::Reverse;
    use std::collections::BinaryHeap;

    use proptest::prelude::*;

    use super::*;
    use crate::fixtures::tiny_graph;
    use crate::Vertex;

    #[test]
    fn tiny_22_to_66() {
        let g = tiny_graph();
        assert_eq!(shortest_path(&g, 0.2, 38.2, 0.6, 38.6), Ok(vec![22, 46, 66]));
        assert_eq!(
            shortest_path(&g, 0.21, 38.19, 0.59, 38.61),
            Ok(vec![22, 46, 66]),
        );
    }

    #[test]
    fn tiny_41_to_46() {
        let g = tiny_graph();
        assert_eq!(
            shortest_path(&g, 0.4, 38.1, 0.4, 38.6),
            Ok(vec![41, 63, 66, 46]),
        );
    }

    #[test]
    fn tiny_other_routes() {
        let g = tiny_graph();
        assert_eq!(find_route(&g, 22, 11), Ok(vec![22, 11]));
        assert_eq!(find_route(&g, 66, 41), Ok(vec![66, 63, 41]));
        assert_eq!(find_route(&g, 11, 66), Ok(vec![11, 22, 46, 66]));
        assert_eq!(find_route(&g, 22, 22), Ok(vec![22]));
    }

    #[test]
    fn tiny_no_route() {
        let g = tiny_graph();

        // 55 is only reachable by a footway and a service road
        assert_eq!(
            find_route(&g, 66, 55),
            Err(RouteError::NoRoute { from: 66, to: 55 }),
        );

        // 4-5-6 is a separate component
        assert_eq!(
            find_route(&g, 22, 4),
            Err(RouteError::NoRoute { from: 22, to: 4 }),
        );
    }

    #[test]
    fn unreachable_target_with_smallest_id() {
        // 1 is popped first among the unreachable vertices, as ties go to the smallest id
        let mut g = Graph::new();
        g.add_vertex(Vertex::new(1, 0.0, 0.0));
        g.add_vertex(Vertex::new(2, 0.01, 0.0));
        g.add_vertex(Vertex::new(3, 0.02, 0.0));
        g.add_edge(2, 3, "Derby Street").unwrap();

        assert_eq!(find_route(&g, 2, 1), Err(RouteError::NoRoute { from: 2, to: 1 }));
        assert_eq!(find_route(&g, 1, 3), Err(RouteError::NoRoute { from: 1, to: 3 }));
        assert_eq!(find_route(&g, 1, 1), Ok(vec![1]));
    }

    #[test]
    fn invalid_references() {
        let g = tiny_graph();
        assert_eq!(find_route(&g, 1, 22), Err(RouteError::InvalidReference(1)));
        assert_eq!(find_route(&g, 22, 1), Err(RouteError::InvalidReference(1)));
        assert_eq!(
            shortest_path(&Graph::new(), 0.0, 0.0, 1.0, 1.0),
            Err(RouteError::EmptyGraph),
        );
    }

    #[test]
    fn equal_cost_routes_are_deterministic() {
        //    2
        //  /   \
        // 1     4
        //  \   /
        //    3
        let mut g = Graph::new();
        g.add_vertex(Vertex::new(1, -0.01, 0.0));
        g.add_vertex(Vertex::new(2, 0.0, 0.01));
        g.add_vertex(Vertex::new(3, 0.0, -0.01));
        g.add_vertex(Vertex::new(4, 0.01, 0.0));
        g.add_edge(1, 3, "Lower Road").unwrap();
        g.add_edge(3, 4, "Lower Road").unwrap();
        g.add_edge(1, 2, "Upper Road").unwrap();
        g.add_edge(2, 4, "Upper Road").unwrap();

        assert_eq!(find_route(&g, 1, 4), Ok(vec![1, 2, 4]));
    }

    /// Unoptimized Dijkstra, used as the reference for route costs.
    fn dijkstra_cost(g: &Graph, from_id: i64, to_id: i64) -> Option<f64> {
        let mut best: HashMap<i64, f64> = HashMap::from([(from_id, 0.0)]);
        let mut queue = BinaryHeap::from([(Reverse(OrdF64(0.0)), from_id)]);

        while let Some((Reverse(OrdF64(cost)), at)) = queue.pop() {
            if at == to_id {
                return Some(cost);
            }
            if cost > best[&at] {
                continue;
            }
            for street in g.streets(at) {
                let candidate = cost + g.distance(at, street.to).unwrap();
                if candidate < best.get(&street.to).copied().unwrap_or(f64::INFINITY) {
                    best.insert(street.to, candidate);
                    queue.push((Reverse(OrdF64(candidate)), street.to));
                }
            }
        }

        None
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct OrdF64(f64);

    impl Eq for OrdF64 {}

    impl PartialOrd for OrdF64 {
        fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
            Some(self.cmp(other))
        }
    }

    impl Ord for OrdF64 {
        fn cmp(&self, other: &Self) -> std::cmp::Ordering {
            self.0.total_cmp(&other.0)
        }
    }

    fn graph_and_endpoints() -> impl Strategy<Value = (Graph, i64, i64)> {
        (2usize..25)
            .prop_flat_map(|n| {
                (
                    prop::collection::vec((-0.1f64..0.1, -0.1f64..0.1), n),
                    prop::collection::vec((0..n, 0..n), 0..n * 3),
                    1..=n as i64,
                    1..=n as i64,
                )
            })
            .prop_map(|(positions, edges, from_id, to_id)| {
                let mut g = Graph::new();
                for (idx, &(lon, lat)) in positions.iter().enumerate() {
                    g.add_vertex(Vertex::new(idx as i64 + 1, lon, lat));
                }
                for (a, b) in edges {
                    if a != b {
                        g.add_edge(a as i64 + 1, b as i64 + 1, "Test Street").unwrap();
                    }
                }
                (g, from_id, to_id)
            })
    }

    proptest! {
        #[test]
        fn route_is_optimal((g, from_id, to_id) in graph_and_endpoints()) {
            let expected = dijkstra_cost(&g, from_id, to_id);
            match find_route(&g, from_id, to_id) {
                Ok(route) => {
                    let expected = expected.expect("A* found a route Dijkstra did not");
                    let cost = g.path_length(&route).unwrap();
                    prop_assert!(
                        (cost - expected).abs() <= 1e-9 * expected.max(1.0),
                        "route cost {} differs from Dijkstra cost {}",
                        cost,
                        expected,
                    );
                }
                Err(RouteError::NoRoute { .. }) => prop_assert!(expected.is_none()),
                Err(e) => prop_assert!(false, "unexpected error: {}", e),
            }
        }

        #[test]
        fn route_follows_edges((g, from_id, to_id) in graph_and_endpoints()) {
            if let Ok(route) = find_route(&g, from_id, to_id) {
                prop_assert_eq!(route.first().copied(), Some(from_id));
                prop_assert_eq!(route.last().copied(), Some(to_id));
                for pair in route.windows(2) {
                    prop_assert!(g.street_between(pair[0], pair[1]).is_some());
                }
            }
        }
    }
}
