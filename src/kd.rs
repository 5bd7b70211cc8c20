// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::{earth_distance, Graph};

/// Position of a vertex stored in the [KDTree].
#[derive(Debug, Clone, Copy, PartialEq)]
struct Pivot {
    id: i64,
    lon: f64,
    lat: f64,
}

/// KDTree implements the [k-d tree data structure](https://en.wikipedia.org/wiki/K-d_tree),
/// which can be used to speed up nearest-vertex search for large graphs.
/// [crate::Graph::closest_vertex] computes the distance to every vertex,
/// while a k-d tree only visits a small part of the graph.
///
/// Results are identical to [crate::Graph::closest_vertex], including the
/// smallest-id tie-break.
///
/// This implementation splits space in euclidean lon-lat coordinates, even though the
/// distance function is [earth_distance]. This results in undefined behavior when points
/// are close to the ante meridian (180°/-180° longitude) or poles (90°/-90° latitude).
#[derive(Debug, Clone)]
pub struct KDTree {
    pivot: Pivot,
    left: Option<Box<KDTree>>,
    right: Option<Box<KDTree>>,
}

impl KDTree {
    /// Builds a k-d tree over all vertices of a [Graph].
    /// Returns `None` for an empty graph.
    pub fn from_graph(g: &Graph) -> Option<Self> {
        let mut pivots = g
            .iter()
            .map(|v| Pivot {
                id: v.id,
                lon: v.lon,
                lat: v.lat,
            })
            .collect::<Vec<_>>();
        Self::build_impl(&mut pivots, false)
    }

    /// Finds the id of the closest vertex to the given position.
    pub fn closest_vertex(&self, lon: f64, lat: f64) -> i64 {
        self.closest_vertex_impl(lon, lat, false).0
    }

    fn closest_vertex_impl(&self, lon: f64, lat: f64, lon_divides: bool) -> (i64, f64) {
        // Start by assuming that pivot is the closest
        let mut best = self.pivot.id;
        let mut best_dist = earth_distance(lon, lat, self.pivot.lon, self.pivot.lat);

        let first_left = if lon_divides {
            lon < self.pivot.lon
        } else {
            lat < self.pivot.lat
        };
        let (first, second) = if first_left {
            (&self.left, &self.right)
        } else {
            (&self.right, &self.left)
        };

        if let Some(ref branch) = first {
            let alt = branch.closest_vertex_impl(lon, lat, !lon_divides);
            if is_better(alt, (best, best_dist)) {
                (best, best_dist) = alt;
            }
        }

        if let Some(ref branch) = second {
            // A closer (or equally close, but with a smaller id) vertex is possible
            // in the second branch only if the splitting axis is not further away
            // than the current best candidate.
            let (axis_lon, axis_lat) = if lon_divides {
                (self.pivot.lon, lat)
            } else {
                (lon, self.pivot.lat)
            };
            let dist_to_axis = earth_distance(lon, lat, axis_lon, axis_lat);

            if dist_to_axis <= best_dist {
                let alt = branch.closest_vertex_impl(lon, lat, !lon_divides);
                if is_better(alt, (best, best_dist)) {
                    (best, best_dist) = alt;
                }
            }
        }

        (best, best_dist)
    }

    fn build_impl(pivots: &mut [Pivot], lon_divides: bool) -> Option<Self> {
        match pivots.len() {
            0 => None,
            1 => Some(Self {
                pivot: pivots[0],
                left: None,
                right: None,
            }),
            _ => {
                if lon_divides {
                    pivots.sort_by(|a, b| a.lon.total_cmp(&b.lon));
                } else {
                    pivots.sort_by(|a, b| a.lat.total_cmp(&b.lat));
                }
                let median = pivots.len() / 2;
                let pivot = pivots[median];
                let (left, right_and_pivot) = pivots.split_at_mut(median);
                let right = &mut right_and_pivot[1..];
                Some(Self {
                    pivot,
                    left: Self::build_impl(left, !lon_divides).map(Box::new),
                    right: Self::build_impl(right, !lon_divides).map(Box::new),
                })
            }
        }
    }
}

#[inline]
fn is_better((id, dist): (i64, f64), (best_id, best_dist): (i64, f64)) -> bool {
    dist < best_dist || (dist == best_dist && id < best_id)
}
