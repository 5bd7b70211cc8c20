// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Selection of pre-rendered map tiles covering a viewport.
//!
//! The map is a quadtree of square image tiles: the single root tile at depth 0
//! covers the whole [root box](RasterConfig::root), and every tile at depth `d`
//! is split into 4 tiles at depth `d + 1`. Tiles are addressed by their depth and
//! their column (`x`, growing eastwards) and row (`y`, growing southwards) at that depth.

use std::fmt;

/// Axis-aligned rectangle in lon/lat space, described by its
/// upper-left (north-west) and lower-right (south-east) corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub ul_lon: f64,
    pub ul_lat: f64,
    pub lr_lon: f64,
    pub lr_lat: f64,
}

impl BoundingBox {
    pub const fn new(ul_lon: f64, ul_lat: f64, lr_lon: f64, lr_lat: f64) -> Self {
        Self {
            ul_lon,
            ul_lat,
            lr_lon,
            lr_lat,
        }
    }

    /// Longitudinal span of the box, positive for well-formed boxes.
    #[inline]
    pub fn lon_span(&self) -> f64 {
        self.lr_lon - self.ul_lon
    }

    /// Latitudinal span of the box, positive for well-formed boxes.
    #[inline]
    pub fn lat_span(&self) -> f64 {
        self.ul_lat - self.lr_lat
    }

    pub fn is_finite(&self) -> bool {
        self.ul_lon.is_finite()
            && self.ul_lat.is_finite()
            && self.lr_lon.is_finite()
            && self.lr_lat.is_finite()
    }

    /// Checks if `other` lies entirely within this box (edges included).
    pub fn contains(&self, other: &BoundingBox) -> bool {
        self.ul_lon <= other.ul_lon
            && self.ul_lat >= other.ul_lat
            && self.lr_lon >= other.lr_lon
            && self.lr_lat <= other.lr_lat
    }

    /// Returns the intersection of both boxes, or None if the intersection has no area.
    pub fn intersection(&self, other: &BoundingBox) -> Option<BoundingBox> {
        if !self.is_finite() || !other.is_finite() {
            return None;
        }

        let clipped = BoundingBox {
            ul_lon: self.ul_lon.max(other.ul_lon),
            ul_lat: self.ul_lat.min(other.ul_lat),
            lr_lon: self.lr_lon.min(other.lr_lon),
            lr_lat: self.lr_lat.max(other.lr_lat),
        };

        if clipped.ul_lon < clipped.lr_lon && clipped.ul_lat > clipped.lr_lat {
            Some(clipped)
        } else {
            None
        }
    }
}

/// Static description of the tile pyramid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterConfig {
    /// Area covered by the depth-0 tile.
    pub root: BoundingBox,

    /// Width and height of every tile image, in pixels.
    pub tile_size: u32,

    /// Deepest available level of the quadtree.
    pub max_depth: u32,
}

impl RasterConfig {
    /// Tiles of the Berkeley map.
    pub const BERKELEY: RasterConfig = RasterConfig {
        root: BoundingBox::new(
            -122.2998046875,
            37.892195547244356,
            -122.2119140625,
            37.82280243352756,
        ),
        tile_size: 256,
        max_depth: 7,
    };
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self::BERKELEY
    }
}

/// Area and viewport size requested by a client.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterQuery {
    pub bbox: BoundingBox,

    /// Viewport width in pixels, determines the depth of returned tiles.
    pub width: f64,

    /// Viewport height in pixels. Tiles are square and the depth is chosen
    /// from the horizontal resolution only, so this is informational.
    pub height: f64,
}

/// Address of a single tile in the quadtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId {
    pub depth: u32,
    pub x: u32,
    pub y: u32,
}

impl TileId {
    /// Name of the image of this tile in the tile store.
    pub fn file_name(&self) -> String {
        format!("{self}.png")
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}_x{}_y{}", self.depth, self.x, self.y)
    }
}

/// Outcome of [Rasterer::raster].
///
/// If `success` is false, the query did not intersect the map, and
/// all other fields carry no meaning.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterResult {
    /// Selected tiles, row by row (north to south), each row west to east.
    pub grid: Vec<Vec<TileId>>,

    /// Area actually covered by the `grid`.
    pub raster: BoundingBox,

    pub depth: u32,
    pub success: bool,
}

impl RasterResult {
    fn failed(bbox: BoundingBox) -> Self {
        Self {
            grid: Vec::default(),
            raster: bbox,
            depth: 0,
            success: false,
        }
    }
}

/// Rasterer picks the tiles which should be stitched together to display a [RasterQuery].
///
/// The chosen depth is the shallowest one whose tiles have at least the resolution
/// (longitudinal distance per pixel, LonDPP) of the viewport, capped at
/// [RasterConfig::max_depth]. All tiles at that depth intersecting the
/// query (clipped to the root box) are returned.
#[derive(Debug, Clone)]
pub struct Rasterer {
    config: RasterConfig,
    root_lon_dpp: f64,
}

impl Rasterer {
    /// Deepest supported level of the quadtree; tile indices must fit in a `u32`.
    pub const DEPTH_LIMIT: u32 = 31;

    /// Creates a Rasterer for the given tile pyramid.
    /// `max_depth` is capped at [Rasterer::DEPTH_LIMIT].
    pub fn new(mut config: RasterConfig) -> Self {
        if config.max_depth > Self::DEPTH_LIMIT {
            log::warn!(
                "max_depth {} exceeds the supported {}, capping",
                config.max_depth,
                Self::DEPTH_LIMIT,
            );
            config.max_depth = Self::DEPTH_LIMIT;
        }

        Self {
            root_lon_dpp: config.root.lon_span() / config.tile_size as f64,
            config,
        }
    }

    pub fn config(&self) -> &RasterConfig {
        &self.config
    }

    pub fn raster(&self, query: &RasterQuery) -> RasterResult {
        let root = &self.config.root;

        let Some(clipped) = query.bbox.intersection(root) else {
            log::debug!("raster query {:?} does not intersect the map", query.bbox);
            return RasterResult::failed(query.bbox);
        };

        if !query.width.is_finite() || query.width <= 0.0 {
            log::debug!("raster query with invalid viewport width {}", query.width);
            return RasterResult::failed(query.bbox);
        }

        let depth = self.depth_for(clipped.lon_span() / query.width);
        let tiles_per_side = 1_u32 << depth;
        let tile_lon = root.lon_span() / tiles_per_side as f64;
        let tile_lat = root.lat_span() / tiles_per_side as f64;

        let x_min = lower_index((clipped.ul_lon - root.ul_lon) / tile_lon, tiles_per_side);
        let x_max = upper_index((clipped.lr_lon - root.ul_lon) / tile_lon, tiles_per_side);
        let y_min = lower_index((root.ul_lat - clipped.ul_lat) / tile_lat, tiles_per_side);
        let y_max = upper_index((root.ul_lat - clipped.lr_lat) / tile_lat, tiles_per_side);
        let (x_max, y_max) = (x_max.max(x_min), y_max.max(y_min));

        let grid = (y_min..=y_max)
            .map(|y| (x_min..=x_max).map(|x| TileId { depth, x, y }).collect())
            .collect();

        let raster = BoundingBox {
            ul_lon: edge(root.ul_lon, root.lr_lon, tile_lon, x_min, tiles_per_side),
            ul_lat: edge(root.ul_lat, root.lr_lat, -tile_lat, y_min, tiles_per_side),
            lr_lon: edge(root.ul_lon, root.lr_lon, tile_lon, x_max + 1, tiles_per_side),
            lr_lat: edge(root.ul_lat, root.lr_lat, -tile_lat, y_max + 1, tiles_per_side),
        };

        RasterResult {
            grid,
            raster,
            depth,
            success: true,
        }
    }

    /// Returns the tile LonDPP at the provided depth.
    pub fn lon_dpp_at(&self, depth: u32) -> f64 {
        self.root_lon_dpp / (1_u64 << depth) as f64
    }

    fn depth_for(&self, required_lon_dpp: f64) -> u32 {
        (0..=self.config.max_depth)
            .find(|&d| self.lon_dpp_at(d) <= required_lon_dpp)
            .unwrap_or(self.config.max_depth)
    }
}

impl Default for Rasterer {
    fn default() -> Self {
        Self::new(RasterConfig::default())
    }
}

/// Index of the tile containing `offset` (expressed in tiles from the root edge).
fn lower_index(offset: f64, tiles_per_side: u32) -> u32 {
    clamp_index(offset.floor(), tiles_per_side)
}

/// Index of the last tile reached by `offset`, not counting a tile only touched at its edge.
fn upper_index(offset: f64, tiles_per_side: u32) -> u32 {
    let floor = offset.floor();
    if floor == offset {
        clamp_index(floor - 1.0, tiles_per_side)
    } else {
        clamp_index(floor, tiles_per_side)
    }
}

fn clamp_index(index: f64, tiles_per_side: u32) -> u32 {
    index.clamp(0.0, (tiles_per_side - 1) as f64) as u32
}

/// Coordinate of the `i`-th tile edge, snapped to the root edges at both extremes.
fn edge(start: f64, end: f64, step: f64, i: u32, tiles_per_side: u32) -> f64 {
    if i == 0 {
        start
    } else if i >= tiles_per_side {
        end
    } else {
        start + i as f64 * step
    }
}
