// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::osm::{graph_from_buffer, FileFormat, Options, CAR_PROFILE};
use crate::Graph;

const TINY_XML: &[u8] = include_bytes!("osm/reader/test_fixtures/tiny.osm");

/// Builds the small, hand-drawn network from `tiny.osm`;
/// see the `osm` module tests for its layout.
pub(crate) fn tiny_graph() -> Graph {
    let options = Options {
        profile: &CAR_PROFILE,
        file_format: FileFormat::Xml,
        prune_isolated: false,
    };
    graph_from_buffer(&options, TINY_XML).expect("tiny.osm must be valid")
}
