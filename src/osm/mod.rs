// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Conversion of [OpenStreetMap](https://www.openstreetmap.org/) data into a [Graph](crate::Graph).
//!
//! [GraphBuilder] consumes plain [node](NodeRecord) and [way](WayRecord) records
//! from any source, while [graph_from_file] and friends feed it from
//! [OSM XML](https://wiki.openstreetmap.org/wiki/OSM_XML) files.

mod profile;
mod reader;

pub use profile::{Profile, CAR_PROFILE};
pub use reader::{
    graph_from_buffer, graph_from_file, graph_from_io, Error, Feature, FileFormat, GraphBuilder,
    NodeRecord, Options, WayRecord,
};

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::super::Graph;
    use super::*;

    macro_rules! assert_almost_eq {
        ($a:expr, $b:expr) => {
            assert!(
                (($a - $b).abs() < 1e-4),
                "assertion failed: {} ≈ {}",
                $a,
                $b
            )
        };
    }

    const TINY_XML: &[u8] = include_bytes!("reader/test_fixtures/tiny.osm");
    const TINY_XML_GZ: &[u8] = include_bytes!("reader/test_fixtures/tiny.osm.gz");
    const TINY_XML_BZ2: &[u8] = include_bytes!("reader/test_fixtures/tiny.osm.bz2");

    fn check_tiny_graph(g: &Graph) {
        //          46──Cedar──66
        //         /           │\
        //    Birch        Dogwood 55 (service, footway only)
        //       /             │
        //     22              63
        //     │                \
        //  Alder             Dogwood
        //     │                  \
        //     11──────Hazel───────41
        //
        //     4──Fir Court──5──(unnamed)──6

        assert_eq!(g.len(), 10);
        assert_eq!(g.edge_count(), 8);

        assert_eq!(g.street_between(22, 46), Some("Birch Street"));
        assert_eq!(g.street_between(66, 63), Some("Dogwood Drive"));
        assert_eq!(g.street_between(41, 63), Some("Dogwood Drive"));
        assert_eq!(g.street_between(5, 6), Some(crate::UNKNOWN_ROAD));
        assert_eq!(g.street_between(66, 41), None);

        // Service roads and footways are rejected
        assert!(g.adjacent(55).is_empty());
        assert_eq!(g.adjacent(66), BTreeSet::from([46, 63]));

        assert_almost_eq!(g.distance(22, 46).unwrap(), 29.7152);

        assert_eq!(g.get_vertex(41).unwrap().name.as_deref(), Some("Top Dog"));
        assert_eq!(
            g.get_vertex(55).unwrap().name.as_deref(),
            Some("Peet's Coffee & Tea"),
        );
        assert_eq!(g.get_vertex(22).unwrap().name, None);
    }

    fn options(file_format: FileFormat) -> Options<'static> {
        Options {
            profile: &CAR_PROFILE,
            file_format,
            prune_isolated: false,
        }
    }

    #[test]
    fn build_graph_xml() {
        let g = graph_from_buffer(&options(FileFormat::Xml), TINY_XML).unwrap();
        check_tiny_graph(&g);
    }

    #[test]
    fn build_graph_xml_io() {
        let g = graph_from_io(&options(FileFormat::Xml), TINY_XML).unwrap();
        check_tiny_graph(&g);
    }

    #[test]
    fn build_graph_gz() {
        let g = graph_from_buffer(&options(FileFormat::XmlGz), TINY_XML_GZ).unwrap();
        check_tiny_graph(&g);
    }

    #[test]
    fn build_graph_bz2() {
        let g = graph_from_buffer(&options(FileFormat::XmlBz2), TINY_XML_BZ2).unwrap();
        check_tiny_graph(&g);
    }

    #[test]
    fn build_graph_detect_format() {
        for data in [TINY_XML, TINY_XML_GZ, TINY_XML_BZ2] {
            let g = graph_from_buffer(&options(FileFormat::Unknown), data).unwrap();
            check_tiny_graph(&g);

            let g = graph_from_io(&options(FileFormat::Unknown), data).unwrap();
            check_tiny_graph(&g);
        }
    }

    #[test]
    fn build_graph_pruned() {
        let g = graph_from_buffer(
            &Options {
                prune_isolated: true,
                ..options(FileFormat::Xml)
            },
            TINY_XML,
        )
        .unwrap();

        assert_eq!(g.len(), 9);
        assert!(g.get_vertex(55).is_none());
    }

    #[test]
    fn detect() {
        assert_eq!(FileFormat::detect(b"<?xml version='1.0'?>"), FileFormat::Xml);
        assert_eq!(FileFormat::detect(&[0x1F, 0x8B, 0x08]), FileFormat::XmlGz);
        assert_eq!(FileFormat::detect(b"BZh91AY"), FileFormat::XmlBz2);
        assert_eq!(FileFormat::detect(b""), FileFormat::Xml);
    }

    #[test]
    fn broken_xml() {
        let result = graph_from_buffer(&options(FileFormat::Xml), b"<osm><node id='1'></way></osm>");
        assert!(matches!(result, Err(Error::Xml(_))));
    }

    #[test]
    fn missing_file() {
        let result = graph_from_file(&options(FileFormat::Unknown), "/nonexistent/tiny.osm");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
