// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::fs::File;
use std::io::{self, BufRead};
use std::path::Path;

use crate::osm::Profile;
use crate::Graph;

pub use graph_builder::GraphBuilder;
pub use model::{Feature, NodeRecord, WayRecord};

mod graph_builder;
mod model;
mod xml;

/// Format of the input OSM file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Unknown format - guess the format based on the content
    Unknown,

    /// Force uncompressed [OSM XML](https://wiki.openstreetmap.org/wiki/OSM_XML)
    Xml,

    /// Force [OSM XML](https://wiki.openstreetmap.org/wiki/OSM_XML)
    /// with [gzip](https://en.wikipedia.org/wiki/Gzip) compression
    XmlGz,

    /// Force [OSM XML](https://wiki.openstreetmap.org/wiki/OSM_XML)
    /// with [bzip2](https://en.wikipedia.org/wiki/Bzip2) compression
    XmlBz2,
}

impl FileFormat {
    /// Guesses the format of a file based on its first bytes.
    pub fn detect(header: &[u8]) -> Self {
        if header.starts_with(&[0x1F, 0x8B]) {
            Self::XmlGz
        } else if header.starts_with(b"BZh") {
            Self::XmlBz2
        } else {
            Self::Xml
        }
    }
}

/// Additional controls for interpreting OSM data as a routing [Graph].
#[derive(Debug)]
pub struct Options<'a> {
    /// Which OSM ways should be converted into edges.
    pub profile: &'a Profile<'a>,

    /// Format of the input data.
    pub file_format: FileFormat,

    /// Remove vertices which are not part of any accepted way.
    /// When false, such vertices remain in the graph, unreachable from anywhere.
    pub prune_isolated: bool,
}

/// Error conditions which may occur when reading OSM data.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("invalid OSM XML: {0}")]
    Xml(#[from] quick_xml::Error),
}

/// Parse OSM features from a reader into a [Graph] as per the provided [Options].
///
/// The provided stream will be automatically wrapped in a buffered reader when needed.
pub fn graph_from_io<R: io::Read>(options: &Options<'_>, reader: R) -> Result<Graph, Error> {
    let mut b = io::BufReader::new(reader);

    let format = match options.file_format {
        FileFormat::Unknown => FileFormat::detect(b.fill_buf()?),
        format => format,
    };

    match format {
        FileFormat::Unknown | FileFormat::Xml => graph_from_xml(options, b),

        FileFormat::XmlGz => {
            let d = flate2::read::MultiGzDecoder::new(b);
            graph_from_xml(options, io::BufReader::new(d))
        }

        FileFormat::XmlBz2 => {
            let d = bzip2::read::MultiBzDecoder::new(b);
            graph_from_xml(options, io::BufReader::new(d))
        }
    }
}

/// Parse OSM features from a file at the provided path into a [Graph] as per the provided [Options].
pub fn graph_from_file<P: AsRef<Path>>(options: &Options<'_>, path: P) -> Result<Graph, Error> {
    let f = File::open(path)?;
    graph_from_io(options, f)
}

/// Parse OSM features from a static buffer into a [Graph] as per the provided [Options].
pub fn graph_from_buffer(options: &Options<'_>, data: &[u8]) -> Result<Graph, Error> {
    let format = match options.file_format {
        FileFormat::Unknown => FileFormat::detect(data),
        format => format,
    };

    if format == FileFormat::Xml {
        // Fast path is available for in-memory XML data
        let r = xml::Reader::from_buffer(data, options.profile.key);
        build(options, r)
    } else {
        // Wrap the buffer in a cursor and use the IO path
        let cursor = io::Cursor::new(data);
        graph_from_io(
            &Options {
                file_format: format,
                ..*options
            },
            cursor,
        )
    }
}

fn graph_from_xml<R: io::BufRead>(options: &Options<'_>, reader: R) -> Result<Graph, Error> {
    let r = xml::Reader::from_io(reader, options.profile.key);
    build(options, r)
}

fn build<I>(options: &Options<'_>, features: I) -> Result<Graph, Error>
where
    I: Iterator<Item = Result<Feature, quick_xml::Error>>,
{
    let mut b = GraphBuilder::new(options.profile).prune_isolated(options.prune_isolated);
    b.add_features(features)?;
    Ok(b.finish())
}
