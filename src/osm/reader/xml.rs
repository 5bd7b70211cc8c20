// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::io;
use std::str::from_utf8;

use quick_xml::events::{BytesStart, Event};

use super::model::{Feature, NodeRecord, WayRecord};

/// Parser is a trait for objects which can parse XML.
///
/// This trait only exists to fix the mismatch of
/// [quick_xml::Reader::read_event] when working on buffered data
/// and [quick_xml::Reader::read_event_into] when working on IO.
pub(super) trait Parser {
    fn read_event<'a>(&'a mut self) -> quick_xml::Result<Event<'a>>;
}

/// IoParser implements [Parser] over an [std::io::BufRead].
pub(super) struct IoParser<R: io::BufRead>(quick_xml::Reader<R>, Vec<u8>);

impl<R: io::BufRead> IoParser<R> {
    #[inline]
    fn new(reader: R) -> Self {
        Self(quick_xml::Reader::from_reader(reader), Vec::default())
    }
}

impl<R: io::BufRead> Parser for IoParser<R> {
    #[inline]
    fn read_event<'a>(&'a mut self) -> quick_xml::Result<Event<'a>> {
        self.1.clear();
        self.0.read_event_into(&mut self.1)
    }
}

/// BufParser implements [Parser] over a slice of bytes (`&[u8]`).
pub(super) struct BufParser<'a>(quick_xml::Reader<&'a [u8]>);

impl<'a> BufParser<'a> {
    #[inline]
    fn new(data: &'a [u8]) -> Self {
        Self(quick_xml::Reader::from_reader(data))
    }
}

impl<'a> Parser for BufParser<'a> {
    #[inline]
    fn read_event<'b>(&'b mut self) -> quick_xml::Result<Event<'b>> {
        self.0.read_event()
    }
}

/// Reader streams node and way [Features](Feature) from an
/// [OSM XML](https://wiki.openstreetmap.org/wiki/OSM_XML) file.
///
/// Only the attributes needed to build a graph are kept: node positions and `name` tags,
/// way node references, `name` tags and the road type tag (under `road_type_key`).
/// Relations and malformed elements are skipped.
pub(super) struct Reader<'k, P: Parser> {
    parser: P,
    road_type_key: &'k str,
    eof: bool,
}

impl<'k, P: Parser> Reader<'k, P> {
    #[inline]
    fn new(parser: P, road_type_key: &'k str) -> Self {
        Self {
            parser,
            road_type_key,
            eof: false,
        }
    }
}

impl<'k, P: Parser> Iterator for Reader<'k, P> {
    type Item = Result<Feature, quick_xml::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut f: Option<Feature> = None;

        while !self.eof {
            let event = match self.parser.read_event() {
                Ok(e) => e,
                Err(e) => return Some(Err(e)),
            };

            match event {
                Event::Empty(start) => match start.local_name().as_ref() {
                    b"node" => {
                        if let Some(n) = parse_node(&start) {
                            return Some(Ok(Feature::Node(n)));
                        }
                    }
                    // "way" can't be self-closing
                    b"tag" => {
                        if let (Some(f), Some((k, v))) = (f.as_mut(), parse_tag(&start)) {
                            apply_tag(f, self.road_type_key, k, v);
                        }
                    }
                    b"nd" => {
                        if let (Some(Feature::Way(w)), Some(ref_)) = (f.as_mut(), parse_nd(&start))
                        {
                            w.nodes.push(ref_);
                        }
                    }
                    _ => {}
                },

                Event::Start(start) => match start.local_name().as_ref() {
                    b"node" => f = parse_node(&start).map(Feature::Node),
                    b"way" => f = parse_way(&start).map(Feature::Way),
                    // "tag" and "nd" must be self-closing
                    _ => {}
                },

                Event::End(end) => match end.local_name().as_ref() {
                    b"node" | b"way" => {
                        if let Some(f) = f.take() {
                            return Some(Ok(f));
                        }
                    }
                    _ => {}
                },

                Event::Eof => {
                    self.eof = true;
                }

                _ => {}
            }
        }

        f.map(Ok)
    }
}

impl<'a, 'k> Reader<'k, BufParser<'a>> {
    #[inline]
    pub(super) fn from_buffer(data: &'a [u8], road_type_key: &'k str) -> Self {
        Self::new(BufParser::new(data), road_type_key)
    }
}

impl<'k, R: io::BufRead> Reader<'k, IoParser<R>> {
    #[inline]
    pub(super) fn from_io(reader: R, road_type_key: &'k str) -> Self {
        Self::new(IoParser::new(reader), road_type_key)
    }
}

fn apply_tag(f: &mut Feature, road_type_key: &str, k: String, v: String) {
    match f {
        Feature::Node(n) => {
            if k == "name" {
                n.name = Some(v);
            }
        }
        Feature::Way(w) => {
            if k == "name" {
                w.name = Some(v);
            } else if k == road_type_key {
                w.road_type = Some(v);
            }
        }
    }
}

fn parse_node(start: &BytesStart<'_>) -> Option<NodeRecord> {
    let mut id: i64 = 0;
    let mut lat = f64::NAN;
    let mut lon = f64::NAN;

    for attr in start.attributes() {
        let attr = attr.ok()?;
        match attr.key.as_ref() {
            b"id" => id = from_utf8(&attr.value).ok()?.parse().ok()?,
            b"lat" => lat = from_utf8(&attr.value).ok()?.parse().ok()?,
            b"lon" => lon = from_utf8(&attr.value).ok()?.parse().ok()?,
            _ => {}
        }
    }

    if id != 0 && lat.is_finite() && lon.is_finite() {
        Some(NodeRecord {
            id,
            lon,
            lat,
            name: None,
        })
    } else {
        log::debug!("skipping malformed node element (id {id})");
        None
    }
}

fn parse_way(start: &BytesStart<'_>) -> Option<WayRecord> {
    let mut id: i64 = 0;

    for attr in start.attributes() {
        let attr = attr.ok()?;
        if attr.key.as_ref() == b"id" {
            id = from_utf8(&attr.value).ok()?.parse().ok()?;
        }
    }

    if id != 0 {
        Some(WayRecord {
            id,
            nodes: Vec::default(),
            road_type: None,
            name: None,
        })
    } else {
        log::debug!("skipping way element without an id");
        None
    }
}

fn parse_tag(start: &BytesStart<'_>) -> Option<(String, String)> {
    let mut k = None;
    let mut v = None;

    for attr in start.attributes() {
        let attr = attr.ok()?;
        match attr.key.as_ref() {
            b"k" => k = Some(attr.unescape_value().ok()?.into_owned()),
            b"v" => v = Some(attr.unescape_value().ok()?.into_owned()),
            _ => {}
        }
    }

    k.map(|k| (k, v.unwrap_or_default()))
}

fn parse_nd(start: &BytesStart<'_>) -> Option<i64> {
    let mut ref_: i64 = 0;

    for attr in start.attributes() {
        let attr = attr.ok()?;
        if attr.key.as_ref() == b"ref" {
            ref_ = from_utf8(&attr.value).ok()?.parse().ok()?;
        }
    }

    if ref_ != 0 {
        Some(ref_)
    } else {
        None
    }
}
