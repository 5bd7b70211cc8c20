// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

/// Describes which OSM ways become edges of a [Graph](crate::Graph).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Profile<'a> {
    /// Human readable name of the routing profile. Not used for data interpretation.
    pub name: &'a str,

    /// Key of the OSM tag holding the road type of a way, customary "highway".
    pub key: &'a str,

    /// Road types (values under [Profile::key]) of ways which can be used for routing.
    /// Ways with any other, or without any, road type contribute no edges.
    pub accepted: &'a [&'a str],
}

impl<'a> Profile<'a> {
    /// Checks if a way with the given road type can be used for routing.
    pub fn is_accepted(&self, road_type: Option<&str>) -> bool {
        road_type.is_some_and(|t| self.accepted.contains(&t))
    }
}

/// Routing [Profile] for motor vehicles: arterial, residential and link roads,
/// without service roads, tracks, foot- and cycleways.
pub const CAR_PROFILE: Profile = Profile {
    name: "motorcar",
    key: "highway",
    accepted: &[
        "motorway",
        "trunk",
        "primary",
        "secondary",
        "tertiary",
        "unclassified",
        "residential",
        "living_street",
        "motorway_link",
        "trunk_link",
        "primary_link",
        "secondary_link",
        "tertiary_link",
    ],
};
