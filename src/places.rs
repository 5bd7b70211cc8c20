// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::{BTreeMap, BTreeSet};

use crate::{Graph, PrefixIndex};

/// Normalizes a place name for searching: lowercases it and
/// removes everything except ASCII letters, digits and spaces.
///
/// ```
/// assert_eq!(bearmaps::clean_name("Peet's Coffee & Tea"), "peets coffee  tea");
/// ```
pub fn clean_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Named vertex of the [Graph].
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub id: i64,
    pub lon: f64,
    pub lat: f64,
    pub name: String,
}

#[derive(Debug, Default, Clone)]
struct Entry {
    names: BTreeSet<String>,
    locations: Vec<Location>,
}

/// PlaceIndex resolves place names (names of graph vertices) for autocompletion and search.
///
/// All lookups are done on [cleaned](clean_name) names, so queries are case-insensitive
/// and ignore punctuation.
#[derive(Debug, Default, Clone)]
pub struct PlaceIndex {
    prefixes: PrefixIndex,
    entries: BTreeMap<String, Entry>,
}

impl PlaceIndex {
    /// Indexes every named vertex of the graph.
    pub fn from_graph(g: &Graph) -> Self {
        let mut index = Self::default();

        for v in g.iter() {
            let Some(name) = v.name.as_deref() else {
                continue;
            };
            let cleaned = clean_name(name);
            index.prefixes.insert(&cleaned);

            let entry = index.entries.entry(cleaned).or_default();
            entry.names.insert(name.to_string());
            entry.locations.push(Location {
                id: v.id,
                lon: v.lon,
                lat: v.lat,
                name: name.to_string(),
            });
        }

        log::info!("indexed {} distinct place names", index.prefixes.len());
        index
    }

    /// Returns the number of distinct cleaned names.
    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    /// Returns full (uncleaned) names of all places whose cleaned name
    /// starts with the cleaned `prefix`, sorted and without duplicates.
    pub fn names_by_prefix(&self, prefix: &str) -> Vec<String> {
        let names: BTreeSet<&String> = self
            .prefixes
            .search_prefix(&clean_name(prefix))
            .iter()
            .filter_map(|cleaned| self.entries.get(cleaned))
            .flat_map(|entry| entry.names.iter())
            .collect();

        names.into_iter().cloned().collect()
    }

    /// Returns all places whose cleaned name is equal to the cleaned `name`,
    /// ordered by vertex id.
    pub fn locations(&self, name: &str) -> Vec<Location> {
        self.entries
            .get(&clean_name(name))
            .map(|entry| entry.locations.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::tiny_graph;
    use crate::Vertex;

    #[test]
    fn cleaning() {
        assert_eq!(clean_name("Top Dog"), "top dog");
        assert_eq!(clean_name("Peet's Coffee & Tea"), "peets coffee  tea");
        assert_eq!(clean_name("Café 1999!"), "caf 1999");
        assert_eq!(clean_name(""), "");
    }

    #[test]
    fn tiny_names_by_prefix() {
        let idx = PlaceIndex::from_graph(&tiny_graph());
        assert_eq!(idx.len(), 4);

        assert_eq!(
            idx.names_by_prefix("to"),
            vec!["Tolman Hall", "Top Dog", "Top Dog Annex"],
        );
        assert_eq!(idx.names_by_prefix("TOP dog"), vec!["Top Dog", "Top Dog Annex"]);
        assert_eq!(idx.names_by_prefix("peet's"), vec!["Peet's Coffee & Tea"]);
        assert_eq!(idx.names_by_prefix("zz"), Vec::<String>::new());
        assert_eq!(idx.names_by_prefix("").len(), 4);
    }

    #[test]
    fn tiny_locations() {
        let idx = PlaceIndex::from_graph(&tiny_graph());

        let tolman = idx.locations("tolman hall");
        assert_eq!(tolman.iter().map(|l| l.id).collect::<Vec<_>>(), vec![11, 66]);
        assert!(tolman.iter().all(|l| l.name == "Tolman Hall"));
        assert_eq!((tolman[1].lon, tolman[1].lat), (0.6, 38.6));

        let peets = idx.locations("peets coffee  tea");
        assert_eq!(peets.len(), 1);
        assert_eq!(peets[0].id, 55);

        assert!(idx.locations("Top").is_empty());
    }

    #[test]
    fn different_spellings_share_a_cleaned_name() {
        let mut g = Graph::new();
        g.add_vertex(Vertex::new(1, 0.0, 0.0).with_name("Sather Gate"));
        g.add_vertex(Vertex::new(2, 0.0, 0.0).with_name("SATHER GATE!"));
        g.add_vertex(Vertex::new(3, 0.0, 0.0));

        let idx = PlaceIndex::from_graph(&g);
        assert_eq!(idx.len(), 1);
        assert_eq!(idx.names_by_prefix("sat"), vec!["SATHER GATE!", "Sather Gate"]);
        assert_eq!(idx.locations("sather gate").len(), 2);
    }

    #[test]
    fn empty_graph() {
        let idx = PlaceIndex::from_graph(&Graph::new());
        assert!(idx.is_empty());
        assert!(idx.names_by_prefix("").is_empty());
    }
}
