//! Time-expanded timetable graph.
//!
//! Each scheduled ride segment is its own edge with a fixed departure
//! clock. Parallel edges on the same line are never merged: the search's
//! `departure >= now` check does the scheduling.

use std::collections::HashMap;

use crate::domain::Coordinates;

/// One scheduled, directed ride from the owning stop to `target`.
#[derive(Debug, Clone, PartialEq)]
pub struct RideEdge {
    /// Name of the stop this ride arrives at.
    pub target: String,
    /// Line identifier (e.g. "S1", "2").
    pub line: String,
    /// Departure clock in minutes since midnight. May be >= 1440 for
    /// services running past midnight.
    pub departure: f64,
    /// Ride duration in minutes.
    pub travel_time: f64,
}

impl RideEdge {
    /// Clock time at which the ride reaches `target`.
    pub fn arrival(&self) -> f64 {
        self.departure + self.travel_time
    }
}

/// A named stop and its outgoing rides, in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    pub name: String,
    pub coords: Option<Coordinates>,
    pub edges: Vec<RideEdge>,
}

impl Stop {
    fn new(name: &str, coords: Option<Coordinates>) -> Self {
        Self {
            name: name.to_string(),
            coords,
            edges: Vec::new(),
        }
    }
}

/// Directed multigraph of stops and scheduled rides.
///
/// Stops are kept in first-seen order so that scans over the graph (nearest
/// stop, fuzzy name matching) break ties deterministically.
#[derive(Debug, Clone, Default)]
pub struct TimetableGraph {
    stops: Vec<Stop>,
    index: HashMap<String, usize>,
}

impl TimetableGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a scheduled ride, creating either stop if it is new.
    ///
    /// Coordinates are only ever filled in: passing `None` for a stop that
    /// already has a position leaves it untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use transit_router::domain::Coordinates;
    /// use transit_router::timetable::TimetableGraph;
    ///
    /// let mut graph = TimetableGraph::new();
    /// graph.add_edge("A", "B", "1", 600.0, 5.0, Some(Coordinates::new(49.0, 8.4)), None);
    /// graph.add_edge("A", "C", "2", 610.0, 7.0, None, None);
    ///
    /// assert_eq!(graph.neighbors("A").len(), 2);
    /// assert!(graph.neighbors("B").is_empty());
    /// assert_eq!(graph.coordinates("A"), Some(Coordinates::new(49.0, 8.4)));
    /// ```
    #[allow(clippy::too_many_arguments)]
    pub fn add_edge(
        &mut self,
        source: &str,
        target: &str,
        line: &str,
        departure: f64,
        travel_time: f64,
        source_coords: Option<Coordinates>,
        target_coords: Option<Coordinates>,
    ) {
        let source_idx = self.ensure_stop(source, source_coords);
        self.ensure_stop(target, target_coords);

        self.stops[source_idx].edges.push(RideEdge {
            target: target.to_string(),
            line: line.to_string(),
            departure,
            travel_time,
        });
    }

    /// Outgoing rides of `stop`. Unknown stops are dead ends, not errors.
    pub fn neighbors(&self, stop: &str) -> &[RideEdge] {
        self.stop(stop).map(|s| s.edges.as_slice()).unwrap_or(&[])
    }

    /// Build the graph with every ride turned around.
    ///
    /// A ride `u -> v` departing at `dep` becomes `v -> u` departing at
    /// `dep + travel_time`, i.e. the clock at which the original ride
    /// reaches `v`. Searching this graph backwards in time answers
    /// arrive-by queries. Stop coordinates are carried over.
    pub fn reversed(&self) -> TimetableGraph {
        let mut rev = TimetableGraph::new();

        // Register stops first so the reversed graph keeps the same stop order.
        for stop in &self.stops {
            rev.ensure_stop(&stop.name, stop.coords);
        }

        for stop in &self.stops {
            for edge in &stop.edges {
                rev.add_edge(
                    &edge.target,
                    &stop.name,
                    &edge.line,
                    edge.arrival(),
                    edge.travel_time,
                    None,
                    None,
                );
            }
        }

        rev
    }

    /// Look up a stop by exact name.
    pub fn stop(&self, name: &str) -> Option<&Stop> {
        self.index.get(name).map(|&i| &self.stops[i])
    }

    /// Whether a stop with this exact name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Known coordinates of a stop, if any.
    pub fn coordinates(&self, name: &str) -> Option<Coordinates> {
        self.stop(name).and_then(|s| s.coords)
    }

    /// All stops in first-seen order.
    pub fn stops(&self) -> impl Iterator<Item = &Stop> {
        self.stops.iter()
    }

    /// All stop names in first-seen order.
    pub fn stop_names(&self) -> Vec<&str> {
        self.stops.iter().map(|s| s.name.as_str()).collect()
    }

    /// Number of stops.
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Whether the graph has no stops.
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Total number of ride edges.
    pub fn edge_count(&self) -> usize {
        self.stops.iter().map(|s| s.edges.len()).sum()
    }

    fn ensure_stop(&mut self, name: &str, coords: Option<Coordinates>) -> usize {
        match self.index.get(name) {
            Some(&idx) => {
                if coords.is_some() {
                    self.stops[idx].coords = coords;
                }
                idx
            }
            None => {
                let idx = self.stops.len();
                self.stops.push(Stop::new(name, coords));
                self.index.insert(name.to_string(), idx);
                idx
            }
        }
    }
}
