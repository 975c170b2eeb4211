//! Untimed best-first search.
//!
//! Ignores departure clocks and treats every ride as available whenever it
//! is needed, so only ride durations and line changes count. A straight
//! line lower bound on the remaining travel guides the search (A*). Useful
//! for networks described by topology alone; timetabled queries go through
//! [`find_route`](super::find_route).

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use serde::Serialize;
use tracing::debug;

use crate::domain::Coordinates;
use crate::timetable::TimetableGraph;

use super::config::CostWeights;
use super::frontier::Frontier;

/// A stop on an untimed route and the line used to reach it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineStep {
    pub stop: String,
    /// `None` for the starting stop.
    pub line: Option<String>,
}

#[derive(Debug, Clone, Copy)]
struct Node<'g> {
    stop: &'g str,
    line: Option<&'g str>,
    cost: f64,
    parent: Option<usize>,
}

/// Cheapest untimed route from `start` to `goal`, or `None`.
///
/// Edge cost is `minute_weight * travel_time`, plus `transfer_penalty` on
/// a line change. The heuristic is the haversine distance to `goal` covered
/// at `max_speed_kmh`; it is zero when either stop lacks coordinates.
///
/// # Examples
///
/// ```
/// use transit_router::planner::{CostWeights, find_route_heuristic};
/// use transit_router::timetable::TimetableGraph;
///
/// let mut graph = TimetableGraph::new();
/// graph.add_edge("Karlstor", "Europaplatz", "2", 0.0, 3.0, None, None);
/// graph.add_edge("Europaplatz", "Mühlburger Tor", "2", 0.0, 5.0, None, None);
///
/// let route = find_route_heuristic(&graph, "Karlstor", "Mühlburger Tor", CostWeights::new(1.0, 0.1), 160.0)
///     .unwrap();
/// assert_eq!(route.len(), 3);
/// assert_eq!(route[0].line, None);
/// assert_eq!(route[2].line.as_deref(), Some("2"));
/// ```
pub fn find_route_heuristic(
    graph: &TimetableGraph,
    start: &str,
    goal: &str,
    weights: CostWeights,
    max_speed_kmh: f64,
) -> Option<Vec<LineStep>> {
    let goal_coords = graph.coordinates(goal);
    let estimate = |stop: &str| -> f64 {
        match (graph.coordinates(stop), goal_coords) {
            (Some(here), Some(there)) if max_speed_kmh > 0.0 => {
                straight_line_minutes(here, there, max_speed_kmh) * weights.minute_weight
            }
            _ => 0.0,
        }
    };

    let mut nodes = vec![Node {
        stop: start,
        line: None,
        cost: 0.0,
        parent: None,
    }];
    let mut best: HashMap<(&str, Option<&str>), f64> = HashMap::new();
    best.insert((start, None), 0.0);

    let mut frontier = Frontier::new();
    frontier.push(estimate(start), 0);

    while let Some(idx) = frontier.pop() {
        let node = nodes[idx];
        if best.get(&(node.stop, node.line)).is_some_and(|&c| node.cost > c) {
            continue;
        }

        if node.stop == goal {
            debug!(start, goal, expanded = nodes.len(), "Untimed route found");
            return Some(reconstruct(&nodes, idx));
        }

        for edge in graph.neighbors(node.stop) {
            let transfer = match node.line {
                Some(line) if line != edge.line => weights.transfer_penalty,
                _ => 0.0,
            };
            let cost = node.cost + edge.travel_time * weights.minute_weight + transfer;
            let key = (edge.target.as_str(), Some(edge.line.as_str()));

            match best.entry(key) {
                Entry::Occupied(mut e) if cost < *e.get() => {
                    e.insert(cost);
                }
                Entry::Occupied(_) => continue,
                Entry::Vacant(e) => {
                    e.insert(cost);
                }
            }

            nodes.push(Node {
                stop: key.0,
                line: key.1,
                cost,
                parent: Some(idx),
            });
            frontier.push(cost + estimate(key.0), nodes.len() - 1);
        }
    }

    debug!(start, goal, "No untimed route found");
    None
}

/// Minutes needed to cover the great-circle distance at `speed_kmh`.
fn straight_line_minutes(a: Coordinates, b: Coordinates, speed_kmh: f64) -> f64 {
    let km = a.distance_m(&b) / 1000.0;
    km / speed_kmh * 60.0
}

fn reconstruct(nodes: &[Node<'_>], found: usize) -> Vec<LineStep> {
    let mut steps = Vec::new();
    let mut cursor = Some(found);
    while let Some(idx) = cursor {
        let node = &nodes[idx];
        steps.push(LineStep {
            stop: node.stop.to_string(),
            line: node.line.map(str::to_string),
        });
        cursor = node.parent;
    }
    steps.reverse();
    steps
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The tram corridor around Karlsruhe Europaplatz.
    fn tram_graph() -> TimetableGraph {
        let mut g = TimetableGraph::new();
        for (from, to, line, minutes) in [
            ("Europaplatz/Postgalerie", "Mühlburger Tor", "2", 5.0),
            ("Europaplatz/Postgalerie", "Mühlburger Tor", "9", 5.0),
            ("Europaplatz/Postgalerie", "Mühlburger Tor", "1", 3.0),
            ("Mühlburger Tor", "Yorkstraße", "2", 3.0),
            ("Mühlburger Tor", "Yorkstraße", "9", 3.0),
            ("Europaplatz/Postgalerie", "Europaplatz", "2", 1.0),
            ("Europaplatz", "Europaplatz/Postgalerie", "2", 1.0),
            ("Europaplatz/Postgalerie", "Europaplatz", "9", 1.0),
            ("Europaplatz", "Europaplatz/Postgalerie", "9", 1.0),
            ("Europaplatz", "Karlstor", "2", 3.0),
            ("Karlstor", "Europaplatz", "2", 3.0),
            ("Europaplatz", "Karlstor", "9", 3.0),
            ("Karlstor", "Europaplatz", "9", 3.0),
            ("Yorkstraße", "Händelstraße", "9", 2.0),
        ] {
            g.add_edge(from, to, line, 0.0, minutes, None, None);
        }
        g
    }

    fn lines(route: &[LineStep]) -> Vec<Option<&str>> {
        route.iter().map(|s| s.line.as_deref()).collect()
    }

    #[test]
    fn fastest_route_takes_quick_line() {
        let g = tram_graph();
        let route =
            find_route_heuristic(&g, "Karlstor", "Mühlburger Tor", CostWeights::new(1.0, 0.1), 160.0)
                .unwrap();

        let stops: Vec<&str> = route.iter().map(|s| s.stop.as_str()).collect();
        assert_eq!(
            stops,
            vec!["Karlstor", "Europaplatz", "Europaplatz/Postgalerie", "Mühlburger Tor"]
        );
        // Line 1 saves two minutes, worth a transfer at a small penalty.
        assert_eq!(lines(&route), vec![None, Some("2"), Some("2"), Some("1")]);
    }

    #[test]
    fn transfer_averse_route_stays_on_line() {
        let g = tram_graph();
        let route = find_route_heuristic(
            &g,
            "Karlstor",
            "Mühlburger Tor",
            CostWeights::new(1.0, 100.0),
            160.0,
        )
        .unwrap();

        assert_eq!(lines(&route), vec![None, Some("2"), Some("2"), Some("2")]);
    }

    #[test]
    fn unreachable_goal() {
        let g = tram_graph();
        assert!(
            find_route_heuristic(&g, "Händelstraße", "Karlstor", CostWeights::new(1.0, 0.1), 160.0)
                .is_none()
        );
        assert!(find_route_heuristic(&g, "Karlstor", "Nowhere", CostWeights::new(1.0, 0.1), 160.0).is_none());
    }

    #[test]
    fn start_is_goal() {
        let g = tram_graph();
        let route =
            find_route_heuristic(&g, "Karlstor", "Karlstor", CostWeights::new(1.0, 0.1), 160.0).unwrap();
        assert_eq!(route, vec![LineStep { stop: "Karlstor".into(), line: None }]);
    }

    #[test]
    fn coordinates_guide_without_changing_result() {
        let mut g = TimetableGraph::new();
        let a = Coordinates::new(49.0, 8.40);
        let b = Coordinates::new(49.0, 8.45);
        let c = Coordinates::new(49.0, 8.50);
        let detour = Coordinates::new(49.2, 8.40);
        g.add_edge("A", "B", "1", 0.0, 4.0, Some(a), Some(b));
        g.add_edge("B", "C", "1", 0.0, 4.0, None, Some(c));
        g.add_edge("A", "D", "2", 0.0, 1.0, None, Some(detour));
        g.add_edge("D", "C", "2", 0.0, 20.0, None, None);

        let route = find_route_heuristic(&g, "A", "C", CostWeights::new(1.0, 0.1), 160.0).unwrap();
        let stops: Vec<&str> = route.iter().map(|s| s.stop.as_str()).collect();
        assert_eq!(stops, vec!["A", "B", "C"]);
    }

    #[test]
    fn straight_line_bound() {
        let a = Coordinates::new(49.0, 8.4);
        let b = Coordinates::new(50.0, 8.4);
        // ~111 km at 111 km/h is about an hour
        let minutes = straight_line_minutes(a, b, 111.195);
        assert!((minutes - 60.0).abs() < 0.5);
    }
}
