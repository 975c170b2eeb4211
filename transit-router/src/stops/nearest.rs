//! Nearest stop lookup by position.

use crate::domain::Coordinates;
use crate::timetable::TimetableGraph;

/// Name of the stop closest to `coords` (haversine distance).
///
/// Stops without known coordinates are ignored. Returns `None` if no stop
/// has coordinates. Equal distances resolve to the earliest-loaded stop.
///
/// A linear scan is plenty for a city network; there is no spatial index.
pub fn find_nearest_stop<'g>(graph: &'g TimetableGraph, coords: Coordinates) -> Option<&'g str> {
    nearest_with_distance(graph, coords).map(|(name, _)| name)
}

/// Like [`find_nearest_stop`], also returning the distance in metres.
pub fn nearest_with_distance(
    graph: &TimetableGraph,
    coords: Coordinates,
) -> Option<(&str, f64)> {
    let mut best: Option<(&str, f64)> = None;

    for stop in graph.stops() {
        let Some(stop_coords) = stop.coords else {
            continue;
        };
        let distance = coords.distance_m(&stop_coords);
        if best.is_none_or(|(_, best_distance)| distance < best_distance) {
            best = Some((stop.name.as_str(), distance));
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_graph() -> TimetableGraph {
        let mut g = TimetableGraph::new();
        g.add_edge(
            "Oberderdingen Freibad",
            "Knittlingen Kreuz",
            "734",
            872.0,
            9.0,
            Some(Coordinates::new(49.05840313, 8.79699496)),
            Some(Coordinates::new(49.0232174, 8.7574529)),
        );
        g.add_edge("Knittlingen Kreuz", "Geisterhalt", "734", 881.0, 3.0, None, None);
        g
    }

    #[test]
    fn finds_closest_stop() {
        let g = sample_graph();
        assert_eq!(
            find_nearest_stop(&g, Coordinates::new(49.0584, 8.7970)),
            Some("Oberderdingen Freibad")
        );
        assert_eq!(
            find_nearest_stop(&g, Coordinates::new(49.02, 8.75)),
            Some("Knittlingen Kreuz")
        );
    }

    #[test]
    fn own_coordinates_return_same_stop() {
        let g = sample_graph();
        for stop in g.stops() {
            if let Some(coords) = stop.coords {
                assert_eq!(find_nearest_stop(&g, coords), Some(stop.name.as_str()));
            }
        }
    }

    #[test]
    fn stops_without_coordinates_ignored() {
        let g = sample_graph();
        let (name, distance) = nearest_with_distance(&g, Coordinates::new(0.0, 0.0)).unwrap();
        assert_ne!(name, "Geisterhalt");
        assert!(distance > 1_000_000.0);
    }

    #[test]
    fn no_coordinates_means_not_found() {
        let mut g = TimetableGraph::new();
        g.add_edge("A", "B", "1", 0.0, 1.0, None, None);
        assert_eq!(find_nearest_stop(&g, Coordinates::new(49.0, 8.0)), None);
        assert_eq!(find_nearest_stop(&TimetableGraph::new(), Coordinates::new(49.0, 8.0)), None);
    }

    #[test]
    fn equal_distance_prefers_first_stop() {
        let mut g = TimetableGraph::new();
        g.add_edge("West", "East", "1", 0.0, 1.0, Some(Coordinates::new(0.0, -1.0)), Some(Coordinates::new(0.0, 1.0)));
        assert_eq!(find_nearest_stop(&g, Coordinates::new(0.0, 0.0)), Some("West"));
    }
}
