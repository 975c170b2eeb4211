//! Itinerary types returned by the route search.

use serde::Serialize;

/// One step of an itinerary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PathStep {
    /// Where the journey starts. No line has been taken yet.
    Origin { stop: String },
    /// A ride on `line` that boards at `departure` and reaches `stop` at
    /// `arrival` (minutes since the reference midnight, unwrapped).
    Travel {
        stop: String,
        line: String,
        departure: f64,
        arrival: f64,
    },
}

impl PathStep {
    /// The stop this step ends at.
    pub fn stop(&self) -> &str {
        match self {
            PathStep::Origin { stop } | PathStep::Travel { stop, .. } => stop,
        }
    }

    /// The line ridden to reach this step's stop.
    pub fn line(&self) -> Option<&str> {
        match self {
            PathStep::Origin { .. } => None,
            PathStep::Travel { line, .. } => Some(line),
        }
    }

    /// Arrival clock at this step's stop, if it was reached by a ride.
    pub fn arrival(&self) -> Option<f64> {
        match self {
            PathStep::Origin { .. } => None,
            PathStep::Travel { arrival, .. } => Some(*arrival),
        }
    }
}

/// A complete journey from origin to destination, in chronological order
/// regardless of whether it was found by a depart-at or arrive-by search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Itinerary {
    steps: Vec<PathStep>,
}

impl Itinerary {
    /// Wrap steps; the first step is always the origin.
    pub(crate) fn new(steps: Vec<PathStep>) -> Self {
        debug_assert!(matches!(steps.first(), Some(PathStep::Origin { .. })));
        Self { steps }
    }

    /// All steps, origin first.
    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    /// The ride steps (everything after the origin).
    pub fn rides(&self) -> impl Iterator<Item = &PathStep> {
        self.steps.iter().skip(1)
    }

    /// Stop the journey starts at.
    pub fn origin(&self) -> &str {
        self.steps.first().map(PathStep::stop).unwrap_or_default()
    }

    /// Stop the journey ends at.
    pub fn destination(&self) -> &str {
        self.steps.last().map(PathStep::stop).unwrap_or_default()
    }

    /// Boarding clock of the first ride, or `None` if origin is destination.
    pub fn departure_time(&self) -> Option<f64> {
        self.rides().find_map(|step| match step {
            PathStep::Travel { departure, .. } => Some(*departure),
            PathStep::Origin { .. } => None,
        })
    }

    /// Arrival clock at the destination, or `None` if origin is destination.
    pub fn arrival_time(&self) -> Option<f64> {
        self.steps.last().and_then(PathStep::arrival)
    }

    /// Number of line changes between consecutive rides.
    pub fn transfer_count(&self) -> usize {
        let lines: Vec<&str> = self.rides().filter_map(PathStep::line).collect();
        lines.windows(2).filter(|w| w[0] != w[1]).count()
    }

    /// Whether the journey needs no ride at all.
    pub fn is_trivial(&self) -> bool {
        self.steps.len() == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn travel(stop: &str, line: &str, departure: f64, arrival: f64) -> PathStep {
        PathStep::Travel {
            stop: stop.to_string(),
            line: line.to_string(),
            departure,
            arrival,
        }
    }

    fn origin(stop: &str) -> PathStep {
        PathStep::Origin {
            stop: stop.to_string(),
        }
    }

    #[test]
    fn accessors() {
        let it = Itinerary::new(vec![
            origin("A"),
            travel("B", "1", 600.0, 605.0),
            travel("C", "1", 605.0, 610.0),
            travel("D", "2", 615.0, 620.0),
        ]);

        assert_eq!(it.origin(), "A");
        assert_eq!(it.destination(), "D");
        assert_eq!(it.departure_time(), Some(600.0));
        assert_eq!(it.arrival_time(), Some(620.0));
        assert_eq!(it.transfer_count(), 1);
        assert_eq!(it.rides().count(), 3);
        assert!(!it.is_trivial());
    }

    #[test]
    fn trivial_itinerary() {
        let it = Itinerary::new(vec![origin("A")]);
        assert_eq!(it.origin(), "A");
        assert_eq!(it.destination(), "A");
        assert_eq!(it.departure_time(), None);
        assert_eq!(it.arrival_time(), None);
        assert_eq!(it.transfer_count(), 0);
        assert!(it.is_trivial());
    }

    #[test]
    fn step_accessors() {
        let step = travel("B", "S1", 1.0, 2.0);
        assert_eq!(step.stop(), "B");
        assert_eq!(step.line(), Some("S1"));
        assert_eq!(step.arrival(), Some(2.0));

        let step = origin("A");
        assert_eq!(step.line(), None);
        assert_eq!(step.arrival(), None);
    }

    #[test]
    fn serializes_tagged() {
        let json = serde_json::to_value(travel("B", "S1", 1.0, 2.0)).unwrap();
        assert_eq!(json["kind"], "travel");
        assert_eq!(json["line"], "S1");

        let json = serde_json::to_value(origin("A")).unwrap();
        assert_eq!(json["kind"], "origin");
        assert_eq!(json["stop"], "A");
    }
}
