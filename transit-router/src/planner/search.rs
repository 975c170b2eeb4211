//! Time-dependent route search over the timetable graph.
//!
//! A label-setting search over `(stop, line last ridden)` states. Costs come
//! from real clock times: waiting for a ride's fixed departure plus the ride
//! itself, with a penalty whenever the line changes. Arrive-by queries run
//! the same search over the reversed graph with time flowing backwards.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::OnceLock;

use tracing::{debug, trace};

use crate::domain::MINUTES_PER_DAY;
use crate::timetable::TimetableGraph;

use super::config::{CostWeights, SearchConfig, SortBy};
use super::frontier::Frontier;
use super::itinerary::{Itinerary, PathStep};

/// Error from route search.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SearchError {
    /// Invalid route query
    #[error("invalid route query: {0}")]
    InvalidQuery(String),
}

/// A route query between two stops.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteQuery {
    pub start: String,
    pub goal: String,
    /// Departure clock (forward) or latest arrival clock (`reverse`).
    pub reference_minutes: f64,
    /// Arrive-by query.
    pub reverse: bool,
    pub sort_by: SortBy,
}

impl RouteQuery {
    /// Leave `start` no earlier than `minutes`.
    pub fn depart_at(start: impl Into<String>, goal: impl Into<String>, minutes: f64) -> Self {
        Self {
            start: start.into(),
            goal: goal.into(),
            reference_minutes: minutes,
            reverse: false,
            sort_by: SortBy::Time,
        }
    }

    /// Reach `goal` no later than `minutes`.
    pub fn arrive_by(start: impl Into<String>, goal: impl Into<String>, minutes: f64) -> Self {
        Self {
            reverse: true,
            ..Self::depart_at(start, goal, minutes)
        }
    }

    /// Choose the optimisation criterion.
    pub fn sorted_by(mut self, sort_by: SortBy) -> Self {
        self.sort_by = sort_by;
        self
    }

    /// Validate the query.
    pub fn validate(&self) -> Result<(), SearchError> {
        if !self.reference_minutes.is_finite() {
            return Err(SearchError::InvalidQuery(format!(
                "reference time must be finite, got {}",
                self.reference_minutes
            )));
        }
        if self.start.trim().is_empty() || self.goal.trim().is_empty() {
            return Err(SearchError::InvalidQuery(
                "start and goal must be named".to_string(),
            ));
        }
        Ok(())
    }
}

/// Route search over a loaded timetable.
///
/// Owns the graph and builds the reversed graph on the first arrive-by
/// query, reusing it afterwards. Safe to share between threads: searches
/// only read the graphs and keep their own state.
#[derive(Debug)]
pub struct TimetableRouter {
    graph: TimetableGraph,
    reversed: OnceLock<TimetableGraph>,
    config: SearchConfig,
}

impl TimetableRouter {
    /// Create a router over `graph`.
    pub fn new(graph: TimetableGraph, config: SearchConfig) -> Self {
        Self {
            graph,
            reversed: OnceLock::new(),
            config,
        }
    }

    /// The forward timetable graph.
    pub fn graph(&self) -> &TimetableGraph {
        &self.graph
    }

    /// The search configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Find the best itinerary for `query`, or `None` if the goal cannot
    /// be reached.
    pub fn route(&self, query: &RouteQuery) -> Result<Option<Itinerary>, SearchError> {
        query.validate()?;
        let weights = self.config.weights(query.sort_by);
        // Clocks past midnight ("25:00", or shifted by a walk) mean the same
        // time of day.
        let reference_minutes = query.reference_minutes.rem_euclid(MINUTES_PER_DAY);

        let itinerary = if query.reverse {
            let reversed = self.reversed.get_or_init(|| {
                debug!("Building reversed timetable graph");
                self.graph.reversed()
            });
            search_backward(reversed, &query.start, &query.goal, reference_minutes, weights)
        } else {
            search_forward(&self.graph, &query.start, &query.goal, reference_minutes, weights)
        };

        Ok(itinerary)
    }
}

/// Find a route from `start` to `goal`.
///
/// With `reverse == false`, leaves `start` no earlier than
/// `reference_minutes`. With `reverse == true`, reaches `goal` no later than
/// `reference_minutes`, materialising the reversed graph for this call (use
/// [`TimetableRouter`] to cache it). Steps always come back in forward
/// chronological order. `None` means no route exists.
///
/// # Examples
///
/// ```
/// use transit_router::planner::{SortBy, find_route};
/// use transit_router::timetable::TimetableGraph;
///
/// let mut graph = TimetableGraph::new();
/// graph.add_edge("A", "B", "1", 600.0, 10.0, None, None);
/// graph.add_edge("B", "C", "2", 615.0, 5.0, None, None);
///
/// let route = find_route(&graph, "A", "C", 590.0, false, SortBy::Time).unwrap();
/// assert_eq!(route.arrival_time(), Some(620.0));
///
/// let route = find_route(&graph, "A", "C", 630.0, true, SortBy::Time).unwrap();
/// assert_eq!(route.departure_time(), Some(600.0));
///
/// assert!(find_route(&graph, "C", "A", 590.0, false, SortBy::Time).is_none());
/// ```
pub fn find_route(
    graph: &TimetableGraph,
    start: &str,
    goal: &str,
    reference_minutes: f64,
    reverse: bool,
    sort_by: SortBy,
) -> Option<Itinerary> {
    let weights = SearchConfig::default().weights(sort_by);
    if reverse {
        search_backward(&graph.reversed(), start, goal, reference_minutes, weights)
    } else {
        search_forward(graph, start, goal, reference_minutes, weights)
    }
}

fn search_forward(
    graph: &TimetableGraph,
    start: &str,
    goal: &str,
    reference_minutes: f64,
    weights: CostWeights,
) -> Option<Itinerary> {
    let search = run(graph, start, goal, reference_minutes, Direction::Forward, weights)?;
    Some(search.forward_itinerary())
}

/// Arrive-by: search the reversed graph from `goal` back to `start`.
fn search_backward(
    reversed: &TimetableGraph,
    start: &str,
    goal: &str,
    reference_minutes: f64,
    weights: CostWeights,
) -> Option<Itinerary> {
    let search = run(reversed, goal, start, reference_minutes, Direction::Backward, weights)?;
    Some(search.backward_itinerary())
}

/// Which way the clock runs during a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    /// Over the reversed graph, where an edge's departure is the latest
    /// moment one may be at its source stop.
    Backward,
}

impl Direction {
    /// Effective boarding clock and wait for a ride with fixed `departure`
    /// when standing at its stop at `now`.
    ///
    /// The schedule repeats daily, so the ride also runs one day earlier and
    /// one day later. Forward takes the first of those at or after `now`,
    /// backward the last at or before it. A ride missed by more than a day
    /// is unusable.
    fn board(self, departure: f64, now: f64) -> Option<(f64, f64)> {
        let runs = [
            departure - MINUTES_PER_DAY,
            departure,
            departure + MINUTES_PER_DAY,
        ];
        let boarded = match self {
            Direction::Forward => runs.into_iter().filter(|&t| t >= now).reduce(f64::min),
            Direction::Backward => runs.into_iter().filter(|&t| t <= now).reduce(f64::max),
        }?;
        Some((boarded, (boarded - now).abs()))
    }

    /// Clock at the far end of a ride boarded at `boarded`.
    fn advance(self, boarded: f64, travel_time: f64) -> f64 {
        match self {
            Direction::Forward => boarded + travel_time,
            Direction::Backward => boarded - travel_time,
        }
    }
}

/// How a label was reached.
#[derive(Debug, Clone, Copy)]
struct Via<'g> {
    line: &'g str,
    /// Effective boarding clock of the ride, after any day wrap.
    boarded: f64,
}

#[derive(Debug, Clone, Copy)]
struct Label<'g> {
    stop: &'g str,
    via: Option<Via<'g>>,
    /// Clock at `stop`.
    time: f64,
    cost: f64,
    parent: Option<usize>,
}

impl<'g> Label<'g> {
    fn key(&self) -> (&'g str, Option<&'g str>) {
        (self.stop, self.via.map(|v| v.line))
    }
}

/// Finished search: the label arena and the label that reached the target.
struct Search<'g> {
    labels: Vec<Label<'g>>,
    found: usize,
}

impl<'g> Search<'g> {
    /// Labels from the search origin to the found label.
    fn chain(&self) -> Vec<&Label<'g>> {
        let mut chain = Vec::new();
        let mut cursor = Some(self.found);
        while let Some(idx) = cursor {
            let label = &self.labels[idx];
            chain.push(label);
            cursor = label.parent;
        }
        chain.reverse();
        chain
    }

    /// Forward search: the chain already runs start to goal.
    fn forward_itinerary(&self) -> Itinerary {
        let chain = self.chain();
        let mut steps = Vec::with_capacity(chain.len());

        for label in chain {
            let step = match label.via {
                None => PathStep::Origin {
                    stop: label.stop.to_string(),
                },
                Some(via) => PathStep::Travel {
                    stop: label.stop.to_string(),
                    line: via.line.to_string(),
                    departure: via.boarded,
                    arrival: label.time,
                },
            };
            steps.push(step);
        }

        Itinerary::new(steps)
    }

    /// Backward search: the chain runs goal to start over reversed rides.
    ///
    /// Walking it from the start label, each label describes the forward
    /// ride leaving its stop: it departs at the label's clock and reaches
    /// the next stop at the reversed ride's boarding clock.
    fn backward_itinerary(&self) -> Itinerary {
        let mut chain = self.chain();
        chain.reverse();

        let mut steps = Vec::with_capacity(chain.len());
        steps.push(PathStep::Origin {
            stop: chain[0].stop.to_string(),
        });

        for pair in chain.windows(2) {
            let (ride, next) = (pair[0], pair[1]);
            if let Some(via) = ride.via {
                steps.push(PathStep::Travel {
                    stop: next.stop.to_string(),
                    line: via.line.to_string(),
                    departure: ride.time,
                    arrival: via.boarded,
                });
            }
        }

        Itinerary::new(steps)
    }
}

/// Label-setting search from `origin` until `target` is settled.
fn run<'g>(
    graph: &'g TimetableGraph,
    origin: &'g str,
    target: &str,
    reference_minutes: f64,
    direction: Direction,
    weights: CostWeights,
) -> Option<Search<'g>> {
    let mut labels: Vec<Label<'g>> = vec![Label {
        stop: origin,
        via: None,
        time: reference_minutes,
        cost: 0.0,
        parent: None,
    }];
    let mut best: HashMap<(&'g str, Option<&'g str>), f64> = HashMap::new();
    best.insert(labels[0].key(), 0.0);

    let mut frontier = Frontier::new();
    frontier.push(0.0, 0);
    let mut settled = 0usize;

    while let Some(idx) = frontier.pop() {
        let label = labels[idx];

        // Superseded by a cheaper label for the same state.
        if best.get(&label.key()).is_some_and(|&c| label.cost > c) {
            continue;
        }
        settled += 1;

        if label.stop == target {
            debug!(
                origin,
                destination = target,
                ?direction,
                settled,
                labels = labels.len(),
                cost = label.cost,
                "Route found"
            );
            return Some(Search { labels, found: idx });
        }

        trace!(stop = label.stop, time = label.time, cost = label.cost, "Expanding label");

        let last_line = label.via.map(|v| v.line);
        for edge in graph.neighbors(label.stop) {
            let Some((boarded, wait)) = direction.board(edge.departure, label.time) else {
                continue;
            };

            let transfer = match last_line {
                Some(line) if line != edge.line => weights.transfer_penalty,
                _ => 0.0,
            };
            let cost =
                label.cost + weights.minute_weight * (wait + edge.travel_time) + transfer;

            let next = Label {
                stop: edge.target.as_str(),
                via: Some(Via {
                    line: edge.line.as_str(),
                    boarded,
                }),
                time: direction.advance(boarded, edge.travel_time),
                cost,
                parent: Some(idx),
            };

            match best.entry(next.key()) {
                Entry::Occupied(mut e) if cost < *e.get() => {
                    e.insert(cost);
                }
                Entry::Occupied(_) => continue,
                Entry::Vacant(e) => {
                    e.insert(cost);
                }
            }

            labels.push(next);
            frontier.push(cost, labels.len() - 1);
        }
    }

    debug!(origin, destination = target, ?direction, settled, "No route found");
    None
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod search_tests;
