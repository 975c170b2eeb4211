//! Route planning over the timetable graph.
//!
//! The main entry point is [`TimetableRouter`] (or [`find_route`] for one-off
//! queries), a time-dependent search that honours each ride's departure
//! clock and answers both "depart at" and "arrive by" questions.
//! [`find_route_heuristic`] is an untimed A* variant for topology-only
//! routing.

mod config;
mod frontier;
mod heuristic;
mod itinerary;
mod search;

pub use config::{CostWeights, InvalidSortBy, SearchConfig, SortBy};
pub use heuristic::{LineStep, find_route_heuristic};
pub use itinerary::{Itinerary, PathStep};
pub use search::{RouteQuery, SearchError, TimetableRouter, find_route};
