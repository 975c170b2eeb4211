//! Scheduled transit journey router.
//!
//! Loads a timetable of scheduled rides, then answers: "when do I get from
//! here to there?" Departure-time and arrive-by queries are both supported,
//! ranked by travel time or by number of line changes. Free-text endpoints
//! are matched to stops or geocoded, with a walk to the nearest stop.

pub mod config;
pub mod domain;
pub mod geocode;
pub mod journey;
pub mod planner;
pub mod render;
pub mod road;
pub mod stops;
pub mod timetable;
pub mod web;
