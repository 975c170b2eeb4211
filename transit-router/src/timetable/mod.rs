//! Timetable graph and the CSV loader that builds it.
//!
//! The graph is built once at startup and is read-only afterwards; every
//! query borrows it.

mod error;
mod graph;
mod loader;

pub use error::LoadError;
pub use graph::{RideEdge, Stop, TimetableGraph};
pub use loader::{LoadedTimetable, LoaderConfig, load_timetable, load_timetable_from_reader};
