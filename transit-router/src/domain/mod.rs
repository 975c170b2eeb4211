//! Domain value types shared by the timetable, planner and collaborators.
//!
//! Times are minutes since midnight (`f64`), positions are WGS84
//! coordinates. Parsing is strict: malformed text is always an error,
//! never a silent default.

mod coordinates;
mod time;

pub use coordinates::Coordinates;
pub use time::{
    MINUTES_PER_DAY, ParseError, minutes_to_hhmm, now_minutes, parse_time_to_minutes,
    parse_travel_time,
};
