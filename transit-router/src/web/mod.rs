//! Web layer for the journey router.
//!
//! Provides HTTP endpoints for resolving stops, planning journeys and
//! drawing them on a map.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
