//! Stop lookup: fuzzy name resolution and nearest stop by position.
//!
//! Neither lookup fails. "Nothing matched" is reported as `None`.

mod nearest;
mod resolve;

pub use nearest::{find_nearest_stop, nearest_with_distance};
pub use resolve::{DEFAULT_CUTOFF, STRICT_CUTOFF, resolve_stop, similarity};
