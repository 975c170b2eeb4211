//! Search configuration for the route planner.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// What the search optimises for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    /// Earliest arrival (or latest departure for arrive-by); transfers
    /// only break ties.
    #[default]
    Time,
    /// Fewest transfers; elapsed time only breaks ties.
    Transfers,
}

/// Error returned for an unknown optimisation criterion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort criterion {0:?} (expected \"time\" or \"transfers\")")]
pub struct InvalidSortBy(String);

impl FromStr for SortBy {
    type Err = InvalidSortBy;

    /// Accepts any case and unambiguous prefixes (`"t"` is ambiguous).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        if lower.len() >= 2 && "transfers".starts_with(&lower) {
            Ok(SortBy::Transfers)
        } else if lower.len() >= 2 && "time".starts_with(&lower) {
            Ok(SortBy::Time)
        } else {
            Err(InvalidSortBy(s.to_string()))
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortBy::Time => f.write_str("time"),
            SortBy::Transfers => f.write_str("transfers"),
        }
    }
}

/// Weights turning a ride into a search cost.
///
/// `cost += minute_weight * (wait + travel) + transfer_penalty`, the
/// penalty only applying when the line changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostWeights {
    pub minute_weight: f64,
    pub transfer_penalty: f64,
}

impl CostWeights {
    pub fn new(minute_weight: f64, transfer_penalty: f64) -> Self {
        Self {
            minute_weight,
            transfer_penalty,
        }
    }
}

/// Configuration parameters for route search.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Weights used for `SortBy::Time`.
    pub time_weights: CostWeights,

    /// Weights used for `SortBy::Transfers`.
    pub transfer_weights: CostWeights,

    /// Upper bound on vehicle speed, used by the straight-line heuristic
    /// of the untimed search. Must not underestimate real speeds.
    pub max_speed_kmh: f64,
}

impl SearchConfig {
    /// Weights for the given criterion.
    pub fn weights(&self, sort_by: SortBy) -> CostWeights {
        match sort_by {
            SortBy::Time => self.time_weights,
            SortBy::Transfers => self.transfer_weights,
        }
    }

    /// Set the heuristic speed bound.
    pub fn with_max_speed_kmh(mut self, kmh: f64) -> Self {
        self.max_speed_kmh = kmh;
        self
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            time_weights: CostWeights::new(1.0, 0.1),
            // A transfer outweighs any realistic wait within the rolling day.
            transfer_weights: CostWeights::new(1.0, 100_000.0),
            max_speed_kmh: 160.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = SearchConfig::default();

        assert_eq!(config.weights(SortBy::Time), CostWeights::new(1.0, 0.1));
        assert_eq!(
            config.weights(SortBy::Transfers),
            CostWeights::new(1.0, 100_000.0)
        );
        assert_eq!(config.max_speed_kmh, 160.0);
    }

    #[test]
    fn custom_config() {
        let config = SearchConfig {
            time_weights: CostWeights::new(2.0, 1.0),
            ..SearchConfig::default()
        }
        .with_max_speed_kmh(80.0);

        assert_eq!(config.weights(SortBy::Time), CostWeights::new(2.0, 1.0));
        assert_eq!(config.max_speed_kmh, 80.0);
    }

    #[test]
    fn parse_sort_by() {
        assert_eq!("time".parse::<SortBy>().unwrap(), SortBy::Time);
        assert_eq!("Transfers".parse::<SortBy>().unwrap(), SortBy::Transfers);
        assert_eq!("tr".parse::<SortBy>().unwrap(), SortBy::Transfers);
        assert_eq!("ti".parse::<SortBy>().unwrap(), SortBy::Time);
        assert!("t".parse::<SortBy>().is_err());
        assert!("fastest".parse::<SortBy>().is_err());
        assert!("".parse::<SortBy>().is_err());
    }

    #[test]
    fn sort_by_display_roundtrip() {
        for sort in [SortBy::Time, SortBy::Transfers] {
            assert_eq!(sort.to_string().parse::<SortBy>().unwrap(), sort);
        }
    }

    #[test]
    fn sort_by_default_is_time() {
        assert_eq!(SortBy::default(), SortBy::Time);
    }
}
