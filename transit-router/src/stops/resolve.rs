//! Free-text stop name matching.

use tracing::trace;

/// Default similarity a fuzzy match must reach.
pub const DEFAULT_CUTOFF: f64 = 0.6;

/// Stricter cutoff for contexts where a wrong stop is worse than none.
pub const STRICT_CUTOFF: f64 = 0.85;

/// Similarity of two strings in `[0, 1]` (normalized Levenshtein).
///
/// # Examples
///
/// ```
/// use transit_router::stops::similarity;
///
/// assert_eq!(similarity("karlstor", "karlstor"), 1.0);
/// assert!(similarity("karlstor", "karlstr") > 0.85);
/// assert!(similarity("karlstor", "hbf") < 0.3);
/// ```
pub fn similarity(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(a, b)
}

/// Resolve a user query to one of `known_names`.
///
/// A case-insensitive exact match wins outright. Otherwise the candidate
/// with the highest similarity to the query is returned if it reaches
/// `cutoff`; ties go to the earliest candidate. `None` means nothing was
/// close enough, which is an ordinary outcome.
///
/// # Examples
///
/// ```
/// use transit_router::stops::{DEFAULT_CUTOFF, resolve_stop};
///
/// let names = ["Karlstor", "Europaplatz", "Mühlburger Tor"];
///
/// assert_eq!(resolve_stop("europaplatz", names, DEFAULT_CUTOFF), Some("Europaplatz"));
/// assert_eq!(resolve_stop("Europaplats", names, DEFAULT_CUTOFF), Some("Europaplatz"));
/// assert_eq!(resolve_stop("Hauptbahnhof", names, DEFAULT_CUTOFF), None);
/// ```
pub fn resolve_stop<'a, I>(query: &str, known_names: I, cutoff: f64) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
    I::IntoIter: Clone,
{
    let names = known_names.into_iter();
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return None;
    }

    if let Some(exact) = names.clone().find(|name| name.to_lowercase() == query) {
        return Some(exact);
    }

    let mut best: Option<(&'a str, f64)> = None;
    for name in names {
        let score = similarity(&query, &name.to_lowercase());
        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((name, score));
        }
    }

    let (name, score) = best?;
    trace!(query = %query, candidate = name, score, "Best fuzzy stop match");
    (score >= cutoff).then_some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAMES: [&str; 5] = [
        "Flehingen Bahnhof",
        "Oberderdingen Amthof",
        "Oberderdingen Freibad",
        "Knittlingen Kreuz",
        "Knittlingen ZOB / Schule",
    ];

    #[test]
    fn exact_match_ignores_case() {
        assert_eq!(
            resolve_stop("oberderdingen freibad", NAMES, DEFAULT_CUTOFF),
            Some("Oberderdingen Freibad")
        );
        assert_eq!(
            resolve_stop("KNITTLINGEN KREUZ", NAMES, STRICT_CUTOFF),
            Some("Knittlingen Kreuz")
        );
    }

    #[test]
    fn tolerates_one_typo() {
        assert_eq!(
            resolve_stop("Oberderdingen Frebad", NAMES, DEFAULT_CUTOFF),
            Some("Oberderdingen Freibad")
        );
        assert_eq!(
            resolve_stop("Oberderdingen Freibdd", NAMES, DEFAULT_CUTOFF),
            Some("Oberderdingen Freibad")
        );
    }

    #[test]
    fn partial_name_picks_closest() {
        assert_eq!(
            resolve_stop("Oberderdingen", NAMES, DEFAULT_CUTOFF),
            Some("Oberderdingen Amthof")
        );
        assert_eq!(resolve_stop("Oberderdingen", NAMES, STRICT_CUTOFF), None);
    }

    #[test]
    fn dissimilar_query_not_found() {
        assert_eq!(resolve_stop("Hauptstrasse 12", NAMES, DEFAULT_CUTOFF), None);
        assert_eq!(resolve_stop("xyz", NAMES, DEFAULT_CUTOFF), None);
    }

    #[test]
    fn empty_inputs_not_found() {
        assert_eq!(resolve_stop("", NAMES, DEFAULT_CUTOFF), None);
        assert_eq!(resolve_stop("Karlstor", [], DEFAULT_CUTOFF), None);
    }

    #[test]
    fn ties_go_to_first_candidate() {
        let names = ["Stop A", "Stop B"];
        assert_eq!(resolve_stop("Stop C", names, DEFAULT_CUTOFF), Some("Stop A"));

        let names = ["Stop B", "Stop A"];
        assert_eq!(resolve_stop("Stop C", names, DEFAULT_CUTOFF), Some("Stop B"));
    }

    #[test]
    fn works_with_owned_name_lists() {
        let owned: Vec<String> = NAMES.iter().map(|s| s.to_string()).collect();
        let found = resolve_stop("flehingen bahnhof", owned.iter().map(String::as_str), DEFAULT_CUTOFF);
        assert_eq!(found, Some("Flehingen Bahnhof"));
    }

    #[test]
    fn similarity_bounds() {
        assert_eq!(similarity("", ""), 1.0);
        assert_eq!(similarity("abc", "xyz"), 0.0);
        let s = similarity("freibad", "frebad");
        assert!(s > 0.0 && s < 1.0);
    }
}
