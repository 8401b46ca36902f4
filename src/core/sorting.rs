use feruca::Collator;
use crate::models::{FilteredCandidate, SortKey};

/// Order results by the given key
///
/// The sort is stable, so entries with equal keys keep their relative order.
/// The sorter never filters: callers pass the in-radius subset.
///
/// * `Distance` - ascending, unknown distance last
/// * `Rating` - descending, missing rating counts as 0
/// * `Name` - ascending, case-insensitive, Unicode collation order
pub fn sort_results(results: &[FilteredCandidate], key: SortKey) -> Vec<FilteredCandidate> {
    let mut sorted = results.to_vec();

    match key {
        SortKey::Distance => {
            sorted.sort_by(|a, b| distance_key(a).total_cmp(&distance_key(b)));
        }
        SortKey::Rating => {
            sorted.sort_by(|a, b| rating_key(b).total_cmp(&rating_key(a)));
        }
        SortKey::Name => {
            let mut collator = Collator::default();
            // Fold once up front instead of on every comparison
            let mut keyed: Vec<(String, FilteredCandidate)> = sorted
                .into_iter()
                .map(|r| (name_key(&r.candidate.name), r))
                .collect();
            keyed.sort_by(|(a, _), (b, _)| collator.collate(a, b));
            sorted = keyed.into_iter().map(|(_, r)| r).collect();
        }
    }

    sorted
}

#[inline]
fn distance_key(r: &FilteredCandidate) -> f64 {
    match r.distance_km {
        Some(d) if !d.is_nan() => d,
        _ => f64::INFINITY,
    }
}

#[inline]
fn rating_key(r: &FilteredCandidate) -> f64 {
    match r.candidate.rating {
        Some(rating) if !rating.is_nan() => rating,
        _ => 0.0,
    }
}

fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}
