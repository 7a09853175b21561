//! The navigation-aware eviction decision, shared by both cache variants.

use crate::cache::navigation::{Half, PlanePoint, TravelLine};

/// Pick the key to evict before inserting `incoming` into a full cache.
///
/// Keys are ordered by descending distance from `incoming` (ties broken by
/// ascending (z, t) so the decision is deterministic). Without a direction
/// the farthest key goes. With one, the farthest key *off* the line of travel
/// goes; if every key sits on the line, the farthest key already passed
/// (behind the current position) goes; failing that, the farthest overall.
///
/// Returns `None` only for an empty key set.
pub(crate) fn eviction_candidate(
    keys: &[PlanePoint],
    incoming: PlanePoint,
    direction: Option<&TravelLine>,
) -> Option<PlanePoint> {
    let mut ordered: Vec<PlanePoint> = keys.to_vec();
    ordered.sort_by(|a, b| {
        b.distance(incoming)
            .total_cmp(&a.distance(incoming))
            .then_with(|| (a.z, a.t).cmp(&(b.z, b.t)))
    });
    let farthest = *ordered.first()?;

    let Some(line) = direction else {
        return Some(farthest);
    };

    let mut behind: Option<PlanePoint> = None;
    for &key in &ordered {
        if !line.lies_on(key) {
            return Some(key);
        }
        if behind.is_none() && line.lies_on_half(key, Half::Behind) {
            behind = Some(key);
        }
    }
    Some(behind.unwrap_or(farthest))
}
