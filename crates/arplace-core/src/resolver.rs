//! Surface hit resolution.
//!
//! Picks the one candidate an object should land on out of everything a hit
//! test returned. Existing tracked geometry always beats plane estimates;
//! among estimates the allowed alignments decide.

use crate::hit_test::{AlignmentSet, HitCandidate, HitKind};

/// Selects the best hit candidate for the allowed plane alignments.
///
/// `candidates` must be in the tracker's priority order; "first" below means
/// first in that order.
///
/// 1. The first existing-geometry candidate whose alignment is allowed wins,
///    whatever its distance.
/// 2. Otherwise, with `H` and `V` the first horizontal and vertical estimates:
///    - horizontal only: `H`
///    - vertical only: `V`, falling back to `H` (a picture can still rest on a table)
///    - both: the nearer of `H` and `V`; `H` on an exact tie
///    - none: nothing
///
/// Returning `None` is the normal "nothing to place on this tick" outcome.
#[must_use]
pub fn resolve(candidates: &[HitCandidate], allowed: AlignmentSet) -> Option<HitCandidate> {
    if let Some(existing) = candidates.iter().find(|c| {
        c.kind == HitKind::ExistingPlaneGeometry
            && c.plane_alignment.is_some_and(|a| allowed.contains(a))
    }) {
        return Some(*existing);
    }

    let first_of = |kind: HitKind| candidates.iter().find(|c| c.kind == kind).copied();
    let horizontal = first_of(HitKind::EstimatedHorizontalPlane);
    let vertical = first_of(HitKind::EstimatedVerticalPlane);

    match (allowed.horizontal, allowed.vertical) {
        (true, false) => horizontal,
        (false, true) => vertical.or(horizontal),
        (true, true) => match (horizontal, vertical) {
            (Some(h), Some(v)) => Some(if v.distance < h.distance { v } else { h }),
            (h, v) => h.or(v),
        },
        (false, false) => None,
    }
}
