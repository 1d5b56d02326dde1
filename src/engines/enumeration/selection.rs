use crate::types::ZState;
use std::cmp::Ordering;

/// Pick the leaders of a level by cumulative score mass.
///
/// States are ranked by decreasing score, equal scores falling back to
/// canonical state order. The shortest prefix whose running sum strictly
/// exceeds `probsum * target` is kept. Returned indices are ascending.
///
/// `None` means no prefix crosses the threshold, which happens when every
/// score has rounded down to zero (or is not a number).
pub fn select_leaders(
    states: &[ZState],
    scores: &[f64],
    probsum: f64,
    target: f64,
) -> Option<Vec<usize>> {
    debug_assert_eq!(states.len(), scores.len());

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| rank(states, scores, a, b));

    let targ = probsum * target;
    let mut cum = 0.0;
    let mut nsel = 0;
    for (pos, &idx) in order.iter().enumerate() {
        cum += scores[idx];
        if cum > targ {
            nsel = pos + 1;
            break;
        }
    }
    if nsel == 0 {
        return None;
    }

    let mut selected = order[..nsel].to_vec();
    selected.sort_unstable();
    Some(selected)
}

fn rank(states: &[ZState], scores: &[f64], a: usize, b: usize) -> Ordering {
    scores[b]
        .total_cmp(&scores[a])
        .then_with(|| states[a].cmp(&states[b]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn singletons(n: usize) -> Vec<ZState> {
        (0..n).map(ZState::singleton).collect()
    }

    #[test]
    fn test_two_states_cover_target() {
        let scores = [0.005, 0.6, 0.005, 0.39];
        let selected = select_leaders(&singletons(4), &scores, 1.0, 0.98);
        assert_eq!(selected, Some(vec![1, 3]));
    }

    #[test]
    fn test_crossing_is_strict() {
        // Cumulative sum equal to the threshold does not cross it
        let scores = [0.5, 0.25, 0.25];
        let selected = select_leaders(&singletons(3), &scores, 1.0, 0.75);
        assert_eq!(selected, Some(vec![0, 1, 2]));

        let selected = select_leaders(&singletons(3), &scores, 1.0, 0.7);
        assert_eq!(selected, Some(vec![0, 1]));
    }

    #[test]
    fn test_ties_follow_canonical_order() {
        let states = vec![
            ZState::singleton(2),
            ZState::singleton(0),
            ZState::singleton(1),
        ];
        let scores = [0.3, 0.3, 0.4];
        // [1] first, then [0] wins the tie against [2]
        let selected = select_leaders(&states, &scores, 1.0, 0.5);
        assert_eq!(selected, Some(vec![1, 2]));
    }

    #[test]
    fn test_all_zero_scores_select_nothing() {
        let scores = [0.0; 4];
        assert_eq!(select_leaders(&singletons(4), &scores, 0.0, 0.98), None);
    }

    #[test]
    fn test_nan_scores_select_nothing() {
        let scores = [f64::NAN, 0.2];
        assert_eq!(select_leaders(&singletons(2), &scores, f64::NAN, 0.9), None);
    }

    #[test]
    fn test_full_target_never_crosses() {
        // The whole level only ties the threshold, so no prefix exceeds it
        let scores = [0.25; 4];
        assert_eq!(select_leaders(&singletons(4), &scores, 1.0, 1.0), None);
    }

    #[test]
    fn test_empty_level() {
        assert_eq!(select_leaders(&[], &[], 0.0, 0.5), None);
    }
}
