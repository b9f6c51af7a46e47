//! Property tests for frame run compaction.

use proptest::prelude::*;

use decomp_project::event_objects::compact::{FrameRun, compact_runs, expand_runs};

fn frames() -> impl Strategy<Value = Vec<(u8, u32)>> {
    prop::collection::vec((0u8..3, 0u32..6), 0..40)
}

proptest! {
    #[test]
    fn test_expanding_runs_restores_frames(frames in frames()) {
        let runs = compact_runs(frames.clone());
        prop_assert_eq!(expand_runs(&runs), frames);
    }

    #[test]
    fn test_runs_are_maximal(frames in frames()) {
        let runs = compact_runs(frames);
        for pair in runs.windows(2) {
            let (left, right): (&FrameRun<u8>, &FrameRun<u8>) = (&pair[0], &pair[1]);
            prop_assert!(
                left.pic != right.pic || left.start + left.count != right.start,
                "adjacent runs {left:?} and {right:?} could merge"
            );
        }
        prop_assert!(runs.iter().all(|run| run.count >= 1));
    }
}

#[test]
fn test_run_restarts_on_index_gap() {
    let runs = compact_runs([("a", 0), ("a", 1), ("a", 3), ("b", 4)]);
    assert_eq!(
        runs,
        vec![
            FrameRun { pic: "a", start: 0, count: 2 },
            FrameRun { pic: "a", start: 3, count: 1 },
            FrameRun { pic: "b", start: 4, count: 1 },
        ]
    );
}
