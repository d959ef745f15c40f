//! Property tests for the drive loop and the frame protocol.

use chronicle_core::capture::TransactionalCaptureSupplier;
use chronicle_core::effect::{EffectKind, EffectResult, ProcessingSideEffect};
use chronicle_core::error::ProtocolFault;
use chronicle_core::frame::FrameStatus;
use chronicle_core::pipeline::Pipeline;
use chronicle_core::test_utils::{sample_args, FakeWorld, FnEffect, StaticGate};
use proptest::prelude::*;
use std::sync::Arc;

/// One scripted step of a synthetic effect chain.
#[derive(Debug, Clone, Copy)]
enum Step {
    NoOp,
    Replace(u32),
    Stop(Option<u32>),
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        Just(Step::NoOp),
        any::<u32>().prop_map(Step::Replace),
        proptest::option::of(any::<u32>()).prop_map(Step::Stop),
    ]
}

fn effect_for(tag: u16, step: Step) -> Arc<dyn ProcessingSideEffect<u32>> {
    Arc::new(FnEffect::new(
        EffectKind::Scripted(tag),
        move |_ctx, _state| {
            Ok(match step {
                Step::NoOp => EffectResult::NoOp,
                Step::Replace(v) => EffectResult::Replace(v),
                Step::Stop(v) => EffectResult::Stop(v),
            })
        },
    ))
}

/// Reference fold: the state the drive must produce, and how many effects
/// actually run.
fn expected(initial: u32, script: &[Step]) -> (u32, usize) {
    let mut state = initial;
    for (ran, step) in script.iter().enumerate() {
        match step {
            Step::NoOp => {}
            Step::Replace(v) => state = *v,
            Step::Stop(v) => {
                if let Some(v) = v {
                    state = *v;
                }
                return (state, ran + 1);
            }
        }
    }
    (state, script.len())
}

proptest! {
    // -----------------------------------------------------------------------
    // Drive result equals the reference fold over the script
    // -----------------------------------------------------------------------
    #[test]
    fn drive_matches_reference_fold(
        initial in any::<u32>(),
        script in prop::collection::vec(step_strategy(), 1..8),
    ) {
        let effects = script
            .iter()
            .enumerate()
            .map(|(i, step)| effect_for(i as u16, *step))
            .collect();
        let mut pipeline = Pipeline::new(effects, sample_args()).unwrap();

        let mut supplier = TransactionalCaptureSupplier::new();
        let mut world = FakeWorld::new();
        let final_state = pipeline
            .drive(&mut supplier, &mut world, &StaticGate(true), initial)
            .unwrap();

        let (want_state, want_ran) = expected(initial, &script);
        prop_assert_eq!(final_state, want_state);

        // One cleanly sealed frame per effect that ran, nothing dangling.
        let sealed: Vec<_> = supplier.drain_frames().collect();
        prop_assert_eq!(sealed.len(), want_ran);
        prop_assert!(sealed.iter().all(|(_, f)| f.status() == FrameStatus::Sealed));
        prop_assert!(supplier.is_idle());
    }

    // -----------------------------------------------------------------------
    // Sequence numbers are strictly increasing in open order
    // -----------------------------------------------------------------------
    #[test]
    fn seq_strictly_increasing(
        script in prop::collection::vec(step_strategy(), 1..8),
    ) {
        let effects = script
            .iter()
            .enumerate()
            .map(|(i, step)| effect_for(i as u16, *step))
            .collect();
        let mut pipeline = Pipeline::new(effects, sample_args()).unwrap();

        let mut supplier = TransactionalCaptureSupplier::new();
        let mut world = FakeWorld::new();
        pipeline
            .drive(&mut supplier, &mut world, &StaticGate(true), 0u32)
            .unwrap();

        let seqs: Vec<u64> = supplier.drain_frames().map(|(_, f)| f.seq()).collect();
        prop_assert!(seqs.windows(2).all(|w| w[0] < w[1]));
    }

    // -----------------------------------------------------------------------
    // Closing any frame other than the innermost open one always errors
    // -----------------------------------------------------------------------
    #[test]
    fn out_of_order_release_always_errors(
        depth in 2usize..6,
        victim in 0usize..4,
    ) {
        prop_assume!(victim < depth - 1);

        let mut supplier = TransactionalCaptureSupplier::new();
        let frames: Vec<_> = (0..depth)
            .map(|i| supplier.open_frame(EffectKind::Scripted(i as u16)))
            .collect();

        let err = supplier
            .close_frame(frames[victim], FrameStatus::Sealed)
            .unwrap_err();
        prop_assert!(
            matches!(err, ProtocolFault::ReleaseOutOfOrder { .. }),
            "expected ReleaseOutOfOrder, got {err:?}"
        );

        // The failed release did not disturb the stack: LIFO teardown
        // still succeeds.
        for frame in frames.iter().rev() {
            supplier.close_frame(*frame, FrameStatus::Sealed).unwrap();
        }
        prop_assert!(supplier.is_idle());
    }
}
