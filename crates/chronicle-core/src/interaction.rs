//! Concrete interaction pipelines.
//!
//! Thin constructors over [`Pipeline`] that fix the effect order for each
//! trigger. Order reflects causal dependency: the interaction is applied
//! first, then the actor's container is refreshed, then derived changes are
//! broadcast, then secondary effects run.

use crate::args::InteractionArgs;
use crate::capture::TransactionalCaptureSupplier;
use crate::effect::EffectKind;
use crate::error::{ConfigurationFault, PipelineError};
use crate::pipeline::Pipeline;
use crate::registry::EffectRegistry;
use crate::world::{EventGate, InteractionResult, WorldMutator};

/// Pipeline for a bare item use (no block target).
#[derive(Debug)]
pub struct UseItemPipeline {
    inner: Pipeline<InteractionResult>,
}

impl UseItemPipeline {
    pub fn new(
        registry: &EffectRegistry,
        args: InteractionArgs,
    ) -> Result<Self, ConfigurationFault> {
        let effects = vec![
            registry.require(EffectKind::UseItem)?,
            registry.require(EffectKind::ContainerRefresh)?,
        ];
        Ok(Self {
            inner: Pipeline::new(effects, args)?,
        })
    }

    /// Drive the chain and return the interaction outcome reported to the
    /// game. Starts from `Pass`, the neutral fall-through value.
    pub fn drive(
        &mut self,
        supplier: &mut TransactionalCaptureSupplier,
        world: &mut dyn WorldMutator,
        events: &dyn EventGate,
    ) -> Result<InteractionResult, PipelineError> {
        self.inner
            .drive(supplier, world, events, InteractionResult::Pass)
    }

    pub fn pipeline(&self) -> &Pipeline<InteractionResult> {
        &self.inner
    }
}

/// Pipeline for using an item against a targeted block.
#[derive(Debug)]
pub struct UseItemOnBlockPipeline {
    inner: Pipeline<InteractionResult>,
}

impl UseItemOnBlockPipeline {
    pub fn new(
        registry: &EffectRegistry,
        args: InteractionArgs,
    ) -> Result<Self, ConfigurationFault> {
        let effects = vec![
            registry.require(EffectKind::UseItemOnBlock)?,
            registry.require(EffectKind::ContainerRefresh)?,
            registry.require(EffectKind::BroadcastChanges)?,
            registry.require(EffectKind::Ignite)?,
        ];
        Ok(Self {
            inner: Pipeline::new(effects, args)?,
        })
    }

    /// Drive the chain and return the interaction outcome reported to the
    /// game. Starts from `Pass`, the neutral fall-through value.
    pub fn drive(
        &mut self,
        supplier: &mut TransactionalCaptureSupplier,
        world: &mut dyn WorldMutator,
        events: &dyn EventGate,
    ) -> Result<InteractionResult, PipelineError> {
        self.inner
            .drive(supplier, world, events, InteractionResult::Pass)
    }

    pub fn pipeline(&self) -> &Pipeline<InteractionResult> {
        &self.inner
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::MutationRecord;
    use crate::id::BlockStateId;
    use crate::test_utils::{sample_args, FakeWorld, StaticGate, WorldCall};

    // -----------------------------------------------------------------------
    // Test 1: UseItemPipeline applies the item and refreshes the container
    // -----------------------------------------------------------------------
    #[test]
    fn use_item_pipeline_end_to_end() {
        let registry = EffectRegistry::standard();
        let mut supplier = TransactionalCaptureSupplier::new();
        let mut world = FakeWorld::new();
        world.use_item_outcome = InteractionResult::Success;

        let mut pipeline = UseItemPipeline::new(&registry, sample_args()).unwrap();
        let outcome = pipeline
            .drive(&mut supplier, &mut world, &StaticGate(true))
            .unwrap();

        assert_eq!(outcome, InteractionResult::Success);
        assert!(matches!(world.calls[0], WorldCall::UseItem));
        assert!(matches!(world.calls[1], WorldCall::RefreshContainer(_)));

        // Two top-level frames plus the nested container broadcast.
        assert_eq!(supplier.drain_frames().count(), 3);
    }

    // -----------------------------------------------------------------------
    // Test 2: UseItemOnBlockPipeline records the whole mutation story
    // -----------------------------------------------------------------------
    #[test]
    fn use_item_on_block_pipeline_end_to_end() {
        let registry = EffectRegistry::standard();
        let mut supplier = TransactionalCaptureSupplier::new();
        let mut world = FakeWorld::new();
        world.block_outcome = InteractionResult::Consume;
        world.block_change = Some((BlockStateId(1), BlockStateId(2)));

        let mut args = sample_args();
        args.ignites = true;

        let mut pipeline = UseItemOnBlockPipeline::new(&registry, args).unwrap();
        let outcome = pipeline
            .drive(&mut supplier, &mut world, &StaticGate(true))
            .unwrap();
        assert_eq!(outcome, InteractionResult::Consume);

        // Four effect frames plus the nested container broadcast.
        let sealed: Vec<_> = supplier.drain_frames().collect();
        assert_eq!(sealed.len(), 5);
        assert!(sealed.iter().all(|(_, f)| f.is_sealed() && !f.is_faulted()));

        let all_mutations: Vec<&MutationRecord> =
            sealed.iter().flat_map(|(_, f)| f.mutations()).collect();
        assert!(all_mutations
            .iter()
            .any(|m| matches!(m, MutationRecord::BlockChange { .. })));
        assert!(all_mutations
            .iter()
            .any(|m| matches!(m, MutationRecord::InventoryChange { .. })));
        assert!(all_mutations
            .iter()
            .any(|m| matches!(m, MutationRecord::ViewBroadcast { .. })));
        assert!(all_mutations
            .iter()
            .any(|m| matches!(m, MutationRecord::Ignition { .. })));
    }

    // -----------------------------------------------------------------------
    // Test 3: Closed gate suppresses the view broadcast only
    // -----------------------------------------------------------------------
    #[test]
    fn closed_gate_suppresses_view_broadcast() {
        let registry = EffectRegistry::standard();
        let mut supplier = TransactionalCaptureSupplier::new();
        let mut world = FakeWorld::new();

        let mut pipeline = UseItemOnBlockPipeline::new(&registry, sample_args()).unwrap();
        pipeline
            .drive(&mut supplier, &mut world, &StaticGate(false))
            .unwrap();

        assert!(!world
            .calls
            .iter()
            .any(|c| matches!(c, WorldCall::Broadcast(_))));
        // The container refresh is not event-gated.
        assert!(world
            .calls
            .iter()
            .any(|c| matches!(c, WorldCall::RefreshContainer(_))));
    }

    // -----------------------------------------------------------------------
    // Test 4: Missing registration surfaces at construction
    // -----------------------------------------------------------------------
    #[test]
    fn missing_registration_rejected_at_construction() {
        let registry = crate::registry::EffectRegistryBuilder::new().build();
        let err = UseItemPipeline::new(&registry, sample_args()).unwrap_err();
        assert_eq!(
            err,
            ConfigurationFault::UnregisteredEffect(EffectKind::UseItem)
        );
    }

    // -----------------------------------------------------------------------
    // Test 5: Frame links expose per-effect frames after the drive
    // -----------------------------------------------------------------------
    #[test]
    fn frame_links_after_drive() {
        let registry = EffectRegistry::standard();
        let mut supplier = TransactionalCaptureSupplier::new();
        let mut world = FakeWorld::new();

        let mut pipeline = UseItemPipeline::new(&registry, sample_args()).unwrap();
        pipeline
            .drive(&mut supplier, &mut world, &StaticGate(true))
            .unwrap();

        for entry in pipeline.pipeline().effects() {
            let frame = supplier.frame(entry.frame().unwrap()).unwrap();
            assert_eq!(frame.kind(), entry.effect().kind());
        }
    }
}
