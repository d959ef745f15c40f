//! The built-in effect family for interaction pipelines.
//!
//! Each effect is a stateless unit struct owning exactly one mutation
//! concern. They are shared as `Arc` instances through the
//! [`EffectRegistry`](crate::registry::EffectRegistry) and may run in many
//! unrelated pipelines concurrently in program order.

use crate::effect::{EffectCtx, EffectKind, EffectResult, ProcessingSideEffect};
use crate::error::PipelineError;
use crate::frame::MutationRecord;
use crate::world::{GameEventKind, InteractionResult};

// ---------------------------------------------------------------------------
// UseItemEffect
// ---------------------------------------------------------------------------

/// Applies a bare item use through the simulation and replaces the running
/// state with the outcome the simulation reports.
#[derive(Debug, Default)]
pub struct UseItemEffect;

impl ProcessingSideEffect<InteractionResult> for UseItemEffect {
    fn kind(&self) -> EffectKind {
        EffectKind::UseItem
    }

    fn process(
        &self,
        ctx: &mut EffectCtx<'_, '_>,
        _state: &InteractionResult,
    ) -> Result<EffectResult<InteractionResult>, PipelineError> {
        let outcome = ctx.world.use_item(ctx.args)?;
        Ok(EffectResult::Replace(outcome))
    }
}

// ---------------------------------------------------------------------------
// UseItemOnBlockEffect
// ---------------------------------------------------------------------------

/// Applies an item use against the targeted block. When the simulation
/// reports a content change, it is recorded on this effect's frame.
#[derive(Debug, Default)]
pub struct UseItemOnBlockEffect;

impl ProcessingSideEffect<InteractionResult> for UseItemOnBlockEffect {
    fn kind(&self) -> EffectKind {
        EffectKind::UseItemOnBlock
    }

    fn process(
        &self,
        ctx: &mut EffectCtx<'_, '_>,
        _state: &InteractionResult,
    ) -> Result<EffectResult<InteractionResult>, PipelineError> {
        let interaction = ctx.world.use_item_on_block(ctx.args)?;
        if let Some((previous, next)) = interaction.change {
            ctx.tx.record(MutationRecord::BlockChange {
                pos: ctx.args.target,
                previous,
                next,
            })?;
        }
        Ok(EffectResult::Replace(interaction.outcome))
    }
}

// ---------------------------------------------------------------------------
// ContainerRefreshEffect
// ---------------------------------------------------------------------------

/// Logs the actor's inventory change on the current frame, then rebroadcasts
/// the open container inside a nested scope so the event layer sees the
/// broadcast as its own sub-transaction.
#[derive(Debug, Default)]
pub struct ContainerRefreshEffect;

impl ProcessingSideEffect<InteractionResult> for ContainerRefreshEffect {
    fn kind(&self) -> EffectKind {
        EffectKind::ContainerRefresh
    }

    fn process(
        &self,
        ctx: &mut EffectCtx<'_, '_>,
        _state: &InteractionResult,
    ) -> Result<EffectResult<InteractionResult>, PipelineError> {
        let actor = ctx.args.actor;
        ctx.tx.record(MutationRecord::InventoryChange { actor })?;

        let mut nested = ctx.tx.supplier().push_effect(EffectKind::BroadcastChanges);
        ctx.world.refresh_container(actor)?;
        nested.record(MutationRecord::ContainerBroadcast { actor })?;
        nested.complete()?;

        Ok(EffectResult::NoOp)
    }
}

// ---------------------------------------------------------------------------
// BroadcastChangesEffect
// ---------------------------------------------------------------------------

/// Broadcasts the changed block view to observers. Short-circuits when no
/// listener could observe a view-change event.
#[derive(Debug, Default)]
pub struct BroadcastChangesEffect;

impl ProcessingSideEffect<InteractionResult> for BroadcastChangesEffect {
    fn kind(&self) -> EffectKind {
        EffectKind::BroadcastChanges
    }

    fn process(
        &self,
        ctx: &mut EffectCtx<'_, '_>,
        _state: &InteractionResult,
    ) -> Result<EffectResult<InteractionResult>, PipelineError> {
        if !ctx.events.should_fire(GameEventKind::ViewChange) {
            return Ok(EffectResult::NoOp);
        }
        let pos = ctx.args.target;
        ctx.world.broadcast_change(pos)?;
        ctx.tx.record(MutationRecord::ViewBroadcast { pos })?;
        Ok(EffectResult::NoOp)
    }
}

// ---------------------------------------------------------------------------
// IgniteEffect
// ---------------------------------------------------------------------------

/// Creates the secondary fire effect at the target when the interaction
/// requests it. A blocked ignition stops the chain with the running state
/// unchanged.
#[derive(Debug, Default)]
pub struct IgniteEffect;

impl ProcessingSideEffect<InteractionResult> for IgniteEffect {
    fn kind(&self) -> EffectKind {
        EffectKind::Ignite
    }

    fn process(
        &self,
        ctx: &mut EffectCtx<'_, '_>,
        _state: &InteractionResult,
    ) -> Result<EffectResult<InteractionResult>, PipelineError> {
        if !ctx.args.ignites {
            return Ok(EffectResult::NoOp);
        }
        let pos = ctx.args.target;
        let lit = ctx.world.ignite(pos)?;
        if !lit {
            return Ok(EffectResult::Stop(None));
        }
        ctx.tx.record(MutationRecord::Ignition { pos })?;
        Ok(EffectResult::NoOp)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
