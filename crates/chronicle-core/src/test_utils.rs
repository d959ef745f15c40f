//! Shared fakes and fixtures for tests.
//!
//! Available to downstream crates under the `test-utils` feature, so
//! integrations can drive pipelines against a scriptable world without
//! wiring up a real simulation.

use crate::args::{BlockPos, Hand, HitLocation, InteractionArgs, ItemSnapshot};
use crate::effect::{EffectCtx, EffectKind, EffectResult, ProcessingSideEffect};
use crate::error::{EffectFault, PipelineError};
use crate::id::{ActorId, BlockStateId, ItemTypeId};
use crate::world::{BlockInteraction, EventGate, GameEventKind, InteractionResult, WorldMutator};

// ---------------------------------------------------------------------------
// FakeWorld
// ---------------------------------------------------------------------------

/// One recorded call into the fake simulation, in invocation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldCall {
    UseItem,
    UseItemOnBlock,
    Broadcast(BlockPos),
    RefreshContainer(ActorId),
    Ignite(BlockPos),
}

/// A scriptable [`WorldMutator`]. Every call is recorded in `calls`;
/// outcomes are configured through the public fields. Setting `fail_next`
/// makes the next call fail with that fault instead of being recorded.
#[derive(Debug)]
pub struct FakeWorld {
    pub calls: Vec<WorldCall>,
    pub use_item_outcome: InteractionResult,
    pub block_outcome: InteractionResult,
    pub block_change: Option<(BlockStateId, BlockStateId)>,
    pub ignite_succeeds: bool,
    pub fail_next: Option<EffectFault>,
}

impl FakeWorld {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            use_item_outcome: InteractionResult::Pass,
            block_outcome: InteractionResult::Pass,
            block_change: None,
            ignite_succeeds: true,
            fail_next: None,
        }
    }

    fn take_failure(&mut self) -> Result<(), EffectFault> {
        match self.fail_next.take() {
            Some(fault) => Err(fault),
            None => Ok(()),
        }
    }
}

impl Default for FakeWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl WorldMutator for FakeWorld {
    fn use_item(&mut self, _args: &InteractionArgs) -> Result<InteractionResult, EffectFault> {
        self.take_failure()?;
        self.calls.push(WorldCall::UseItem);
        Ok(self.use_item_outcome)
    }

    fn use_item_on_block(
        &mut self,
        _args: &InteractionArgs,
    ) -> Result<BlockInteraction, EffectFault> {
        self.take_failure()?;
        self.calls.push(WorldCall::UseItemOnBlock);
        Ok(BlockInteraction {
            outcome: self.block_outcome,
            change: self.block_change,
        })
    }

    fn broadcast_change(&mut self, pos: BlockPos) -> Result<(), EffectFault> {
        self.take_failure()?;
        self.calls.push(WorldCall::Broadcast(pos));
        Ok(())
    }

    fn refresh_container(&mut self, actor: ActorId) -> Result<(), EffectFault> {
        self.take_failure()?;
        self.calls.push(WorldCall::RefreshContainer(actor));
        Ok(())
    }

    fn ignite(&mut self, pos: BlockPos) -> Result<bool, EffectFault> {
        self.take_failure()?;
        self.calls.push(WorldCall::Ignite(pos));
        Ok(self.ignite_succeeds)
    }
}

// ---------------------------------------------------------------------------
// StaticGate
// ---------------------------------------------------------------------------

/// An [`EventGate`] that answers the same for every event kind.
#[derive(Debug, Clone, Copy)]
pub struct StaticGate(pub bool);

impl EventGate for StaticGate {
    fn should_fire(&self, _kind: GameEventKind) -> bool {
        self.0
    }
}

// ---------------------------------------------------------------------------
// FnEffect
// ---------------------------------------------------------------------------

/// An effect backed by a closure, for scripting arbitrary behavior in
/// tests. Carries an explicit kind so frames stay identifiable.
pub struct FnEffect<S> {
    kind: EffectKind,
    #[allow(clippy::type_complexity)]
    func: Box<
        dyn Fn(&mut EffectCtx<'_, '_>, &S) -> Result<EffectResult<S>, PipelineError>
            + Send
            + Sync,
    >,
}

impl<S> FnEffect<S> {
    pub fn new<F>(kind: EffectKind, func: F) -> Self
    where
        F: Fn(&mut EffectCtx<'_, '_>, &S) -> Result<EffectResult<S>, PipelineError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            kind,
            func: Box::new(func),
        }
    }
}

impl<S> ProcessingSideEffect<S> for FnEffect<S> {
    fn kind(&self) -> EffectKind {
        self.kind
    }

    fn process(
        &self,
        ctx: &mut EffectCtx<'_, '_>,
        state: &S,
    ) -> Result<EffectResult<S>, PipelineError> {
        (self.func)(ctx, state)
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A plausible interaction argument bundle for tests.
pub fn sample_args() -> InteractionArgs {
    InteractionArgs {
        actor: ActorId(42),
        hand: Hand::Main,
        target: BlockPos::new(100, 64, -200),
        hit: HitLocation {
            pos: BlockPos::new(100, 64, -200),
            inside: false,
        },
        item: ItemSnapshot {
            item_type: ItemTypeId(7),
            count: 16,
        },
        creative: false,
        ignites: false,
    }
}
