//! The polymorphic unit of work: side effects and their results.
//!
//! A [`ProcessingSideEffect`] is one discrete, independently-cancellable
//! mutation step inside a pipeline. Effects are stateless values dispatched
//! by identity ([`EffectKind`]); anything per-invocation rides in the
//! [`InteractionArgs`](crate::args::InteractionArgs) or the running state,
//! so the same effect instance may run in many unrelated pipelines.

use crate::args::InteractionArgs;
use crate::error::PipelineError;
use crate::transactor::EffectTransactor;
use crate::world::{EventGate, WorldMutator};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// EffectResult
// ---------------------------------------------------------------------------

/// Tri-state outcome of one effect. Decides whether the drive loop keeps
/// iterating and what running state the next effect sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EffectResult<S> {
    /// Continue with the current running state unchanged.
    NoOp,
    /// Continue, replacing the running state.
    Replace(S),
    /// Terminate the chain. `Stop(None)` keeps the last running state;
    /// `Stop(Some(s))` fixes the final state to `s`.
    Stop(Option<S>),
}

impl<S> EffectResult<S> {
    /// Whether this result terminates the chain.
    pub fn is_stop(&self) -> bool {
        matches!(self, EffectResult::Stop(_))
    }
}

// ---------------------------------------------------------------------------
// EffectKind
// ---------------------------------------------------------------------------

/// Stable identity for every effect in the closed family. Frames are
/// labelled with the kind of the effect that opened them, which keeps the
/// frame log exhaustively matchable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    /// Apply a bare item use.
    UseItem,
    /// Apply an item use against a targeted block.
    UseItemOnBlock,
    /// Log and rebroadcast the actor's container after inventory changes.
    ContainerRefresh,
    /// Broadcast a changed block view to observers.
    BroadcastChanges,
    /// Create a secondary fire effect at the target.
    Ignite,
    /// Reserved for scripted effects in tests and tooling.
    Scripted(u16),
}

// ---------------------------------------------------------------------------
// Effect context and trait
// ---------------------------------------------------------------------------

/// Everything an effect may touch while it runs: the immutable argument
/// bundle, its open transactor scope, the simulation mutation handle, and
/// the event-cancellation gate.
pub struct EffectCtx<'a, 'sup> {
    /// Immutable per-invocation snapshot, shared across the whole drive.
    pub args: &'a InteractionArgs,
    /// The transactor scope opened for this effect. Mutations recorded here
    /// land on this effect's frame; nested scopes and sub-pipeline drives
    /// go through [`EffectTransactor::supplier`].
    pub tx: &'a mut EffectTransactor<'sup>,
    /// World-mutation interface of the simulation layer.
    pub world: &'a mut dyn WorldMutator,
    /// Cancellation-query interface of the external event system.
    pub events: &'a dyn EventGate,
}

/// One mutation step. Implementations must be reentrant: no per-invocation
/// mutable state on `self`.
pub trait ProcessingSideEffect<S> {
    /// The stable identity this effect is dispatched and logged under.
    fn kind(&self) -> EffectKind;

    /// Run the effect against the current running state. World mutations
    /// happen through `ctx.world`; the returned [`EffectResult`] is applied
    /// to the running state by the drive loop.
    fn process(
        &self,
        ctx: &mut EffectCtx<'_, '_>,
        state: &S,
    ) -> Result<EffectResult<S>, PipelineError>;
}

impl<S> core::fmt::Debug for dyn ProcessingSideEffect<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ProcessingSideEffect")
            .field("kind", &self.kind())
            .finish()
    }
}
