//! The pipeline: an ordered, immutable plan for one action's effect chain,
//! driven exactly once.
//!
//! # Drive loop
//!
//! For each effect in declaration order: open a transactor scope, invoke
//! the effect, apply its [`EffectResult`] to the running state, and seal
//! the scope before moving on. The scope is sealed on every exit path --
//! cleanly on success, as faulted when the effect raised a fault. A `Stop`
//! result terminates the loop after the current scope closes.
//!
//! Ordering is the declaration order baked in at construction; there is no
//! priority system. Callers choose the order to reflect causal dependency
//! (apply the interaction before broadcasting its view change).

use crate::args::InteractionArgs;
use crate::effect::{EffectCtx, EffectResult, ProcessingSideEffect};
use crate::capture::TransactionalCaptureSupplier;
use crate::error::{ConfigurationFault, PipelineError, ProtocolFault};
use crate::id::FrameId;
use crate::world::{EventGate, WorldMutator};
use std::sync::Arc;

// ---------------------------------------------------------------------------
// ResultingTransactionBySideEffect
// ---------------------------------------------------------------------------

/// Couples one effect with the transaction frame it produced, so a later
/// stage can ask "what exactly did this effect do" independent of the
/// linear result chain. The frame link is filled in during the drive.
pub struct ResultingTransactionBySideEffect<S> {
    effect: Arc<dyn ProcessingSideEffect<S>>,
    frame: Option<FrameId>,
}

impl<S> ResultingTransactionBySideEffect<S> {
    fn new(effect: Arc<dyn ProcessingSideEffect<S>>) -> Self {
        Self {
            effect,
            frame: None,
        }
    }

    pub fn effect(&self) -> &dyn ProcessingSideEffect<S> {
        self.effect.as_ref()
    }

    /// The sealed frame this effect produced. `None` until the effect has
    /// run (a truncated chain leaves trailing entries unlinked).
    pub fn frame(&self) -> Option<FrameId> {
        self.frame
    }
}

impl<S> std::fmt::Debug for ResultingTransactionBySideEffect<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultingTransactionBySideEffect")
            .field("kind", &self.effect.kind())
            .field("frame", &self.frame)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Lifecycle of a pipeline. Driving is observable only from within effect
/// callbacks; externally a pipeline is Built until `drive` returns, then
/// Completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Built,
    Driving,
    Completed,
}

/// An ordered, immutable effect list plus the captured invocation
/// arguments. Created once per triggering call and driven exactly once.
pub struct Pipeline<S> {
    effects: Vec<ResultingTransactionBySideEffect<S>>,
    args: InteractionArgs,
    stage: Stage,
}

impl<S> std::fmt::Debug for Pipeline<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("effects", &self.effects)
            .field("stage", &self.stage)
            .finish_non_exhaustive()
    }
}

impl<S> Pipeline<S> {
    /// Build a pipeline from an ordered effect list and the per-invocation
    /// argument bundle. An empty list is rejected here, before any frame
    /// is opened.
    pub fn new(
        effects: Vec<Arc<dyn ProcessingSideEffect<S>>>,
        args: InteractionArgs,
    ) -> Result<Self, ConfigurationFault> {
        if effects.is_empty() {
            return Err(ConfigurationFault::EmptyEffectList);
        }
        Ok(Self {
            effects: effects
                .into_iter()
                .map(ResultingTransactionBySideEffect::new)
                .collect(),
            args,
            stage: Stage::Built,
        })
    }

    /// The captured invocation arguments.
    pub fn args(&self) -> &InteractionArgs {
        &self.args
    }

    /// The effect entries in declaration order, with frame links filled in
    /// after a drive.
    pub fn effects(&self) -> &[ResultingTransactionBySideEffect<S>] {
        &self.effects
    }

    pub fn is_completed(&self) -> bool {
        self.stage == Stage::Completed
    }

    /// Drive the chain to completion and return the final running state.
    ///
    /// Effects run in list order; each runs inside its own transactor
    /// scope on the shared `supplier`. A fault from an effect seals the
    /// current frame as faulted, leaves the pipeline Completed, and
    /// propagates; previously-applied world mutations are not rolled back.
    ///
    /// Driving a pipeline twice is a [`ProtocolFault`].
    pub fn drive(
        &mut self,
        supplier: &mut TransactionalCaptureSupplier,
        world: &mut dyn WorldMutator,
        events: &dyn EventGate,
        initial: S,
    ) -> Result<S, PipelineError> {
        if self.stage != Stage::Built {
            return Err(ProtocolFault::RedriveCompleted.into());
        }
        self.stage = Stage::Driving;
        tracing::debug!(effects = self.effects.len(), "pipeline drive start");

        let mut state = initial;
        for idx in 0..self.effects.len() {
            let effect = Arc::clone(&self.effects[idx].effect);
            let mut tx = supplier.push_effect(effect.kind());
            let frame = tx.frame();

            let outcome = {
                let mut ctx = EffectCtx {
                    args: &self.args,
                    tx: &mut tx,
                    world,
                    events,
                };
                effect.process(&mut ctx, &state)
            };

            match outcome {
                Ok(result) => {
                    tx.complete()?;
                    self.effects[idx].frame = Some(frame);
                    match result {
                        EffectResult::NoOp => {}
                        EffectResult::Replace(next) => state = next,
                        EffectResult::Stop(final_state) => {
                            if let Some(next) = final_state {
                                state = next;
                            }
                            self.stage = Stage::Completed;
                            tracing::debug!(stopped_at = idx, "pipeline drive stopped");
                            return Ok(state);
                        }
                    }
                }
                Err(fault) => {
                    tx.fault()?;
                    self.effects[idx].frame = Some(frame);
                    self.stage = Stage::Completed;
                    tracing::debug!(faulted_at = idx, error = %fault, "pipeline drive faulted");
                    return Err(fault);
                }
            }
        }

        self.stage = Stage::Completed;
        tracing::debug!("pipeline drive completed");
        Ok(state)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
