//! Interfaces to the external simulation and event layers.
//!
//! The pipeline engine never mutates world state itself; every content
//! change goes through [`WorldMutator`], supplied by the simulation layer at
//! drive time. [`EventGate`] is the cancellation-query surface of the
//! external event system: effects use it to skip work that no listener
//! could observe.

use crate::args::{BlockPos, InteractionArgs};
use crate::error::EffectFault;
use crate::id::{ActorId, BlockStateId};
use serde::{Deserialize, Serialize};

/// The simulation-visible outcome of one interaction, threaded through an
/// interaction pipeline as its running state and reported back to the game
/// when the drive completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionResult {
    /// Nothing handled the interaction; fall through to default behavior.
    Pass,
    /// The interaction succeeded with a visible result.
    Success,
    /// The interaction succeeded and consumed the item.
    Consume,
    /// The interaction was explicitly refused.
    Fail,
}

/// The block-level result of applying an item to a targeted block: the
/// interaction outcome plus the content change it caused, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockInteraction {
    pub outcome: InteractionResult,
    /// `(previous, next)` block states when the interaction changed the
    /// target block.
    pub change: Option<(BlockStateId, BlockStateId)>,
}

/// Event kinds the external cancellation layer can be queried about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameEventKind {
    BlockChange,
    InventoryChange,
    ViewChange,
    Ignition,
}

/// World-mutation interface supplied by the simulation layer.
///
/// Every method may fail with an [`EffectFault`] when the simulation rejects
/// the mutation (e.g. the target block was removed between trigger and
/// drive). The engine seals the current frame and propagates the fault.
pub trait WorldMutator {
    /// Apply a bare item use (no block target). Returns the outcome the
    /// simulation reports for it.
    fn use_item(&mut self, args: &InteractionArgs) -> Result<InteractionResult, EffectFault>;

    /// Apply an item use against the targeted block.
    fn use_item_on_block(&mut self, args: &InteractionArgs)
    -> Result<BlockInteraction, EffectFault>;

    /// Broadcast the changed view of a block position to observers.
    fn broadcast_change(&mut self, pos: BlockPos) -> Result<(), EffectFault>;

    /// Re-send an actor's container contents after an inventory mutation.
    fn refresh_container(&mut self, actor: ActorId) -> Result<(), EffectFault>;

    /// Attempt to start a fire at the position. Returns `false` when the
    /// simulation blocks ignition (e.g. non-flammable target).
    fn ignite(&mut self, pos: BlockPos) -> Result<bool, EffectFault>;
}

/// Cancellation-query interface of the external event system.
pub trait EventGate {
    /// Whether any listener could observe an event of this kind. Effects
    /// short-circuit expensive work when this returns `false`.
    fn should_fire(&self, kind: GameEventKind) -> bool;
}
