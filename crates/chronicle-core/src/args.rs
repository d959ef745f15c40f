//! Immutable per-invocation argument bundles.
//!
//! An [`InteractionArgs`] is built once when a pipeline is constructed and
//! shared by reference across every effect in one drive. Nothing in it is
//! mutated afterward; per-effect state rides in the running state instead.

use crate::id::{ActorId, ItemTypeId};
use serde::{Deserialize, Serialize};

/// A block position in the simulation world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

/// Which hand the actor used for the interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hand {
    Main,
    Off,
}

/// A copied snapshot of the item involved in the interaction, taken before
/// the simulation mutates the live stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSnapshot {
    pub item_type: ItemTypeId,
    pub count: u32,
}

/// Where the interaction ray hit the target block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitLocation {
    pub pos: BlockPos,
    /// True when the actor is standing inside the target block.
    pub inside: bool,
}

/// Everything the effects of one interaction pipeline need, snapshotted at
/// trigger time. Constructed once, never mutated, shared by reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionArgs {
    /// The acting player or agent.
    pub actor: ActorId,
    /// The hand holding the used item.
    pub hand: Hand,
    /// The targeted block position.
    pub target: BlockPos,
    /// Raytrace result for the interaction.
    pub hit: HitLocation,
    /// Copy of the used item stack, taken before any mutation.
    pub item: ItemSnapshot,
    /// Whether the actor is in creative mode (item not consumed).
    pub creative: bool,
    /// Whether this interaction should attempt to start a fire.
    pub ignites: bool,
}
