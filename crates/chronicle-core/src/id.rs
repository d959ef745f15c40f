use serde::{Serialize, Deserialize};
use slotmap::new_key_type;

new_key_type! {
    /// Identifies a transaction frame in the capture supplier's frame arena.
    pub struct FrameId;
}

/// Identifies an actor (player or other agent) in the simulation. Cheap to
/// copy and compare; allocation is owned by the simulation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(pub u32);

/// Identifies an item type in the simulation's item registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemTypeId(pub u32);

/// Identifies a concrete block state (type + variant) in the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockStateId(pub u32);
