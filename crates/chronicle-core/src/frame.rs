//! Transaction frames: the sealed record of one transactor scope.
//!
//! A frame is created when a scope opens, accumulates mutation records and
//! child frames while open, and is sealed exactly once when the scope
//! releases. Sealed frames are immutable; the external event/cancellation
//! layer reads them after the top-level action completes.

use crate::args::BlockPos;
use crate::effect::EffectKind;
use crate::id::{ActorId, BlockStateId, FrameId};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Mutation records
// ---------------------------------------------------------------------------

/// One world mutation captured while a frame was open. These are what the
/// event layer inspects to decide on broadcast, cancellation, or selective
/// undo; the engine itself never replays them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MutationRecord {
    /// A block changed state at `pos`.
    BlockChange {
        pos: BlockPos,
        previous: BlockStateId,
        next: BlockStateId,
    },
    /// An actor's inventory changed.
    InventoryChange { actor: ActorId },
    /// An actor's open container was rebroadcast.
    ContainerBroadcast { actor: ActorId },
    /// A block view change was broadcast to observers.
    ViewBroadcast { pos: BlockPos },
    /// A fire was started at `pos`.
    Ignition { pos: BlockPos },
}

// ---------------------------------------------------------------------------
// Frame status
// ---------------------------------------------------------------------------

/// Lifecycle of a frame. `Sealed` and `Faulted` are both terminal; a
/// faulted frame is sealed too, but records that its effect raised a fault
/// while the scope was open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameStatus {
    Open,
    Sealed,
    Faulted,
}

// ---------------------------------------------------------------------------
// TransactionFrame
// ---------------------------------------------------------------------------

/// The record of everything captured while one transactor scope was open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionFrame {
    seq: u64,
    kind: EffectKind,
    parent: Option<FrameId>,
    children: Vec<FrameId>,
    mutations: Vec<MutationRecord>,
    status: FrameStatus,
}

impl TransactionFrame {
    pub(crate) fn new(seq: u64, kind: EffectKind, parent: Option<FrameId>) -> Self {
        Self {
            seq,
            kind,
            parent,
            children: Vec::new(),
            mutations: Vec::new(),
            status: FrameStatus::Open,
        }
    }

    /// Global open-order position of this frame within the top-level action.
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// The effect that opened this frame.
    pub fn kind(&self) -> EffectKind {
        self.kind
    }

    /// The frame that was open when this one was opened. `None` at the root.
    pub fn parent(&self) -> Option<FrameId> {
        self.parent
    }

    /// Frames opened (and closed) while this frame was open, in open order.
    pub fn children(&self) -> &[FrameId] {
        &self.children
    }

    /// Mutation records captured while this frame was open, in record order.
    pub fn mutations(&self) -> &[MutationRecord] {
        &self.mutations
    }

    pub fn status(&self) -> FrameStatus {
        self.status
    }

    pub fn is_open(&self) -> bool {
        self.status == FrameStatus::Open
    }

    /// Sealed cleanly or sealed faulted; either way, immutable.
    pub fn is_sealed(&self) -> bool {
        self.status != FrameStatus::Open
    }

    pub fn is_faulted(&self) -> bool {
        self.status == FrameStatus::Faulted
    }

    pub(crate) fn push_child(&mut self, child: FrameId) {
        self.children.push(child);
    }

    pub(crate) fn push_mutation(&mut self, mutation: MutationRecord) {
        debug_assert!(self.is_open());
        self.mutations.push(mutation);
    }

    pub(crate) fn seal(&mut self, status: FrameStatus) {
        debug_assert!(self.is_open());
        debug_assert!(status != FrameStatus::Open);
        self.status = status;
    }
}
