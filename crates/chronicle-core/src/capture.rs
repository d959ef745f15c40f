//! Per-action transaction capture: the stack of open frames and the ordered
//! log of everything a top-level action did.
//!
//! One [`TransactionalCaptureSupplier`] is created per top-level triggering
//! call and handed down through every nested pipeline invoked as part of
//! that action, so an arbitrarily deep tree of pipelines-within-effects
//! shares one coherent transaction stack and one frame log.
//!
//! Frame release is strict LIFO. The safe way to hold a scope is
//! [`push_effect`](TransactionalCaptureSupplier::push_effect), which returns
//! an [`EffectTransactor`] guard; [`open_frame`] / [`close_frame`] are the
//! underlying checked operations.
//!
//! [`open_frame`]: TransactionalCaptureSupplier::open_frame
//! [`close_frame`]: TransactionalCaptureSupplier::close_frame

use crate::effect::EffectKind;
use crate::error::ProtocolFault;
use crate::frame::{FrameStatus, MutationRecord, TransactionFrame};
use crate::id::FrameId;
use crate::transactor::EffectTransactor;
use slotmap::SlotMap;

/// Process-local capture state for one top-level action. Not shared across
/// unrelated triggers; exclusively owned by the action for its lifetime.
#[derive(Debug, Default)]
pub struct TransactionalCaptureSupplier {
    /// Arena of all frames this action ever opened.
    frames: SlotMap<FrameId, TransactionFrame>,
    /// Currently-open frames, innermost last.
    stack: Vec<FrameId>,
    /// Every frame in open order; the frame log handed to the event layer.
    log: Vec<FrameId>,
    next_seq: u64,
}

impl TransactionalCaptureSupplier {
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Scope management
    // -----------------------------------------------------------------------

    /// Open a frame for `kind` and return the guard that seals it. The only
    /// legal ways to end the guard are [`EffectTransactor::complete`] and
    /// [`EffectTransactor::fault`]; dropping it unwinds the scope as faulted.
    pub fn push_effect(&mut self, kind: EffectKind) -> EffectTransactor<'_> {
        let frame = self.open_frame(kind);
        EffectTransactor::new(self, frame)
    }

    /// Push a new frame onto the stack, childed under the currently-open
    /// frame (or a root frame when the stack is empty).
    pub fn open_frame(&mut self, kind: EffectKind) -> FrameId {
        let parent = self.stack.last().copied();
        let seq = self.next_seq;
        self.next_seq += 1;

        let id = self.frames.insert(TransactionFrame::new(seq, kind, parent));
        if let Some(parent) = parent {
            self.frames[parent].push_child(id);
        }
        self.stack.push(id);
        self.log.push(id);
        tracing::trace!(?id, ?kind, seq, depth = self.stack.len(), "frame opened");
        id
    }

    /// Seal `frame` with `status` and pop it from the stack. `frame` must be
    /// the innermost open frame; anything else is a [`ProtocolFault`].
    pub fn close_frame(
        &mut self,
        frame: FrameId,
        status: FrameStatus,
    ) -> Result<(), ProtocolFault> {
        debug_assert!(status != FrameStatus::Open);
        if !self.frames.contains_key(frame) {
            return Err(ProtocolFault::UnknownFrame(frame));
        }
        match self.stack.last() {
            Some(&top) if top == frame => {
                self.stack.pop();
                self.frames[frame].seal(status);
                tracing::trace!(?frame, ?status, depth = self.stack.len(), "frame sealed");
                Ok(())
            }
            open => Err(ProtocolFault::ReleaseOutOfOrder {
                frame,
                open: open.copied(),
            }),
        }
    }

    /// Unwind backstop for dropped guards: pop and seal frames as faulted,
    /// innermost first, until `frame` itself has been sealed.
    pub(crate) fn unwind_frame(&mut self, frame: FrameId) {
        while let Some(top) = self.stack.pop() {
            self.frames[top].seal(FrameStatus::Faulted);
            tracing::trace!(frame = ?top, "frame unwound as faulted");
            if top == frame {
                break;
            }
        }
    }

    // -----------------------------------------------------------------------
    // Mutation recording
    // -----------------------------------------------------------------------

    /// Append a mutation record to `frame`. Fails if the frame is sealed.
    pub fn record_mutation(
        &mut self,
        frame: FrameId,
        mutation: MutationRecord,
    ) -> Result<(), ProtocolFault> {
        let entry = self
            .frames
            .get_mut(frame)
            .ok_or(ProtocolFault::UnknownFrame(frame))?;
        if !entry.is_open() {
            return Err(ProtocolFault::SealedFrameMutation(frame));
        }
        entry.push_mutation(mutation);
        Ok(())
    }

    /// Append a mutation record to the innermost open frame.
    pub fn record(&mut self, mutation: MutationRecord) -> Result<(), ProtocolFault> {
        let frame = self
            .stack
            .last()
            .copied()
            .ok_or(ProtocolFault::NoOpenFrame)?;
        self.record_mutation(frame, mutation)
    }

    // -----------------------------------------------------------------------
    // Inspection
    // -----------------------------------------------------------------------

    /// The innermost open frame, if any.
    pub fn current_frame(&self) -> Option<&TransactionFrame> {
        self.stack.last().map(|&id| &self.frames[id])
    }

    /// Id of the innermost open frame, if any.
    pub fn current_frame_id(&self) -> Option<FrameId> {
        self.stack.last().copied()
    }

    /// Look up any frame by id, open or sealed.
    pub fn frame(&self, id: FrameId) -> Option<&TransactionFrame> {
        self.frames.get(id)
    }

    /// Ordered (open-order) iteration over the sealed frame log. This is a
    /// read, not a consuming operation: calling it twice yields the same
    /// sequence. Use [`clear`](Self::clear) to reset the supplier.
    pub fn drain_frames(&self) -> impl Iterator<Item = (FrameId, &TransactionFrame)> {
        self.log
            .iter()
            .map(|&id| (id, &self.frames[id]))
            .filter(|(_, frame)| frame.is_sealed())
    }

    /// Number of currently-open frames.
    pub fn open_depth(&self) -> usize {
        self.stack.len()
    }

    /// Whether no frame is currently open.
    pub fn is_idle(&self) -> bool {
        self.stack.is_empty()
    }

    /// Total frames ever opened by this action.
    pub fn frame_count(&self) -> usize {
        self.log.len()
    }

    /// Drop all captured state. Only valid between top-level actions; open
    /// frames are discarded without sealing.
    pub fn clear(&mut self) {
        self.frames.clear();
        self.stack.clear();
        self.log.clear();
        self.next_seq = 0;
    }
}

// ===========================================================================
// Tests
// ===========================================================================
