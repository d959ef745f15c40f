//! Scoped transaction handle: one open frame, sealed on every exit path.
//!
//! An [`EffectTransactor`] is acquired from
//! [`TransactionalCaptureSupplier::push_effect`] and represents "this block
//! of code is logically one sub-transaction". Normal release goes through
//! [`complete`](EffectTransactor::complete) or
//! [`fault`](EffectTransactor::fault), which are LIFO-checked. If the guard
//! is dropped without either (early return, panic unwind), the drop
//! implementation unwinds the scope and seals the frame as faulted, so a
//! frame is never left unsealed.

use crate::capture::TransactionalCaptureSupplier;
use crate::error::ProtocolFault;
use crate::frame::{FrameStatus, MutationRecord};
use crate::id::FrameId;

/// RAII guard for one transaction frame. Holds the supplier exclusively for
/// the lifetime of the scope; nested scopes reborrow through
/// [`supplier`](Self::supplier).
#[derive(Debug)]
pub struct EffectTransactor<'a> {
    supplier: &'a mut TransactionalCaptureSupplier,
    frame: FrameId,
    released: bool,
}

impl<'a> EffectTransactor<'a> {
    pub(crate) fn new(supplier: &'a mut TransactionalCaptureSupplier, frame: FrameId) -> Self {
        Self {
            supplier,
            frame,
            released: false,
        }
    }

    /// The frame this scope opened.
    pub fn frame(&self) -> FrameId {
        self.frame
    }

    /// Access the shared capture supplier, e.g. to open a nested scope or
    /// drive a sub-pipeline inside this one. Frames opened through the
    /// returned reference become children of this scope's frame.
    pub fn supplier(&mut self) -> &mut TransactionalCaptureSupplier {
        self.supplier
    }

    /// Record a mutation on this scope's frame.
    pub fn record(&mut self, mutation: MutationRecord) -> Result<(), ProtocolFault> {
        self.supplier.record_mutation(self.frame, mutation)
    }

    /// Release the scope, sealing the frame cleanly. Fails with a
    /// [`ProtocolFault`] if this frame is not the innermost open frame.
    pub fn complete(mut self) -> Result<(), ProtocolFault> {
        self.released = true;
        self.supplier.close_frame(self.frame, FrameStatus::Sealed)
    }

    /// Release the scope, sealing the frame as faulted. Used when the
    /// effect raised a fault while the scope was open; the frame stays in
    /// the log so the event layer can see what was attempted.
    pub fn fault(mut self) -> Result<(), ProtocolFault> {
        self.released = true;
        self.supplier.close_frame(self.frame, FrameStatus::Faulted)
    }
}

impl Drop for EffectTransactor<'_> {
    fn drop(&mut self) {
        if !self.released {
            // Unwind path: seal this frame and any still-open descendants
            // as faulted so the log is left fully sealed.
            self.supplier.unwind_frame(self.frame);
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
