//! Fault taxonomy for the pipeline engine.
//!
//! Three families, matching how they must be handled:
//!
//! - [`ProtocolFault`] -- programmer error; an engine invariant was violated
//!   (out-of-order release, redrive, mutation on a sealed frame). Fatal to
//!   the current top-level action, never silently recovered.
//! - [`EffectFault`] -- the simulation layer rejected an effect's mutation
//!   attempt. Propagates out of the drive loop after the open frame is
//!   sealed; nothing already applied is rolled back here.
//! - [`ConfigurationFault`] -- a pipeline was assembled wrong. Rejected at
//!   construction time, before any frame is opened.

use crate::args::BlockPos;
use crate::effect::EffectKind;
use crate::id::FrameId;

/// Engine invariant violations. These indicate a bug in the caller, not a
/// recoverable runtime condition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolFault {
    #[error("pipeline has already been driven")]
    RedriveCompleted,
    #[error("frame {frame:?} released out of order; innermost open frame is {open:?}")]
    ReleaseOutOfOrder {
        frame: FrameId,
        open: Option<FrameId>,
    },
    #[error("mutation recorded against sealed frame {0:?}")]
    SealedFrameMutation(FrameId),
    #[error("no open frame on the transaction stack")]
    NoOpenFrame,
    #[error("unknown frame {0:?}")]
    UnknownFrame(FrameId),
}

/// A simulation-level failure raised while an effect was executing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EffectFault {
    #[error("interaction target at {pos:?} no longer exists")]
    TargetMissing { pos: BlockPos },
    #[error("simulation rejected the mutation: {reason}")]
    Rejected { reason: String },
}

/// A pipeline was built with a malformed effect list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationFault {
    #[error("pipeline effect list is empty")]
    EmptyEffectList,
    #[error("effect kind {0:?} is not registered")]
    UnregisteredEffect(EffectKind),
}

/// Umbrella error returned by `Pipeline::drive` and by effects that perform
/// their own frame bookkeeping or nested drives.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Protocol(#[from] ProtocolFault),
    #[error(transparent)]
    Effect(#[from] EffectFault),
    #[error(transparent)]
    Configuration(#[from] ConfigurationFault),
}
