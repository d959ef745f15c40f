//! Transactional side-effect pipeline engine.
//!
//! Game-facing actions (using an item, clicking a block) are decomposed
//! into ordered chains of [`effect::ProcessingSideEffect`]s, driven by a
//! [`pipeline::Pipeline`]. While effects run, every world mutation is
//! captured into strictly-nested transaction frames by the
//! [`capture::TransactionalCaptureSupplier`], producing a complete,
//! inspectable record of what one action did and which effect did it.
//!
//! The engine is deterministic and single-threaded per action: effects run
//! in declaration order, frames seal in strict LIFO order, and the same
//! inputs always produce the same frame log.
//!
//! # Crate layout
//!
//! - [`effect`] / [`effects`]: the effect contract and the built-in family
//! - [`pipeline`] / [`interaction`]: the drive loop and concrete pipelines
//! - [`capture`] / [`transactor`] / [`frame`]: the transactional record
//! - [`world`]: interfaces to the simulation and event layers
//! - [`registry`]: process-scoped effect registration
//! - [`serialize`]: frame-log snapshot export

pub mod args;
pub mod capture;
pub mod effect;
pub mod effects;
pub mod error;
pub mod frame;
pub mod id;
pub mod interaction;
pub mod pipeline;
pub mod registry;
pub mod serialize;
pub mod transactor;
pub mod world;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
