//! Common functionality for the silent COT pipeline.
//!
//! This crate provides the abstractions needed to model two-party protocol execution: a thread
//! [`Context`] carrying the I/O channel to the peer, executors, and the CPU backend used to move
//! heavy computation off the async task.
//!
//! This crate does not provide any cryptographic primitives, see `scot-core` for that.

#![deny(
    unsafe_code,
    missing_docs,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all
)]

mod context;
pub mod cpu;
pub mod executor;
mod id;
#[cfg(any(test, feature = "ideal"))]
pub mod ideal;

use async_trait::async_trait;

pub use context::Context;
pub use id::ThreadId;

/// A functionality which can be allocated ahead of use.
pub trait Allocate {
    /// Allocates `count` instances for preprocessing.
    fn alloc(&mut self, count: usize);
}

/// A functionality which can perform preprocessing of allocated instances.
#[async_trait]
pub trait Preprocess<Ctx>: Allocate {
    /// Error type.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Preprocesses everything that has been allocated so far.
    async fn preprocess(&mut self, ctx: &mut Ctx) -> Result<(), Self::Error>;
}
