//! Core cryptographic primitives shared by the silent COT pipeline.
//!
//! This crate provides the 128-bit [`Block`] type which every correlation is expressed in, a
//! fixed-key AES helper, an AES-based PRG and the LPN encoder used by silent expansion.

#![deny(
    unsafe_code,
    missing_docs,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all
)]

pub mod aes;
mod block;
pub mod lpn;
pub mod prg;

pub use block::Block;

/// The byte length of every correlation element.
pub const BLOCK_BYTE_LENGTH: usize = Block::LEN;
