//! Core types, trait definitions, and pure engine logic for Selvedge.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.
//!
//! The "engine" half — [`classify`], [`score`], [`trend`], [`concept`] — is
//! pure and deterministic: the same inputs always produce the same outputs,
//! which is what makes the weekly artifacts reproducible.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod classify;
pub mod concept;
pub mod error;
pub mod item;
pub mod profile;
pub mod score;
pub mod snapshot;
pub mod store;
pub mod trend;
pub mod vote;

pub use error::{Error, Result};
