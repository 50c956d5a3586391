//! Testing utilities for summarization runs.
//!
//! This module provides:
//! - `ScriptedClient`, a pattern-matched generative client that records prompts
//! - `StaticChannel` and `FlakyChannel` content channels
//! - HTML fixtures of watch pages

pub mod fixtures;
mod mocks;

pub use mocks::{FlakyChannel, ScriptedClient, StaticChannel};
