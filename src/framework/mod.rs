//! Generic single-controller framework for session state.
//!
//! This module provides the building blocks for owning one mutable state record
//! inside a tokio task and mutating it only through typed, sequential transitions.
//!
//! # Main Components
//!
//! - [`SessionEntity`] - Trait a state record implements (pure `apply` transitions)
//! - [`SessionActor`] - Generic actor that owns the state
//! - [`SessionClient`] - Type-safe, cloneable handle for sending actions
//! - [`FrameworkError`] - Plumbing errors
//! - [`mock`] - Scripted port fakes for tests

pub mod core;
pub mod mock;

// Re-export core types for convenience
pub use core::*;
