//! # Session Lifecycle
//!
//! Starting, wiring and stopping the ordering session.
//!
//! 1. **Startup load** - menu and settings are read concurrently (`tokio::join!`)
//! 2. **Actor creation** - the session actor takes ownership of the initial state
//! 3. **Dependency injection** - the data service, chat host and clipboard go to
//!    the pipeline and the [`OrderingClient`](crate::clients::OrderingClient)
//! 4. **Graceful shutdown** - drop the client, await the actor
//!
//! [`tracing`] holds the subscriber setup used by the binary.

pub mod order_system;
pub mod tracing;

pub use order_system::*;
