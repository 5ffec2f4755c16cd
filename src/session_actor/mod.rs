//! The ordering session: one state record, one actor, pure transitions.

mod actions;
pub mod admin;
pub mod entity;
pub mod error;

pub use actions::*;
pub use admin::AdminGate;
pub use entity::SessionState;
pub use error::*;

use crate::framework::{SessionActor, SessionClient};

/// Creates the session actor owning `state` and its generic client.
pub fn new(state: SessionState) -> (SessionActor<SessionState>, SessionClient<SessionState>) {
    SessionActor::new(32, state)
}
