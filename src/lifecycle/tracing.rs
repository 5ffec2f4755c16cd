//! # Observability & Tracing
//!
//! [`setup_tracing`] initializes structured logging for the binary. Library code
//! only emits events; it never installs a subscriber.
//!
//! ## Configuration
//!
//! Levels come from `RUST_LOG`. The compact format hides module paths
//! (`with_target(false)`) and shows spans inline.
//!
//! ```bash
//! # Phase transitions, dispatch results, status changes
//! RUST_LOG=info cargo run
//!
//! # Every session action and outcome, composed order text, skipped channels
//! RUST_LOG=debug cargo run
//! ```
//!
//! ## What Gets Logged
//!
//! - **Session actor**: startup, every applied or rejected action (debug/warn), shutdown with a count
//! - **Submission**: each pipeline phase at info, persistence and dispatch failures at warn,
//!   swallowed clipboard failures at debug
//! - **Admin gate**: status updates at info, failed patches at warn
//!
//! Passwords are redacted in action logs and the settings secret is never printed.
//!
//! ## Workflow Trace Example
//!
//! ```text
//! INFO Catalog loaded items=12 vendor="Auntie Lin" is_open=true
//! INFO Session actor started entity_type="SessionState"
//! INFO commit_item: Added to cart item="Set A" price=220 total=220
//! INFO submit: Submitting order total=220 lines=1
//! INFO submit:run: Submission phase phase=BuildingRepresentations
//! INFO submit:run: Submission phase phase=CopyingFallbackText
//! INFO submit:run: Submission phase phase=PersistingRecord
//! INFO submit:run: Submission phase phase=Dispatching
//! INFO submit:run: Order dispatched channel=DirectSend
//! INFO submit:run: Submission phase phase=Delivered
//! INFO submit: Submission phase phase=Cleared
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
