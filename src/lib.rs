//! # Bento Order
//!
//! > **An ordering client for a single food vendor, built on one session actor.**
//!
//! Customers browse a catalog, configure items (combo choices, spice, addons),
//! collect them in a cart and submit the order to the vendor through a chat
//! application. A spreadsheet-style data service holds the menu, the shop
//! settings and the order log.
//!
//! ## 🏗️ Design Philosophy
//!
//! ### One state record, one owner
//! Everything that changes during a session (draft item, cart, checkout view,
//! pickup details, in-flight flag, admin gate) lives in one
//! [`SessionState`](session_actor::SessionState). It is owned by a
//! [`SessionActor`](framework::SessionActor) task that applies actions one at a time.
//!
//! ### Pure transitions
//! Every mutation is `SessionState::apply(action) -> Result<outcome, error>`.
//! No I/O happens inside, so the state machine is tested without tokio.
//!
//! ### Network work between transitions
//! [`OrderingClient`](clients::OrderingClient) brackets async work with two
//! actions. Submission is `BeginSubmission` (validate, freeze a snapshot, raise
//! the in-flight flag), then the [`submission`] pipeline, then `FinishSubmission`
//! (clear or retain the cart). Re-entrant submits and cart edits are rejected
//! while the flag is up.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Engine ([`framework`])
//! Generic `SessionActor<T>` / `SessionClient<T>` plus scripted port mocks.
//!
//! ### 2. The Domain ([`model`], [`catalog`], [`configurator`], [`composer`])
//! - **[`catalog`]**: normalizes loosely-typed sheet rows into menu items and shop status.
//! - **[`configurator`]**: the per-item draft and its commit rules.
//! - **[`model`]**: cart lines (priced at commit), the cart, the order request.
//! - **[`composer`]**: plain text, rich message and log record from one snapshot.
//!
//! ### 3. The Session ([`session_actor`])
//! Actions, outcomes, errors and the admin gate.
//!
//! ### 4. The Outside World ([`clients`], [`submission`])
//! - **[`clients`]**: the data service, the chat host bridge, and the ordering client.
//! - **[`submission`]**: persistence, then direct send → share picker → deep link.
//!
//! ### 5. The Orchestrator ([`lifecycle`], [`config`])
//! Startup load, wiring, shutdown, tracing setup, configuration.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! ORDER_DATA_SERVICE_URL=https://sheetdb.io/api/v1/<id> RUST_LOG=info cargo run
//! ```
//!
//! ### Running Tests
//!
//! ```bash
//! cargo test
//! ```

pub mod catalog;
pub mod clients;
pub mod composer;
pub mod config;
pub mod configurator;
pub mod framework;
pub mod lifecycle;
pub mod model;
pub mod session_actor;
pub mod submission;
