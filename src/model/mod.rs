//! Pure data structures: catalog entries, cart lines, and the order request.

pub mod cart;
pub mod menu;
pub mod order;

pub use cart::*;
pub use menu::*;
pub use order::*;
