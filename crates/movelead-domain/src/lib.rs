//! movelead-domain
//!
//! Data model shared by the wizard, the lead client, and the proxy relay.
//! No I/O, no HTTP, no terminal. Only records and wire shapes.

pub mod affiliate;
pub mod lead;
pub mod wire;

pub use affiliate::*;
pub use lead::*;
pub use wire::*;
