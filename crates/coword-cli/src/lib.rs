//! CoWord terminal client
//!
//! Runs the [`coword_app::Runtime`] over a tokio-tungstenite WebSocket
//! ([`driver::WsDriver`]), reading commands from stdin and rendering the view
//! as log lines.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod args;
pub mod driver;
pub mod render;

pub use args::Args;
pub use driver::{TransportError, WsDriver};
