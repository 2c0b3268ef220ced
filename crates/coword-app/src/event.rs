//! Events produced by drivers.

use coword_client::ClientEvent;

/// Events a [`crate::Driver`] reports to the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// One line of user input.
    Line(String),

    /// Socket or timer event, passed straight to the client.
    Client(ClientEvent),
}
