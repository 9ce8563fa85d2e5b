//! # Livepage Protocol
//!
//! The typed envelope and channel connecting the host controller with the
//! document runtime living inside the sandbox.

pub mod channel;
pub mod error;
pub mod messages;
pub mod sandbox;

pub use channel::{channel, HostPort, Port, SandboxPort};
pub use error::ProtocolError;
pub use messages::{
    ControllerMessage, ElementColors, NewElement, RuntimeMessage, SelectionInfo, StyleUpdate,
};
pub use sandbox::SandboxPolicy;
