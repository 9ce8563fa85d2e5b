//! # Livepage Controller
//!
//! Host side of the sync engine: the [`HostController`], the sandbox
//! [`Frame`] it drives, and the [`Generator`] seam.

pub mod controller;
pub mod error;
pub mod frame;
pub mod generator;

pub use controller::{ControllerConfig, ControllerState, GenerationStatus, HostController};
pub use error::{ControllerError, GenerationError};
pub use frame::Frame;
pub use generator::{GenerationInput, Generator, StaticGenerator};
