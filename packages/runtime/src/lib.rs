//! # Livepage Runtime
//!
//! Everything that runs inside the sandbox: runtime injection, the
//! interactive [`DocumentRuntime`], and cleanup serialization.

pub mod affordance;
pub mod cleanup;
pub mod colors;
pub mod config;
pub mod event;
pub mod inject;
pub mod layout;
pub mod runtime;
pub mod state;

pub use cleanup::{canonicalize, serialize_clean};
pub use colors::{resolve_colors, Rgba};
pub use config::{RuntimeConfig, TextSync};
pub use event::InputEvent;
pub use inject::{inject_runtime, is_runtime_node, RUNTIME_MARKER};
pub use layout::{BlockLayout, Geometry, Point, Rect};
pub use runtime::DocumentRuntime;
pub use state::{DragSession, Phase};
