//! Runtime tuning

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How text edits are synchronized back to the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSync {
    /// Every input emits a snapshot
    Immediate,
    /// At most one snapshot per interval; the trailing edit is flushed on
    /// the next pointer-up, selection change, mode change or tick
    Coalesce(Duration),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuntimeConfig {
    /// Pointer travel (px) before a press becomes a drag
    pub drag_threshold: f64,
    /// Minimum interval between text-edit snapshots; 0 syncs every input
    pub text_sync_interval_ms: u64,
    /// Width of the rendering surface used for layout
    pub viewport_width: f64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            drag_threshold: 5.0,
            text_sync_interval_ms: 0,
            viewport_width: 1024.0,
        }
    }
}

impl RuntimeConfig {
    pub fn text_sync(&self) -> TextSync {
        match self.text_sync_interval_ms {
            0 => TextSync::Immediate,
            ms => TextSync::Coalesce(Duration::from_millis(ms)),
        }
    }
}
