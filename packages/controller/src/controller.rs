//! # Host Controller
//!
//! Single owner of the canonical markup and of edit mode.
//!
//! ```text
//!            set_markup (changed)          pump
//!   Idle ─────────────────────────▶ Rendering ─────▶ Interactive
//!                                        ▲                │
//!                                        └── set_markup ──┘
//! ```
//!
//! Markup arrives two ways. External replacement (`set_markup`, a
//! generation, a history record) forces a hard reload of the sandbox.
//! A `SYNC_SNAPSHOT` from the runtime is an echo of an edit already on
//! screen: it updates the markup and the last-known value together, so the
//! change is never mistaken for an external one.

use crate::error::ControllerError;
use crate::frame::Frame;
use crate::generator::{GenerationInput, Generator};
use livepage_history::{HistoryRecord, HistoryStore};
use livepage_protocol::{
    ControllerMessage, HostPort, NewElement, RuntimeMessage, SandboxPolicy, SelectionInfo,
    StyleUpdate,
};
use livepage_runtime::RuntimeConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// No markup yet
    Idle,
    /// A hard reload is scheduled
    Rendering,
    /// Sandbox is live
    Interactive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationStatus {
    Idle,
    Succeeded { record_id: String, durable: bool },
    Failed(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ControllerConfig {
    pub runtime: RuntimeConfig,
    pub sandbox: SandboxPolicy,
}

pub struct HostController {
    markup: String,
    last_known: String,
    edit_mode: bool,
    selection: Option<SelectionInfo>,
    state: ControllerState,
    reload_pending: bool,
    frame: Frame,
    port: Option<HostPort>,
    history: HistoryStore,
    status: GenerationStatus,
}

impl HostController {
    pub fn new(history: HistoryStore, config: ControllerConfig) -> Self {
        Self {
            markup: String::new(),
            last_known: String::new(),
            edit_mode: false,
            selection: None,
            state: ControllerState::Idle,
            reload_pending: false,
            frame: Frame::new(config.sandbox, config.runtime),
            port: None,
            history,
            status: GenerationStatus::Idle,
        }
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// Canonical markup for download
    pub fn export(&self) -> String {
        self.markup.clone()
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn edit_mode(&self) -> bool {
        self.edit_mode
    }

    pub fn selection(&self) -> Option<&SelectionInfo> {
        self.selection.as_ref()
    }

    pub fn status(&self) -> &GenerationStatus {
        &self.status
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut HistoryStore {
        &mut self.history
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn frame_mut(&mut self) -> &mut Frame {
        &mut self.frame
    }

    pub fn srcdoc(&self) -> &str {
        self.frame.srcdoc()
    }

    /// Replace the markup from outside. Returns false when `markup` equals
    /// the last-known value and nothing happens.
    pub fn set_markup(&mut self, markup: impl Into<String>) -> bool {
        let markup = markup.into();
        if markup == self.last_known {
            tracing::trace!("markup unchanged, no reload");
            return false;
        }
        self.markup = markup.clone();
        self.last_known = markup;
        self.selection = None;
        self.state = ControllerState::Rendering;
        self.reload_pending = true;
        tracing::info!(bytes = self.markup.len(), "markup replaced, reload scheduled");
        true
    }

    /// Run a scheduled reload, then exchange messages with the sandbox
    /// until neither side has anything queued. Returns the number of
    /// runtime messages handled.
    pub fn pump(&mut self) -> usize {
        if self.reload_pending {
            self.reload();
        }

        let mut handled = 0;
        loop {
            let applied = self
                .frame
                .runtime_mut()
                .map(|runtime| runtime.pump())
                .unwrap_or(0);
            let messages = self.port.as_mut().map(|port| port.drain()).unwrap_or_default();
            if applied == 0 && messages.is_empty() {
                break;
            }
            handled += messages.len();
            for message in messages {
                self.receive(message);
            }
        }
        handled
    }

    /// Let the runtime emit coalesced text edits, then pump
    pub fn tick(&mut self) -> usize {
        if let Some(runtime) = self.frame.runtime_mut() {
            runtime.tick();
        }
        self.pump()
    }

    pub fn set_edit_mode(&mut self, enabled: bool) {
        if self.edit_mode == enabled {
            return;
        }
        self.edit_mode = enabled;
        if !enabled {
            self.selection = None;
        }
        self.send(ControllerMessage::SetEditMode(enabled));
    }

    pub fn add_element(&mut self, element: NewElement) {
        self.send(ControllerMessage::AddElement(element));
    }

    pub fn update_style(&mut self, update: StyleUpdate) {
        self.send(ControllerMessage::UpdateStyle(update));
    }

    pub fn delete_element(&mut self) {
        self.send(ControllerMessage::DeleteElement);
    }

    /// Run the generator. Success records history and replaces the markup;
    /// a generator or history failure leaves both untouched.
    pub fn generate(
        &mut self,
        generator: &mut dyn Generator,
        input: GenerationInput,
    ) -> Result<&GenerationStatus, ControllerError> {
        tracing::info!(prompt = %input.prompt, "generating");
        let markup = match generator.generate(&input) {
            Ok(markup) if !markup.trim().is_empty() => markup,
            Ok(_) => {
                return Ok(self.fail("generator returned no markup".to_string()));
            }
            Err(e) => return Ok(self.fail(e.to_string())),
        };

        let record = HistoryRecord::new(markup.clone(), input.prompt, input.image, input.style);
        let record_id = record.id.clone();
        let outcome = match self.history.append(record) {
            Ok(outcome) => outcome,
            Err(e) => {
                self.fail(format!("history unavailable: {e}"));
                return Err(e.into());
            }
        };
        if !outcome.durable {
            tracing::warn!("history could not be persisted");
        }

        self.set_markup(markup);
        self.status = GenerationStatus::Succeeded {
            record_id,
            durable: outcome.durable,
        };
        Ok(&self.status)
    }

    /// Revisit a history record
    pub fn load_record(&mut self, id: &str) -> Result<(), ControllerError> {
        let markup = self
            .history
            .get(id)
            .map(|record| record.markup.clone())
            .ok_or_else(|| ControllerError::RecordNotFound(id.to_string()))?;
        tracing::info!(id, "loading history record");
        self.set_markup(markup);
        Ok(())
    }

    fn fail(&mut self, description: String) -> &GenerationStatus {
        tracing::warn!(error = %description, "generation failed");
        self.status = GenerationStatus::Failed(description);
        &self.status
    }

    fn reload(&mut self) {
        self.reload_pending = false;
        self.selection = None;
        // Dropping the old port discards whatever the old runtime queued
        self.port = None;
        self.port = Some(self.frame.load(&self.markup));
        self.state = ControllerState::Interactive;
        self.send(ControllerMessage::SetEditMode(self.edit_mode));
    }

    fn receive(&mut self, message: RuntimeMessage) {
        tracing::debug!(kind = message.kind(), "runtime message");
        match message {
            RuntimeMessage::SyncSnapshot(markup) => {
                self.markup = markup.clone();
                self.last_known = markup;
            }
            // A report queued before edit mode was turned off
            RuntimeMessage::ElementSelected(_) if !self.edit_mode => {
                tracing::trace!("selection report outside edit mode ignored");
            }
            RuntimeMessage::ElementSelected(info) => {
                self.selection = Some(info);
            }
        }
    }

    fn send(&self, message: ControllerMessage) {
        let Some(port) = self.port.as_ref() else {
            tracing::trace!(kind = message.kind(), "no sandbox yet, command dropped");
            return;
        };
        if let Err(e) = port.post(&message) {
            tracing::warn!(kind = message.kind(), error = %e, "sandbox unreachable");
        }
    }
}
