//! # Sandbox Frame
//!
//! The isolated surface the page is rendered in. Loading markup tears down
//! the current runtime and its channel, injects the runtime script, and
//! boots a fresh [`DocumentRuntime`] on a new channel. Anything the old
//! runtime had queued is dropped with it.

use livepage_protocol::{channel, HostPort, SandboxPolicy};
use livepage_runtime::{inject_runtime, DocumentRuntime, InputEvent, RuntimeConfig};

pub struct Frame {
    policy: SandboxPolicy,
    runtime_config: RuntimeConfig,
    runtime: Option<DocumentRuntime>,
    srcdoc: String,
    loads: u64,
}

impl Frame {
    pub fn new(policy: SandboxPolicy, runtime_config: RuntimeConfig) -> Self {
        Self {
            policy,
            runtime_config,
            runtime: None,
            srcdoc: String::new(),
            loads: 0,
        }
    }

    pub fn policy(&self) -> &SandboxPolicy {
        &self.policy
    }

    /// Markup currently rendered, runtime included
    pub fn srcdoc(&self) -> &str {
        &self.srcdoc
    }

    /// Number of hard reloads so far
    pub fn loads(&self) -> u64 {
        self.loads
    }

    pub fn runtime(&self) -> Option<&DocumentRuntime> {
        self.runtime.as_ref()
    }

    pub fn runtime_mut(&mut self) -> Option<&mut DocumentRuntime> {
        self.runtime.as_mut()
    }

    /// Rebuild from scratch and return the host end of the new channel
    pub fn load(&mut self, markup: &str) -> HostPort {
        self.runtime = None;
        self.srcdoc = inject_runtime(markup);
        self.loads += 1;

        let (host, sandbox) = channel();
        if self.policy.permits_runtime() {
            self.runtime = Some(DocumentRuntime::boot(
                &self.srcdoc,
                sandbox,
                self.runtime_config.clone(),
            ));
        } else {
            tracing::warn!("sandbox policy forbids scripts, page will not be editable");
        }
        tracing::info!(load = self.loads, bytes = markup.len(), "sandbox loaded");
        host
    }

    /// Forward a platform input event to the runtime
    pub fn dispatch(&mut self, event: InputEvent) {
        if let Some(runtime) = self.runtime.as_mut() {
            runtime.dispatch(event);
        }
    }

    /// Host page embedding the sandbox
    pub fn host_page(&self, title: &str) -> String {
        format!(
            "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>{}</title></head><body style=\"margin: 0;\"><iframe title=\"preview\" sandbox=\"{}\" style=\"border: 0; width: 100%; height: 100vh;\" srcdoc=\"{}\"></iframe></body></html>",
            escape(title),
            self.policy.to_attribute(),
            escape(&self.srcdoc)
        )
    }
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use livepage_runtime::RUNTIME_MARKER;

    #[test]
    fn test_load_injects_and_boots() {
        let mut frame = Frame::new(SandboxPolicy::default(), RuntimeConfig::default());
        let _port = frame.load("<html><body><p>x</p></body></html>");
        assert!(frame.srcdoc().contains(RUNTIME_MARKER));
        assert!(frame.runtime().is_some());
        assert_eq!(frame.loads(), 1);
    }

    #[test]
    fn test_scriptless_policy_has_no_runtime() {
        let policy = SandboxPolicy {
            allow_scripts: false,
            ..SandboxPolicy::default()
        };
        let mut frame = Frame::new(policy, RuntimeConfig::default());
        let port = frame.load("<p>x</p>");
        assert!(frame.runtime().is_none());
        assert!(port.is_closed());
    }

    #[test]
    fn test_host_page_escapes_srcdoc() {
        let mut frame = Frame::new(SandboxPolicy::default(), RuntimeConfig::default());
        let _port = frame.load("<p title=\"a\">x</p>");
        let page = frame.host_page("Preview");
        assert!(page.contains("sandbox=\"allow-scripts allow-forms\""));
        assert!(page.contains("srcdoc=\"&lt;p title=&quot;a&quot;&gt;x&lt;/p&gt;"));
    }
}
