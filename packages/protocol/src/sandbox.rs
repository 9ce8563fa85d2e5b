//! Capability grant for the sandboxed rendering surface

use serde::{Deserialize, Serialize};

/// Capabilities granted to the sandbox. Anything not granted is withheld;
/// the only way out of the sandbox is the message channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SandboxPolicy {
    /// Run the page's embedded logic (and the injected runtime)
    pub allow_scripts: bool,
    /// Allow form interaction
    pub allow_forms: bool,
    /// Allow navigating the top-level browsing context
    pub allow_top_navigation: bool,
    /// Treat the content as same-origin (grants credential access)
    pub allow_same_origin: bool,
}

impl Default for SandboxPolicy {
    fn default() -> Self {
        Self {
            allow_scripts: true,
            allow_forms: true,
            allow_top_navigation: false,
            allow_same_origin: false,
        }
    }
}

impl SandboxPolicy {
    /// Token list for an iframe `sandbox` attribute
    pub fn to_attribute(&self) -> String {
        let mut tokens = Vec::new();
        if self.allow_scripts {
            tokens.push("allow-scripts");
        }
        if self.allow_forms {
            tokens.push("allow-forms");
        }
        if self.allow_top_navigation {
            tokens.push("allow-top-navigation");
        }
        if self.allow_same_origin {
            tokens.push("allow-same-origin");
        }
        tokens.join(" ")
    }

    /// The runtime cannot execute without script permission
    pub fn permits_runtime(&self) -> bool {
        self.allow_scripts
    }

    /// True when nothing outside the message channel is reachable
    pub fn is_isolated(&self) -> bool {
        !self.allow_top_navigation && !self.allow_same_origin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_grant() {
        let policy = SandboxPolicy::default();
        assert_eq!(policy.to_attribute(), "allow-scripts allow-forms");
        assert!(policy.is_isolated());
        assert!(policy.permits_runtime());
    }

    #[test]
    fn test_config_overrides() {
        let policy: SandboxPolicy = serde_json::from_str(r#"{"allowForms": false}"#).unwrap();
        assert_eq!(policy.to_attribute(), "allow-scripts");
    }
}
