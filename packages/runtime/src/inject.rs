//! Runtime injection
//!
//! The page is rendered with a small bootstrap script appended to its body.
//! The script carries [`RUNTIME_MARKER`] so cleanup can find and drop it.

use livepage_dom::Node;

/// Attribute identifying runtime-owned elements
pub const RUNTIME_MARKER: &str = "data-livepage-runtime";

pub const RUNTIME_VERSION: &str = env!("CARGO_PKG_VERSION");

const BOOTSTRAP: &str = "window.__livepage={version:\"%VERSION%\",channel:\"parent\"};";

/// The `<script>` element added to rendered pages
pub fn runtime_script() -> String {
    format!(
        "<script {}=\"{}\">{}</script>",
        RUNTIME_MARKER,
        RUNTIME_VERSION,
        BOOTSTRAP.replace("%VERSION%", RUNTIME_VERSION)
    )
}

/// Insert the runtime script immediately before the last `</body>`.
/// Without a closing body marker the script is appended at the end.
pub fn inject_runtime(markup: &str) -> String {
    let script = runtime_script();
    match markup.to_ascii_lowercase().rfind("</body") {
        Some(index) => {
            let mut out = String::with_capacity(markup.len() + script.len());
            out.push_str(&markup[..index]);
            out.push_str(&script);
            out.push_str(&markup[index..]);
            out
        }
        None => {
            tracing::debug!("no closing body marker, appending runtime at end");
            format!("{}{}", markup, script)
        }
    }
}

/// True for elements that belong to the runtime rather than the page
pub fn is_runtime_node(node: &Node) -> bool {
    node.is_element() && node.has_attribute(RUNTIME_MARKER)
}
