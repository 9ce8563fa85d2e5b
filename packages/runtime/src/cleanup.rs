//! Cleanup serialization
//!
//! Produces the canonical markup of a live document. Editor overlays live
//! outside the attribute list and are never written; runtime-owned elements
//! are skipped along with their subtrees. Everything else is emitted exactly
//! as it stands in the tree.

use crate::inject::is_runtime_node;
use livepage_dom::{Document, Serializer};

pub fn serialize_clean(document: &Document) -> String {
    Serializer::new()
        .skip_when(is_runtime_node)
        .serialize_document(document)
}

/// Parse and clean in one pass. Used to normalize markup that has
/// never been through the runtime.
pub fn canonicalize(markup: &str) -> String {
    serialize_clean(&livepage_dom::parse(markup))
}
