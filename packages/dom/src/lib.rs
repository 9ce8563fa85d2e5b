//! # Livepage DOM
//!
//! The Live Document Tree and its markup codec.
//!
//! ```text
//! markup ──tokenize──▶ tokens ──parse──▶ Document ──serialize──▶ markup
//! ```
//!
//! Parsing is lenient (it never fails) and serialization is deterministic,
//! so `serialize(parse(serialize(parse(x))))` equals `serialize(parse(x))`.

pub mod document;
pub mod error;
pub mod node;
pub mod parser;
pub mod selector;
pub mod serializer;
pub mod style;
pub mod tokenizer;

pub use document::Document;
pub use error::{DomError, DomResult};
pub use node::{Attribute, Node, NodeData, NodeId, NodeRef, Overlay};
pub use parser::{can_contain, is_void_element, parse, parse_fragment};
pub use selector::{select_all, select_first, Selector};
pub use serializer::{serialize, Serializer};
pub use style::StyleDeclarations;
pub use tokenizer::{tokenize, Token};
