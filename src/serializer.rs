//! Tree to JSON serialization.
//!
//!     The node model carries the output contract in its `Serialize` derive
//!     (field order, attribute omission, name casing); this module is the thin
//!     writing layer on serde_json plus the canned empty-document form.
//!
//!     serde_json's string escaping is the contract consumers rely on: the
//!     short escapes for `"`, `\`, backspace, form feed, newline, carriage
//!     return and tab, `\u00xx` (lowercase, zero-padded) for the rest of the
//!     0x00-0x1F range, and everything from 0x20 up passed through untouched,
//!     multi-byte sequences included.

use crate::node::MarkdownNode;

/// The encoded empty document, with its `children` array spelled out.
///
/// Everywhere else an empty children list is omitted from the output; this
/// literal form is what the empty-input fast path has always produced, and
/// consumers match on it.
pub const EMPTY_DOCUMENT_JSON: &str = "{\"type\":\"document\",\"children\":[]}";

/// Encode one node and its subtree as compact JSON.
pub fn encode(node: &MarkdownNode) -> String {
    serde_json::to_string(node).expect("markdown nodes serialize to JSON")
}

/// Encode a root set as the JSON array envelope handed to embedders.
pub fn encode_roots(nodes: &[MarkdownNode]) -> String {
    serde_json::to_string(nodes).expect("markdown nodes serialize to JSON")
}
