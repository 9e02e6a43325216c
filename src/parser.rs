//! The parse facade.
//!
//!     Orchestrates one parse: resolve options, enforce the size cap, take
//!     the empty-input fast path, run the tokenizer into a fresh builder, map
//!     failures. Two entry points: [`parse`] returns the typed tree,
//!     [`parse_to_json`] returns the envelope the host bridge ships across
//!     the boundary: a success flag, the encoded AST as a JSON array, and
//!     the error fields.
//!
//!     Neither entry point panics for any input within the size limit; every
//!     failure path comes back as data.

use serde::Serialize;

use crate::builder::TreeBuilder;
use crate::error::ParseError;
use crate::node::{MarkdownNode, NodeKind};
use crate::options::ParserOptions;
use crate::serializer;
use crate::tokenizer;

/// Parse markdown into a document tree.
///
/// Failure kinds: oversized input (checked before the tokenizer runs) and
/// tokenizer abort. Everything else succeeds; malformed markdown is
/// recovered, never rejected.
pub fn parse(content: &str, options: &ParserOptions) -> Result<MarkdownNode, ParseError> {
    let effective = options.resolve();

    if content.len() > effective.max_input_size {
        return Err(ParseError::input_too_large());
    }

    if content.is_empty() {
        return Ok(MarkdownNode::new(NodeKind::Document));
    }

    let mut builder = TreeBuilder::new();
    if tokenizer::tokenize(content, &effective, &mut builder).is_err() {
        return Err(ParseError::tokenize_failure());
    }

    Ok(builder.finish())
}

/// The result envelope handed to embedders.
///
/// `ast` is a JSON array wrapping the document root: `"[]"` on failure, the
/// canned `[{"type":"document","children":[]}]` for empty input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseOutcome {
    pub success: bool,
    pub ast: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_column: Option<u32>,
}

impl ParseOutcome {
    fn success(ast: String) -> Self {
        Self {
            success: true,
            ast,
            error_message: None,
            error_line: None,
            error_column: None,
        }
    }

    fn failure(error: &ParseError) -> Self {
        Self {
            success: false,
            ast: "[]".to_string(),
            error_message: Some(error.message().to_string()),
            error_line: error.line,
            error_column: error.column,
        }
    }
}

/// Parse and encode in one call.
pub fn parse_to_json(content: &str, options: &ParserOptions) -> ParseOutcome {
    match parse(content, options) {
        Ok(root) => {
            let ast = if content.is_empty() {
                format!("[{}]", serializer::EMPTY_DOCUMENT_JSON)
            } else {
                serializer::encode_roots(std::slice::from_ref(&root))
            };
            ParseOutcome::success(ast)
        }
        Err(error) => ParseOutcome::failure(&error),
    }
}
