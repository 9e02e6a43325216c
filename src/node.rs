//! The document tree node model.
//!
//!     A parsed document is a plain owning tree of [`MarkdownNode`]s: each node
//!     carries its kind, the scalar attributes that apply to that kind, and its
//!     children in document order. There is exactly one root, always of kind
//!     `document`, and no node is ever shared between parents, so no reference
//!     counting is needed anywhere.
//!
//!     The node is deliberately one uniform struct rather than a variant per
//!     kind: the output shape is uniform, and the `Serialize` derive on this
//!     struct *is* the output contract. Field declaration order is emission
//!     order, unset attributes are omitted, and an empty children list is
//!     omitted too (the empty-document fast path in the facade is the one
//!     documented exception, see [`crate::serializer`]).

use serde::Serialize;

/// Alignment of a table cell, taken from the column's delimiter row.
///
/// Serializes as `"default"`, `"left"`, `"center"` or `"right"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TableCellAlign {
    Default,
    Left,
    Center,
    Right,
}

/// Every node kind the tree can contain.
///
/// Serialized names are the snake_case strings the consuming application
/// matches on, e.g. `task_list_item`, `code_inline`, `wiki_link`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Document,
    Paragraph,
    Heading,
    Blockquote,
    List,
    ListItem,
    TaskListItem,
    ThematicBreak,
    CodeBlock,
    HtmlBlock,
    Table,
    TableHead,
    TableBody,
    TableRow,
    TableCell,
    Text,
    Emphasis,
    Strong,
    Link,
    Image,
    CodeInline,
    Strikethrough,
    Underline,
    MathInline,
    MathBlock,
    WikiLink,
    Softbreak,
    Hardbreak,
}

/// One node of the document tree.
///
/// Attribute fields are populated per kind:
/// - `content`: leaf text, or the captured raw body of a code/html block
/// - `level`: headings, 1..=6
/// - `href`, `title`: links and wiki links
/// - `src`, `alt`, `title`: images
/// - `language`: fenced code blocks with an info string
/// - `ordered`, `start`: list containers
/// - `checked`: task list items
/// - `align`, `is_header`: table cells
///
/// `content` and non-empty `children` are mutually exclusive for
/// `code_block`, `html_block`, `text` and `image`; those kinds are leaves.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkdownNode {
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ordered: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<TableCellAlign>,
    #[serde(rename = "isHeader", skip_serializing_if = "Option::is_none")]
    pub is_header: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MarkdownNode>,
}

impl MarkdownNode {
    /// A bare node of the given kind, no attributes, no children.
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            content: None,
            level: None,
            href: None,
            src: None,
            alt: None,
            title: None,
            language: None,
            ordered: None,
            start: None,
            checked: None,
            align: None,
            is_header: None,
            children: Vec::new(),
        }
    }

    /// A text leaf holding the given content.
    pub fn text(content: impl Into<String>) -> Self {
        let mut node = Self::new(NodeKind::Text);
        node.content = Some(content.into());
        node
    }
}
