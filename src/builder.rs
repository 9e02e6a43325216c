//! Event-to-tree building.
//!
//! # The High-Level Concept
//!
//! The builder reconstructs a document tree from the tokenizer's linear event
//! stream. A stack acts as the memory of open containers: entering a block or
//! span pushes a fresh node, leaving one pops it and attaches it to its
//! parent. The bottom of the stack is the document root, created up front and
//! never popped, so the stack depth is at least one at all times.
//!
//! # Text Buffering
//!
//! Consecutive literal text events coalesce into a single pending buffer
//! rather than one node per fragment. The buffer is flushed into a `text`
//! node before any structural event is processed, so text never straddles a
//! boundary. Soft and hard breaks flush too, then append their own leaf, so
//! a break always splits surrounding text into separate nodes.
//!
//! # Raw Capture
//!
//! Code and html blocks never expose structural children: when one is left,
//! the text gathered inside it is folded into the node's scalar `content`.
//! Images are similar: whatever was built inside the span is reduced to the
//! concatenated literal fragments, stored as `alt`, and the children are
//! discarded.

use crate::event::{BlockEvent, EventSink, SinkResult, SpanEvent, TextEvent};
use crate::node::{MarkdownNode, NodeKind};

/// Stateful consumer of one tokenizer event stream.
///
/// A builder serves exactly one parse: feed it events (usually via
/// [`crate::tokenizer::tokenize`]), then take the finished tree with
/// [`TreeBuilder::finish`].
#[derive(Debug)]
pub struct TreeBuilder {
    /// Open nodes, document root at the bottom.
    stack: Vec<MarkdownNode>,
    /// Coalesced literal text not yet attached to the tree.
    pending_text: String,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self {
            stack: vec![MarkdownNode::new(NodeKind::Document)],
            pending_text: String::new(),
        }
    }

    /// Flush trailing text, close anything still open, and hand back the
    /// document root.
    pub fn finish(mut self) -> MarkdownNode {
        self.flush_pending_text();
        while self.stack.len() > 1 {
            self.pop();
        }
        self.stack.pop().expect("stack always holds the document root")
    }

    fn top(&self) -> &MarkdownNode {
        self.stack.last().expect("stack always holds the document root")
    }

    fn top_mut(&mut self) -> &mut MarkdownNode {
        self.stack.last_mut().expect("stack always holds the document root")
    }

    /// Move the pending buffer into a `text` child of the current top.
    fn flush_pending_text(&mut self) {
        if self.pending_text.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.pending_text);
        self.top_mut().children.push(MarkdownNode::text(text));
    }

    fn push(&mut self, node: MarkdownNode) {
        self.stack.push(node);
    }

    /// Close the current top and attach it to its parent. The document root
    /// stays put: popping with only the root left is a no-op.
    fn pop(&mut self) {
        if self.stack.len() < 2 {
            return;
        }
        let node = self.stack.pop().expect("depth checked above");
        self.top_mut().children.push(node);
    }

    /// Fold the raw text gathered inside a code or html block into the
    /// node's scalar `content`. These kinds never expose children.
    fn capture_raw_content(&mut self) {
        let node = self.top_mut();
        let mut raw = String::new();
        for child in &node.children {
            if child.kind == NodeKind::Text {
                if let Some(text) = &child.content {
                    raw.push_str(text);
                }
            }
        }
        node.children.clear();
        if !raw.is_empty() {
            node.content = Some(raw);
        }
    }

    /// Concatenate every literal fragment under `node`, in document order,
    /// at any nesting depth.
    fn collect_text_fragments(node: &MarkdownNode, out: &mut String) {
        for child in &node.children {
            if child.kind == NodeKind::Text {
                if let Some(text) = &child.content {
                    out.push_str(text);
                }
            }
            Self::collect_text_fragments(child, out);
        }
    }

    /// Reduce the finished image span to a leaf: its collected literal text
    /// becomes `alt`, its children are discarded. The alt text is the same
    /// however deeply the image description nested emphasis or strong runs.
    fn fold_image_alt(&mut self) {
        let mut alt = String::new();
        Self::collect_text_fragments(self.top(), &mut alt);
        let node = self.top_mut();
        node.children.clear();
        if !alt.is_empty() {
            node.alt = Some(alt);
        }
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for TreeBuilder {
    fn enter_block(&mut self, event: &BlockEvent) -> SinkResult {
        self.flush_pending_text();

        let node = match event {
            // The root pre-exists and is never re-pushed.
            BlockEvent::Document => return Ok(()),
            BlockEvent::Paragraph => MarkdownNode::new(NodeKind::Paragraph),
            BlockEvent::Blockquote => MarkdownNode::new(NodeKind::Blockquote),
            BlockEvent::ThematicBreak => MarkdownNode::new(NodeKind::ThematicBreak),
            BlockEvent::Heading { level } => {
                let mut node = MarkdownNode::new(NodeKind::Heading);
                node.level = Some(*level);
                node
            }
            BlockEvent::CodeBlock { info } => {
                let mut node = MarkdownNode::new(NodeKind::CodeBlock);
                // The language is the first word of the info string, as in
                // ```rust or ```rust,ignore; the rest is tooling noise.
                if let Some(language) = info.split_whitespace().next() {
                    node.language = Some(language.to_string());
                }
                node
            }
            BlockEvent::HtmlBlock => MarkdownNode::new(NodeKind::HtmlBlock),
            BlockEvent::List { ordered, start } => {
                let mut node = MarkdownNode::new(NodeKind::List);
                node.ordered = Some(*ordered);
                if *ordered {
                    node.start = Some(*start);
                }
                node
            }
            BlockEvent::ListItem { task_marker } => match task_marker {
                Some(marker) => {
                    let mut node = MarkdownNode::new(NodeKind::TaskListItem);
                    node.checked = Some(matches!(marker, 'x' | 'X'));
                    node
                }
                None => MarkdownNode::new(NodeKind::ListItem),
            },
            BlockEvent::Table => MarkdownNode::new(NodeKind::Table),
            BlockEvent::TableHead => MarkdownNode::new(NodeKind::TableHead),
            BlockEvent::TableBody => MarkdownNode::new(NodeKind::TableBody),
            BlockEvent::TableRow => MarkdownNode::new(NodeKind::TableRow),
            BlockEvent::TableCell { align, header } => {
                let mut node = MarkdownNode::new(NodeKind::TableCell);
                node.align = Some(*align);
                node.is_header = Some(*header);
                node
            }
        };

        self.push(node);
        Ok(())
    }

    fn leave_block(&mut self, event: &BlockEvent) -> SinkResult {
        self.flush_pending_text();

        match event {
            BlockEvent::Document => return Ok(()),
            BlockEvent::CodeBlock { .. } | BlockEvent::HtmlBlock => {
                // Guard against unbalanced streams: only capture when the
                // top really is the raw block being left, never the root.
                if matches!(self.top().kind, NodeKind::CodeBlock | NodeKind::HtmlBlock) {
                    self.capture_raw_content();
                }
            }
            _ => {}
        }

        self.pop();
        Ok(())
    }

    fn enter_span(&mut self, event: &SpanEvent) -> SinkResult {
        self.flush_pending_text();

        let node = match event {
            SpanEvent::Emphasis => MarkdownNode::new(NodeKind::Emphasis),
            SpanEvent::Strong => MarkdownNode::new(NodeKind::Strong),
            SpanEvent::Strikethrough => MarkdownNode::new(NodeKind::Strikethrough),
            SpanEvent::Underline => MarkdownNode::new(NodeKind::Underline),
            SpanEvent::CodeInline => MarkdownNode::new(NodeKind::CodeInline),
            SpanEvent::MathInline => MarkdownNode::new(NodeKind::MathInline),
            SpanEvent::MathBlock => MarkdownNode::new(NodeKind::MathBlock),
            SpanEvent::Link { href, title } => {
                let mut node = MarkdownNode::new(NodeKind::Link);
                if !href.is_empty() {
                    node.href = Some(href.clone());
                }
                if !title.is_empty() {
                    node.title = Some(title.clone());
                }
                node
            }
            SpanEvent::Image { src, title } => {
                let mut node = MarkdownNode::new(NodeKind::Image);
                if !src.is_empty() {
                    node.src = Some(src.clone());
                }
                if !title.is_empty() {
                    node.title = Some(title.clone());
                }
                node
            }
            SpanEvent::WikiLink { target } => {
                let mut node = MarkdownNode::new(NodeKind::WikiLink);
                if !target.is_empty() {
                    node.href = Some(target.clone());
                }
                node
            }
        };

        self.push(node);
        Ok(())
    }

    fn leave_span(&mut self, event: &SpanEvent) -> SinkResult {
        self.flush_pending_text();

        if matches!(event, SpanEvent::Image { .. }) && self.top().kind == NodeKind::Image {
            self.fold_image_alt();
        }

        self.pop();
        Ok(())
    }

    fn text(&mut self, event: &TextEvent<'_>) -> SinkResult {
        match event {
            TextEvent::Normal(text)
            | TextEvent::Code(text)
            | TextEvent::Math(text)
            | TextEvent::Html(text) => {
                self.pending_text.push_str(text);
            }
            TextEvent::SoftBreak => {
                self.flush_pending_text();
                self.top_mut()
                    .children
                    .push(MarkdownNode::new(NodeKind::Softbreak));
            }
            TextEvent::HardBreak => {
                self.flush_pending_text();
                self.top_mut()
                    .children
                    .push(MarkdownNode::new(NodeKind::Hardbreak));
            }
            TextEvent::NullChar => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::TableCellAlign;

    fn feed(builder: &mut TreeBuilder, events: &[TestEvent]) {
        for event in events {
            match event {
                TestEvent::EnterBlock(e) => builder.enter_block(e).unwrap(),
                TestEvent::LeaveBlock(e) => builder.leave_block(e).unwrap(),
                TestEvent::EnterSpan(e) => builder.enter_span(e).unwrap(),
                TestEvent::LeaveSpan(e) => builder.leave_span(e).unwrap(),
                TestEvent::Text(e) => builder.text(e).unwrap(),
            }
        }
    }

    enum TestEvent<'a> {
        EnterBlock(BlockEvent),
        LeaveBlock(BlockEvent),
        EnterSpan(SpanEvent),
        LeaveSpan(SpanEvent),
        Text(TextEvent<'a>),
    }
    use TestEvent::*;

    #[test]
    fn empty_stream_yields_bare_document() {
        let builder = TreeBuilder::new();
        let root = builder.finish();
        assert_eq!(root.kind, NodeKind::Document);
        assert!(root.children.is_empty());
    }

    #[test]
    fn consecutive_text_events_coalesce() {
        let mut builder = TreeBuilder::new();
        feed(
            &mut builder,
            &[
                EnterBlock(BlockEvent::Paragraph),
                Text(TextEvent::Normal("Hello ")),
                Text(TextEvent::Normal("beautiful ")),
                Text(TextEvent::Normal("world")),
                LeaveBlock(BlockEvent::Paragraph),
            ],
        );
        let root = builder.finish();
        let paragraph = &root.children[0];
        assert_eq!(paragraph.children.len(), 1);
        assert_eq!(
            paragraph.children[0].content.as_deref(),
            Some("Hello beautiful world")
        );
    }

    #[test]
    fn breaks_split_text_into_separate_nodes() {
        let mut builder = TreeBuilder::new();
        feed(
            &mut builder,
            &[
                EnterBlock(BlockEvent::Paragraph),
                Text(TextEvent::Normal("one")),
                Text(TextEvent::SoftBreak),
                Text(TextEvent::Normal("two")),
                Text(TextEvent::HardBreak),
                Text(TextEvent::Normal("three")),
                LeaveBlock(BlockEvent::Paragraph),
            ],
        );
        let root = builder.finish();
        let kinds: Vec<NodeKind> = root.children[0]
            .children
            .iter()
            .map(|child| child.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                NodeKind::Text,
                NodeKind::Softbreak,
                NodeKind::Text,
                NodeKind::Hardbreak,
                NodeKind::Text,
            ]
        );
    }

    #[test]
    fn null_chars_are_dropped() {
        let mut builder = TreeBuilder::new();
        feed(
            &mut builder,
            &[
                EnterBlock(BlockEvent::Paragraph),
                Text(TextEvent::Normal("a")),
                Text(TextEvent::NullChar),
                Text(TextEvent::Normal("b")),
                LeaveBlock(BlockEvent::Paragraph),
            ],
        );
        let root = builder.finish();
        assert_eq!(root.children[0].children.len(), 1);
        assert_eq!(root.children[0].children[0].content.as_deref(), Some("ab"));
    }

    #[test]
    fn excess_leave_events_never_pop_the_root() {
        let mut builder = TreeBuilder::new();
        feed(
            &mut builder,
            &[
                LeaveBlock(BlockEvent::Paragraph),
                LeaveBlock(BlockEvent::Blockquote),
                LeaveSpan(SpanEvent::Emphasis),
                EnterBlock(BlockEvent::Paragraph),
                Text(TextEvent::Normal("still alive")),
                LeaveBlock(BlockEvent::Paragraph),
                LeaveBlock(BlockEvent::Paragraph),
            ],
        );
        let root = builder.finish();
        assert_eq!(root.kind, NodeKind::Document);
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].kind, NodeKind::Paragraph);
    }

    #[test]
    fn excess_code_block_leave_does_not_corrupt_the_root() {
        let mut builder = TreeBuilder::new();
        feed(
            &mut builder,
            &[
                EnterBlock(BlockEvent::Paragraph),
                Text(TextEvent::Normal("kept")),
                LeaveBlock(BlockEvent::Paragraph),
                LeaveBlock(BlockEvent::CodeBlock {
                    info: String::new(),
                }),
            ],
        );
        let root = builder.finish();
        assert_eq!(root.kind, NodeKind::Document);
        assert!(root.content.is_none());
        assert_eq!(root.children.len(), 1);
    }

    #[test]
    fn code_block_text_becomes_scalar_content() {
        let mut builder = TreeBuilder::new();
        feed(
            &mut builder,
            &[
                EnterBlock(BlockEvent::CodeBlock {
                    info: "rust".to_string(),
                }),
                Text(TextEvent::Code("fn main() {}\n")),
                LeaveBlock(BlockEvent::CodeBlock {
                    info: "rust".to_string(),
                }),
            ],
        );
        let root = builder.finish();
        let code = &root.children[0];
        assert_eq!(code.kind, NodeKind::CodeBlock);
        assert_eq!(code.language.as_deref(), Some("rust"));
        assert_eq!(code.content.as_deref(), Some("fn main() {}\n"));
        assert!(code.children.is_empty());
    }

    #[test]
    fn code_language_is_first_word_of_info() {
        let mut builder = TreeBuilder::new();
        feed(
            &mut builder,
            &[
                EnterBlock(BlockEvent::CodeBlock {
                    info: "rust,ignore extra".to_string(),
                }),
                LeaveBlock(BlockEvent::CodeBlock {
                    info: "rust,ignore extra".to_string(),
                }),
            ],
        );
        let root = builder.finish();
        assert_eq!(root.children[0].language.as_deref(), Some("rust,ignore"));
    }

    #[test]
    fn html_block_text_becomes_scalar_content() {
        let mut builder = TreeBuilder::new();
        feed(
            &mut builder,
            &[
                EnterBlock(BlockEvent::HtmlBlock),
                Text(TextEvent::Html("<div>\n")),
                Text(TextEvent::Html("</div>\n")),
                LeaveBlock(BlockEvent::HtmlBlock),
            ],
        );
        let root = builder.finish();
        let html = &root.children[0];
        assert_eq!(html.kind, NodeKind::HtmlBlock);
        assert_eq!(html.content.as_deref(), Some("<div>\n</div>\n"));
        assert!(html.children.is_empty());
    }

    #[test]
    fn task_item_reclassifies_and_derives_checked() {
        for (marker, checked) in [('x', true), ('X', true), (' ', false)] {
            let mut builder = TreeBuilder::new();
            feed(
                &mut builder,
                &[
                    EnterBlock(BlockEvent::List {
                        ordered: false,
                        start: 1,
                    }),
                    EnterBlock(BlockEvent::ListItem {
                        task_marker: Some(marker),
                    }),
                    Text(TextEvent::Normal("todo")),
                    LeaveBlock(BlockEvent::ListItem {
                        task_marker: Some(marker),
                    }),
                    LeaveBlock(BlockEvent::List {
                        ordered: false,
                        start: 1,
                    }),
                ],
            );
            let root = builder.finish();
            let item = &root.children[0].children[0];
            assert_eq!(item.kind, NodeKind::TaskListItem);
            assert_eq!(item.checked, Some(checked));
        }
    }

    #[test]
    fn unordered_list_has_no_start() {
        let mut builder = TreeBuilder::new();
        feed(
            &mut builder,
            &[
                EnterBlock(BlockEvent::List {
                    ordered: false,
                    start: 1,
                }),
                LeaveBlock(BlockEvent::List {
                    ordered: false,
                    start: 1,
                }),
            ],
        );
        let root = builder.finish();
        assert_eq!(root.children[0].ordered, Some(false));
        assert_eq!(root.children[0].start, None);
    }

    #[test]
    fn ordered_list_keeps_start() {
        let mut builder = TreeBuilder::new();
        feed(
            &mut builder,
            &[
                EnterBlock(BlockEvent::List {
                    ordered: true,
                    start: 7,
                }),
                LeaveBlock(BlockEvent::List {
                    ordered: true,
                    start: 7,
                }),
            ],
        );
        let root = builder.finish();
        assert_eq!(root.children[0].ordered, Some(true));
        assert_eq!(root.children[0].start, Some(7));
    }

    #[test]
    fn image_alt_is_collected_across_nested_spans() {
        let mut builder = TreeBuilder::new();
        feed(
            &mut builder,
            &[
                EnterBlock(BlockEvent::Paragraph),
                EnterSpan(SpanEvent::Image {
                    src: "cat.png".to_string(),
                    title: String::new(),
                }),
                Text(TextEvent::Normal("a ")),
                EnterSpan(SpanEvent::Emphasis),
                Text(TextEvent::Normal("very ")),
                EnterSpan(SpanEvent::Strong),
                Text(TextEvent::Normal("fluffy")),
                LeaveSpan(SpanEvent::Strong),
                LeaveSpan(SpanEvent::Emphasis),
                Text(TextEvent::Normal(" cat")),
                LeaveSpan(SpanEvent::Image {
                    src: "cat.png".to_string(),
                    title: String::new(),
                }),
                LeaveBlock(BlockEvent::Paragraph),
            ],
        );
        let root = builder.finish();
        let image = &root.children[0].children[0];
        assert_eq!(image.kind, NodeKind::Image);
        assert_eq!(image.src.as_deref(), Some("cat.png"));
        assert_eq!(image.alt.as_deref(), Some("a very fluffy cat"));
        assert!(image.children.is_empty());
    }

    #[test]
    fn image_with_empty_description_is_still_a_leaf() {
        let mut builder = TreeBuilder::new();
        feed(
            &mut builder,
            &[
                EnterBlock(BlockEvent::Paragraph),
                EnterSpan(SpanEvent::Image {
                    src: "bare.png".to_string(),
                    title: String::new(),
                }),
                LeaveSpan(SpanEvent::Image {
                    src: "bare.png".to_string(),
                    title: String::new(),
                }),
                LeaveBlock(BlockEvent::Paragraph),
            ],
        );
        let root = builder.finish();
        let image = &root.children[0].children[0];
        assert_eq!(image.alt, None);
        assert!(image.children.is_empty());
    }

    #[test]
    fn link_drops_empty_href_and_title() {
        let mut builder = TreeBuilder::new();
        feed(
            &mut builder,
            &[
                EnterBlock(BlockEvent::Paragraph),
                EnterSpan(SpanEvent::Link {
                    href: "https://example.com".to_string(),
                    title: String::new(),
                }),
                Text(TextEvent::Normal("here")),
                LeaveSpan(SpanEvent::Link {
                    href: "https://example.com".to_string(),
                    title: String::new(),
                }),
                LeaveBlock(BlockEvent::Paragraph),
            ],
        );
        let root = builder.finish();
        let link = &root.children[0].children[0];
        assert_eq!(link.href.as_deref(), Some("https://example.com"));
        assert_eq!(link.title, None);
        assert_eq!(link.children[0].content.as_deref(), Some("here"));
    }

    #[test]
    fn wiki_link_target_lands_in_href() {
        let mut builder = TreeBuilder::new();
        feed(
            &mut builder,
            &[
                EnterBlock(BlockEvent::Paragraph),
                EnterSpan(SpanEvent::WikiLink {
                    target: "Home Page".to_string(),
                }),
                Text(TextEvent::Normal("Home Page")),
                LeaveSpan(SpanEvent::WikiLink {
                    target: "Home Page".to_string(),
                }),
                LeaveBlock(BlockEvent::Paragraph),
            ],
        );
        let root = builder.finish();
        let wiki = &root.children[0].children[0];
        assert_eq!(wiki.kind, NodeKind::WikiLink);
        assert_eq!(wiki.href.as_deref(), Some("Home Page"));
    }

    #[test]
    fn table_cell_derives_alignment_and_header_flag() {
        let mut builder = TreeBuilder::new();
        feed(
            &mut builder,
            &[
                EnterBlock(BlockEvent::Table),
                EnterBlock(BlockEvent::TableHead),
                EnterBlock(BlockEvent::TableRow),
                EnterBlock(BlockEvent::TableCell {
                    align: TableCellAlign::Center,
                    header: true,
                }),
                Text(TextEvent::Normal("Name")),
                LeaveBlock(BlockEvent::TableCell {
                    align: TableCellAlign::Center,
                    header: true,
                }),
                LeaveBlock(BlockEvent::TableRow),
                LeaveBlock(BlockEvent::TableHead),
                LeaveBlock(BlockEvent::Table),
            ],
        );
        let root = builder.finish();
        let cell = &root.children[0].children[0].children[0].children[0];
        assert_eq!(cell.kind, NodeKind::TableCell);
        assert_eq!(cell.align, Some(TableCellAlign::Center));
        assert_eq!(cell.is_header, Some(true));
    }

    #[test]
    fn finish_drains_unclosed_containers() {
        let mut builder = TreeBuilder::new();
        feed(
            &mut builder,
            &[
                EnterBlock(BlockEvent::Blockquote),
                EnterBlock(BlockEvent::Paragraph),
                Text(TextEvent::Normal("dangling")),
            ],
        );
        let root = builder.finish();
        assert_eq!(root.children.len(), 1);
        let quote = &root.children[0];
        assert_eq!(quote.kind, NodeKind::Blockquote);
        assert_eq!(quote.children[0].kind, NodeKind::Paragraph);
        assert_eq!(
            quote.children[0].children[0].content.as_deref(),
            Some("dangling")
        );
    }
}
