//! Comrak integration: the event source.
//!
//!     comrak does the actual CommonMark/GFM tokenization. This module maps
//!     the resolved [`EffectiveOptions`] onto comrak's extension flags, parses
//!     the source, and walks the resulting AST in document order, driving an
//!     [`EventSink`] with the same enter/leave/text stream a push-style
//!     tokenizer would deliver.
//!
//!     Two structural gaps between comrak's AST and the event contract are
//!     bridged here rather than in the builder:
//!
//!     - comrak has no thead/tbody nodes; rows carry a header flag instead.
//!       The walker wraps header rows in a `table_head` grouping and the
//!       remaining rows in a `table_body` one (omitted when there are none).
//!     - comrak keeps paragraph nodes inside tight list items. The walker
//!       unwraps those so tight items hold their inline content directly.
//!
//!     Whitespace collapsing in flow text is always on and applied here;
//!     code, math and raw HTML fragments pass through verbatim.

use comrak::nodes::{AstNode, ListType, NodeValue, TableAlignment};
use comrak::{parse_document, Arena, ComrakOptions};

use crate::event::{BlockEvent, EventSink, SinkResult, SpanEvent, TextEvent};
use crate::node::TableCellAlign;
use crate::options::EffectiveOptions;

/// Map the resolved flag set onto comrak's options.
pub fn comrak_options(options: &EffectiveOptions) -> ComrakOptions<'static> {
    let mut comrak = ComrakOptions::default();
    comrak.extension.table = options.tables;
    comrak.extension.tasklist = options.task_lists;
    comrak.extension.strikethrough = options.strikethrough;
    comrak.extension.autolink = options.autolink;
    comrak.extension.math_dollars = options.math;
    comrak.extension.wikilinks_title_after_pipe = options.wiki;
    // No underline extension: underscores stay emphasis. The underline node
    // kind exists for sinks fed by other event sources.
    comrak
}

/// Tokenize `source` and deliver the event stream to `sink`.
///
/// Returns `Err(SinkAbort)` as soon as any handler aborts; the remaining
/// events are not delivered.
pub fn tokenize<S: EventSink>(
    source: &str,
    options: &EffectiveOptions,
    sink: &mut S,
) -> SinkResult {
    let arena = Arena::new();
    let root = parse_document(&arena, source, &comrak_options(options));
    walk_node(root, sink)
}

fn align_from_comrak(align: TableAlignment) -> TableCellAlign {
    match align {
        TableAlignment::Left => TableCellAlign::Left,
        TableAlignment::Center => TableCellAlign::Center,
        TableAlignment::Right => TableCellAlign::Right,
        TableAlignment::None => TableCellAlign::Default,
    }
}

/// Collapse runs of spaces and tabs to a single space.
fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;
    for ch in text.chars() {
        if ch == ' ' || ch == '\t' {
            if !in_run {
                out.push(' ');
            }
            in_run = true;
        } else {
            in_run = false;
            out.push(ch);
        }
    }
    out
}

fn walk_node<'a, S: EventSink>(node: &'a AstNode<'a>, sink: &mut S) -> SinkResult {
    let data = node.data.borrow();
    match &data.value {
        NodeValue::Document => {
            sink.enter_block(&BlockEvent::Document)?;
            for child in node.children() {
                walk_node(child, sink)?;
            }
            sink.leave_block(&BlockEvent::Document)
        }

        NodeValue::Paragraph => {
            sink.enter_block(&BlockEvent::Paragraph)?;
            for child in node.children() {
                walk_node(child, sink)?;
            }
            sink.leave_block(&BlockEvent::Paragraph)
        }

        NodeValue::Heading(heading) => {
            let event = BlockEvent::Heading {
                level: heading.level,
            };
            sink.enter_block(&event)?;
            for child in node.children() {
                walk_node(child, sink)?;
            }
            sink.leave_block(&event)
        }

        NodeValue::BlockQuote => {
            sink.enter_block(&BlockEvent::Blockquote)?;
            for child in node.children() {
                walk_node(child, sink)?;
            }
            sink.leave_block(&BlockEvent::Blockquote)
        }

        NodeValue::ThematicBreak => {
            sink.enter_block(&BlockEvent::ThematicBreak)?;
            sink.leave_block(&BlockEvent::ThematicBreak)
        }

        NodeValue::List(list) => {
            let event = BlockEvent::List {
                ordered: list.list_type == ListType::Ordered,
                start: list.start as u32,
            };
            sink.enter_block(&event)?;
            for item in node.children() {
                walk_list_item(item, list.tight, sink)?;
            }
            sink.leave_block(&event)
        }

        // Items reached outside a list context (never produced by comrak);
        // handled for completeness.
        NodeValue::Item(_) | NodeValue::TaskItem(_) => walk_list_item(node, false, sink),

        NodeValue::CodeBlock(code_block) => {
            let event = BlockEvent::CodeBlock {
                info: code_block.info.clone(),
            };
            sink.enter_block(&event)?;
            sink.text(&TextEvent::Code(&code_block.literal))?;
            sink.leave_block(&event)
        }

        NodeValue::HtmlBlock(html) => {
            sink.enter_block(&BlockEvent::HtmlBlock)?;
            sink.text(&TextEvent::Html(&html.literal))?;
            sink.leave_block(&BlockEvent::HtmlBlock)
        }

        NodeValue::Table(table) => walk_table(node, &table.alignments, sink),

        // Rows and cells are walked by walk_table, which owes them their
        // alignment context; nothing to do standalone.
        NodeValue::TableRow(_) | NodeValue::TableCell => Ok(()),

        NodeValue::Text(text) => {
            let collapsed = collapse_whitespace(text);
            sink.text(&TextEvent::Normal(&collapsed))
        }

        NodeValue::SoftBreak => sink.text(&TextEvent::SoftBreak),
        NodeValue::LineBreak => sink.text(&TextEvent::HardBreak),

        NodeValue::Code(code) => {
            sink.enter_span(&SpanEvent::CodeInline)?;
            sink.text(&TextEvent::Code(&code.literal))?;
            sink.leave_span(&SpanEvent::CodeInline)
        }

        NodeValue::HtmlInline(html) => sink.text(&TextEvent::Html(html)),

        NodeValue::Emph => walk_span(node, SpanEvent::Emphasis, sink),
        NodeValue::Strong => walk_span(node, SpanEvent::Strong, sink),
        NodeValue::Strikethrough => walk_span(node, SpanEvent::Strikethrough, sink),
        NodeValue::Underline => walk_span(node, SpanEvent::Underline, sink),

        NodeValue::Link(link) => walk_span(
            node,
            SpanEvent::Link {
                href: link.url.clone(),
                title: link.title.clone(),
            },
            sink,
        ),

        NodeValue::Image(image) => walk_span(
            node,
            SpanEvent::Image {
                src: image.url.clone(),
                title: image.title.clone(),
            },
            sink,
        ),

        NodeValue::WikiLink(wiki) => walk_span(
            node,
            SpanEvent::WikiLink {
                target: wiki.url.clone(),
            },
            sink,
        ),

        NodeValue::Math(math) => {
            let event = if math.display_math {
                SpanEvent::MathBlock
            } else {
                SpanEvent::MathInline
            };
            sink.enter_span(&event)?;
            sink.text(&TextEvent::Math(&math.literal))?;
            sink.leave_span(&event)
        }

        // Extension nodes we never enable, skipped if they ever appear.
        _ => Ok(()),
    }
}

fn walk_span<'a, S: EventSink>(
    node: &'a AstNode<'a>,
    event: SpanEvent,
    sink: &mut S,
) -> SinkResult {
    sink.enter_span(&event)?;
    for child in node.children() {
        walk_node(child, sink)?;
    }
    sink.leave_span(&event)
}

fn walk_list_item<'a, S: EventSink>(
    node: &'a AstNode<'a>,
    tight: bool,
    sink: &mut S,
) -> SinkResult {
    let task_marker = match &node.data.borrow().value {
        NodeValue::TaskItem(symbol) => Some(symbol.unwrap_or(' ')),
        _ => None,
    };
    let event = BlockEvent::ListItem { task_marker };
    sink.enter_block(&event)?;
    for child in node.children() {
        // Tight lists carry their text without an intervening paragraph
        // block.
        if tight && matches!(child.data.borrow().value, NodeValue::Paragraph) {
            for inline in child.children() {
                walk_node(inline, sink)?;
            }
        } else {
            walk_node(child, sink)?;
        }
    }
    sink.leave_block(&event)
}

fn walk_table<'a, S: EventSink>(
    node: &'a AstNode<'a>,
    alignments: &[TableAlignment],
    sink: &mut S,
) -> SinkResult {
    sink.enter_block(&BlockEvent::Table)?;

    let is_header_row = |row: &&'a AstNode<'a>| -> bool {
        matches!(row.data.borrow().value, NodeValue::TableRow(true))
    };

    let header_rows: Vec<_> = node.children().filter(is_header_row).collect();
    let body_rows: Vec<_> = node.children().filter(|row| !is_header_row(row)).collect();

    sink.enter_block(&BlockEvent::TableHead)?;
    for row in header_rows {
        walk_table_row(row, true, alignments, sink)?;
    }
    sink.leave_block(&BlockEvent::TableHead)?;

    if !body_rows.is_empty() {
        sink.enter_block(&BlockEvent::TableBody)?;
        for row in body_rows {
            walk_table_row(row, false, alignments, sink)?;
        }
        sink.leave_block(&BlockEvent::TableBody)?;
    }

    sink.leave_block(&BlockEvent::Table)
}

fn walk_table_row<'a, S: EventSink>(
    row: &'a AstNode<'a>,
    header: bool,
    alignments: &[TableAlignment],
    sink: &mut S,
) -> SinkResult {
    sink.enter_block(&BlockEvent::TableRow)?;
    for (column, cell) in row.children().enumerate() {
        let align = alignments
            .get(column)
            .cloned()
            .map(align_from_comrak)
            .unwrap_or(TableCellAlign::Default);
        let event = BlockEvent::TableCell { align, header };
        sink.enter_block(&event)?;
        for child in cell.children() {
            walk_node(child, sink)?;
        }
        sink.leave_block(&event)?;
    }
    sink.leave_block(&BlockEvent::TableRow)
}
