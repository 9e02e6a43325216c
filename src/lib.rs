//! # hypermark
//!
//! Markdown to document-tree parsing with compact JSON output.
//!
//! Architecture
//!
//!     The crate is a pipeline of small parts, leaves first:
//!
//!     - options: user-facing feature flags resolved into the tokenizer's
//!       effective flag set. Pure, no failure mode.
//!     - node: the uniform document-tree node (kind, optional scalar
//!       attributes, owned children). Its Serialize derive is the output
//!       contract.
//!     - event: the enter/leave/text contract between the tokenizer and any
//!       sink, with abort status.
//!     - builder: the stateful event consumer. A stack of open nodes plus a
//!       pending-text buffer turn the flat stream back into a tree. This is
//!       where the careful work lives.
//!     - tokenizer: comrak does the CommonMark/GFM parsing; the driver walks
//!       its AST and delivers the event stream in document order.
//!     - serializer: serde_json writing plus the canned empty-document form.
//!     - parser: the facade gluing the above together, with the two
//!       documented failure kinds and the embedder envelope.
//!
//!     This is a pure lib: no I/O, no printing, no environment access. The
//!     embedding application owns all of that.
//!
//! Usage
//!
//!     let root = hypermark::parse("# Hello", &ParserOptions::default())?;
//!     let json = hypermark::serializer::encode(&root);
//!
//!     or, for the envelope shape hosts ship over a bridge:
//!
//!     let outcome = hypermark::parse_to_json("# Hello", &ParserOptions::default());
//!
//! Concurrency
//!
//!     Everything is owned data; one parse uses one builder and one resolved
//!     option set. Parallel parses are fine as long as each call site keeps
//!     to its own arguments, which the API makes the only option anyway.

pub mod builder;
pub mod error;
pub mod event;
pub mod node;
pub mod options;
pub mod parser;
pub mod serializer;
pub mod tokenizer;

pub use error::{ParseError, ParseErrorKind};
pub use node::{MarkdownNode, NodeKind, TableCellAlign};
pub use options::{EffectiveOptions, ParserOptions};
pub use parser::{parse, parse_to_json, ParseOutcome};
