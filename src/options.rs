//! Parser options and their resolution.
//!
//!     Embedders hand us the user-facing [`ParserOptions`] record; everything the
//!     rest of the crate consumes is the resolved [`EffectiveOptions`]. Resolution
//!     is pure and total, there is no failure mode here.
//!
//!     `gfm` is an umbrella switch: when on (the default) it implies tables, task
//!     lists, strikethrough and autolinks, whatever the individual enable flags
//!     say. `math` and `wiki` are deliberately outside the umbrella and activate
//!     only when asked for explicitly.
//!
//!     Whitespace collapsing is not on this surface at all: it is always forced
//!     on by the tokenizer driver and is not user-configurable.

use serde::Deserialize;

/// Default cap on input length, in bytes.
pub const DEFAULT_MAX_INPUT_SIZE: usize = 10 * 1024 * 1024;

/// Default timeout in milliseconds. Advisory only, see [`ParserOptions::timeout`].
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// User-facing feature flags and limits, all optional.
///
/// The field names deserialize from the camelCase keys embedder configuration
/// already uses, so a partial JSON record like `{"gfm": false, "math": true}`
/// is enough; everything absent takes its default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParserOptions {
    pub gfm: bool,
    pub enable_tables: bool,
    pub enable_task_lists: bool,
    pub enable_strikethrough: bool,
    pub enable_autolink: bool,
    pub math: bool,
    pub wiki: bool,
    /// Inputs longer than this many bytes are rejected before tokenization.
    pub max_input_size: usize,
    /// Accepted and resolved, but advisory: no deadline is enforced during a
    /// parse.
    pub timeout: u64,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            gfm: true,
            enable_tables: true,
            enable_task_lists: true,
            enable_strikethrough: true,
            enable_autolink: true,
            math: false,
            wiki: false,
            max_input_size: DEFAULT_MAX_INPUT_SIZE,
            timeout: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl ParserOptions {
    /// Resolve the user-facing record into the tokenizer-facing flag set.
    pub fn resolve(&self) -> EffectiveOptions {
        EffectiveOptions {
            tables: self.gfm || self.enable_tables,
            task_lists: self.gfm || self.enable_task_lists,
            strikethrough: self.gfm || self.enable_strikethrough,
            autolink: self.gfm || self.enable_autolink,
            math: self.math,
            wiki: self.wiki,
            max_input_size: self.max_input_size,
            timeout_ms: self.timeout,
        }
    }
}

/// The resolved flag set consumed by the tokenizer driver and the parse
/// facade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveOptions {
    pub tables: bool,
    pub task_lists: bool,
    pub strikethrough: bool,
    pub autolink: bool,
    pub math: bool,
    pub wiki: bool,
    pub max_input_size: usize,
    pub timeout_ms: u64,
}
