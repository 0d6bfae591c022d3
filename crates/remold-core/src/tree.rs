use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::marker::Markers;

/// Identity of a tree node. Stable across `with_*` copies of the same node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TreeId(u64);

impl TreeId {
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        TreeId(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// A comment together with the whitespace that follows it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comment {
    /// Full comment text including its delimiters.
    pub text: String,
    pub suffix: String,
}

/// Formatting that precedes a node: leading whitespace then any number of
/// comments, each carrying its own trailing whitespace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Space {
    pub whitespace: String,
    pub comments: Vec<Comment>,
}

impl Space {
    pub const EMPTY: Space = Space {
        whitespace: String::new(),
        comments: Vec::new(),
    };

    pub fn whitespace(ws: impl Into<String>) -> Self {
        Space {
            whitespace: ws.into(),
            comments: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.whitespace.is_empty() && self.comments.is_empty()
    }

    /// Indentation of the last line of this prefix.
    pub fn indent(&self) -> &str {
        let last = self
            .comments
            .last()
            .map(|c| c.suffix.as_str())
            .unwrap_or(self.whitespace.as_str());
        match last.rfind('\n') {
            Some(idx) => &last[idx + 1..],
            None => last,
        }
    }

    pub fn print(&self, out: &mut PrintOutput) {
        out.append(&self.whitespace);
        for comment in &self.comments {
            out.append(&comment.text);
            out.append(&comment.suffix);
        }
    }
}

/// Sink that printing appends to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrintOutput {
    buf: String,
}

impl PrintOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, text: &str) -> &mut Self {
        self.buf.push_str(text);
        self
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn into_string(self) -> String {
        self.buf
    }
}

pub trait Tree {
    fn id(&self) -> TreeId;

    fn prefix(&self) -> &Space;

    fn with_prefix(self, prefix: Space) -> Self
    where
        Self: Sized;

    fn markers(&self) -> &Markers;

    /// Print the node prefix first, then its content.
    fn print(&self, out: &mut PrintOutput);

    fn print_to_string(&self) -> String {
        let mut out = PrintOutput::new();
        self.print(&mut out);
        out.into_string()
    }
}

/// Root of a parsed document.
pub trait SourceFile: Tree {
    fn source_path(&self) -> &Path;

    /// Whether the original bytes started with a UTF-8 byte order mark.
    fn charset_bom_marked(&self) -> bool;

    fn print_all(&self) -> String {
        let mut out = PrintOutput::new();
        if self.charset_bom_marked() {
            out.append("\u{feff}");
        }
        self.print(&mut out);
        out.into_string()
    }
}
