use std::path::{Path, PathBuf};

use crate::marker::Markers;
use crate::tree::{PrintOutput, SourceFile, Space, Tree, TreeId};

/// A document kept verbatim as a single text node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlainText {
    id: TreeId,
    source_path: PathBuf,
    charset_bom_marked: bool,
    prefix: Space,
    markers: Markers,
    text: String,
}

impl PlainText {
    /// Parse `source` into a plain text document. A leading UTF-8 BOM is
    /// remembered and stripped from the text.
    pub fn parse(path: impl Into<PathBuf>, source: &str) -> Self {
        let (bom, text) = match source.strip_prefix('\u{feff}') {
            Some(rest) => (true, rest),
            None => (false, source),
        };
        PlainText {
            id: TreeId::next(),
            source_path: path.into(),
            charset_bom_marked: bom,
            prefix: Space::EMPTY,
            markers: Markers::new(),
            text: text.to_string(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the document text; identity is preserved.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_markers(mut self, markers: Markers) -> Self {
        self.markers = markers;
        self
    }
}

impl Tree for PlainText {
    fn id(&self) -> TreeId {
        self.id
    }

    fn prefix(&self) -> &Space {
        &self.prefix
    }

    fn with_prefix(mut self, prefix: Space) -> Self {
        self.prefix = prefix;
        self
    }

    fn markers(&self) -> &Markers {
        &self.markers
    }

    fn print(&self, out: &mut PrintOutput) {
        self.prefix.print(out);
        out.append(&self.text);
    }
}

impl SourceFile for PlainText {
    fn source_path(&self) -> &Path {
        &self.source_path
    }

    fn charset_bom_marked(&self) -> bool {
        self.charset_bom_marked
    }
}
