//! Core contracts shared by every remold tree.
//!
//! A tree is lossless: every node owns the whitespace and comments that
//! precede it (its [`Space`] prefix), so printing an unmodified tree yields
//! the original bytes.

#![forbid(unsafe_code)]

mod batch;
mod edit;
mod marker;
mod text;
mod tree;

pub use batch::{BatchFailure, BatchReport};
pub use edit::{apply_text_edits, normalize_text_edits, EditError, TextEdit};
pub use marker::{Marker, MarkerId, Markers};
pub use text::PlainText;
pub use text_size::{TextRange, TextSize};
pub use tree::{Comment, PrintOutput, SourceFile, Space, Tree, TreeId};
