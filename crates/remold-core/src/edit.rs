//! Text edits applied to a source snapshot.

use text_size::{TextRange, TextSize};

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TextEdit {
    pub range: TextRange,
    pub replacement: String,
}

impl TextEdit {
    pub fn new(range: TextRange, replacement: impl Into<String>) -> Self {
        Self {
            range,
            replacement: replacement.into(),
        }
    }

    pub fn insert(offset: TextSize, text: impl Into<String>) -> Self {
        Self::new(TextRange::empty(offset), text)
    }

    pub fn delete(range: TextRange) -> Self {
        Self::new(range, String::new())
    }
}

#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum EditError {
    #[error("edit range {range:?} is out of bounds for text length {text_len:?}")]
    RangeOutOfBounds { range: TextRange, text_len: TextSize },
    #[error("offset {offset:?} is not a UTF-8 character boundary")]
    InvalidUtf8Boundary { offset: TextSize },
    #[error("overlapping edits: {first:?} overlaps {second:?}")]
    OverlappingEdits { first: TextRange, second: TextRange },
}

/// Apply `edits` to `text`. Edits are sorted by range and applied back to front.
pub fn apply_text_edits(text: &str, edits: &[TextEdit]) -> Result<String, EditError> {
    let mut edits = edits.to_vec();
    normalize_text_edits(text, &mut edits)?;

    let mut out = text.to_string();
    for edit in edits.into_iter().rev() {
        let start = usize::from(edit.range.start());
        let end = usize::from(edit.range.end());
        out.replace_range(start..end, &edit.replacement);
    }
    Ok(out)
}

/// Sort edits, reject out-of-bounds or overlapping ranges, and coalesce
/// adjacent ones.
pub fn normalize_text_edits(text: &str, edits: &mut Vec<TextEdit>) -> Result<(), EditError> {
    edits.sort_by_key(|e| (e.range.start(), e.range.end()));

    let text_len = TextSize::of(text);
    for edit in edits.iter() {
        if edit.range.end() > text_len {
            return Err(EditError::RangeOutOfBounds {
                range: edit.range,
                text_len,
            });
        }
        for offset in [edit.range.start(), edit.range.end()] {
            if !text.is_char_boundary(usize::from(offset)) {
                return Err(EditError::InvalidUtf8Boundary { offset });
            }
        }
    }

    for pair in edits.windows(2) {
        let (first, second) = (&pair[0], &pair[1]);
        // Two inserts at one offset have no defined order.
        let same_insert = first.range.is_empty()
            && second.range.is_empty()
            && first.range.start() == second.range.start();
        if first.range.end() > second.range.start() || same_insert {
            return Err(EditError::OverlappingEdits {
                first: first.range,
                second: second.range,
            });
        }
    }

    let mut merged: Vec<TextEdit> = Vec::with_capacity(edits.len());
    for edit in edits.drain(..) {
        if let Some(last) = merged.last_mut() {
            if last.range.end() == edit.range.start() {
                last.range = TextRange::new(last.range.start(), edit.range.end());
                last.replacement.push_str(&edit.replacement);
                continue;
            }
        }
        merged.push(edit);
    }
    *edits = merged;

    Ok(())
}
