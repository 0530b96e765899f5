use crate::prelude::{ConvertError, ConvertResult};
use std::ops::Range;

/// Cursor over the document-ordered flat per-feature lists.
///
/// The training tool exports one flat list per field across the whole
/// cascade, so slicing the first `n` stages means walking a prefix sum
/// of per-stage feature counts. All of that arithmetic lives here; the
/// loader only asks for the next stage's range.
#[derive(Debug, Default)]
pub struct FeatureCursor {
    next: usize,
}

impl FeatureCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hands out the flat-list range for the next stage's `count`
    /// features, bounded by the total entries present in the document.
    pub fn advance(&mut self, count: usize, total: usize) -> ConvertResult<Range<usize>> {
        let start = self.next;
        let end = start.checked_add(count).ok_or_else(|| {
            ConvertError::Parse("stage feature counts overflow the feature index".to_string())
        })?;
        if end > total {
            return Err(ConvertError::Parse(format!(
                "stage feature counts require {} entries but the document holds {}",
                end, total
            )));
        }
        self.next = end;
        Ok(start..end)
    }

    /// Number of feature entries consumed so far.
    pub fn consumed(&self) -> usize {
        self.next
    }
}
