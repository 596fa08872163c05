//! Deterministic sliding-window splitter for the map phase.
//!
//! The windower is pure: the same document and sizes always yield the same
//! chunk sequence. Consecutive chunks overlap by `overlap_size` characters so
//! that context spanning a boundary remains visible to both neighboring
//! summaries; the final chunk may be shorter than the nominal window.

use super::types::{Chunk, PipelineError};

/// Split `document` into overlapping, ordered chunks.
///
/// `window_size` and `overlap_size` are measured in characters. The stride
/// between chunk starts is `window_size - overlap_size`, which must be
/// positive. The produced ranges cover `[0, len)` exactly; an empty document
/// yields an empty sequence, and a document no longer than `window_size`
/// yields a single chunk covering the whole document.
pub fn window(
    document: &str,
    window_size: usize,
    overlap_size: usize,
) -> Result<Vec<Chunk>, PipelineError> {
    if window_size == 0 || overlap_size >= window_size {
        return Err(PipelineError::InvalidWindow {
            window_size,
            overlap_size,
        });
    }
    let stride = window_size - overlap_size;

    // Byte offset of every character boundary, plus the end of the string,
    // so character ranges can be sliced without re-walking the document.
    let boundaries: Vec<usize> = document
        .char_indices()
        .map(|(offset, _)| offset)
        .chain(std::iter::once(document.len()))
        .collect();
    let char_count = boundaries.len() - 1;

    if char_count == 0 {
        return Ok(Vec::new());
    }
    // A document that fits in one window is a single chunk even when the
    // stride is smaller than the document.
    if char_count <= window_size {
        return Ok(vec![Chunk {
            index: 0,
            start: 0,
            end: char_count,
            text: document.to_string(),
        }]);
    }

    let mut chunks = Vec::new();
    let mut start = 0usize;
    let mut index = 0usize;
    while start < char_count {
        let end = (start + window_size).min(char_count);
        chunks.push(Chunk {
            index,
            start,
            end,
            text: document[boundaries[start]..boundaries[end]].to_string(),
        });
        index += 1;
        start += stride;
    }

    tracing::debug!(
        chunks = chunks.len(),
        window_size,
        overlap_size,
        stride,
        document_chars = char_count,
        "Windowed document"
    );

    Ok(chunks)
}
