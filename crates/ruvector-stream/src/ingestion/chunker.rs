//! Sentence-aware text chunking

use unicode_segmentation::UnicodeSegmentation;

/// Text chunker with configurable size and overlap
///
/// Sizes are counted in characters. Chunks never exceed `chunk_size`;
/// sentences longer than that are split on character boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextChunker {
    /// Maximum chunk size in characters
    chunk_size: usize,
    /// Characters carried over from the previous chunk
    overlap: usize,
}

impl TextChunker {
    /// Create a new chunker
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            overlap: overlap.min(chunk_size / 2),
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Split text into chunks
    pub fn chunk_text(&self, text: &str) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current = String::new();
        let mut current_len = 0usize;

        for sentence in text.split_sentence_bounds() {
            for piece in self.split_oversized(sentence) {
                let piece_len = piece.chars().count();

                if current_len > 0 && current_len + piece_len > self.chunk_size {
                    push_trimmed(&mut chunks, &current);

                    // Start new chunk with overlap, unless it would not fit
                    current = self.get_overlap_text(&current);
                    current_len = current.chars().count();
                    if current_len + piece_len > self.chunk_size {
                        current.clear();
                        current_len = 0;
                    }
                }

                current.push_str(piece);
                current_len += piece_len;
            }
        }

        push_trimmed(&mut chunks, &current);
        chunks
    }

    /// Cut a sentence longer than `chunk_size` into fitting pieces
    fn split_oversized<'a>(&self, sentence: &'a str) -> Vec<&'a str> {
        if sentence.chars().count() <= self.chunk_size {
            return vec![sentence];
        }

        let mut pieces = Vec::new();
        let mut start = 0usize;
        for (count, (idx, _)) in sentence.char_indices().enumerate() {
            if count > 0 && count % self.chunk_size == 0 {
                pieces.push(&sentence[start..idx]);
                start = idx;
            }
        }
        pieces.push(&sentence[start..]);
        pieces
    }

    /// Get overlap text from the end of a chunk
    fn get_overlap_text(&self, text: &str) -> String {
        if self.overlap == 0 {
            return String::new();
        }

        let total = text.chars().count();
        if total <= self.overlap {
            return text.to_string();
        }

        let start = text
            .char_indices()
            .nth(total - self.overlap)
            .map(|(idx, _)| idx)
            .unwrap_or(0);
        let overlap_text = &text[start..];

        // Fall back to word boundary
        match overlap_text.find(' ') {
            Some(pos) => overlap_text[pos + 1..].to_string(),
            None => overlap_text.to_string(),
        }
    }
}

fn push_trimmed(chunks: &mut Vec<String>, text: &str) {
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}
