//! Splitting long documents into chunks for extraction.
//!
//! All lengths are counted in characters, never bytes, so a chunk boundary can
//! not fall inside a multi-byte character.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::ChunkOptions;
use crate::errors::{ExtractionError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    pub text: String,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkSet {
    pub chunks: Vec<TextChunk>,
    pub total_chunks: usize,
}

impl ChunkSet {
    pub fn new(chunks: Vec<TextChunk>) -> Self {
        Self {
            total_chunks: chunks.len(),
            chunks,
        }
    }
}

pub trait Chunker: Send + Sync {
    fn chunk(&self, text: &str, options: &ChunkOptions) -> Result<ChunkSet>;
}

static PARAGRAPH_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n[ \t]*\n").expect("static regex"));
static SENTENCE_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[.!?]["')\]]*\s+"#).expect("static regex"));

const PARAGRAPH_JOIN: &str = "\n\n";
const SENTENCE_JOIN: &str = " ";

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Packs paragraphs into chunks, falling back to sentences and finally to raw
/// character runs for paragraphs that do not fit. Each chunk holds at most
/// `max_chunk_chars` of new text, preceded by up to `overlap_chars` of trailing
/// context from the previous chunk.
#[derive(Debug, Default, Clone, Copy)]
pub struct ParagraphChunker;

impl ParagraphChunker {
    fn sentences(paragraph: &str) -> Vec<&str> {
        let mut sentences = Vec::new();
        let mut start = 0;
        for m in SENTENCE_END.find_iter(paragraph) {
            let sentence = paragraph[start..m.end()].trim();
            if !sentence.is_empty() {
                sentences.push(sentence);
            }
            start = m.end();
        }
        let tail = paragraph[start..].trim();
        if !tail.is_empty() {
            sentences.push(tail);
        }
        sentences
    }

    fn hard_split(text: &str, max: usize) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        chars.chunks(max).map(|piece| piece.iter().collect()).collect()
    }

    /// Pieces no longer than `max`, each with the separator that joins it to
    /// the previous piece.
    fn units(text: &str, max: usize) -> Vec<(String, &'static str)> {
        let mut units = Vec::new();
        for paragraph in PARAGRAPH_BREAK.split(text) {
            let paragraph = paragraph.trim();
            if paragraph.is_empty() {
                continue;
            }
            if char_len(paragraph) <= max {
                units.push((paragraph.to_string(), PARAGRAPH_JOIN));
                continue;
            }

            let mut joiner = PARAGRAPH_JOIN;
            for sentence in Self::sentences(paragraph) {
                if char_len(sentence) <= max {
                    units.push((sentence.to_string(), joiner));
                } else {
                    for (i, piece) in Self::hard_split(sentence, max).into_iter().enumerate() {
                        units.push((piece, if i == 0 { joiner } else { "" }));
                    }
                }
                joiner = SENTENCE_JOIN;
            }
        }
        units
    }

    /// Last `overlap` characters of `text`, advanced to a word boundary.
    fn overlap_tail(text: &str, overlap: usize) -> String {
        if overlap == 0 {
            return String::new();
        }
        let total = char_len(text);
        if total <= overlap {
            return text.trim().to_string();
        }
        let start = text
            .char_indices()
            .nth(total - overlap)
            .map(|(i, _)| i)
            .unwrap_or(0);
        let tail = &text[start..];
        match tail.find(char::is_whitespace) {
            Some(pos) if !tail[pos..].trim().is_empty() => tail[pos..].trim().to_string(),
            _ => tail.trim().to_string(),
        }
    }

    fn flush(chunks: &mut Vec<TextChunk>, body: &mut String, carry: &mut String, overlap: usize) {
        let text = if carry.is_empty() {
            body.clone()
        } else {
            format!("{} {}", carry, body)
        };
        chunks.push(TextChunk {
            text,
            index: chunks.len(),
        });
        *carry = Self::overlap_tail(body, overlap);
        body.clear();
    }
}

impl Chunker for ParagraphChunker {
    fn chunk(&self, text: &str, options: &ChunkOptions) -> Result<ChunkSet> {
        let max = options.max_chunk_chars;
        if max == 0 {
            return Err(ExtractionError::Chunking(
                "max_chunk_chars must be greater than zero".to_string(),
            ));
        }
        if options.overlap_chars >= max {
            return Err(ExtractionError::Chunking(format!(
                "overlap_chars ({}) must be smaller than max_chunk_chars ({})",
                options.overlap_chars, max
            )));
        }

        let mut chunks = Vec::new();
        let mut body = String::new();
        let mut body_len = 0;
        let mut carry = String::new();

        for (unit, joiner) in Self::units(text, max) {
            let unit_len = char_len(&unit);
            if !body.is_empty() && body_len + char_len(joiner) + unit_len > max {
                Self::flush(&mut chunks, &mut body, &mut carry, options.overlap_chars);
                body_len = 0;
            }
            if !body.is_empty() {
                body.push_str(joiner);
                body_len += char_len(joiner);
            }
            body.push_str(&unit);
            body_len += unit_len;
        }
        if !body.is_empty() {
            Self::flush(&mut chunks, &mut body, &mut carry, options.overlap_chars);
        }

        tracing::debug!(
            "Chunked {} chars into {} chunks",
            char_len(text),
            chunks.len()
        );
        Ok(ChunkSet::new(chunks))
    }
}
