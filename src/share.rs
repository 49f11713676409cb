//! Shareable round tokens.
//!
//! A round is encoded as the concatenation of each verse identifier truncated
//! or padded to exactly two characters, in question order. The encoding is
//! lossy: verses sharing a two-character prefix collapse onto the same chunk,
//! and resolution picks the first match. Known limitation, kept for link
//! brevity.

use crate::types::Verse;

/// Characters per encoded verse identifier
pub const CHUNK_LEN: usize = 2;

/// Padding for identifiers shorter than a chunk
const FILLER: char = '_';

/// Truncate or pad a verse identifier to exactly one chunk
pub fn short_id(id: &str) -> String {
    let mut chunk: String = id.chars().take(CHUNK_LEN).collect();
    for _ in chunk.chars().count()..CHUNK_LEN {
        chunk.push(FILLER);
    }
    chunk
}

/// Encode a round as a token, one chunk per verse in question order
pub fn encode_round(verses: &[Verse]) -> String {
    verses.iter().map(|v| short_id(v.id())).collect()
}

/// Decode a token back into ordered truncated identifiers.
/// Tokens of zero or odd character length decode to nothing.
pub fn decode_token(token: &str) -> Vec<String> {
    let chars: Vec<char> = token.chars().collect();
    if chars.is_empty() || chars.len() % CHUNK_LEN != 0 {
        return Vec::new();
    }
    chars
        .chunks(CHUNK_LEN)
        .map(|chunk| chunk.iter().collect())
        .collect()
}
