//! Program input adapter.
//!
//! One immutable byte buffer with two independent read-heads: a raw byte
//! position consumed by `~`, and a queue of whitespace-delimited tokens
//! consumed by `&`. The token queue is split once, from the whole buffer,
//! at construction; consuming a byte never affects the token queue and
//! vice versa.

use std::collections::VecDeque;

/// Input buffer with independent character and integer read-heads.
pub struct InputStream {
    bytes: Vec<u8>,
    pos: usize,
    tokens: VecDeque<String>,
}

impl InputStream {
    /// Wrap a byte buffer, pre-splitting the integer token queue.
    pub fn new(data: Vec<u8>) -> Self {
        let tokens = String::from_utf8_lossy(&data)
            .split_whitespace()
            .map(str::to_owned)
            .collect();
        Self {
            bytes: data,
            pos: 0,
            tokens,
        }
    }

    /// An exhausted stream.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Read the next raw byte, or `None` once the buffer is exhausted.
    pub fn read_byte(&mut self) -> Option<u8> {
        let byte = self.bytes.get(self.pos).copied()?;
        self.pos += 1;
        Some(byte)
    }

    /// Read the next whitespace-delimited token as an integer.
    ///
    /// Returns `None` when the queue is exhausted or the token does not
    /// parse as an `i64`; the token is consumed either way.
    pub fn read_int_token(&mut self) -> Option<i64> {
        self.tokens.pop_front()?.parse().ok()
    }
}
