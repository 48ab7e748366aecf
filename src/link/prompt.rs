// src/link/prompt.rs

use std::io::Read;

use crate::constants::LINK_PROMPT;
use crate::error::Result;

const READ_CHUNK: usize = 256;

/// Position of the first prompt in `buf`.
pub fn find_prompt(buf: &[u8]) -> Option<usize> {
    buf.windows(LINK_PROMPT.len())
        .position(|window| window == LINK_PROMPT)
}

/// Splits a byte stream into prompt-terminated responses.
///
/// Bytes read past a prompt are kept for the next response.
#[derive(Debug)]
pub struct PromptReader<S> {
    stream: S,
    pending: Vec<u8>,
}

impl<S: Read> PromptReader<S> {
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            pending: Vec::new(),
        }
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    pub fn into_inner(self) -> S {
        self.stream
    }

    /// Everything up to the next prompt, prompt excluded.
    /// `None` when the stream ends first; the partial bytes are discarded.
    pub fn read_until_prompt(&mut self) -> Result<Option<Vec<u8>>> {
        let mut scanned = 0;
        loop {
            if let Some(pos) = find_prompt(&self.pending[scanned..]) {
                let end = scanned + pos;
                let response = self.pending[..end].to_vec();
                self.pending.drain(..end + LINK_PROMPT.len());
                return Ok(Some(response));
            }
            // A prompt may straddle two reads.
            scanned = self.pending.len().saturating_sub(LINK_PROMPT.len() - 1);

            let mut chunk = [0u8; READ_CHUNK];
            let read = self.stream.read(&mut chunk)?;
            if read == 0 {
                self.pending.clear();
                return Ok(None);
            }
            self.pending.extend_from_slice(&chunk[..read]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Hands out at most `chunk` bytes per read.
    struct Trickle {
        data: Vec<u8>,
        pos: usize,
        chunk: usize,
    }

    impl Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let n = self.chunk.min(buf.len()).min(self.data.len() - self.pos);
            buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    #[test]
    fn finds_prompt() {
        assert_eq!(find_prompt(b"abc> \r\n"), Some(3));
        assert_eq!(find_prompt(b"a > b\r\n"), None);
        assert_eq!(find_prompt(b"> \r"), None);
    }

    #[test]
    fn splits_consecutive_responses() {
        let mut reader = PromptReader::new(Cursor::new(b"> \r\nline1\r\nline2\r\n> \r\ntail".to_vec()));
        assert_eq!(reader.read_until_prompt().unwrap(), Some(Vec::new()));
        assert_eq!(
            reader.read_until_prompt().unwrap(),
            Some(b"line1\r\nline2\r\n".to_vec())
        );
        assert_eq!(reader.read_until_prompt().unwrap(), None);
    }

    #[test]
    fn prompt_split_across_reads() {
        let mut reader = PromptReader::new(Trickle {
            data: b"2014/10/1,0:2:2,4.1\r\n> \r\n".to_vec(),
            pos: 0,
            chunk: 3,
        });
        assert_eq!(
            reader.read_until_prompt().unwrap(),
            Some(b"2014/10/1,0:2:2,4.1\r\n".to_vec())
        );
    }

    #[test]
    fn greater_than_inside_data_is_not_a_prompt() {
        let mut reader = PromptReader::new(Cursor::new(b"a>b > x\r\n> \r\n".to_vec()));
        assert_eq!(
            reader.read_until_prompt().unwrap(),
            Some(b"a>b > x\r\n".to_vec())
        );
    }
}

// src/link/prompt.rs
